use eframe::egui;
use parking_lot::Mutex;
use std::sync::Arc;

mod modals;
use modals::{ApiKeyDialog, Modal};

mod state;
pub use state::*;

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "pdf", "docx"];

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let state = match AppState::from_disk() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to start: {:#}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        base_url = %state.settings.base_url,
        config = ?state.dirs.config,
        "Agent Desk starting"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([640.0, 520.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Agent Desk",
        options,
        Box::new(|_cc| {
            Box::new(AgentDeskApp {
                state: Arc::new(Mutex::new(state)),
                key_dialog: ApiKeyDialog::new("api_key_dialog"),
            })
        }),
    )
}

struct AgentDeskApp {
    state: Arc<Mutex<AppState>>,
    key_dialog: ApiKeyDialog,
}

impl eframe::App for AgentDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut guard = self.state.lock();
        let s = &mut *guard;

        // Poll for the completion (non-blocking)
        s.poll();
        if s.is_busy() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Agent Desk");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        s.show_settings = !s.show_settings;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            match &s.status {
                Some(status) if status.is_error => {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), &status.message);
                }
                Some(status) => {
                    ui.label(&status.message);
                }
                None => {
                    ui.label(egui::RichText::new("Ready").weak());
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                task_section(ui, s);
                ui.separator();
                attachments_section(ui, s);
                ui.separator();
                run_section(ui, s);
                ui.separator();
                result_section(ui, s);
            });
        });

        if s.show_settings {
            settings_window(ctx, s);
        }

        if s.show_key_prompt && !self.key_dialog.is_open() {
            self.key_dialog.open();
        }
        if self.key_dialog.update(ctx) {
            match self.key_dialog.take_result().take_value() {
                Some(key) => {
                    s.set_api_key(key);
                }
                None => s.show_key_prompt = false,
            }
        }
    }
}

fn task_section(ui: &mut egui::Ui, s: &mut AppState) {
    let agents: Vec<(&'static str, &'static str)> = s
        .host
        .registry()
        .agents()
        .iter()
        .map(|a| (a.id, a.label))
        .collect();
    let Some(agent) = s.current_agent() else {
        return;
    };
    let label = agent.label;
    let placeholder = agent.placeholder;
    let example = agent.example;
    let options = agent.sub_options;
    let option_kind = agent.prompt.required_option();

    ui.horizontal(|ui| {
        ui.label("Task:");
        let mut picked = None;
        egui::ComboBox::from_id_source("agent_select")
            .selected_text(label)
            .width(220.0)
            .show_ui(ui, |ui| {
                for (id, agent_label) in &agents {
                    if ui.selectable_label(*id == s.agent_id, *agent_label).clicked() {
                        picked = Some(*id);
                    }
                }
            });
        if let Some(id) = picked {
            s.select_agent(id);
        }

        if let Some(kind) = option_kind {
            ui.add_space(12.0);
            ui.label(format!("{}:", kind.label()));
            egui::ComboBox::from_id_source(("sub_option", s.agent_id))
                .selected_text(s.sub_option.unwrap_or("-"))
                .show_ui(ui, |ui| {
                    for opt in options {
                        ui.selectable_value(&mut s.sub_option, Some(*opt), *opt);
                    }
                });
        }
    });

    ui.add_space(4.0);
    ui.label(egui::RichText::new(format!("Example: {}", example)).small().weak());
    ui.add_space(4.0);
    ui.add(
        egui::TextEdit::multiline(&mut s.input_text)
            .hint_text(placeholder)
            .desired_rows(8)
            .desired_width(f32::INFINITY),
    );
}

fn attachments_section(ui: &mut egui::Ui, s: &mut AppState) {
    ui.horizontal(|ui| {
        let can_attach = !s.attachments.is_full() && !s.is_busy();
        if ui
            .add_enabled(can_attach, egui::Button::new("📎 Attach file…"))
            .clicked()
        {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Documents", DOCUMENT_EXTENSIONS)
                .add_filter("All files", &["*"])
                .set_title("Attach a document")
                .pick_file()
            {
                s.attach_file(&path);
            }
        }
        ui.label(
            egui::RichText::new(format!(
                "{}/{} attached",
                s.attachments.len(),
                shared::MAX_ATTACHMENTS
            ))
            .weak(),
        );
    });

    let mut remove = None;
    for (i, doc) in s.attachments.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("📄 {} ({} chars)", doc.filename, doc.text.chars().count()));
            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        s.remove_attachment(i);
    }
}

fn run_section(ui: &mut egui::Ui, s: &mut AppState) {
    ui.horizontal(|ui| {
        let busy = s.is_busy();
        if ui
            .add_enabled(!busy, egui::Button::new("▶ Run"))
            .clicked()
        {
            s.run();
        }
        if busy {
            ui.spinner();
            ui.label("Working…");
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!busy, egui::Button::new("Clear all")).clicked() {
                s.clear_all();
            }
        });
    });
}

fn result_section(ui: &mut egui::Ui, s: &mut AppState) {
    ui.horizontal(|ui| {
        ui.strong("Result");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let enabled = s.has_result();
            if ui.add_enabled(enabled, egui::Button::new("💾 Save…")).clicked() {
                let default_name = format!(
                    "agent_desk_result_{}.txt",
                    chrono::Local::now().format("%Y%m%d_%H%M%S")
                );
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Text", &["txt"])
                    .set_file_name(default_name)
                    .save_file()
                {
                    s.save_result_to(&path);
                }
            }
            if ui.add_enabled(enabled, egui::Button::new("📋 Copy")).clicked() {
                s.copy_result();
            }
        });
    });

    if s.result_is_error {
        ui.colored_label(egui::Color32::from_rgb(220, 80, 80), &s.result_text);
    } else {
        let mut view = s.result_text.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut view)
                .desired_rows(12)
                .desired_width(f32::INFINITY),
        );
    }
}

fn settings_window(ctx: &egui::Context, s: &mut AppState) {
    let mut open = true;
    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            ui.set_min_width(360.0);

            ui.strong("API key");
            ui.horizontal(|ui| {
                let state = if s.host.has_credential() { "configured" } else { "not set" };
                ui.label(state);
                if ui.button("Change API key…").clicked() {
                    s.show_key_prompt = true;
                }
            });

            ui.add_space(8.0);
            ui.strong("Server");
            ui.label(&s.settings.base_url);

            ui.add_space(8.0);
            ui.strong("Models");
            egui::Grid::new("models_grid").num_columns(2).show(ui, |ui| {
                for tier in shared::ModelTier::all() {
                    ui.label(tier.as_str());
                    ui.label(s.host.catalog().model_name(*tier));
                    ui.end_row();
                }
            });

            ui.add_space(8.0);
            ui.strong("Info");
            ui.label(format!("Agent Desk {}", env!("CARGO_PKG_VERSION")));
            ui.label(
                egui::RichText::new(format!("Settings: {}", s.dirs.settings_path().display()))
                    .small()
                    .weak(),
            );
            let history = s.history_entries();
            ui.label(
                egui::RichText::new(format!(
                    "History: {} saved results in {}",
                    history.len(),
                    s.dirs.data.display()
                ))
                .small()
                .weak(),
            );
        });
    if !open {
        s.show_settings = false;
    }
}
