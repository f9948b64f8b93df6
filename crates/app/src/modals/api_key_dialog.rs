//! API key entry dialog.
//!
//! Masked input held in `Zeroizing` memory. Enter submits, Escape cancels.

use super::{Modal, ModalResult};
use egui::{Align2, Area, Context, Id, Key, RichText, TextEdit, Vec2};
use zeroize::Zeroizing;

pub struct ApiKeyDialog {
    is_open: bool,
    key: Zeroizing<String>,
    result: ModalResult<String>,
    message: String,
    id: Id,
}

impl ApiKeyDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            key: Zeroizing::new(String::new()),
            result: ModalResult::Pending,
            message: String::new(),
            id: Id::new(id),
        }
    }

    pub fn open_with_message(&mut self, message: impl Into<String>) {
        self.is_open = true;
        self.message = message.into();
        self.key = Zeroizing::new(String::new());
        self.result = ModalResult::Pending;
    }

    /// Take the result, leaving `Pending` behind.
    pub fn take_result(&mut self) -> ModalResult<String> {
        std::mem::replace(&mut self.result, ModalResult::Pending)
    }

    fn confirm(&mut self) {
        let key = std::mem::take(&mut *self.key);
        self.result = ModalResult::Confirmed(key);
    }
}

impl Modal for ApiKeyDialog {
    fn update(&mut self, ctx: &Context) -> bool {
        if !self.is_open {
            return false;
        }

        let mut should_close = false;

        Area::new(self.id.with("overlay"))
            .anchor(Align2::LEFT_TOP, Vec2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(180));
            });

        egui::Window::new("🔑 API Key")
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(380.0);
                ui.add_space(8.0);

                if !self.message.is_empty() {
                    ui.label(&self.message);
                    ui.add_space(8.0);
                }

                ui.horizontal(|ui| {
                    ui.label("Key:");
                    let response = ui.add(
                        TextEdit::singleline(&mut *self.key)
                            .password(true)
                            .desired_width(260.0)
                            .hint_text("sk-..."),
                    );
                    response.request_focus();

                    if response.lost_focus()
                        && ui.input(|i| i.key_pressed(Key::Enter))
                        && !self.key.trim().is_empty()
                    {
                        self.confirm();
                        should_close = true;
                    }
                });

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.result = ModalResult::Cancelled;
                        should_close = true;
                    }

                    ui.add_space(8.0);

                    let save_enabled = !self.key.trim().is_empty();
                    if ui.add_enabled(save_enabled, egui::Button::new("Save")).clicked() {
                        self.confirm();
                        should_close = true;
                    }
                });

                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.label(RichText::new("Stored only on this computer").small().weak());
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.result = ModalResult::Cancelled;
            should_close = true;
        }

        if should_close {
            self.is_open = false;
            self.key = Zeroizing::new(String::new());
        }

        should_close
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn open(&mut self) {
        self.open_with_message("Enter the API key for the chat server:");
    }
}
