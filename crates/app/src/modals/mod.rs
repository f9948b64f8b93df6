//! Modal dialogs for the application.

pub mod api_key_dialog;

pub use api_key_dialog::ApiKeyDialog;

use egui::Context;

/// Trait for modal dialogs.
pub trait Modal {
    /// Render the modal. Returns true once it closes.
    fn update(&mut self, ctx: &Context) -> bool;

    fn is_open(&self) -> bool;

    fn open(&mut self);
}

/// Result from a modal dialog.
#[derive(Debug, Clone)]
pub enum ModalResult<T> {
    /// User hasn't made a decision yet
    Pending,
    Confirmed(T),
    Cancelled,
}

impl<T> ModalResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ModalResult::Pending)
    }

    pub fn take_value(self) -> Option<T> {
        match self {
            ModalResult::Confirmed(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_value() {
        assert_eq!(ModalResult::Confirmed(3).take_value(), Some(3));
        assert_eq!(ModalResult::<u8>::Cancelled.take_value(), None);
        assert!(ModalResult::<u8>::Pending.is_pending());
    }
}
