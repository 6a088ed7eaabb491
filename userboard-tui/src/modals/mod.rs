//! Modal dialogs.

mod confirm;

pub use confirm::ConfirmModal;
