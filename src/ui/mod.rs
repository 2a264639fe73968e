pub mod formatting;
pub mod updates;

pub use updates::{set_status, show_error, update_ui_from_state, StatusLevel};
