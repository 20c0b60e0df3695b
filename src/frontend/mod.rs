pub mod tui;

pub use tui::{restore_terminal, TuiApplication};
