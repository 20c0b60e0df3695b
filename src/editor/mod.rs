//! エディタモジュール
//!
//! 編集履歴とクリップボード

pub mod clipboard;
pub mod history;

// 公開API
pub use clipboard::{Clipboard, LocalClipboard, SystemClipboard};
pub use history::{AtomicEdit, HistoryCommandKind, HistoryEntry, HistoryStack};
