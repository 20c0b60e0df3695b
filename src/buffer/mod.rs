//! バッファ管理モジュール
//!
//! テキストデータの保持、カーソル位置、選択範囲、編集操作を提供

pub mod cursor;
pub mod editor;
pub mod gap_buffer;
pub mod navigation;

// 公開API
pub use crate::error::EditError;
pub use cursor::{CursorPosition, Selection};
pub use editor::TextEditor;
pub use gap_buffer::GapBuffer;
pub use navigation::{NavigationAction, NavigationTarget};
