//! 入力処理モジュール
//!
//! コマンド定義とキーバインドを提供

pub mod commands;
pub mod keybinding;

// 公開API
pub use commands::{Command, CommandOutcome};
pub use keybinding::{Action, EditAction, Key, KeyCode, KeyMap, KeyModifiers};
