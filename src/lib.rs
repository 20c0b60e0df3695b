//! modern-text-editor - Minimal single-window terminal text editor
//!
//! メニューバー、テキストエリア、ステータスバーからなる1ウィンドウのエディタ

// コアモジュール
pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod input;

// 表示層
pub mod ui;

// 公開API
pub use app::{App, ShellState};
pub use config::{EditorConfig, SavePolicy};
pub use error::{EditorError, Result};
pub use frontend::TuiApplication;
