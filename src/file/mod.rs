//! ファイル操作モジュール
//!
//! - ファイル全体の読み書き（変換なし、アトミック保存）
//! - ダイアログ入力のパス展開
//! - ダイアログのファイル種別フィルタ

pub mod filter;
pub mod gateway;
pub mod path;

pub use filter::FileFilter;
pub use gateway::{FileGateway, FsGateway};
pub use path::{display_name, expand_path, with_default_extension};
