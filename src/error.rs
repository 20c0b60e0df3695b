//! エラーハンドリングシステム
//!
//! エディタ全体で使用される統一されたエラー型と、ユーザー向け通知への変換を定義

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// 通知の既定表示時間
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// ファイル操作エラー
    #[error("{0}")]
    File(#[from] FileError),

    /// 編集操作エラー
    #[error("{0}")]
    Edit(#[from] EditError),

    /// UI操作エラー
    #[error("{0}")]
    Ui(#[from] UiError),

    /// 設定エラー
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Not a UTF-8 text file: {path}")]
    Encoding { path: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// `std::io::Error` をパス付きのファイルエラーに変換
    pub fn from_io(path: &Path, error: &io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FileError::Encoding { path },
            _ => FileError::Io {
                path,
                message: error.to_string(),
            },
        }
    }

    /// 対象パス
    pub fn path(&self) -> &str {
        match self {
            FileError::NotFound { path }
            | FileError::PermissionDenied { path }
            | FileError::InvalidPath { path }
            | FileError::Encoding { path }
            | FileError::Io { path, .. } => path,
        }
    }
}

/// 編集操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Position {position} is out of bounds (length {len})")]
    OutOfBounds { position: usize, len: usize },

    #[error("Invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Terminal operation failed ({context}): {message}")]
    Terminal { context: String, message: String },

    #[error("Screen size too small: {width}x{height}")]
    ScreenTooSmall { width: u16, height: u16 },
}

impl UiError {
    pub fn terminal(context: &str, err: impl std::fmt::Display) -> Self {
        UiError::Terminal {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EditorError>;

/// 通知レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// ステータスバーに表示する一時的な通知
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub start_time: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Error)
    }

    /// エラーからユーザー向けメッセージを組み立てる
    pub fn from_error(context: &str, error: &EditorError) -> Self {
        Self::error(format!("{}: {}", context, error))
    }

    fn with_level(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            start_time: Instant::now(),
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// パニックハンドラの設定
///
/// raw モードと代替スクリーンを解除してからパニック内容を出力する。
pub fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        crate::frontend::restore_terminal();
        log::error!("panic: {}", panic_info);
        default_hook(panic_info);
    }));
}
