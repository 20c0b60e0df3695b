//! エディタ設定
//!
//! すべてコード内の既定値から構築する。ファイルや環境変数からは読まない。

use crate::error::ConfigError;
use crate::file::FileFilter;
use crate::ui::theme::Theme;
use log::LevelFilter;
use std::time::Duration;

/// アプリケーション名（ウィンドウタイトルの後半）
pub const APP_NAME: &str = "Modern Text Editor";
/// 未保存文書のタイトル
pub const UNTITLED_NAME: &str = "New File";

/// Save コマンドの振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// 毎回保存ダイアログを表示する
    #[default]
    AlwaysPrompt,
    /// 既知のパスがあればダイアログなしで上書きする
    ReuseKnownPath,
}

/// エディタ全体の設定
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub app_name: String,
    pub untitled_name: String,
    /// 保存ダイアログで補う拡張子（ドットなし）
    pub default_extension: String,
    /// ファイルダイアログのフィルタ（先頭が既定）
    pub file_filters: Vec<FileFilter>,
    pub save_policy: SavePolicy,
    pub tab_width: usize,
    /// 単語単位の折り返し（無効時は横スクロール）
    pub word_wrap: bool,
    pub notification_duration: Duration,
    pub log_level: LevelFilter,
    pub use_system_clipboard: bool,
    pub theme: Theme,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            untitled_name: UNTITLED_NAME.to_string(),
            default_extension: "txt".to_string(),
            file_filters: vec![FileFilter::text_files(), FileFilter::all_files()],
            save_policy: SavePolicy::AlwaysPrompt,
            tab_width: 4,
            word_wrap: true,
            notification_duration: crate::error::NOTIFICATION_DURATION,
            log_level: LevelFilter::Info,
            use_system_clipboard: true,
            theme: Theme::default(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_policy(mut self, policy: SavePolicy) -> Self {
        self.save_policy = policy;
        self
    }

    pub fn with_system_clipboard(mut self, enabled: bool) -> Self {
        self.use_system_clipboard = enabled;
        self
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    pub fn with_word_wrap(mut self, enabled: bool) -> Self {
        self.word_wrap = enabled;
        self
    }

    pub fn with_file_filters(mut self, filters: Vec<FileFilter>) -> Self {
        self.file_filters = filters;
        self
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// 設定値の検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "app_name".to_string(),
            });
        }
        if self.untitled_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "untitled_name".to_string(),
            });
        }
        if self.file_filters.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "file_filters".to_string(),
            });
        }
        if self.tab_width == 0 || self.tab_width > 16 {
            return Err(ConfigError::InvalidValue {
                key: "tab_width".to_string(),
                value: self.tab_width.to_string(),
            });
        }
        if self.default_extension.starts_with('.')
            || self.default_extension.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(ConfigError::InvalidValue {
                key: "default_extension".to_string(),
                value: self.default_extension.clone(),
            });
        }
        Ok(())
    }
}
