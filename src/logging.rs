//! ロギングシステム
//!
//! `log` ファサードの実装。TUI 動作中は端末へ出力できないため、
//! JSON Lines 形式でログファイルへ追記する。

use crate::error::{EditorError, Result};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_DIR_NAME: &str = "modern-text-editor";
const LOG_FILE_NAME: &str = "editor.log";

/// ログファイルへ書き出す1レコード
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    ts: u128,
    level: &'a str,
    target: &'a str,
    message: String,
}

/// ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_file: Option<PathBuf>,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_file: None,
        }
    }

    /// TUI 用ロガー（ファイル出力のみ）
    pub fn for_terminal_ui<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(LevelFilter::Info).with_file_output(path)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// グローバルロガーとして登録
    pub fn init(self) -> Result<()> {
        if let Some(path) = &self.output_file {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| {
                    EditorError::Config(crate::error::ConfigError::InvalidValue {
                        key: "log_file".to_string(),
                        value: format!("{}: {}", path.display(), err),
                    })
                })?;
            }
        }

        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|err| {
            EditorError::Config(crate::error::ConfigError::InvalidValue {
                key: "logger".to_string(),
                value: err.to_string(),
            })
        })?;
        log::set_max_level(level);
        Ok(())
    }

    fn write_line(&self, record: &Record) {
        let line = LogLine {
            ts: timestamp_ms(),
            level: record.level().as_str(),
            target: record.target(),
            message: record.args().to_string(),
        };

        if let Some(path) = &self.output_file {
            let Ok(serialized) = serde_json::to_string(&line) else {
                return;
            };
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", serialized);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_line(record);
        }
    }

    fn flush(&self) {}
}

/// 既定のログファイルパス（ユーザーキャッシュディレクトリ配下）
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_DIR_NAME)
        .join(LOG_FILE_NAME)
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis())
        .unwrap_or_default()
}
