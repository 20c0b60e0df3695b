//! ウィンドウタイトル

use crate::file::display_name;
use std::fmt;
use std::path::Path;

/// "{ファイル名} - {アプリ名}" 形式のタイトル
pub fn format_title(document: Option<&Path>, untitled_name: &str, app_name: &str) -> String {
    let name = document
        .map(display_name)
        .unwrap_or_else(|| untitled_name.to_string());
    format!("{} - {}", name, app_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTitle {
    app_name: String,
    untitled_name: String,
    text: String,
}

impl WindowTitle {
    /// 起動直後のタイトル（アプリ名のみ）
    pub fn new(app_name: &str, untitled_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            untitled_name: untitled_name.to_string(),
            text: app_name.to_string(),
        }
    }

    /// 文書パスからタイトルを再計算
    pub fn update(&mut self, document: Option<&Path>) {
        self.text = format_title(document, &self.untitled_name, &self.app_name);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for WindowTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
