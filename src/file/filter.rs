//! ファイルダイアログ用のファイル種別フィルタ
//!
//! `*.txt` のようなグロブパターンを正規表現に変換して照合する

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// ファイル種別フィルタ（例: "Text files (*.txt)"）
#[derive(Debug, Clone)]
pub struct FileFilter {
    label: String,
    patterns: Vec<String>,
    matcher: Regex,
}

impl FileFilter {
    /// ラベルとグロブパターンからフィルタを作成
    pub fn new<S: AsRef<str>>(label: &str, patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: format!("file filter patterns for '{}'", label),
            });
        }

        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let alternatives: Vec<String> = patterns.iter().map(|p| glob_to_regex(p)).collect();
        let source = format!("^(?:{})$", alternatives.join("|"));

        let matcher = RegexBuilder::new(&source)
            .case_insensitive(cfg!(windows))
            .build()
            .map_err(|err| ConfigError::InvalidValue {
                key: format!("file filter '{}'", label),
                value: err.to_string(),
            })?;

        Ok(Self {
            label: label.to_string(),
            patterns,
            matcher,
        })
    }

    /// テキストファイル（*.txt）
    pub fn text_files() -> Self {
        Self::new("Text files", &["*.txt"]).expect("built-in text filter is valid")
    }

    /// 全ファイル（*.*）
    pub fn all_files() -> Self {
        Self::new("All files", &["*.*"]).expect("built-in catch-all filter is valid")
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// 表示用ラベル
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label, self.patterns.join(";"))
    }

    /// ファイル名がフィルタに一致するか
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matcher.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

/// `*.*` は拡張子の有無にかかわらず全ファイルに一致させる（Windows の慣例）
fn glob_to_regex(pattern: &str) -> String {
    if pattern == "*.*" || pattern == "*" {
        return ".*".to_string();
    }

    let mut out = String::with_capacity(pattern.len() * 2);
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_filter_matches_only_txt() {
        let filter = FileFilter::text_files();
        assert!(filter.matches(Path::new("/tmp/notes.txt")));
        assert!(!filter.matches(Path::new("/tmp/notes.md")));
        assert!(!filter.matches(Path::new("/tmp/txt")));
        assert_eq!(filter.display_label(), "Text files (*.txt)");
    }

    #[test]
    fn all_files_filter_matches_files_without_extension() {
        let filter = FileFilter::all_files();
        assert!(filter.matches(Path::new("Makefile")));
        assert!(filter.matches(Path::new("archive.tar.gz")));
    }

    #[test]
    fn multiple_patterns_and_question_mark() {
        let filter = FileFilter::new("Logs", &["*.log", "trace?.out"]).unwrap();
        assert!(filter.matches(Path::new("app.log")));
        assert!(filter.matches(Path::new("trace1.out")));
        assert!(!filter.matches(Path::new("trace12.out")));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let filter = FileFilter::new("Plus", &["a+b.txt"]).unwrap();
        assert!(filter.matches(Path::new("a+b.txt")));
        assert!(!filter.matches(Path::new("aab.txt")));
    }

    #[test]
    fn empty_pattern_list_is_rejected() {
        let patterns: [&str; 0] = [];
        assert!(matches!(
            FileFilter::new("Nothing", &patterns),
            Err(ConfigError::MissingRequired { .. })
        ));
    }
}
