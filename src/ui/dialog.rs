//! ファイルダイアログ
//!
//! 開く/保存の両方で使うモーダルなファイル選択。ディレクトリ一覧、
//! ファイル名入力、種別フィルタを持つ。

use crate::file::{expand_path, with_default_extension, FileFilter};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs;
use std::path::{Path, PathBuf};

/// ダイアログの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
}

/// キー入力の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    /// 入力継続
    Pending,
    /// パスが確定した
    Chosen(PathBuf),
    /// キャンセルされた
    Cancelled,
}

/// 一覧の1項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    /// 一覧表示用の名前（ディレクトリは末尾に区切り文字）
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

const PARENT: &str = "..";

#[derive(Debug, Clone)]
pub struct FileDialog {
    kind: DialogKind,
    directory: PathBuf,
    entries: Vec<DirEntry>,
    selected: Option<usize>,
    input: String,
    filters: Vec<FileFilter>,
    active_filter: usize,
    default_extension: Option<String>,
    error: Option<String>,
}

impl FileDialog {
    /// 開くダイアログ
    pub fn open(directory: PathBuf, filters: Vec<FileFilter>) -> Self {
        Self::build(DialogKind::Open, directory, filters, None, String::new())
    }

    /// 保存ダイアログ。`suggested` は入力欄の初期値
    pub fn save(
        directory: PathBuf,
        filters: Vec<FileFilter>,
        default_extension: &str,
        suggested: Option<String>,
    ) -> Self {
        Self::build(
            DialogKind::Save,
            directory,
            filters,
            Some(default_extension.to_string()),
            suggested.unwrap_or_default(),
        )
    }

    fn build(
        kind: DialogKind,
        directory: PathBuf,
        filters: Vec<FileFilter>,
        default_extension: Option<String>,
        input: String,
    ) -> Self {
        let filters = if filters.is_empty() {
            vec![FileFilter::all_files()]
        } else {
            filters
        };
        let mut dialog = Self {
            kind,
            directory,
            entries: Vec::new(),
            selected: None,
            input,
            filters,
            active_filter: 0,
            default_extension,
            error: None,
        };
        dialog.refresh();
        dialog
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Open => "Open",
            DialogKind::Save => "Save As",
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn active_filter(&self) -> &FileFilter {
        &self.filters[self.active_filter]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// ディレクトリ一覧を読み直す
    pub fn refresh(&mut self) {
        self.selected = None;
        self.entries.clear();
        if self.directory.parent().is_some() {
            self.entries.push(DirEntry {
                name: PARENT.to_string(),
                is_dir: true,
            });
        }

        let read = match fs::read_dir(&self.directory) {
            Ok(read) => read,
            Err(err) => {
                log::warn!("cannot list {}: {}", self.directory.display(), err);
                self.error = Some(format!("Cannot read {}: {}", self.directory.display(), err));
                return;
            }
        };

        let filter = &self.filters[self.active_filter];
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.path().is_dir();
            if is_dir {
                dirs.push(DirEntry { name, is_dir });
            } else if filter.matches(Path::new(&name)) {
                files.push(DirEntry { name, is_dir });
            }
        }
        dirs.sort_by_key(|entry| entry.name.to_lowercase());
        files.sort_by_key(|entry| entry.name.to_lowercase());
        self.entries.extend(dirs);
        self.entries.extend(files);
    }

    /// ディレクトリを移動
    fn change_directory(&mut self, directory: PathBuf) {
        self.directory = fs::canonicalize(&directory).unwrap_or(directory);
        self.input.clear();
        self.error = None;
        self.refresh();
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, event: &KeyEvent) -> DialogResponse {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return DialogResponse::Pending;
        }

        match event.code {
            KeyCode::Esc => DialogResponse::Cancelled,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_filter = (self.active_filter + 1) % self.filters.len();
                self.refresh();
                DialogResponse::Pending
            }
            KeyCode::Up => {
                self.move_selection(false);
                DialogResponse::Pending
            }
            KeyCode::Down => {
                self.move_selection(true);
                DialogResponse::Pending
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.selected = None;
                DialogResponse::Pending
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                self.selected = None;
                self.error = None;
                DialogResponse::Pending
            }
            _ => DialogResponse::Pending,
        }
    }

    fn move_selection(&mut self, forward: bool) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        let next = match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(index), true) => (index + 1).min(last),
            (Some(index), false) => index.saturating_sub(1),
        };
        self.selected = Some(next);
        self.input = self.entries[next].name.clone();
    }

    /// 入力を確定する
    pub fn submit(&mut self) -> DialogResponse {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return DialogResponse::Pending;
        }

        if input == PARENT {
            if let Some(parent) = self.directory.parent().map(Path::to_path_buf) {
                self.change_directory(parent);
            }
            return DialogResponse::Pending;
        }

        let path = match expand_path(&input, &self.directory) {
            Ok(path) => path,
            Err(err) => {
                self.error = Some(err.to_string());
                return DialogResponse::Pending;
            }
        };

        if path.is_dir() {
            self.change_directory(path);
            return DialogResponse::Pending;
        }

        let path = match (&self.kind, &self.default_extension) {
            (DialogKind::Save, Some(extension)) => with_default_extension(&path, extension),
            _ => path,
        };
        DialogResponse::Chosen(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(dialog: &mut FileDialog, text: &str) {
        for ch in text.chars() {
            dialog.handle_key(&key(KeyCode::Char(ch)));
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("A.txt")).unwrap();
        File::create(dir.path().join("image.png")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    fn names(dialog: &FileDialog) -> Vec<String> {
        dialog.entries().iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn lists_directories_first_and_applies_filter() {
        let dir = fixture();
        let mut dialog = FileDialog::open(
            dir.path().to_path_buf(),
            vec![FileFilter::text_files(), FileFilter::all_files()],
        );
        assert_eq!(names(&dialog), vec!["..", "sub", "A.txt", "b.txt"]);

        dialog.handle_key(&key(KeyCode::Tab));
        assert_eq!(dialog.active_filter().label(), "All files");
        assert_eq!(names(&dialog), vec!["..", "sub", "A.txt", "b.txt", "image.png"]);
    }

    #[test]
    fn typed_name_resolves_against_directory() {
        let dir = fixture();
        let mut dialog = FileDialog::open(dir.path().to_path_buf(), vec![FileFilter::text_files()]);
        type_str(&mut dialog, "b.txt");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter)),
            DialogResponse::Chosen(dir.path().join("b.txt"))
        );
    }

    #[test]
    fn enter_on_directory_descends() {
        let dir = fixture();
        let mut dialog = FileDialog::open(dir.path().to_path_buf(), vec![FileFilter::all_files()]);
        dialog.handle_key(&key(KeyCode::Down));
        dialog.handle_key(&key(KeyCode::Down));
        assert_eq!(dialog.input(), "sub");
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter)), DialogResponse::Pending);
        assert!(dialog.directory().ends_with("sub"));
        assert_eq!(names(&dialog), vec![".."]);

        type_str(&mut dialog, "..");
        dialog.handle_key(&key(KeyCode::Enter));
        assert_eq!(
            fs::canonicalize(dialog.directory()).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn save_dialog_appends_default_extension() {
        let dir = fixture();
        let mut dialog = FileDialog::save(dir.path().to_path_buf(), vec![FileFilter::text_files()], "txt", None);
        type_str(&mut dialog, "notes");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter)),
            DialogResponse::Chosen(dir.path().join("notes.txt"))
        );

        let mut dialog = FileDialog::save(
            dir.path().to_path_buf(),
            vec![FileFilter::text_files()],
            "txt",
            Some("data.csv".to_string()),
        );
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter)),
            DialogResponse::Chosen(dir.path().join("data.csv"))
        );
    }

    #[test]
    fn escape_cancels_and_empty_input_waits() {
        let dir = fixture();
        let mut dialog = FileDialog::open(dir.path().to_path_buf(), vec![FileFilter::text_files()]);
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter)), DialogResponse::Pending);
        assert_eq!(dialog.handle_key(&key(KeyCode::Esc)), DialogResponse::Cancelled);
    }
}
