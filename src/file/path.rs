//! パス処理ユーティリティ
//!
//! ダイアログ入力の展開、既定拡張子の付与、タイトル用のファイル名取得

use crate::error::FileError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// ユーザー入力のパスを展開する
///
/// `~` と `$VAR` を展開し、相対パスは `base` からの相対として解決する。
pub fn expand_path(input: &str, base: &Path) -> Result<PathBuf, FileError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FileError::InvalidPath {
            path: input.to_string(),
        });
    }

    let expanded: Cow<'_, str> = shellexpand::full(trimmed).map_err(|err| FileError::InvalidPath {
        path: format!("{} ({})", trimmed, err),
    })?;

    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base.join(path))
    }
}

/// 拡張子がなければ既定拡張子を付与する
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() || path.extension().is_some() {
        return path.to_path_buf();
    }

    let mut with_ext = path.to_path_buf();
    with_ext.set_extension(extension);
    with_ext
}

/// タイトル表示用のファイル名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/work/docs");
        assert_eq!(
            expand_path("notes.txt", base).unwrap(),
            PathBuf::from("/work/docs/notes.txt")
        );
        assert_eq!(
            expand_path("  /etc/hosts  ", base).unwrap(),
            PathBuf::from("/etc/hosts")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_path("~/notes.txt", Path::new("/")).unwrap();
            assert_eq!(expanded, home.join("notes.txt"));
        }
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(matches!(
            expand_path("   ", Path::new("/")),
            Err(FileError::InvalidPath { .. })
        ));
    }

    #[test]
    fn default_extension_only_when_missing() {
        assert_eq!(
            with_default_extension(Path::new("/tmp/draft"), ".txt"),
            PathBuf::from("/tmp/draft.txt")
        );
        assert_eq!(
            with_default_extension(Path::new("/tmp/draft.md"), ".txt"),
            PathBuf::from("/tmp/draft.md")
        );
        assert_eq!(
            with_default_extension(Path::new("/tmp/draft"), ""),
            PathBuf::from("/tmp/draft")
        );
    }

    #[test]
    fn display_name_is_basename() {
        assert_eq!(display_name(Path::new("/home/user/todo.txt")), "todo.txt");
        assert_eq!(display_name(Path::new("todo.txt")), "todo.txt");
    }
}
