//! ファイルゲートウェイ
//!
//! ファイル全体の読み込みと書き込み。内容の変換は一切行わない。

use crate::error::{FileError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// ファイル全体の読み書きを行うトレイト
pub trait FileGateway {
    /// ファイル全体をテキストとして読み込む
    fn read(&self, path: &Path) -> Result<String>;

    /// テキスト全体をファイルへ書き込む（既存ファイルは上書き）
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// ローカルファイルシステム実装
#[derive(Debug, Clone)]
pub struct FsGateway {
    atomic_save: bool,
}

impl FsGateway {
    pub fn new() -> Self {
        Self { atomic_save: true }
    }

    /// 一時ファイルを経由せず直接書き込む
    pub fn direct() -> Self {
        Self { atomic_save: false }
    }

    /// アトミック保存（同じディレクトリの一時ファイル経由）
    fn atomic_write(&self, path: &Path, content: &str) -> Result<()> {
        let temp_path = temp_path_for(path)?;
        log::debug!("atomic save: {} via {}", path.display(), temp_path.display());

        fs::write(&temp_path, content.as_bytes()).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            FileError::from_io(path, &err)
        })?;

        if let Ok(metadata) = fs::metadata(path) {
            let _ = fs::set_permissions(&temp_path, metadata.permissions());
        }

        fs::rename(&temp_path, path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            FileError::from_io(path, &err)
        })?;

        Ok(())
    }

    fn direct_write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content.as_bytes()).map_err(|err| FileError::from_io(path, &err).into())
    }
}

impl Default for FsGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FileGateway for FsGateway {
    fn read(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|err| FileError::from_io(path, &err))?;
        if !metadata.is_file() {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).map_err(|err| FileError::from_io(path, &err))?;
        log::info!("read {} ({} bytes)", path.display(), content.len());
        Ok(content)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if path.is_dir() {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            }
            .into());
        }

        let parent_missing = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| !parent.is_dir())
            .unwrap_or(false);
        if parent_missing {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            }
            .into());
        }

        let result = if self.atomic_save {
            self.atomic_write(path, content)
        } else {
            self.direct_write(path, content)
        };

        match &result {
            Ok(()) => log::info!("wrote {} ({} bytes)", path.display(), content.len()),
            Err(err) => log::warn!("write to {} failed: {}", path.display(), err),
        }
        result
    }
}

/// 一意な一時ファイル名を生成（隠しファイル + プロセスID）
fn temp_path_for(original: &Path) -> Result<PathBuf> {
    let filename = original.file_name().ok_or_else(|| FileError::InvalidPath {
        path: original.display().to_string(),
    })?;

    let temp_name = format!(".{}.{}.tmp", filename.to_string_lossy(), std::process::id());
    let temp_path = match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(temp_name),
        _ => PathBuf::from(temp_name),
    };
    Ok(temp_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use tempfile::tempdir;

    #[test]
    fn read_returns_content_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        fs::write(&path, "first\r\nsecond\r\n\u{feff}third").unwrap();

        let content = FsGateway::new().read(&path).unwrap();
        assert_eq!(content, "first\r\nsecond\r\n\u{feff}third");
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = FsGateway::new().read(&path).unwrap_err();
        assert!(matches!(err, EditorError::File(FileError::NotFound { .. })));
    }

    #[test]
    fn read_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let err = FsGateway::new().read(dir.path()).unwrap_err();
        assert!(matches!(err, EditorError::File(FileError::InvalidPath { .. })));
    }

    #[test]
    fn read_non_utf8_is_encoding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0x63, 0x61, 0x66, 0xe9]).unwrap();

        let err = FsGateway::new().read(&path).unwrap_err();
        assert!(matches!(err, EditorError::File(FileError::Encoding { .. })));
    }

    #[test]
    fn write_overwrites_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old content that is longer").unwrap();

        FsGateway::new().write(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn direct_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("direct.txt");

        FsGateway::direct().write(&path, "plain").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "plain");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");

        let err = FsGateway::new().write(&path, "text").unwrap_err();
        assert!(matches!(err, EditorError::File(FileError::InvalidPath { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn temp_path_stays_in_target_directory() {
        let temp = temp_path_for(Path::new("/data/notes.txt")).unwrap();
        assert_eq!(temp.parent(), Some(Path::new("/data")));
        assert!(temp.file_name().unwrap().to_string_lossy().starts_with(".notes.txt."));
    }
}
