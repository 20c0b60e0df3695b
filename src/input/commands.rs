//! コマンド定義
//!
//! メニューとアクセラレータの両方から同じ `Command` が発行される

use crate::input::keybinding::Key;

/// メニュー/アクセラレータから実行できるコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::New,
        Command::Open,
        Command::Save,
        Command::SaveAs,
        Command::Exit,
        Command::Cut,
        Command::Copy,
        Command::Paste,
        Command::Undo,
        Command::Redo,
    ];

    /// メニュー表示名
    pub fn label(&self) -> &'static str {
        match self {
            Command::New => "New",
            Command::Open => "Open",
            Command::Save => "Save",
            Command::SaveAs => "Save As",
            Command::Exit => "Exit",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
        }
    }

    /// 割り当てられたアクセラレータ
    pub fn accelerator(&self) -> Key {
        match self {
            Command::New => Key::ctrl('n'),
            Command::Open => Key::ctrl('o'),
            Command::Save => Key::ctrl('s'),
            Command::SaveAs => Key::ctrl_shift('s'),
            Command::Exit => Key::ctrl('q'),
            Command::Cut => Key::ctrl('x'),
            Command::Copy => Key::ctrl('c'),
            Command::Paste => Key::ctrl('v'),
            Command::Undo => Key::ctrl('z'),
            Command::Redo => Key::ctrl('y'),
        }
    }

    /// ファイル系コマンドか（File メニューに並ぶ）
    pub fn is_file_command(&self) -> bool {
        matches!(
            self,
            Command::New | Command::Open | Command::Save | Command::SaveAs | Command::Exit
        )
    }
}

/// コマンド実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// 実行が成功したか
    pub success: bool,
    /// ユーザーに表示するメッセージ
    pub message: Option<String>,
    /// アプリケーションを終了するか
    pub should_quit: bool,
}

impl CommandOutcome {
    /// 成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            should_quit: false,
        }
    }

    /// メッセージ付き成功結果を作成
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success()
        }
    }

    /// エラー結果を作成
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            should_quit: false,
        }
    }

    /// 終了結果を作成
    pub fn quit() -> Self {
        Self {
            should_quit: true,
            ..Self::success()
        }
    }
}
