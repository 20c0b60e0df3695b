//! キーバインドシステム
//!
//! crossterm のキーイベントをコマンド・編集・移動アクションへ変換する

use crate::buffer::NavigationAction;
use crate::input::commands::Command;
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use std::collections::HashMap;
use std::fmt;

/// キー入力の内部表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Esc,
    Unknown,
}

impl Key {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    pub fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                ..KeyModifiers::default()
            },
            code: KeyCode::Char(ch),
        }
    }

    pub fn ctrl_shift(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                shift: true,
                alt: false,
            },
            code: KeyCode::Char(ch),
        }
    }

    pub fn alt(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                alt: true,
                ..KeyModifiers::default()
            },
            code: KeyCode::Char(ch),
        }
    }

    fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let mut modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
        };

        let code = match event.code {
            // 端末によって Ctrl+Shift+S は 'S' でも 's' でも届く
            CrosstermKeyCode::Char(c) if c.is_ascii_uppercase() => {
                modifiers.shift = true;
                KeyCode::Char(c.to_ascii_lowercase())
            }
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::BackTab => {
                modifiers.shift = true;
                KeyCode::Tab
            }
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            CrosstermKeyCode::F(n) => KeyCode::F(n),
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        Key { modifiers, code }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// 文字入力以外の編集操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    InsertChar(char),
    InsertNewline,
    DeleteBackward,
    DeleteForward,
}

/// キー入力の解決結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// メニューと共通のコマンド
    Command(Command),
    Edit(EditAction),
    /// カーソル移動（`extend` で選択範囲を伸ばす）
    Navigate { action: NavigationAction, extend: bool },
    /// 画面単位のスクロール移動
    Page { down: bool, extend: bool },
    /// メニューを開く（0: File, 1: Edit）
    OpenMenu(usize),
}

/// キーマップ
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Action>,
}

impl KeyMap {
    /// 既定のキーマップを作成
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(48);
        Self::register_default_bindings(&mut bindings);
        Self { bindings }
    }

    fn register_default_bindings(bindings: &mut HashMap<Key, Action>) {
        for command in Command::ALL {
            bindings.insert(command.accelerator(), Action::Command(command));
        }

        // メニュー
        bindings.insert(Key::plain(KeyCode::F(10)), Action::OpenMenu(0));
        bindings.insert(Key::alt('f'), Action::OpenMenu(0));
        bindings.insert(Key::alt('e'), Action::OpenMenu(1));

        // 編集
        bindings.insert(Key::plain(KeyCode::Enter), Action::Edit(EditAction::InsertNewline));
        bindings.insert(Key::plain(KeyCode::Tab), Action::Edit(EditAction::InsertChar('\t')));
        bindings.insert(Key::plain(KeyCode::Backspace), Action::Edit(EditAction::DeleteBackward));
        bindings.insert(Key::plain(KeyCode::Delete), Action::Edit(EditAction::DeleteForward));

        // 移動（Shift 付きは選択）
        let moves = [
            (Key::plain(KeyCode::Left), NavigationAction::CharBackward),
            (Key::plain(KeyCode::Right), NavigationAction::CharForward),
            (Key::plain(KeyCode::Up), NavigationAction::LineUp),
            (Key::plain(KeyCode::Down), NavigationAction::LineDown),
            (Key::plain(KeyCode::Home), NavigationAction::LineStart),
            (Key::plain(KeyCode::End), NavigationAction::LineEnd),
            (Key::plain(KeyCode::Home).with_ctrl(), NavigationAction::BufferStart),
            (Key::plain(KeyCode::End).with_ctrl(), NavigationAction::BufferEnd),
        ];
        for (key, action) in moves {
            bindings.insert(key, Action::Navigate { action, extend: false });
            bindings.insert(key.with_shift(), Action::Navigate { action, extend: true });
        }

        for (code, down) in [(KeyCode::PageUp, false), (KeyCode::PageDown, true)] {
            bindings.insert(Key::plain(code), Action::Page { down, extend: false });
            bindings.insert(Key::plain(code).with_shift(), Action::Page { down, extend: true });
        }
    }

    /// キーイベントを解決する
    pub fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        let key = Key::from(*event);
        if let Some(action) = self.bindings.get(&key) {
            return Some(*action);
        }

        // 修飾なし（Shift のみ可）の文字は入力として扱う
        match event.code {
            CrosstermKeyCode::Char(c) if !key.modifiers.ctrl && !key.modifiers.alt && !c.is_control() => {
                Some(Action::Edit(EditAction::InsertChar(c)))
            }
            _ => None,
        }
    }

    /// コマンドに割り当てられたキー
    pub fn key_for(&self, command: Command) -> Option<Key> {
        self.bindings
            .iter()
            .find(|(_, action)| **action == Action::Command(command))
            .map(|(key, _)| *key)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}
