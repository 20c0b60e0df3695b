//! 統合テスト共通ヘルパー

#![allow(dead_code)]

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use modern_text_editor::{App, EditorConfig};
use std::path::Path;

/// ローカルクリップボードと指定ディレクトリで起動したアプリ
pub fn app_in(dir: &Path) -> App {
    app_with(EditorConfig::default(), dir)
}

pub fn app_with(config: EditorConfig, dir: &Path) -> App {
    App::new(config.with_system_clipboard(false))
        .expect("default config is valid")
        .with_working_directory(dir)
}

pub fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

pub fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    app.handle_key_event(KeyEvent::new(code, modifiers));
}

pub fn ctrl(app: &mut App, ch: char) {
    press_with(app, KeyCode::Char(ch), KeyModifiers::CONTROL);
}

pub fn release(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ));
}

/// 1文字ずつ入力（改行は Enter）
pub fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        match ch {
            '\n' => press(app, KeyCode::Enter),
            ch => press(app, KeyCode::Char(ch)),
        }
    }
}

pub fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
    app.handle_mouse_event(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

pub fn click(app: &mut App, column: u16, row: u16) {
    mouse(app, MouseEventKind::Down(MouseButton::Left), column, row);
    mouse(app, MouseEventKind::Up(MouseButton::Left), column, row);
}

/// 開いているダイアログにファイル名を入力して確定
pub fn answer_dialog(app: &mut App, name: &str) {
    assert!(app.dialog().is_some(), "expected a file dialog");
    type_text(app, name);
    press(app, KeyCode::Enter);
}
