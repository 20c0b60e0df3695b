// file_operations_tests.rs - ファイルの開く/保存のテスト

mod common;

use common::{answer_dialog, app_in, app_with, ctrl, press, type_text};
use crossterm::event::{KeyCode, KeyModifiers};
use modern_text_editor::editor::LocalClipboard;
use modern_text_editor::error::{EditorError, FileError};
use modern_text_editor::file::FsGateway;
use modern_text_editor::{App, EditorConfig, SavePolicy};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn open_loads_exact_file_content() {
    let dir = TempDir::new().unwrap();
    let content = "first line\r\nsecond\tline\r\n日本語 café\n";
    fs::write(dir.path().join("sample.txt"), content).unwrap();

    let mut app = app_in(dir.path());
    ctrl(&mut app, 'o');
    answer_dialog(&mut app, "sample.txt");

    assert_eq!(app.text(), content);
    assert_eq!(app.title(), "sample.txt - Modern Text Editor");
    assert_eq!(app.document_path(), Some(dir.path().join("sample.txt").as_path()));
    assert!(app.dialog().is_none());
}

#[test]
fn save_then_open_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "line1\nline2");

    ctrl(&mut app, 's');
    answer_dialog(&mut app, "out");

    let saved = dir.path().join("out.txt");
    assert_eq!(fs::read_to_string(&saved).unwrap(), "line1\nline2");
    assert_eq!(app.title(), "out.txt - Modern Text Editor");
    assert!(!app.editor().is_modified());

    ctrl(&mut app, 'n');
    assert_eq!(app.text(), "");
    ctrl(&mut app, 'o');
    answer_dialog(&mut app, "out.txt");
    assert_eq!(app.text(), "line1\nline2");
}

#[test]
fn open_missing_file_reports_error_and_keeps_state() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "keep me");

    ctrl(&mut app, 'o');
    answer_dialog(&mut app, "missing.txt");

    assert_eq!(app.text(), "keep me");
    assert_eq!(app.title(), "Modern Text Editor");
    assert!(app.document_path().is_none());
    assert!(app.is_running());

    let notification = app.notification().expect("error is shown");
    assert!(notification.is_error());
    assert!(notification.message.starts_with("Cannot open: File not found"));
}

#[test]
fn open_path_returns_typed_errors() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());

    let missing = dir.path().join("nope.txt");
    assert!(matches!(
        app.open_path(&missing),
        Err(EditorError::File(FileError::NotFound { .. }))
    ));
    assert!(matches!(
        app.open_path(dir.path()),
        Err(EditorError::File(FileError::InvalidPath { .. }))
    ));

    let binary = dir.path().join("blob.bin");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    assert!(matches!(
        app.open_path(&binary),
        Err(EditorError::File(FileError::Encoding { .. }))
    ));
    assert_eq!(app.title(), "Modern Text Editor");
}

#[test]
fn save_cancel_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "draft");

    ctrl(&mut app, 's');
    assert!(app.dialog().is_some());
    type_text(&mut app, "never");
    press(&mut app, KeyCode::Esc);

    assert!(app.dialog().is_none());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(app.text(), "draft");
    assert_eq!(app.title(), "Modern Text Editor");
    assert!(app.notification().is_none());
}

#[test]
fn save_into_missing_directory_fails_visibly() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "text");

    ctrl(&mut app, 's');
    answer_dialog(&mut app, "no-such-dir/out.txt");

    assert!(app.document_path().is_none());
    assert_eq!(app.title(), "Modern Text Editor");
    assert!(app.notification().map_or(false, |n| n.is_error()));
    assert!(!dir.path().join("no-such-dir").exists());
}

#[test]
fn save_overwrites_existing_file_without_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("existing.txt");
    fs::write(&target, "old content that is longer").unwrap();

    let mut app = app_in(dir.path());
    type_text(&mut app, "new");
    app.save_to_path(&target).unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn save_always_prompts_by_default() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "v1");
    ctrl(&mut app, 's');
    answer_dialog(&mut app, "doc.txt");

    type_text(&mut app, "v2");
    ctrl(&mut app, 's');
    let dialog = app.dialog().expect("save prompts again");
    assert_eq!(dialog.input(), "doc.txt");

    press(&mut app, KeyCode::Enter);
    assert_eq!(fs::read_to_string(dir.path().join("doc.txt")).unwrap(), "v1v2");
}

#[test]
fn save_reuses_known_path_when_configured() {
    let dir = TempDir::new().unwrap();
    let config = EditorConfig::default().with_save_policy(SavePolicy::ReuseKnownPath);
    let mut app = app_with(config, dir.path());

    // 未保存の文書ではダイアログが出る
    type_text(&mut app, "v1");
    ctrl(&mut app, 's');
    answer_dialog(&mut app, "doc.txt");

    type_text(&mut app, "v2");
    ctrl(&mut app, 's');
    assert!(app.dialog().is_none());
    assert_eq!(fs::read_to_string(dir.path().join("doc.txt")).unwrap(), "v1v2");
    assert_eq!(
        app.notification().map(|n| n.message.as_str()),
        Some("Saved doc.txt")
    );

    // Save As は常に尋ねる
    press_with_shift_save_as(&mut app);
    assert!(app.dialog().is_some());
}

fn press_with_shift_save_as(app: &mut App) {
    common::press_with(
        app,
        KeyCode::Char('S'),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    );
}

#[test]
fn save_as_writes_to_new_name_and_updates_title() {
    let dir = TempDir::new().unwrap();
    let mut app = app_in(dir.path());
    type_text(&mut app, "content");

    press_with_shift_save_as(&mut app);
    answer_dialog(&mut app, "renamed.txt");

    assert_eq!(app.title(), "renamed.txt - Modern Text Editor");
    assert_eq!(fs::read_to_string(dir.path().join("renamed.txt")).unwrap(), "content");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn open_then_save_preserves_bytes(content in any::<String>()) {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.txt");
        let target = dir.path().join("out.txt");
        fs::write(&source, &content).unwrap();

        let mut app = App::with_services(
            EditorConfig::default(),
            Box::new(FsGateway::direct()),
            Box::new(LocalClipboard::new()),
        ).unwrap();
        app.open_path(&source).unwrap();
        prop_assert_eq!(app.text(), content.clone());

        app.save_to_path(&target).unwrap();
        prop_assert_eq!(fs::read(&target).unwrap(), content.into_bytes());
    }
}
