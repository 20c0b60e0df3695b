//! テキストエディタ（文書バッファ）
//!
//! ギャップバッファ、カーソル、選択範囲、編集履歴をまとめた編集インターフェース。

use crate::buffer::cursor::{CursorPosition, Selection};
use crate::buffer::gap_buffer::GapBuffer;
use crate::buffer::navigation::{self, NavigationAction};
use crate::editor::history::{AtomicEdit, HistoryCommandKind, HistoryEntry, HistoryStack};
use crate::error::Result;

/// テキストエディタのメイン構造体
#[derive(Debug, Clone, Default)]
pub struct TextEditor {
    buffer: GapBuffer,
    cursor: CursorPosition,
    /// 選択開始位置（Shift移動・ドラッグ中）
    anchor: Option<usize>,
    /// 縦移動で維持する列
    preferred_column: Option<usize>,
    history: HistoryStack,
    modified: bool,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列からエディタを作成
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: GapBuffer::from_text(text),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line_text(&self, line: usize) -> String {
        self.buffer.line_text(line)
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// 保存済みとしてマーク
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// 空でない選択範囲
    pub fn selection(&self) -> Option<Selection> {
        self.anchor
            .map(|anchor| Selection::new(anchor, self.cursor.char_pos))
            .filter(|selection| !selection.is_empty())
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?.range();
        self.buffer.slice(start, end).ok()
    }

    /// 内容を丸ごと置き換える（履歴・選択・変更フラグもリセット）
    pub fn replace_all(&mut self, text: &str) {
        self.buffer = GapBuffer::from_text(text);
        self.cursor = CursorPosition::new();
        self.anchor = None;
        self.preferred_column = None;
        self.history.clear();
        self.modified = false;
    }

    /// 内容を空にする
    pub fn clear(&mut self) {
        self.replace_all("");
    }

    /// 入力された文字を挿入（選択範囲は置き換え）
    pub fn type_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.replace_selection_with(ch.encode_utf8(&mut buf), HistoryCommandKind::Typing)
    }

    pub fn insert_newline(&mut self) -> Result<()> {
        self.type_char('\n')
    }

    /// 貼り付け（独立したUndo単位）
    pub fn paste_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.history.seal();
        self.replace_selection_with(text, HistoryCommandKind::Other)?;
        self.history.seal();
        Ok(())
    }

    /// Backspace。削除したかどうかを返す
    pub fn delete_backward(&mut self) -> Result<bool> {
        if self.selection().is_some() {
            self.replace_selection_with("", HistoryCommandKind::Other)?;
            return Ok(true);
        }

        let pos = self.cursor.char_pos;
        if pos == 0 {
            return Ok(false);
        }

        let removed = self.buffer.delete_range(pos - 1, pos)?;
        self.record(
            HistoryCommandKind::DeleteBackward,
            vec![AtomicEdit::Delete {
                position: pos - 1,
                text: removed,
            }],
            pos,
            pos - 1,
        );
        Ok(true)
    }

    /// Delete。削除したかどうかを返す
    pub fn delete_forward(&mut self) -> Result<bool> {
        if self.selection().is_some() {
            self.replace_selection_with("", HistoryCommandKind::Other)?;
            return Ok(true);
        }

        let pos = self.cursor.char_pos;
        if pos >= self.buffer.len_chars() {
            return Ok(false);
        }

        let removed = self.buffer.delete_range(pos, pos + 1)?;
        self.record(
            HistoryCommandKind::DeleteForward,
            vec![AtomicEdit::Delete {
                position: pos,
                text: removed,
            }],
            pos,
            pos,
        );
        Ok(true)
    }

    /// 選択範囲を切り取って返す
    pub fn cut_selection(&mut self) -> Result<Option<String>> {
        let Some(text) = self.selected_text() else {
            return Ok(None);
        };
        self.history.seal();
        self.replace_selection_with("", HistoryCommandKind::Other)?;
        self.history.seal();
        Ok(Some(text))
    }

    /// カーソル移動。`extend` が真なら選択範囲を広げる
    pub fn navigate(&mut self, action: NavigationAction, extend: bool) -> bool {
        let preferred = if action.is_vertical() {
            self.preferred_column
        } else {
            None
        };
        let target = navigation::resolve(&self.buffer, self.cursor.char_pos, preferred, action);

        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor.char_pos);
            }
        } else {
            self.anchor = None;
        }

        self.history.seal();
        self.preferred_column = target.preferred_column;
        let moved = target.char_pos != self.cursor.char_pos;
        self.set_cursor_char(target.char_pos);
        moved
    }

    /// マウスクリック位置へカーソルを移動（選択解除）
    pub fn click_at(&mut self, line: usize, column: usize) {
        let pos = self.buffer.position_of(line, column);
        self.anchor = Some(pos);
        self.preferred_column = None;
        self.history.seal();
        self.set_cursor_char(pos);
    }

    /// ドラッグで選択範囲を広げる
    pub fn drag_to(&mut self, line: usize, column: usize) {
        let pos = self.buffer.position_of(line, column);
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor.char_pos);
        }
        self.preferred_column = None;
        self.set_cursor_char(pos);
    }

    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo(&mut self.buffer)? {
            Some(pos) => {
                self.after_history_jump(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo(&mut self.buffer)? {
            Some(pos) => {
                self.after_history_jump(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn after_history_jump(&mut self, pos: usize) {
        self.anchor = None;
        self.preferred_column = None;
        self.modified = true;
        self.set_cursor_char(pos);
    }

    fn replace_selection_with(&mut self, text: &str, kind: HistoryCommandKind) -> Result<()> {
        let before = self.cursor.char_pos;
        let mut operations = Vec::with_capacity(2);
        let mut pos = before;

        if let Some(selection) = self.selection() {
            let (start, end) = selection.range();
            let removed = self.buffer.delete_range(start, end)?;
            operations.push(AtomicEdit::Delete {
                position: start,
                text: removed,
            });
            pos = start;
        }
        self.anchor = None;

        if !text.is_empty() {
            self.buffer.insert_str(pos, text)?;
            operations.push(AtomicEdit::Insert {
                position: pos,
                text: text.to_string(),
            });
            pos += text.chars().count();
        }

        if operations.is_empty() {
            return Ok(());
        }

        let kind = if operations.len() > 1 {
            HistoryCommandKind::Other
        } else {
            kind
        };
        self.record(kind, operations, before, pos);
        Ok(())
    }

    fn record(&mut self, kind: HistoryCommandKind, operations: Vec<AtomicEdit>, before: usize, after: usize) {
        self.history
            .push(HistoryEntry::new(kind, operations, before, after));
        self.modified = true;
        self.anchor = None;
        self.preferred_column = None;
        self.set_cursor_char(after);
    }

    fn set_cursor_char(&mut self, char_pos: usize) {
        let char_pos = char_pos.min(self.buffer.len_chars());
        let (line, column) = self.buffer.line_column(char_pos);
        self.cursor = CursorPosition::at(char_pos, line, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(editor: &mut TextEditor, text: &str) {
        for ch in text.chars() {
            editor.type_char(ch).unwrap();
        }
    }

    #[test]
    fn typing_updates_cursor_line_and_column() {
        let mut editor = TextEditor::new();
        type_text(&mut editor, "ab\ncde");

        assert_eq!(editor.text(), "ab\ncde");
        assert_eq!(editor.cursor(), CursorPosition::at(6, 1, 3));
        assert!(editor.is_modified());
    }

    #[test]
    fn undo_reverts_whole_typing_run() {
        let mut editor = TextEditor::with_text("start ");
        editor.navigate(NavigationAction::BufferEnd, false);
        type_text(&mut editor, "hello");

        assert!(editor.undo().unwrap());
        assert_eq!(editor.text(), "start ");
        assert_eq!(editor.cursor().char_pos, 6);

        assert!(editor.redo().unwrap());
        assert_eq!(editor.text(), "start hello");
        assert!(!editor.redo().unwrap());
    }

    #[test]
    fn cursor_movement_splits_undo_groups() {
        let mut editor = TextEditor::new();
        type_text(&mut editor, "ab");
        editor.navigate(NavigationAction::CharBackward, false);
        editor.navigate(NavigationAction::CharForward, false);
        type_text(&mut editor, "cd");

        editor.undo().unwrap();
        assert_eq!(editor.text(), "ab");
        editor.undo().unwrap();
        assert_eq!(editor.text(), "");
        assert!(!editor.undo().unwrap());
    }

    #[test]
    fn shift_navigation_builds_selection() {
        let mut editor = TextEditor::with_text("hello world");
        editor.navigate(NavigationAction::LineEnd, true);

        assert_eq!(editor.selected_text().as_deref(), Some("hello world"));
        editor.navigate(NavigationAction::CharBackward, false);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn typing_replaces_selection_and_undoes_in_one_step() {
        let mut editor = TextEditor::with_text("hello world");
        for _ in 0..5 {
            editor.navigate(NavigationAction::CharForward, true);
        }
        editor.type_char('J').unwrap();
        assert_eq!(editor.text(), "J world");

        editor.undo().unwrap();
        assert_eq!(editor.text(), "hello world");
    }

    #[test]
    fn cut_and_paste_are_single_undo_steps() {
        let mut editor = TextEditor::with_text("one two");
        editor.navigate(NavigationAction::LineEnd, false);
        for _ in 0..3 {
            editor.navigate(NavigationAction::CharBackward, true);
        }

        let cut = editor.cut_selection().unwrap();
        assert_eq!(cut.as_deref(), Some("two"));
        assert_eq!(editor.text(), "one ");

        editor.navigate(NavigationAction::BufferStart, false);
        editor.paste_text("two ").unwrap();
        assert_eq!(editor.text(), "two one ");

        editor.undo().unwrap();
        assert_eq!(editor.text(), "one ");
        editor.undo().unwrap();
        assert_eq!(editor.text(), "one two");
    }

    #[test]
    fn cut_without_selection_does_nothing() {
        let mut editor = TextEditor::with_text("text");
        assert_eq!(editor.cut_selection().unwrap(), None);
        assert_eq!(editor.text(), "text");
        assert!(!editor.can_undo());
    }

    #[test]
    fn backspace_and_delete_at_edges() {
        let mut editor = TextEditor::with_text("ab");
        assert!(!editor.delete_backward().unwrap());
        assert!(editor.delete_forward().unwrap());
        assert_eq!(editor.text(), "b");

        editor.navigate(NavigationAction::BufferEnd, false);
        assert!(!editor.delete_forward().unwrap());
        assert!(editor.delete_backward().unwrap());
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn click_and_drag_select_text() {
        let mut editor = TextEditor::with_text("first\nsecond");
        editor.click_at(1, 0);
        assert_eq!(editor.cursor(), CursorPosition::at(6, 1, 0));
        assert!(editor.selection().is_none());

        editor.drag_to(1, 3);
        assert_eq!(editor.selected_text().as_deref(), Some("sec"));
    }

    #[test]
    fn replace_all_resets_state() {
        let mut editor = TextEditor::new();
        type_text(&mut editor, "draft");
        editor.replace_all("loaded\ntext");

        assert_eq!(editor.text(), "loaded\ntext");
        assert_eq!(editor.cursor(), CursorPosition::new());
        assert!(!editor.can_undo());
        assert!(!editor.is_modified());
    }

    #[test]
    fn deleting_after_click_removes_single_characters() {
        let mut editor = TextEditor::with_text("abcdef");
        editor.click_at(0, 5);
        assert!(editor.delete_backward().unwrap());
        assert!(editor.selection().is_none());
        assert!(editor.delete_backward().unwrap());
        assert_eq!(editor.text(), "abcf");

        editor.click_at(0, 1);
        assert!(editor.delete_forward().unwrap());
        assert!(editor.selection().is_none());
        assert!(editor.delete_forward().unwrap());
        assert_eq!(editor.text(), "af");
    }
}
