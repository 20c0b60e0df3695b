//! 編集履歴（Undo/Redo）
//!
//! 可逆な編集操作のスタック。連続した入力・削除は1つのエントリにまとめる。

use crate::buffer::gap_buffer::GapBuffer;
use crate::error::EditError;

/// コマンド種別（履歴のまとめ判定用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommandKind {
    Typing,
    DeleteBackward,
    DeleteForward,
    Other,
}

/// 履歴操作の最小単位
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicEdit {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
}

impl AtomicEdit {
    fn apply(&self, buffer: &mut GapBuffer) -> Result<(), EditError> {
        match self {
            AtomicEdit::Insert { position, text } => buffer.insert_str(*position, text),
            AtomicEdit::Delete { position, text } => buffer
                .delete_range(*position, *position + text.chars().count())
                .map(|_| ()),
        }
    }

    fn revert(&self, buffer: &mut GapBuffer) -> Result<(), EditError> {
        match self {
            AtomicEdit::Insert { position, text } => buffer
                .delete_range(*position, *position + text.chars().count())
                .map(|_| ()),
            AtomicEdit::Delete { position, text } => buffer.insert_str(*position, text),
        }
    }
}

/// 履歴エントリ
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command_kind: HistoryCommandKind,
    pub operations: Vec<AtomicEdit>,
    pub cursor_before: usize,
    pub cursor_after: usize,
    /// 以降の編集をまとめない
    sealed: bool,
}

impl HistoryEntry {
    pub fn new(
        command_kind: HistoryCommandKind,
        operations: Vec<AtomicEdit>,
        cursor_before: usize,
        cursor_after: usize,
    ) -> Self {
        Self {
            command_kind,
            operations,
            cursor_before,
            cursor_after,
            sealed: false,
        }
    }

    fn try_merge(&mut self, other: &HistoryEntry) -> bool {
        if self.sealed || self.command_kind != other.command_kind {
            return false;
        }

        let (prev, next) = match (self.operations.as_mut_slice(), other.operations.as_slice()) {
            ([prev], [next]) => (prev, next),
            _ => return false,
        };

        let merged = match (self.command_kind, prev, next) {
            (
                HistoryCommandKind::Typing,
                AtomicEdit::Insert { position, text },
                AtomicEdit::Insert {
                    position: next_pos,
                    text: next_text,
                },
            ) => {
                if *next_pos == *position + text.chars().count() {
                    text.push_str(next_text);
                    true
                } else {
                    false
                }
            }
            (
                HistoryCommandKind::DeleteBackward,
                AtomicEdit::Delete { position, text },
                AtomicEdit::Delete {
                    position: next_pos,
                    text: next_text,
                },
            ) => {
                if *next_pos + next_text.chars().count() == *position {
                    let mut combined = next_text.clone();
                    combined.push_str(text);
                    *text = combined;
                    *position = *next_pos;
                    true
                } else {
                    false
                }
            }
            (
                HistoryCommandKind::DeleteForward,
                AtomicEdit::Delete { position, text },
                AtomicEdit::Delete {
                    position: next_pos,
                    text: next_text,
                },
            ) => {
                if *next_pos == *position {
                    text.push_str(next_text);
                    true
                } else {
                    false
                }
            }
            _ => false,
        };

        if merged {
            self.cursor_after = other.cursor_after;
        }
        merged
    }
}

/// 編集履歴スタック
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// 新しい編集を記録（Redo履歴は破棄）
    pub fn push(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        if let Some(last) = self.undo.last_mut() {
            if last.try_merge(&entry) {
                return;
            }
        }
        self.undo.push(entry);
    }

    /// 現在のまとまりを閉じる（カーソル移動など）
    pub fn seal(&mut self) {
        if let Some(last) = self.undo.last_mut() {
            last.sealed = true;
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// 直近の編集を取り消し、復帰後のカーソル位置を返す
    ///
    /// 途中で失敗した場合はバッファを元に戻し、エントリも残す。
    pub fn undo(&mut self, buffer: &mut GapBuffer) -> Result<Option<usize>, EditError> {
        let Some(entry) = self.undo.last() else {
            return Ok(None);
        };
        revert_all(&entry.operations, buffer)?;

        let Some(mut entry) = self.undo.pop() else {
            return Ok(None);
        };
        let cursor = entry.cursor_before;
        entry.sealed = true;
        self.redo.push(entry);
        Ok(Some(cursor))
    }

    /// 取り消した編集をやり直し、カーソル位置を返す
    pub fn redo(&mut self, buffer: &mut GapBuffer) -> Result<Option<usize>, EditError> {
        let Some(entry) = self.redo.last() else {
            return Ok(None);
        };
        apply_all(&entry.operations, buffer)?;

        let Some(mut entry) = self.redo.pop() else {
            return Ok(None);
        };
        let cursor = entry.cursor_after;
        entry.sealed = true;
        self.undo.push(entry);
        Ok(Some(cursor))
    }
}

/// 全操作を逆順に取り消す。失敗時は取り消し済みの分をやり直す
fn revert_all(operations: &[AtomicEdit], buffer: &mut GapBuffer) -> Result<(), EditError> {
    for (done, op) in operations.iter().rev().enumerate() {
        if let Err(err) = op.revert(buffer) {
            for reverted in &operations[operations.len() - done..] {
                let _ = reverted.apply(buffer);
            }
            return Err(err);
        }
    }
    Ok(())
}

/// 全操作を順に適用する。失敗時は適用済みの分を取り消す
fn apply_all(operations: &[AtomicEdit], buffer: &mut GapBuffer) -> Result<(), EditError> {
    for (done, op) in operations.iter().enumerate() {
        if let Err(err) = op.apply(buffer) {
            for applied in operations[..done].iter().rev() {
                let _ = applied.revert(buffer);
            }
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(position: usize, text: &str) -> HistoryEntry {
        HistoryEntry::new(
            HistoryCommandKind::Typing,
            vec![AtomicEdit::Insert {
                position,
                text: text.to_string(),
            }],
            position,
            position + text.chars().count(),
        )
    }

    #[test]
    fn contiguous_typing_merges_into_one_entry() {
        let mut buffer = GapBuffer::new();
        let mut history = HistoryStack::new();

        for (i, ch) in "hello world".chars().enumerate() {
            buffer.insert_str(i, &ch.to_string()).unwrap();
            history.push(typed(i, &ch.to_string()));
        }

        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo(&mut buffer).unwrap(), Some(0));
        assert_eq!(buffer.to_string(), "");
    }

    #[test]
    fn seal_starts_a_new_group() {
        let mut buffer = GapBuffer::new();
        let mut history = HistoryStack::new();

        buffer.insert_str(0, "ab").unwrap();
        history.push(typed(0, "ab"));
        history.seal();
        buffer.insert_str(2, "cd").unwrap();
        history.push(typed(2, "cd"));

        assert_eq!(history.undo_len(), 2);
        history.undo(&mut buffer).unwrap();
        assert_eq!(buffer.to_string(), "ab");
    }

    #[test]
    fn backspaces_merge_and_restore_in_order() {
        let mut buffer = GapBuffer::from_text("abcd");
        let mut history = HistoryStack::new();

        for pos in (1..4).rev() {
            let removed = buffer.delete_range(pos, pos + 1).unwrap();
            history.push(HistoryEntry::new(
                HistoryCommandKind::DeleteBackward,
                vec![AtomicEdit::Delete {
                    position: pos,
                    text: removed,
                }],
                pos + 1,
                pos,
            ));
        }

        assert_eq!(buffer.to_string(), "a");
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo(&mut buffer).unwrap(), Some(4));
        assert_eq!(buffer.to_string(), "abcd");
    }

    #[test]
    fn redo_reapplies_and_new_edit_clears_redo() {
        let mut buffer = GapBuffer::new();
        let mut history = HistoryStack::new();

        buffer.insert_str(0, "x").unwrap();
        history.push(typed(0, "x"));
        history.undo(&mut buffer).unwrap();
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut buffer).unwrap(), Some(1));
        assert_eq!(buffer.to_string(), "x");

        history.undo(&mut buffer).unwrap();
        buffer.insert_str(0, "y").unwrap();
        history.push(typed(0, "y"));
        assert!(!history.can_redo());
    }

    #[test]
    fn redone_entry_does_not_absorb_new_typing() {
        let mut buffer = GapBuffer::new();
        let mut history = HistoryStack::new();

        buffer.insert_str(0, "a").unwrap();
        history.push(typed(0, "a"));
        history.undo(&mut buffer).unwrap();
        history.redo(&mut buffer).unwrap();

        buffer.insert_str(1, "b").unwrap();
        history.push(typed(1, "b"));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn empty_stacks_report_nothing() {
        let mut buffer = GapBuffer::new();
        let mut history = HistoryStack::new();
        assert_eq!(history.undo(&mut buffer).unwrap(), None);
        assert_eq!(history.redo(&mut buffer).unwrap(), None);
    }

    #[test]
    fn failed_undo_keeps_entry_and_buffer() {
        let mut buffer = GapBuffer::from_text("xyab");
        let mut history = HistoryStack::new();
        history.push(HistoryEntry::new(
            HistoryCommandKind::Other,
            vec![
                AtomicEdit::Insert {
                    position: 50,
                    text: "q".to_string(),
                },
                AtomicEdit::Insert {
                    position: 0,
                    text: "xy".to_string(),
                },
            ],
            0,
            2,
        ));

        assert!(history.undo(&mut buffer).is_err());
        assert_eq!(buffer.to_string(), "xyab");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn failed_redo_keeps_entry_and_buffer() {
        let mut buffer = GapBuffer::from_text("ab");
        let mut history = HistoryStack::new();
        history.push(HistoryEntry::new(
            HistoryCommandKind::Other,
            vec![AtomicEdit::Delete {
                position: 0,
                text: "a".to_string(),
            }],
            1,
            0,
        ));
        history.undo(&mut buffer).unwrap();
        assert_eq!(buffer.to_string(), "aab");

        buffer.delete_range(0, 3).unwrap();
        history.redo(&mut buffer).unwrap_err();
        assert_eq!(buffer.to_string(), "");
        assert!(history.can_redo());
    }
}
