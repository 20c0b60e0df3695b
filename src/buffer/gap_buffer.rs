//! ギャップバッファ実装
//!
//! 文字単位のギャップバッファ。カーソル付近にギャップ（空き領域）を保持し、
//! 挿入・削除操作を高速化する。行頭位置はキャッシュして行・列変換に使う。

use crate::error::EditError;
use std::fmt;

const DEFAULT_GAP_CAPACITY: usize = 1024;
const MIN_GAP_RESERVE: usize = 256;
const GAP_GROWTH_FACTOR: usize = 2;

/// ギャップバッファ構造体
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// 内部バッファ（ギャップ部分は '\0' で埋める）
    buffer: Vec<char>,
    /// ギャップの開始位置（文字単位、テキストインデックスと同一）
    gap_start: usize,
    /// ギャップの終了位置（排他的）
    gap_end: usize,
    /// 各行の先頭文字位置
    line_starts: Vec<usize>,
}

impl GapBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_GAP_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec!['\0'; capacity],
            gap_start: 0,
            gap_end: capacity,
            line_starts: vec![0],
        }
    }

    /// 文字列からギャップバッファを作成
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let gap_size = (chars.len() / 4).max(MIN_GAP_RESERVE);
        let len = chars.len();

        let mut buffer = chars;
        buffer.resize(len + gap_size, '\0');

        let mut gap = Self {
            buffer,
            gap_start: len,
            gap_end: len + gap_size,
            line_starts: Vec::new(),
        };
        gap.rebuild_line_starts();
        gap
    }

    pub fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.buffer.len() - self.gap_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// 行数（空バッファでも1行）
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 指定位置の文字
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len_chars() {
            return None;
        }
        Some(self.buffer[self.physical_index(pos)])
    }

    /// 文字位置の反復子
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.buffer[..self.gap_start]
            .iter()
            .chain(self.buffer[self.gap_end..].iter())
            .copied()
    }

    /// 範囲のテキストを取得
    pub fn slice(&self, start: usize, end: usize) -> Result<String, EditError> {
        self.check_range(start, end)?;
        Ok((start..end).map(|pos| self.buffer[self.physical_index(pos)]).collect())
    }

    /// 指定位置に文字列を挿入
    pub fn insert_str(&mut self, pos: usize, text: &str) -> Result<(), EditError> {
        let len = self.len_chars();
        if pos > len {
            return Err(EditError::OutOfBounds { position: pos, len });
        }
        if text.is_empty() {
            return Ok(());
        }

        let count = text.chars().count();
        self.move_gap_to(pos);
        self.ensure_gap(count);

        for ch in text.chars() {
            self.buffer[self.gap_start] = ch;
            self.gap_start += 1;
        }

        self.rebuild_line_starts();
        Ok(())
    }

    /// 範囲を削除し、削除したテキストを返す
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<String, EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(String::new());
        }

        self.move_gap_to(start);
        let count = end - start;
        let removed: String = self.buffer[self.gap_end..self.gap_end + count].iter().collect();
        self.gap_end += count;

        self.rebuild_line_starts();
        Ok(removed)
    }

    /// 文字位置から (行, 列) を求める（0ベース）
    pub fn line_column(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.len_chars());
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (line, pos - self.line_starts[line])
    }

    /// 行の先頭位置
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        self.line_starts[line]
    }

    /// 行の長さ（改行文字を含まない）
    pub fn line_len(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        let start = self.line_starts[line];
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len_chars(),
        };
        end - start
    }

    /// 行のテキスト（改行文字を含まない）
    pub fn line_text(&self, line: usize) -> String {
        let start = self.line_start(line);
        let len = self.line_len(line);
        (start..start + len)
            .map(|pos| self.buffer[self.physical_index(pos)])
            .collect()
    }

    /// (行, 列) を文字位置に変換（範囲外は行末・最終行へ丸める）
    pub fn position_of(&self, line: usize, column: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        self.line_starts[line] + column.min(self.line_len(line))
    }

    fn physical_index(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_size()
        }
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), EditError> {
        let len = self.len_chars();
        if start > end {
            return Err(EditError::InvalidRange { start, end });
        }
        if end > len {
            return Err(EditError::OutOfBounds { position: end, len });
        }
        Ok(())
    }

    fn move_gap_to(&mut self, pos: usize) {
        if pos < self.gap_start {
            let count = self.gap_start - pos;
            let new_gap_end = self.gap_end - count;
            self.buffer.copy_within(pos..self.gap_start, new_gap_end);
            self.gap_start = pos;
            self.gap_end = new_gap_end;
        } else if pos > self.gap_start {
            let count = pos - self.gap_start;
            self.buffer
                .copy_within(self.gap_end..self.gap_end + count, self.gap_start);
            self.gap_start += count;
            self.gap_end += count;
        }
    }

    fn ensure_gap(&mut self, needed: usize) {
        if self.gap_size() >= needed {
            return;
        }

        let grow_by = (self.buffer.len() * (GAP_GROWTH_FACTOR - 1))
            .max(needed)
            .max(MIN_GAP_RESERVE);
        let suffix_len = self.buffer.len() - self.gap_end;
        let old_gap_end = self.gap_end;

        self.buffer.resize(self.buffer.len() + grow_by, '\0');
        let new_gap_end = old_gap_end + grow_by;
        self.buffer
            .copy_within(old_gap_end..old_gap_end + suffix_len, new_gap_end);
        self.gap_end = new_gap_end;
    }

    fn rebuild_line_starts(&mut self) {
        let mut starts = vec![0];
        for (pos, ch) in self.chars().enumerate() {
            if ch == '\n' {
                starts.push(pos + 1);
            }
        }
        self.line_starts = starts;
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            fmt::Write::write_char(f, ch)?;
        }
        Ok(())
    }
}
