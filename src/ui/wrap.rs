//! 折り返し
//!
//! 論理行を画面幅に合わせて表示行へ分割する。空白の直後で折り返し、
//! 画面幅より長い単語は文字単位で分割する。行末の空白は折り返さずに前の行へ残す。

use crate::buffer::GapBuffer;
use crate::ui::text_area::char_display_width;

/// 折り返し後の1表示行（`start..end` は論理行内の文字列）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRow {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    /// 論理行の最後の表示行か
    pub last: bool,
}

impl VisualRow {
    /// 表示行のテキスト
    pub fn text(&self, buffer: &GapBuffer) -> String {
        let line_start = buffer.line_start(self.line);
        buffer
            .slice(line_start + self.start, line_start + self.end)
            .unwrap_or_default()
    }

    /// 文書内の文字位置での範囲
    pub fn char_range(&self, buffer: &GapBuffer) -> (usize, usize) {
        let line_start = buffer.line_start(self.line);
        (line_start + self.start, line_start + self.end)
    }
}

/// 1行を幅 `width` で単語折り返しした区間の一覧
pub fn wrap_line(line: &str, width: usize, tab_width: usize) -> Vec<(usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let width = width.max(1);
    let mut segments = Vec::new();
    let mut start = 0;
    let mut col = 0;
    let mut break_at: Option<usize> = None;
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        let char_width = char_display_width(ch, col, tab_width);
        if col + char_width > width && idx > start && !ch.is_whitespace() {
            let end = match break_at {
                Some(at) if at > start => at,
                _ => idx,
            };
            segments.push((start, end));
            start = end;
            break_at = None;
            col = chars[start..idx]
                .iter()
                .fold(0, |col, &ch| col + char_display_width(ch, col, tab_width));
            continue;
        }

        col += char_width;
        if ch.is_whitespace() {
            break_at = Some(idx + 1);
        }
        idx += 1;
    }

    segments.push((start, chars.len()));
    segments
}

/// 文書全体の表示行
#[derive(Debug, Clone, Default)]
pub struct WrapMap {
    rows: Vec<VisualRow>,
}

impl WrapMap {
    /// `width` が `None` なら折り返さない（1論理行 = 1表示行）
    pub fn build(buffer: &GapBuffer, width: Option<usize>, tab_width: usize) -> Self {
        let mut rows = Vec::with_capacity(buffer.line_count());
        for line in 0..buffer.line_count() {
            let Some(width) = width else {
                rows.push(VisualRow {
                    line,
                    start: 0,
                    end: buffer.line_len(line),
                    last: true,
                });
                continue;
            };

            let segments = wrap_line(&buffer.line_text(line), width, tab_width);
            let count = segments.len();
            rows.extend(
                segments
                    .into_iter()
                    .enumerate()
                    .map(|(index, (start, end))| VisualRow {
                        line,
                        start,
                        end,
                        last: index + 1 == count,
                    }),
            );
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[VisualRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<VisualRow> {
        self.rows.get(index).copied()
    }

    /// 論理位置 (行, 列) を表示する行の番号
    ///
    /// 折り返し位置ちょうどの列は次の表示行の先頭として扱う。
    pub fn row_of(&self, line: usize, column: usize) -> usize {
        let first = self.rows.partition_point(|row| row.line < line);
        self.rows[first..]
            .iter()
            .take_while(|row| row.line == line)
            .position(|row| column < row.end || row.last)
            .map_or(first.min(self.rows.len().saturating_sub(1)), |offset| {
                first + offset
            })
    }
}
