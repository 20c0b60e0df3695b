//! テキストエリア描画
//!
//! 行テキストを表示列に変換して描画用の `Line` を組み立てる。
//! タブは `tab_width` 境界まで展開し、制御文字は U+FFFD で表示する。

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// 制御文字の代替表示
const REPLACEMENT: char = '\u{FFFD}';

/// `column` の位置に置いた文字の表示幅
pub fn char_display_width(ch: char, column: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - column % tab_width
    } else if ch.is_control() {
        1
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

/// 文字単位の列を表示列に変換
pub fn display_column(line: &str, char_column: usize, tab_width: usize) -> usize {
    line.chars()
        .take(char_column)
        .fold(0, |col, ch| col + char_display_width(ch, col, tab_width))
}

/// 表示列を文字単位の列に変換（マウス位置の逆引き）
///
/// 幅2の文字の右半分を指した場合はその文字の位置を返す。
pub fn char_column_at(line: &str, target: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in line.chars().enumerate() {
        let width = char_display_width(ch, col, tab_width);
        if target < col + width.max(1) {
            return idx;
        }
        col += width;
    }
    line.chars().count()
}

/// 1行分の描画スタイル
#[derive(Debug, Clone, Copy)]
pub struct LineStyles {
    pub text: Style,
    pub selection: Style,
    pub cursor: Style,
}

/// 行内の描画対象
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDecorations {
    /// 選択範囲（行内の文字列、終端は含まない）
    pub selection: Option<(usize, usize)>,
    /// カーソルの文字列
    pub cursor: Option<usize>,
}

/// 横スクロール位置 `left` から幅 `width` の範囲を描画用の行にする
pub fn visible_line(
    line_text: &str,
    left: usize,
    width: usize,
    tab_width: usize,
    decorations: LineDecorations,
    styles: &LineStyles,
) -> Line<'static> {
    let right = left + width;
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut pending = String::new();
    let mut pending_style = styles.text;
    let mut col = 0;
    let mut char_count = 0;

    for (idx, ch) in line_text.chars().enumerate() {
        char_count = idx + 1;
        let char_width = char_display_width(ch, col, tab_width);
        let start = col;
        col += char_width;

        if col <= left && char_width > 0 {
            continue;
        }
        if start >= right {
            break;
        }

        let style = style_for(idx, decorations, styles);
        let clipped = start < left || col > right;
        let rendered = if clipped || ch == '\t' {
            let visible = col.min(right) - start.max(left);
            " ".repeat(visible)
        } else if ch.is_control() {
            REPLACEMENT.to_string()
        } else {
            ch.to_string()
        };

        if style != pending_style && !pending.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut pending), pending_style));
        }
        pending_style = style;
        pending.push_str(&rendered);
    }

    if !pending.is_empty() {
        spans.push(Span::styled(pending, pending_style));
    }

    // 行末のカーソル
    if decorations.cursor == Some(char_count) && col >= left && col < right {
        spans.push(Span::styled(" ", styles.cursor));
    }

    Line::from(spans)
}

fn style_for(idx: usize, decorations: LineDecorations, styles: &LineStyles) -> Style {
    if decorations.cursor == Some(idx) {
        styles.cursor
    } else if decorations
        .selection
        .map_or(false, |(start, end)| idx >= start && idx < end)
    {
        styles.selection
    } else {
        styles.text
    }
}
