//! ナビゲーションシステム
//!
//! ギャップバッファ上のカーソル移動先を計算する。状態は持たない。

use crate::buffer::gap_buffer::GapBuffer;

/// ナビゲーション操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
    CharForward,
    CharBackward,
    LineUp,
    LineDown,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    /// 指定行数だけ上へ
    PageUp(usize),
    /// 指定行数だけ下へ
    PageDown(usize),
}

impl NavigationAction {
    /// 縦方向の移動か（希望列を維持する）
    pub fn is_vertical(&self) -> bool {
        matches!(
            self,
            NavigationAction::LineUp
                | NavigationAction::LineDown
                | NavigationAction::PageUp(_)
                | NavigationAction::PageDown(_)
        )
    }
}

/// 移動結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTarget {
    pub char_pos: usize,
    /// 縦移動で維持する列
    pub preferred_column: Option<usize>,
}

/// 移動先を計算する
///
/// `preferred_column` は直前の縦移動で記憶した列。縦移動以外では破棄される。
pub fn resolve(
    buffer: &GapBuffer,
    pos: usize,
    preferred_column: Option<usize>,
    action: NavigationAction,
) -> NavigationTarget {
    let len = buffer.len_chars();
    let pos = pos.min(len);
    let (line, column) = buffer.line_column(pos);
    let goal = preferred_column.unwrap_or(column);

    let vertical = |target_line: usize| NavigationTarget {
        char_pos: buffer.position_of(target_line, goal),
        preferred_column: Some(goal),
    };
    let horizontal = |char_pos: usize| NavigationTarget {
        char_pos,
        preferred_column: None,
    };

    match action {
        NavigationAction::CharForward => horizontal((pos + 1).min(len)),
        NavigationAction::CharBackward => horizontal(pos.saturating_sub(1)),
        NavigationAction::LineUp => {
            if line == 0 {
                horizontal(0)
            } else {
                vertical(line - 1)
            }
        }
        NavigationAction::LineDown => {
            if line + 1 >= buffer.line_count() {
                horizontal(len)
            } else {
                vertical(line + 1)
            }
        }
        NavigationAction::LineStart => horizontal(buffer.line_start(line)),
        NavigationAction::LineEnd => horizontal(buffer.line_start(line) + buffer.line_len(line)),
        NavigationAction::BufferStart => horizontal(0),
        NavigationAction::BufferEnd => horizontal(len),
        NavigationAction::PageUp(lines) => vertical(line.saturating_sub(lines.max(1))),
        NavigationAction::PageDown(lines) => {
            let last = buffer.line_count() - 1;
            vertical((line + lines.max(1)).min(last))
        }
    }
}
