//! カーソル位置管理

/// カーソル位置を表現する構造体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    /// 文字位置（0ベース）
    pub char_pos: usize,
    /// 行番号（0ベース）
    pub line: usize,
    /// 列番号（0ベース、文字単位）
    pub column: usize,
}

impl CursorPosition {
    /// 原点のカーソル
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(char_pos: usize, line: usize, column: usize) -> Self {
        Self {
            char_pos,
            line,
            column,
        }
    }

    /// ステータス表示用の行番号（1ベース）
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// ステータス表示用の列番号（1ベース）
    pub fn display_column(&self) -> usize {
        self.column + 1
    }
}

/// 選択範囲（アンカーとカーソルの間）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// 正規化した (開始, 終了)
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn contains(&self, pos: usize) -> bool {
        let (start, end) = self.range();
        pos >= start && pos < end
    }
}
