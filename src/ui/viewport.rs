//! ビューポート管理
//!
//! テキストエリアに表示する範囲（先頭の表示行と左端の表示列）を管理する。
//! 折り返し有効時の行番号は折り返し後の表示行。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportManager {
    /// 表示の開始行（表示行単位）
    top_line: usize,
    /// 表示の開始列（表示幅単位）
    left_column: usize,
    /// 表示可能な行数
    height: usize,
    /// 表示可能な列数
    width: usize,
}

impl ViewportManager {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            top_line: 0,
            left_column: 0,
            height: height.max(1),
            width: width.max(1),
        }
    }

    /// ビューポートの寸法を更新
    pub fn set_dimensions(&mut self, height: usize, width: usize) {
        self.height = height.max(1);
        self.width = width.max(1);
    }

    /// カーソルが画面内に収まるようスクロールする
    ///
    /// 戻り値はスクロールが発生したかどうか
    pub fn ensure_visible(&mut self, cursor_line: usize, cursor_column: usize) -> bool {
        let mut scrolled = false;

        if cursor_line < self.top_line {
            self.top_line = cursor_line;
            scrolled = true;
        } else if cursor_line >= self.top_line + self.height {
            // 画面外に出たらカーソルを中央に置く
            self.top_line = cursor_line.saturating_sub(self.height / 2);
            scrolled = true;
        }

        if cursor_column < self.left_column {
            self.left_column = cursor_column;
            scrolled = true;
        } else if cursor_column >= self.left_column + self.width {
            self.left_column = cursor_column + 1 - self.width;
            scrolled = true;
        }

        scrolled
    }

    /// マウスホイールによる縦スクロール
    pub fn scroll_by(&mut self, delta: isize, row_count: usize) {
        let max_top = row_count.saturating_sub(1);
        let top = self.top_line as isize + delta;
        self.top_line = top.clamp(0, max_top as isize) as usize;
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn left_column(&self) -> usize {
        self.left_column
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// 文書先頭へ戻す
    pub fn reset(&mut self) {
        self.top_line = 0;
        self.left_column = 0;
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_visible_scrolls_up() {
        let mut viewport = ViewportManager::new(10, 80);
        viewport.ensure_visible(25, 0);
        assert!(viewport.top_line() > 0);

        assert!(viewport.ensure_visible(0, 0));
        assert_eq!(viewport.top_line(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_to_center() {
        let mut viewport = ViewportManager::new(4, 80);
        viewport.ensure_visible(10, 0);
        assert_eq!(viewport.top_line(), 8);
        assert!(!viewport.ensure_visible(11, 0));
    }

    #[test]
    fn horizontal_scroll_follows_cursor() {
        let mut viewport = ViewportManager::new(5, 10);
        assert!(viewport.ensure_visible(0, 12));
        assert_eq!(viewport.left_column(), 3);
        assert!(viewport.ensure_visible(0, 1));
        assert_eq!(viewport.left_column(), 1);
    }

    #[test]
    fn wheel_scroll_is_clamped() {
        let mut viewport = ViewportManager::new(5, 10);
        viewport.scroll_by(3, 20);
        assert_eq!(viewport.top_line(), 3);
        viewport.scroll_by(-10, 20);
        assert_eq!(viewport.top_line(), 0);
        viewport.scroll_by(100, 20);
        assert_eq!(viewport.top_line(), 19);
    }
}
