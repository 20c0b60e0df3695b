//! 画面レイアウト
//!
//! 上からタイトルバー、メニューバー、テキストエリア、ステータスバー。

use crate::error::UiError;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 最小画面幅
pub const MIN_WIDTH: u16 = 24;
/// 最小画面高さ（3本のバー + テキスト1行）
pub const MIN_HEIGHT: u16 = 4;
/// 閉じるボタンの表記
pub const CLOSE_BUTTON: &str = "[X]";

/// アプリケーション全体のレイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title_bar: Rect,
    pub menu_bar: Rect,
    pub text_area: Rect,
    pub status_bar: Rect,
    pub total: Rect,
}

impl AppLayout {
    /// 画面サイズからレイアウトを計算
    pub fn calculate(area: Rect) -> Result<Self, UiError> {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return Err(UiError::ScreenTooSmall {
                width: area.width,
                height: area.height,
            });
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // タイトル
                Constraint::Length(1), // メニュー
                Constraint::Min(1),    // テキスト
                Constraint::Length(1), // ステータス
            ])
            .split(area);

        Ok(Self {
            title_bar: chunks[0],
            menu_bar: chunks[1],
            text_area: chunks[2],
            status_bar: chunks[3],
            total: area,
        })
    }

    /// 端末サイズから計算
    pub fn for_size(width: u16, height: u16) -> Result<Self, UiError> {
        Self::calculate(Rect::new(0, 0, width, height))
    }

    /// タイトルバー右端の閉じるボタン
    pub fn close_button(&self) -> Rect {
        let width = CLOSE_BUTTON.len() as u16;
        Rect::new(
            self.title_bar.right().saturating_sub(width),
            self.title_bar.y,
            width.min(self.title_bar.width),
            1,
        )
    }

    /// テキストエリア内の座標なら (行オフセット, 列オフセット) を返す
    pub fn text_offset(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let area = self.text_area;
        if column >= area.x && column < area.right() && row >= area.y && row < area.bottom() {
            Some(((row - area.y) as usize, (column - area.x) as usize))
        } else {
            None
        }
    }
}

/// 矩形内の点か
pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stacks_four_rows() {
        let layout = AppLayout::for_size(80, 24).unwrap();
        assert_eq!(layout.title_bar, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.menu_bar, Rect::new(0, 1, 80, 1));
        assert_eq!(layout.text_area, Rect::new(0, 2, 80, 21));
        assert_eq!(layout.status_bar, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn close_button_sits_at_the_right_edge() {
        let layout = AppLayout::for_size(80, 24).unwrap();
        assert_eq!(layout.close_button(), Rect::new(77, 0, 3, 1));
        assert!(contains(layout.close_button(), 79, 0));
        assert!(!contains(layout.close_button(), 76, 0));
    }

    #[test]
    fn rejects_tiny_screens() {
        assert_eq!(
            AppLayout::for_size(10, 3),
            Err(UiError::ScreenTooSmall { width: 10, height: 3 })
        );
    }

    #[test]
    fn text_offsets_are_relative_to_the_text_area() {
        let layout = AppLayout::for_size(80, 24).unwrap();
        assert_eq!(layout.text_offset(5, 2), Some((0, 5)));
        assert_eq!(layout.text_offset(5, 1), None);
        assert_eq!(layout.text_offset(5, 23), None);
    }

    #[test]
    fn minimum_height_leaves_one_text_row() {
        let layout = AppLayout::for_size(MIN_WIDTH, MIN_HEIGHT).unwrap();
        assert_eq!(layout.text_area.height, 1);
        assert_eq!(layout.status_bar.y, MIN_HEIGHT - 1);
    }
}
