//! テーマ
//!
//! 端末上の各領域の配色。既定値は暗色背景に白文字。

use ratatui::style::{Color, Modifier, Style};

/// カラー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// 前景色
    pub foreground: Color,
    /// 背景色
    pub background: Color,
    /// 修飾子（太字、反転など）
    pub modifiers: Modifier,
}

impl ColorScheme {
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
            modifiers: Modifier::empty(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers = modifier;
        self
    }

    pub fn to_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .bg(self.background)
            .add_modifier(self.modifiers)
    }
}

/// テーマ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub text: ColorScheme,
    pub selection: ColorScheme,
    /// カーソル位置のセル背景（端末カーソル自体の色は変更できない）
    pub cursor: Color,
    pub title_bar: ColorScheme,
    pub close_button: ColorScheme,
    pub menu_bar: ColorScheme,
    pub menu_highlight: ColorScheme,
    pub status_bar: ColorScheme,
    pub error: ColorScheme,
    pub dialog: ColorScheme,
}

const BACKGROUND: Color = Color::Rgb(0x1e, 0x1e, 0x1e);
const FOREGROUND: Color = Color::Rgb(0xff, 0xff, 0xff);
const CURSOR: Color = Color::Rgb(0xff, 0xcc, 0x00);
const SELECTION: Color = Color::Rgb(0x66, 0x66, 0x66);
const STATUS_BG: Color = Color::Rgb(0x33, 0x33, 0x33);

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: ColorScheme::new(FOREGROUND, BACKGROUND),
            selection: ColorScheme::new(FOREGROUND, SELECTION),
            cursor: CURSOR,
            title_bar: ColorScheme::new(FOREGROUND, STATUS_BG).with_modifier(Modifier::BOLD),
            close_button: ColorScheme::new(FOREGROUND, Color::Rgb(0xc4, 0x2b, 0x1c)),
            menu_bar: ColorScheme::new(FOREGROUND, STATUS_BG),
            menu_highlight: ColorScheme::new(BACKGROUND, CURSOR),
            status_bar: ColorScheme::new(FOREGROUND, STATUS_BG),
            error: ColorScheme::new(Color::Rgb(0xff, 0x6b, 0x6b), STATUS_BG).with_modifier(Modifier::BOLD),
            dialog: ColorScheme::new(FOREGROUND, STATUS_BG),
        }
    }
}

impl Theme {
    pub fn text_style(&self) -> Style {
        self.text.to_style()
    }

    pub fn selection_style(&self) -> Style {
        self.selection.to_style()
    }

    pub fn status_style(&self) -> Style {
        self.status_bar.to_style()
    }

    pub fn error_style(&self) -> Style {
        self.error.to_style()
    }
}
