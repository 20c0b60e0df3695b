//! メニューバー
//!
//! File / Edit の2つのメニュー。キーボードとマウスの両方で操作でき、
//! 項目の選択は `Command` として返す。

use crate::input::Command;
use crate::ui::layout::contains;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(Command),
    Separator,
}

/// 1つのドロップダウンメニュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// 項目表示に必要な内側の幅
    fn inner_width(&self) -> u16 {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(command) => {
                    Some(command.label().len() + command.accelerator().to_string().len())
                }
                MenuEntry::Separator => None,
            })
            .max()
            .unwrap_or(0) as u16
            + 4
    }
}

/// メニュー操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResponse {
    /// 入力を消費したがメニューは開いたまま
    Consumed,
    /// メニューを閉じた
    Closed,
    /// 項目が選ばれた（メニューは閉じる）
    Activate(Command),
    /// メニューと無関係な位置
    Ignored,
}

#[derive(Debug, Clone)]
pub struct MenuBar {
    menus: Vec<Menu>,
    open: Option<usize>,
    highlighted: usize,
}

impl MenuBar {
    pub fn new() -> Self {
        let file = Menu {
            title: "File",
            entries: vec![
                MenuEntry::Item(Command::New),
                MenuEntry::Item(Command::Open),
                MenuEntry::Item(Command::Save),
                MenuEntry::Item(Command::SaveAs),
                MenuEntry::Separator,
                MenuEntry::Item(Command::Exit),
            ],
        };
        let edit = Menu {
            title: "Edit",
            entries: vec![
                MenuEntry::Item(Command::Cut),
                MenuEntry::Item(Command::Copy),
                MenuEntry::Item(Command::Paste),
                MenuEntry::Item(Command::Undo),
                MenuEntry::Item(Command::Redo),
            ],
        };

        Self {
            menus: vec![file, edit],
            open: None,
            highlighted: 0,
        }
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// 指定メニューを開き、先頭項目を強調する
    pub fn open_menu(&mut self, index: usize) {
        if index < self.menus.len() {
            self.open = Some(index);
            self.highlighted = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// メニューバー上のタイトル位置 (x, 幅)
    pub fn title_spans(&self, bar: Rect) -> Vec<(u16, u16)> {
        let mut x = bar.x;
        self.menus
            .iter()
            .map(|menu| {
                let width = menu.title.len() as u16 + 2;
                let span = (x, width);
                x += width;
                span
            })
            .collect()
    }

    /// ドロップダウンの矩形（枠線込み）
    pub fn dropdown_area(&self, index: usize, bar: Rect, screen: Rect) -> Option<Rect> {
        let menu = self.menus.get(index)?;
        let (x, _) = *self.title_spans(bar).get(index)?;
        let width = (menu.inner_width() + 2).min(screen.width);
        let height = (menu.entries.len() as u16 + 2).min(screen.bottom().saturating_sub(bar.y + 1));
        let x = x.min(screen.right().saturating_sub(width));
        Some(Rect::new(x, bar.y + 1, width, height))
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, event: &KeyEvent) -> MenuResponse {
        let Some(open) = self.open else {
            return MenuResponse::Ignored;
        };

        match event.code {
            KeyCode::Esc | KeyCode::F(10) => {
                self.close();
                MenuResponse::Closed
            }
            KeyCode::Left => {
                self.open_menu((open + self.menus.len() - 1) % self.menus.len());
                MenuResponse::Consumed
            }
            KeyCode::Right | KeyCode::Tab => {
                self.open_menu((open + 1) % self.menus.len());
                MenuResponse::Consumed
            }
            KeyCode::Up => {
                self.move_highlight(open, false);
                MenuResponse::Consumed
            }
            KeyCode::Down => {
                self.move_highlight(open, true);
                MenuResponse::Consumed
            }
            KeyCode::Enter => match self.menus[open].entries.get(self.highlighted) {
                Some(MenuEntry::Item(command)) => {
                    let command = *command;
                    self.close();
                    MenuResponse::Activate(command)
                }
                _ => MenuResponse::Consumed,
            },
            _ => MenuResponse::Consumed,
        }
    }

    fn move_highlight(&mut self, menu: usize, forward: bool) {
        let entries = &self.menus[menu].entries;
        let len = entries.len();
        let mut index = self.highlighted;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if matches!(entries[index], MenuEntry::Item(_)) {
                self.highlighted = index;
                return;
            }
        }
    }

    /// マウスクリックを処理
    pub fn handle_click(&mut self, column: u16, row: u16, bar: Rect, screen: Rect) -> MenuResponse {
        if row == bar.y {
            for (index, (x, width)) in self.title_spans(bar).into_iter().enumerate() {
                if column >= x && column < x + width {
                    if self.open == Some(index) {
                        self.close();
                        return MenuResponse::Closed;
                    }
                    self.open_menu(index);
                    return MenuResponse::Consumed;
                }
            }
        }

        let Some(open) = self.open else {
            return MenuResponse::Ignored;
        };

        if let Some(area) = self.dropdown_area(open, bar, screen) {
            if contains(area, column, row) {
                let index = row.saturating_sub(area.y + 1) as usize;
                if row > area.y && row + 1 < area.bottom() {
                    if let Some(MenuEntry::Item(command)) = self.menus[open].entries.get(index) {
                        let command = *command;
                        self.close();
                        return MenuResponse::Activate(command);
                    }
                }
                return MenuResponse::Consumed;
            }
        }

        self.close();
        MenuResponse::Closed
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}
