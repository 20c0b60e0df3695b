//! 画面描画
//!
//! `App` が組み立てた `RenderView` を ratatui のフレームへ描く。

use crate::buffer::TextEditor;
use crate::error::Notification;
use crate::ui::dialog::FileDialog;
use crate::ui::layout::{AppLayout, CLOSE_BUTTON};
use crate::ui::menu::{MenuBar, MenuEntry};
use crate::ui::text_area::{display_column, visible_line, LineDecorations, LineStyles};
use crate::ui::theme::Theme;
use crate::ui::viewport::ViewportManager;
use crate::ui::wrap::WrapMap;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// 1フレーム分の描画対象
pub struct RenderView<'a> {
    pub editor: &'a TextEditor,
    pub title: &'a str,
    pub status: &'a str,
    pub notification: Option<&'a Notification>,
    pub menu: &'a MenuBar,
    pub dialog: Option<&'a FileDialog>,
    pub viewport: &'a ViewportManager,
    pub theme: &'a Theme,
    pub tab_width: usize,
    /// 画面幅での単語折り返し
    pub word_wrap: bool,
}

/// フレーム全体を描画
pub fn draw(frame: &mut Frame<'_>, view: &RenderView<'_>) {
    let area = frame.area();
    let layout = match AppLayout::calculate(area) {
        Ok(layout) => layout,
        Err(err) => {
            let message = Paragraph::new(err.to_string()).style(view.theme.error_style());
            frame.render_widget(message, area);
            return;
        }
    };

    draw_title_bar(frame, &layout, view);
    draw_menu_bar(frame, layout.menu_bar, view);
    let cursor = draw_text_area(frame, layout.text_area, view);
    draw_status_bar(frame, layout.status_bar, view);

    if let Some(index) = view.menu.open_index() {
        draw_dropdown(frame, &layout, index, view);
    }

    if let Some(dialog) = view.dialog {
        draw_dialog(frame, area, dialog, view.theme);
    } else if !view.menu.is_open() {
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }
}

fn draw_title_bar(frame: &mut Frame<'_>, layout: &AppLayout, view: &RenderView<'_>) {
    let title = Paragraph::new(view.title)
        .alignment(Alignment::Center)
        .style(view.theme.title_bar.to_style());
    frame.render_widget(title, layout.title_bar);

    let close = Paragraph::new(CLOSE_BUTTON).style(view.theme.close_button.to_style());
    frame.render_widget(close, layout.close_button());
}

fn draw_menu_bar(frame: &mut Frame<'_>, area: Rect, view: &RenderView<'_>) {
    let spans: Vec<Span<'_>> = view
        .menu
        .menus()
        .iter()
        .enumerate()
        .map(|(index, menu)| {
            let style = if view.menu.open_index() == Some(index) {
                view.theme.menu_highlight.to_style()
            } else {
                view.theme.menu_bar.to_style()
            };
            Span::styled(format!(" {} ", menu.title), style)
        })
        .collect();

    let bar = Paragraph::new(Line::from(spans)).style(view.theme.menu_bar.to_style());
    frame.render_widget(bar, area);
}

/// テキストを描画し、端末カーソルの位置を返す
fn draw_text_area(frame: &mut Frame<'_>, area: Rect, view: &RenderView<'_>) -> Option<(u16, u16)> {
    let editor = view.editor;
    let buffer = editor.buffer();
    let cursor = editor.cursor();
    let selection = editor.selection().map(|s| s.range());
    let width = area.width as usize;
    let height = area.height as usize;
    let top = view.viewport.top_line();
    let left = if view.word_wrap {
        0
    } else {
        view.viewport.left_column()
    };

    let styles = LineStyles {
        text: view.theme.text_style(),
        selection: view.theme.selection_style(),
        cursor: Style::default()
            .fg(view.theme.text.background)
            .bg(view.theme.cursor),
    };

    let map = WrapMap::build(buffer, view.word_wrap.then_some(width), view.tab_width);
    let cursor_row = map.row_of(cursor.line, cursor.column);

    let lines: Vec<Line<'static>> = map
        .rows()
        .iter()
        .enumerate()
        .skip(top)
        .take(height)
        .map(|(index, row)| {
            let (start, end) = row.char_range(buffer);
            let decorations = LineDecorations {
                selection: selection.and_then(|(s, e)| {
                    if e <= start || s > end {
                        None
                    } else {
                        Some((s.max(start) - start, e.min(end) - start))
                    }
                }),
                cursor: (index == cursor_row && selection.is_none())
                    .then(|| cursor.column.saturating_sub(row.start)),
            };
            visible_line(&row.text(buffer), left, width, view.tab_width, decorations, &styles)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(styles.text), area);

    if cursor_row < top || cursor_row >= top + height {
        return None;
    }
    let row = map.row(cursor_row)?;
    let mut column = display_column(
        &row.text(buffer),
        cursor.column.saturating_sub(row.start),
        view.tab_width,
    );
    if view.word_wrap {
        column = column.min(width.saturating_sub(1));
    }
    if column < left || column >= left + width {
        return None;
    }
    Some((
        area.x + (column - left) as u16,
        area.y + (cursor_row - top) as u16,
    ))
}

fn draw_status_bar(frame: &mut Frame<'_>, area: Rect, view: &RenderView<'_>) {
    let status_width = (view.status.len() as u16 + 1).min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(status_width)])
        .split(area);

    let (message, style) = match view.notification {
        Some(notification) if notification.is_error() => {
            (notification.message.as_str(), view.theme.error_style())
        }
        Some(notification) => (notification.message.as_str(), view.theme.status_style()),
        None => ("", view.theme.status_style()),
    };
    frame.render_widget(Paragraph::new(format!(" {}", message)).style(style), chunks[0]);

    let position = Paragraph::new(view.status)
        .alignment(Alignment::Right)
        .style(view.theme.status_style());
    frame.render_widget(position, chunks[1]);
}

fn draw_dropdown(frame: &mut Frame<'_>, layout: &AppLayout, index: usize, view: &RenderView<'_>) {
    let Some(area) = view.menu.dropdown_area(index, layout.menu_bar, layout.total) else {
        return;
    };
    let menu = &view.menu.menus()[index];
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line<'_>> = menu
        .entries
        .iter()
        .enumerate()
        .map(|(row, entry)| match entry {
            MenuEntry::Item(command) => {
                let accelerator = command.accelerator().to_string();
                let gap = inner_width.saturating_sub(command.label().len() + accelerator.len() + 2);
                let text = format!(" {}{}{} ", command.label(), " ".repeat(gap), accelerator);
                let style = if row == view.menu.highlighted() {
                    view.theme.menu_highlight.to_style()
                } else {
                    view.theme.menu_bar.to_style()
                };
                Line::from(Span::styled(text, style))
            }
            MenuEntry::Separator => Line::from("─".repeat(inner_width)),
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .style(view.theme.menu_bar.to_style());
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// 画面中央の矩形
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x).max(20).min(area.width);
    let height = scale(area.height, percent_y).max(8).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_dialog(frame: &mut Frame<'_>, screen: Rect, dialog: &FileDialog, theme: &Theme) {
    let area = centered(screen, 70, 70);
    let style = theme.dialog.to_style();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", dialog.title()))
        .style(style);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // ディレクトリ
            Constraint::Min(1),    // 一覧
            Constraint::Length(1), // フィルタ
            Constraint::Length(1), // 入力
            Constraint::Length(1), // エラー/ヘルプ
        ])
        .split(inner);

    let directory = Paragraph::new(dialog.directory().display().to_string())
        .style(style.add_modifier(Modifier::BOLD));
    frame.render_widget(directory, rows[0]);

    let visible = rows[1].height as usize;
    let offset = dialog
        .selected()
        .map_or(0, |selected| (selected + 1).saturating_sub(visible));
    let entries: Vec<Line<'_>> = dialog
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, entry)| {
            let entry_style = if dialog.selected() == Some(index) {
                theme.menu_highlight.to_style()
            } else {
                style
            };
            Line::from(Span::styled(format!("  {}", entry.display_name()), entry_style))
        })
        .collect();
    frame.render_widget(Paragraph::new(entries), rows[1]);

    let filter = format!("Type: {}  [Tab]", dialog.active_filter().display_label());
    frame.render_widget(Paragraph::new(filter).style(style), rows[2]);

    let prompt = "File name: ";
    let input = Paragraph::new(format!("{}{}", prompt, dialog.input())).style(style);
    frame.render_widget(input, rows[3]);

    let (footer, footer_style) = match dialog.error() {
        Some(error) => (error.to_string(), theme.error_style()),
        None => ("Enter: confirm  Esc: cancel".to_string(), style),
    };
    frame.render_widget(Paragraph::new(footer).style(footer_style), rows[4]);

    let cursor_x = rows[3].x + (prompt.len() + dialog.input().chars().count()) as u16;
    if cursor_x < rows[3].right() {
        frame.set_cursor_position((cursor_x, rows[3].y));
    }
}
