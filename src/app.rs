//! メインアプリケーション構造体
//!
//! エディタの状態（文書、タイトル、ステータス、メニュー、ダイアログ）を保持し、
//! キー/マウス入力をコマンドと編集操作へ振り分ける。端末には依存しないため、
//! テストからイベントを直接流し込める。

use crate::buffer::{NavigationAction, TextEditor};
use crate::config::{EditorConfig, SavePolicy};
use crate::editor::{Clipboard, LocalClipboard, SystemClipboard};
use crate::error::{EditorError, Notification, Result};
use crate::file::{display_name, FileGateway, FsGateway};
use crate::input::{Action, Command, CommandOutcome, EditAction, KeyMap};
use crate::ui::dialog::{DialogKind, DialogResponse, FileDialog};
use crate::ui::layout::{contains, AppLayout};
use crate::ui::menu::{MenuBar, MenuResponse};
use crate::ui::renderer::RenderView;
use crate::ui::status::StatusReporter;
use crate::ui::text_area::{char_column_at, display_column};
use crate::ui::title::WindowTitle;
use crate::ui::viewport::ViewportManager;
use crate::ui::wrap::WrapMap;
use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::env;
use std::path::{Path, PathBuf};

/// ホイール1回あたりのスクロール行数
const WHEEL_LINES: isize = 3;
/// 端末サイズが分かるまでの仮サイズ
const DEFAULT_SCREEN: (u16, u16) = (80, 24);

/// アプリケーションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Running,
    Terminated,
}

/// メインアプリケーション構造体
pub struct App {
    config: EditorConfig,
    /// 文書バッファ
    editor: TextEditor,
    /// 開いている/保存したファイル
    document_path: Option<PathBuf>,
    title: WindowTitle,
    status: StatusReporter,
    notification: Option<Notification>,
    menu: MenuBar,
    keymap: KeyMap,
    /// 表示中のファイルダイアログ
    dialog: Option<FileDialog>,
    clipboard: Box<dyn Clipboard>,
    gateway: Box<dyn FileGateway>,
    viewport: ViewportManager,
    /// 端末サイズ（幅, 高さ）
    screen: (u16, u16),
    state: ShellState,
    /// 端末がキーリリースを通知するか
    release_events: bool,
    /// テキストエリアでドラッグ中
    dragging: bool,
    /// ダイアログの初期ディレクトリ
    working_dir: PathBuf,
}

impl App {
    /// 既定のファイルシステムとクリップボードで作成
    pub fn new(config: EditorConfig) -> Result<Self> {
        let clipboard: Box<dyn Clipboard> = if config.use_system_clipboard {
            let system = SystemClipboard::new();
            log::info!("system clipboard available: {}", system.is_system_backed());
            Box::new(system)
        } else {
            Box::new(LocalClipboard::new())
        };
        Self::with_services(config, Box::new(FsGateway::new()), clipboard)
    }

    /// ファイルゲートウェイとクリップボードを指定して作成
    pub fn with_services(
        config: EditorConfig,
        gateway: Box<dyn FileGateway>,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self> {
        config.validate()?;

        let title = WindowTitle::new(&config.app_name, &config.untitled_name);
        let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut app = Self {
            config,
            editor: TextEditor::new(),
            document_path: None,
            title,
            status: StatusReporter::new(),
            notification: None,
            menu: MenuBar::new(),
            keymap: KeyMap::new(),
            dialog: None,
            clipboard,
            gateway,
            viewport: ViewportManager::default(),
            screen: DEFAULT_SCREEN,
            state: ShellState::Running,
            release_events: false,
            dragging: false,
            working_dir,
        };
        app.resize(DEFAULT_SCREEN.0, DEFAULT_SCREEN.1);
        log::info!("editor initialised");
        Ok(app)
    }

    /// ダイアログの初期ディレクトリを変更
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    // 状態の参照

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn text(&self) -> String {
        self.editor.text()
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dialog(&self) -> Option<&FileDialog> {
        self.dialog.as_ref()
    }

    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ShellState::Running
    }

    /// 端末がキーリリースを通知するかを設定
    ///
    /// 通知しない端末ではキー押下の処理後にステータスを更新する。
    pub fn set_key_release_reporting(&mut self, enabled: bool) {
        self.release_events = enabled;
    }

    pub fn key_release_reporting(&self) -> bool {
        self.release_events
    }

    // コマンド

    /// コマンドを実行（メニューとアクセラレータの共通入口）
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        if !self.is_running() {
            return CommandOutcome::error("editor has terminated");
        }
        log::debug!("dispatch {:?}", command);

        let outcome = match command {
            Command::New => self.new_document(),
            Command::Open => self.show_dialog(DialogKind::Open),
            Command::Save => match (self.config.save_policy, self.document_path.clone()) {
                (SavePolicy::ReuseKnownPath, Some(path)) => self.save_outcome(&path),
                _ => self.show_dialog(DialogKind::Save),
            },
            Command::SaveAs => self.show_dialog(DialogKind::Save),
            Command::Exit => {
                self.terminate();
                CommandOutcome::quit()
            }
            Command::Cut => match self.editor.cut_selection() {
                Ok(Some(text)) => {
                    self.clipboard.set_text(text);
                    CommandOutcome::success()
                }
                Ok(None) => CommandOutcome::success(),
                Err(err) => edit_failure("Cut", &err),
            },
            Command::Copy => {
                if let Some(text) = self.editor.selected_text() {
                    self.clipboard.set_text(text);
                }
                CommandOutcome::success()
            }
            Command::Paste => match self.clipboard.get_text() {
                Some(text) if !text.is_empty() => match self.editor.paste_text(&text) {
                    Ok(()) => CommandOutcome::success(),
                    Err(err) => edit_failure("Paste", &err),
                },
                _ => CommandOutcome::success(),
            },
            Command::Undo => match self.editor.undo() {
                Ok(true) => CommandOutcome::success(),
                Ok(false) => CommandOutcome::success_with_message("Nothing to undo"),
                Err(err) => edit_failure("Undo", &err),
            },
            Command::Redo => match self.editor.redo() {
                Ok(true) => CommandOutcome::success(),
                Ok(false) => CommandOutcome::success_with_message("Nothing to redo"),
                Err(err) => edit_failure("Redo", &err),
            },
        };

        if let Some(message) = &outcome.message {
            let notification = if outcome.success {
                Notification::info(message.clone())
            } else {
                Notification::error(message.clone())
            };
            self.notify(notification);
        }
        self.ensure_cursor_visible();
        outcome
    }

    fn new_document(&mut self) -> CommandOutcome {
        self.editor.clear();
        self.document_path = None;
        self.title.update(None);
        self.viewport.reset();
        log::info!("new document");
        CommandOutcome::success()
    }

    fn show_dialog(&mut self, kind: DialogKind) -> CommandOutcome {
        let directory = self
            .document_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.working_dir.clone());
        let filters = self.config.file_filters.clone();

        let dialog = match kind {
            DialogKind::Open => FileDialog::open(directory, filters),
            DialogKind::Save => FileDialog::save(
                directory,
                filters,
                &self.config.default_extension,
                self.document_path.as_deref().map(display_name),
            ),
        };
        self.menu.close();
        self.dialog = Some(dialog);
        CommandOutcome::success()
    }

    fn save_outcome(&mut self, path: &Path) -> CommandOutcome {
        match self.save_to_path(path) {
            Ok(()) => CommandOutcome::success_with_message(format!("Saved {}", display_name(path))),
            Err(err) => {
                log::error!("save failed: {}", err);
                CommandOutcome::error(format!("Cannot save: {}", err))
            }
        }
    }

    fn terminate(&mut self) {
        if self.state == ShellState::Running {
            log::info!("shell terminated");
        }
        self.state = ShellState::Terminated;
        self.dialog = None;
        self.menu.close();
    }

    // ファイル操作

    /// ファイルを開いてバッファを置き換える
    ///
    /// 失敗時はバッファ、パス、タイトルを変更しない。
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let content = self.gateway.read(path)?;
        self.editor.replace_all(&content);
        self.document_path = Some(path.to_path_buf());
        self.title.update(self.document_path.as_deref());
        self.viewport.reset();
        log::info!("opened {} ({} chars)", path.display(), self.editor.len_chars());
        Ok(())
    }

    /// バッファ全体をファイルへ保存する
    pub fn save_to_path(&mut self, path: &Path) -> Result<()> {
        self.gateway.write(path, &self.editor.text())?;
        self.editor.mark_saved();
        self.document_path = Some(path.to_path_buf());
        self.title.update(self.document_path.as_deref());
        log::info!("saved {}", path.display());
        Ok(())
    }

    // 入力

    /// キーイベントを処理
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if !self.is_running() {
            return;
        }

        if event.kind == KeyEventKind::Release {
            if self.release_events {
                self.status.on_key_release(&self.editor);
            }
            return;
        }

        self.handle_key_press(&event);
        self.ensure_cursor_visible();

        if !self.release_events {
            self.status.on_key_release(&self.editor);
        }
    }

    fn handle_key_press(&mut self, event: &KeyEvent) {
        if self.dialog.is_some() {
            self.handle_dialog_key(event);
            return;
        }

        if self.menu.is_open() {
            if let MenuResponse::Activate(command) = self.menu.handle_key(event) {
                self.dispatch(command);
            }
            return;
        }

        match self.keymap.resolve(event) {
            Some(Action::Command(command)) => {
                self.dispatch(command);
            }
            Some(Action::Edit(edit)) => self.apply_edit(edit),
            Some(Action::Navigate { action, extend }) => {
                self.editor.navigate(action, extend);
            }
            Some(Action::Page { down, extend }) => {
                let lines = self.viewport.height().saturating_sub(1).max(1);
                let action = if down {
                    NavigationAction::PageDown(lines)
                } else {
                    NavigationAction::PageUp(lines)
                };
                self.editor.navigate(action, extend);
            }
            Some(Action::OpenMenu(index)) => self.menu.open_menu(index),
            None => {}
        }
    }

    fn apply_edit(&mut self, edit: EditAction) {
        let result = match edit {
            EditAction::InsertChar(ch) => self.editor.type_char(ch),
            EditAction::InsertNewline => self.editor.insert_newline(),
            EditAction::DeleteBackward => self.editor.delete_backward().map(|_| ()),
            EditAction::DeleteForward => self.editor.delete_forward().map(|_| ()),
        };
        if let Err(err) = result {
            log::error!("edit failed: {}", err);
            self.notify(Notification::from_error("Edit failed", &err));
        }
    }

    fn handle_dialog_key(&mut self, event: &KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let kind = dialog.kind();

        match dialog.handle_key(event) {
            DialogResponse::Pending => {}
            DialogResponse::Cancelled => {
                self.dialog = None;
                log::debug!("{:?} dialog cancelled", kind);
            }
            DialogResponse::Chosen(path) => {
                self.dialog = None;
                let (result, context) = match kind {
                    DialogKind::Open => (self.open_path(&path), "Cannot open"),
                    DialogKind::Save => (self.save_to_path(&path), "Cannot save"),
                };
                if let Err(err) = result {
                    log::error!("{} {}: {}", context, path.display(), err);
                    self.notify(Notification::from_error(context, &err));
                }
            }
        }
    }

    /// 端末からの貼り付け（ブラケットペースト）
    pub fn handle_paste(&mut self, text: &str) {
        if !self.is_running() || self.dialog.is_some() {
            return;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if let Err(err) = self.editor.paste_text(&text) {
            self.notify(Notification::from_error("Paste failed", &err));
        }
        self.ensure_cursor_visible();
    }

    /// マウスイベントを処理
    ///
    /// クリックによるカーソル移動ではステータスを更新しない。
    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        if !self.is_running() {
            return;
        }
        let Ok(layout) = AppLayout::for_size(self.screen.0, self.screen.1) else {
            return;
        };

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(&layout, event.column, event.row),
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.dragging && self.dialog.is_none() && !self.menu.is_open() {
                    let (line, column) = self.text_position(&layout, event.column, event.row);
                    self.editor.drag_to(line, column);
                    self.ensure_cursor_visible();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = false,
            MouseEventKind::ScrollUp => {
                let rows = self.wrap_map().len();
                self.viewport.scroll_by(-WHEEL_LINES, rows);
            }
            MouseEventKind::ScrollDown => {
                let rows = self.wrap_map().len();
                self.viewport.scroll_by(WHEEL_LINES, rows);
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, layout: &AppLayout, column: u16, row: u16) {
        // ダイアログ表示中は閉じるボタンも無効
        if self.dialog.is_some() {
            return;
        }

        if contains(layout.close_button(), column, row) {
            log::debug!("close button clicked");
            self.dispatch(Command::Exit);
            return;
        }

        match self.menu.handle_click(column, row, layout.menu_bar, layout.total) {
            MenuResponse::Activate(command) => {
                self.dispatch(command);
                return;
            }
            MenuResponse::Consumed | MenuResponse::Closed => return,
            MenuResponse::Ignored => {}
        }

        if layout.text_offset(column, row).is_some() {
            let (line, column) = self.text_position(layout, column, row);
            self.editor.click_at(line, column);
            self.dragging = true;
        }
    }

    /// 画面座標を (行, 列) に変換。テキストエリア外は端に寄せる
    fn text_position(&self, layout: &AppLayout, column: u16, row: u16) -> (usize, usize) {
        let area = layout.text_area;
        let row = row.clamp(area.y, area.bottom().saturating_sub(1));
        let column = column.clamp(area.x, area.right().saturating_sub(1));

        let map = self.wrap_map();
        let index = self.viewport.top_line() + (row - area.y) as usize;
        let Some(visual) = map.row(index) else {
            return (self.editor.line_count().saturating_sub(1), usize::MAX);
        };

        let display = self.viewport.left_column() + (column - area.x) as usize;
        let text = visual.text(self.editor.buffer());
        let mut offset = visual.start + char_column_at(&text, display, self.config.tab_width);
        // 折り返した行の右側は、その表示行の最後の文字へ
        if !visual.last && offset >= visual.end && visual.end > visual.start {
            offset = visual.end - 1;
        }
        (visual.line, offset)
    }

    /// 現在の画面幅での表示行
    fn wrap_map(&self) -> WrapMap {
        let width = self.config.word_wrap.then_some(self.viewport.width());
        WrapMap::build(self.editor.buffer(), width, self.config.tab_width)
    }

    // 画面

    /// 端末サイズの変更
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
        if let Ok(layout) = AppLayout::for_size(width, height) {
            self.viewport
                .set_dimensions(layout.text_area.height as usize, layout.text_area.width as usize);
        }
        self.ensure_cursor_visible();
    }

    /// 期限切れの通知を消す
    pub fn tick(&mut self) {
        if self.notification.as_ref().map_or(false, Notification::is_expired) {
            self.notification = None;
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification.with_duration(self.config.notification_duration));
    }

    fn ensure_cursor_visible(&mut self) {
        let cursor = self.editor.cursor();
        let map = self.wrap_map();
        let index = map.row_of(cursor.line, cursor.column);
        let Some(visual) = map.row(index) else {
            return;
        };

        let text = visual.text(self.editor.buffer());
        let mut column = display_column(
            &text,
            cursor.column.saturating_sub(visual.start),
            self.config.tab_width,
        );
        if self.config.word_wrap {
            column = column.min(self.viewport.width() - 1);
        }
        self.viewport.ensure_visible(index, column);
    }

    /// 描画用のビュー
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            editor: &self.editor,
            title: self.title.as_str(),
            status: self.status.text(),
            notification: self.notification.as_ref(),
            menu: &self.menu,
            dialog: self.dialog.as_ref(),
            viewport: &self.viewport,
            theme: &self.config.theme,
            tab_width: self.config.tab_width,
            word_wrap: self.config.word_wrap,
        }
    }
}

fn edit_failure(context: &str, err: &EditorError) -> CommandOutcome {
    log::error!("{} failed: {}", context, err);
    CommandOutcome::error(format!("{} failed: {}", context, err))
}
