use crate::app::App;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result, UiError};
use crate::ui::draw;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen, SetTitle,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::time::Duration;

/// 入力待ちの間隔（通知の期限切れを拾う）
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct TuiApplication {
    app: App,
    /// 端末へ最後に送ったタイトル
    last_title: Option<String>,
}

impl TuiApplication {
    pub fn new(config: EditorConfig) -> Result<Self> {
        Ok(Self {
            app: App::new(config)?,
            last_title: None,
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn run(&mut self) -> Result<()> {
        let enhanced = enter_terminal()?;
        self.app.set_key_release_reporting(enhanced);
        log::info!("terminal ready (key release events: {})", enhanced);

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal(enhanced);

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size().map_err(|err| terminal_error("terminal size", err))?;
        self.app.resize(size.width, size.height);

        while self.app.is_running() {
            self.app.tick();
            self.sync_title()?;
            self.render(terminal)?;

            if event::poll(POLL_INTERVAL).map_err(|err| terminal_error("event poll", err))? {
                match event::read().map_err(|err| terminal_error("event read", err))? {
                    Event::Key(key_event) => self.app.handle_key_event(key_event),
                    Event::Mouse(mouse_event) => self.app.handle_mouse_event(mouse_event),
                    Event::Resize(width, height) => self.app.resize(width, height),
                    Event::Paste(text) => self.app.handle_paste(&text),
                    Event::FocusGained | Event::FocusLost => {}
                }
            }
        }

        Ok(())
    }

    fn render<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let view = self.app.render_view();
        terminal
            .draw(|frame| draw(frame, &view))
            .map(|_| ())
            .map_err(|err| terminal_error("render", err))
    }

    /// 端末エミュレータのウィンドウタイトルを更新
    fn sync_title(&mut self) -> Result<()> {
        let title = self.app.title();
        if self.last_title.as_deref() == Some(title) {
            return Ok(());
        }
        execute!(stdout(), SetTitle(title)).map_err(|err| terminal_error("set title", err))?;
        self.last_title = Some(title.to_string());
        Ok(())
    }
}

/// 端末を初期化し、キーリリースが通知されるかを返す
fn enter_terminal() -> Result<bool> {
    enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)
        .map_err(|err| terminal_error("enter alternate screen", err))?;

    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            out,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .map_err(|err| terminal_error("keyboard enhancement", err))?;
    }
    Ok(enhanced)
}

fn leave_terminal(enhanced: bool) -> Result<()> {
    let mut out = stdout();
    if enhanced {
        execute!(out, PopKeyboardEnhancementFlags).map_err(|err| terminal_error("keyboard enhancement", err))?;
    }
    execute!(out, DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen)
        .map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// パニック時などに端末を元へ戻す（失敗は無視）
pub fn restore_terminal() {
    let mut out = stdout();
    let _ = execute!(
        out,
        PopKeyboardEnhancementFlags,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
    let _ = disable_raw_mode();
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> EditorError {
    EditorError::Ui(UiError::terminal(context, err))
}
