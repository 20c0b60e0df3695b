use anyhow::Context;
use modern_text_editor::logging::{default_log_path, Logger};
use modern_text_editor::{error, EditorConfig, TuiApplication};

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let config = EditorConfig::default();
    let logger = Logger::for_terminal_ui(default_log_path()).with_level(config.log_level);
    if let Err(err) = logger.init() {
        // ログなしでも起動する
        eprintln!("warning: logging disabled: {}", err);
    }

    let mut app = TuiApplication::new(config).context("failed to initialise the editor")?;
    app.run().context("terminal session failed")?;
    log::info!("editor exited");
    Ok(())
}
