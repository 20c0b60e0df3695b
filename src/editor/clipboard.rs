//! クリップボード
//!
//! プロセス内のレジスタと、可能であればシステムクリップボードを使う実装。

/// クリップボード操作
pub trait Clipboard {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: String);
}

/// プロセス内クリップボード
#[derive(Debug, Default, Clone)]
pub struct LocalClipboard {
    contents: Option<String>,
}

impl LocalClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for LocalClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: String) {
        self.contents = Some(text);
    }
}

/// システムクリップボード
///
/// `arboard` はヘッドレス環境や一部の端末で初期化に失敗するため、
/// 失敗時はプロセス内レジスタだけで動作する。
pub struct SystemClipboard {
    #[cfg(feature = "system-clipboard")]
    system: Option<arboard::Clipboard>,
    fallback: LocalClipboard,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "system-clipboard")]
            system: match arboard::Clipboard::new() {
                Ok(clipboard) => Some(clipboard),
                Err(err) => {
                    log::warn!("system clipboard unavailable, using local register: {}", err);
                    None
                }
            },
            fallback: LocalClipboard::new(),
        }
    }

    #[cfg(feature = "system-clipboard")]
    pub fn is_system_backed(&self) -> bool {
        self.system.is_some()
    }

    #[cfg(not(feature = "system-clipboard"))]
    pub fn is_system_backed(&self) -> bool {
        false
    }

    #[cfg(feature = "system-clipboard")]
    fn read_system(&mut self) -> Option<String> {
        let system = self.system.as_mut()?;
        match system.get_text() {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("system clipboard read failed: {}", err);
                None
            }
        }
    }

    #[cfg(not(feature = "system-clipboard"))]
    fn read_system(&mut self) -> Option<String> {
        None
    }

    #[cfg(feature = "system-clipboard")]
    fn write_system(&mut self, text: &str) {
        if let Some(system) = self.system.as_mut() {
            if let Err(err) = system.set_text(text.to_string()) {
                log::debug!("system clipboard write failed: {}", err);
            }
        }
    }

    #[cfg(not(feature = "system-clipboard"))]
    fn write_system(&mut self, _text: &str) {}
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.read_system().or_else(|| self.fallback.get_text())
    }

    fn set_text(&mut self, text: String) {
        self.write_system(&text);
        self.fallback.set_text(text);
    }
}
