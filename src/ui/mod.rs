//! ユーザーインターフェースモジュール
//!
//! タイトルバー、メニューバー、テキストエリア、ステータスバー、ファイルダイアログ

pub mod dialog;
pub mod layout;
pub mod menu;
pub mod renderer;
pub mod status;
pub mod text_area;
pub mod theme;
pub mod title;
pub mod viewport;
pub mod wrap;

// 公開API
pub use dialog::{DialogKind, DialogResponse, FileDialog};
pub use layout::AppLayout;
pub use menu::{MenuBar, MenuEntry, MenuResponse};
pub use renderer::{draw, RenderView};
pub use status::{format_status, StatusReporter};
pub use theme::Theme;
pub use title::{format_title, WindowTitle};
pub use viewport::ViewportManager;
pub use wrap::{VisualRow, WrapMap};
