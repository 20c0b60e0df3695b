//! ステータスバーのカーソル位置表示

use crate::buffer::TextEditor;

/// "Line {行}, Column {列}"（1ベース）
pub fn format_status(line: usize, column: usize) -> String {
    format!("Line {}, Column {}", line, column)
}

/// キーを離したときにカーソル位置を読み取って表示を更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReporter {
    text: String,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self {
            text: format_status(1, 1),
        }
    }

    /// 表示を更新し、変化したかを返す
    pub fn on_key_release(&mut self, editor: &TextEditor) -> bool {
        let cursor = editor.cursor();
        let text = format_status(cursor.display_line(), cursor.display_column());
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}
