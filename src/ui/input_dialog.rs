//! Single-line text entry dialog.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// What the committed text is used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    NewCategory,
    RenameCategory(String),
    CoverPath(String),
    ImportPath,
    CardLabel,
}

pub struct InputDialog {
    pub purpose: InputPurpose,
    pub title: String,
    value: String,
    cursor: usize,
}

impl InputDialog {
    pub fn new(purpose: InputPurpose, title: &str, initial: &str) -> Self {
        Self {
            purpose,
            title: title.to_string(),
            value: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_cursor();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        let at = self.byte_cursor();
        if at < self.value.len() {
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

pub fn render(frame: &mut Frame, dialog: &InputDialog, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 5;

    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", dialog.title));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // Keep the cursor visible when the text overflows the field.
    let available = chunks[0].width as usize;
    let chars: Vec<char> = dialog.value.chars().collect();
    let scroll = if dialog.cursor >= available && available > 0 {
        dialog.cursor - available + 1
    } else {
        0
    };
    let visible: String = chars
        .iter()
        .skip(scroll)
        .take(available)
        .collect();

    let input = Paragraph::new(visible).style(Style::default().fg(Color::White));
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position(Position::new(
        chunks[0].x + (dialog.cursor - scroll) as u16,
        chunks[0].y,
    ));

    let help = Paragraph::new("Enter: confirm | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_at_cursor() {
        let mut dialog = InputDialog::new(InputPurpose::NewCategory, "New category", "abc");
        dialog.move_cursor_home();
        dialog.handle_char('x');
        assert_eq!(dialog.value(), "xabc");

        dialog.delete();
        assert_eq!(dialog.value(), "xbc");

        dialog.move_cursor_end();
        dialog.backspace();
        assert_eq!(dialog.value(), "xb");
    }

    #[test]
    fn test_multibyte_input() {
        let mut dialog = InputDialog::new(InputPurpose::CardLabel, "Card text", "");
        for c in "été".chars() {
            dialog.handle_char(c);
        }
        dialog.backspace();
        assert_eq!(dialog.value(), "ét");
    }
}
