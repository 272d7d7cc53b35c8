//! Confirmation dialog for destructive actions.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::AppMode;

/// What happens if the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeletePhoto(String),
    DeleteCategory(String),
}

pub struct ConfirmDialog {
    pub action: PendingAction,
    pub message: String,
    /// Mode to restore when the user declines.
    pub return_mode: AppMode,
}

impl ConfirmDialog {
    pub fn new(action: PendingAction, message: String, return_mode: AppMode) -> Self {
        Self {
            action,
            message,
            return_mode,
        }
    }
}

pub fn render(frame: &mut Frame, dialog: &ConfirmDialog, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 9;

    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .margin(1)
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Confirm ");
    frame.render_widget(block, dialog_area);

    let message = Paragraph::new(dialog.message.as_str())
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let buttons = Line::from(vec![
        Span::styled(
            "  [Enter/y] ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Yes"),
        Span::raw("    "),
        Span::styled(
            "[Esc/n] ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw("No"),
    ]);
    let button_widget = Paragraph::new(buttons).alignment(Alignment::Center);
    frame.render_widget(button_widget, chunks[1]);
}
