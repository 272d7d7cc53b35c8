use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, View};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref message) = app.status_message {
        let line = Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();

    let importing = app.pending_imports.len();
    if importing > 0 {
        spans.push(Span::styled(
            format!(" [importing {} batch{}] ", importing, if importing == 1 { "" } else { "es" }),
            Style::default().fg(Color::Cyan),
        ));
    }

    let hints = match app.view {
        View::Home => " ?:help q:quit ",
        View::Gallery => " ?:help Esc:back ",
        View::Maker => " ?:help s:save Esc:back ",
    };

    let content_len: usize = spans.iter().map(|s| s.content.len()).sum();
    let available = area.width as usize;
    if available > content_len + hints.len() {
        spans.push(Span::raw(" ".repeat(available - content_len - hints.len())));
    }
    spans.push(Span::styled(
        hints,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
