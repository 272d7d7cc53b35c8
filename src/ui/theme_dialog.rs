//! Background gradient picker.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::theme::{Rgb, Theme};

const PRESETS: [(&str, &str, &str); 6] = [
    ("Peach", "#ffdde1", "#ee9ca7"),
    ("Lavender", "#fbc2eb", "#a18cd1"),
    ("Sky", "#c2e9fb", "#a1c4fd"),
    ("Mint", "#d4fc79", "#96e6a1"),
    ("Dusk", "#a6c0fe", "#f68084"),
    ("Sand", "#fad0c4", "#ffd1ff"),
];

pub struct ThemeDialog {
    pub selected: usize,
}

impl ThemeDialog {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % PRESETS.len();
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + PRESETS.len() - 1) % PRESETS.len();
    }

    pub fn selected_colors(&self) -> (Rgb, Rgb) {
        let (_, start, end) = PRESETS[self.selected];
        let defaults = Theme::default();
        (
            Rgb::from_hex(start).unwrap_or(defaults.start),
            Rgb::from_hex(end).unwrap_or(defaults.end),
        )
    }
}

pub fn render(frame: &mut Frame, dialog: &ThemeDialog, theme: &Theme, area: Rect) {
    let dialog_width = 44.min(area.width.saturating_sub(4));
    let dialog_height = (PRESETS.len() as u16 + 6).min(area.height.saturating_sub(4));

    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let mut lines = Vec::new();
    for (i, (name, start, end)) in PRESETS.iter().enumerate() {
        let marker = if i == dialog.selected { "> " } else { "  " };
        let style = if i == dialog.selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let swatch_start = Rgb::from_hex(start).unwrap_or(theme.start);
        let swatch_end = Rgb::from_hex(end).unwrap_or(theme.end);
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<10}", marker, name), style),
            Span::styled("██", Style::default().fg(swatch_start.into())),
            Span::styled("██", Style::default().fg(swatch_end.into())),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "  angle {}°  split {}%",
        theme.angle, theme.split
    )));
    lines.push(Line::from(Span::styled(
        "  Enter:apply a/A:angle s/S:split Esc:close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Background "),
    );
    frame.render_widget(paragraph, dialog_area);
}
