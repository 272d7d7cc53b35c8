pub mod confirm_dialog;
pub mod gallery;
pub mod home;
pub mod input_dialog;
pub mod maker;
mod status_bar;
pub mod theme_dialog;
pub mod thumbs;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, AppMode, View};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if app.clear_on_next_render {
        app.clear_on_next_render = false;
        frame.render_widget(Clear, area);
    }

    paint_background(frame, app, area);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Home => home::render(frame, app, main_chunks[0]),
        View::Gallery => gallery::render(frame, app, main_chunks[0]),
        View::Maker => maker::render(frame, app, main_chunks[0]),
    }

    status_bar::render(frame, app, main_chunks[1]);

    match app.mode {
        AppMode::Confirming => {
            if let Some(ref dialog) = app.confirm_dialog {
                confirm_dialog::render(frame, dialog, area);
            }
        }
        AppMode::TextEntry => {
            if let Some(ref dialog) = app.input_dialog {
                input_dialog::render(frame, dialog, area);
            }
        }
        AppMode::ThemePicker => {
            if let Some(ref dialog) = app.theme_dialog {
                theme_dialog::render(frame, dialog, &app.theme, area);
            }
        }
        AppMode::Help => render_help(frame, app.view, area),
        _ => {}
    }
}

/// Paint the two-stop gradient across every cell.
fn paint_background(frame: &mut Frame, app: &App, area: Rect) {
    let buf = frame.buffer_mut();
    let w = area.width.max(1) as f32;
    let h = area.height.max(1) as f32;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let color = app
                .theme
                .color_at((x - area.x) as f32 / w, (y - area.y) as f32 / h);
            buf[(x, y)].set_bg(color.into());
        }
    }
}

fn render_help(frame: &mut Frame, view: View, area: Rect) {
    let (title, entries): (&str, &[(&str, &str)]) = match view {
        View::Home => (
            " Collections ",
            &[
                ("h/l, arrows", "Move between tiles"),
                ("Enter", "Open collection / create"),
                ("n", "New collection"),
                ("r", "Rename collection"),
                ("c", "Set cover image"),
                ("d", "Delete collection"),
                ("t", "Background theme"),
                ("q", "Quit"),
            ],
        ),
        View::Gallery => (
            " Gallery ",
            &[
                ("arrows, hjkl", "Move selection"),
                ("Enter/v", "View photo"),
                ("i", "Import a directory"),
                ("m", "Make a card"),
                ("d", "Delete photo"),
                ("Esc", "Back to collections"),
            ],
        ),
        View::Maker => (
            " Card maker ",
            &[
                ("+/-", "Scale photo"),
                ("[/]", "Rotate photo"),
                ("arrows", "Move photo, 0 resets"),
                ("b/B", "Border width"),
                ("c", "Border color"),
                ("f/F", "Filter"),
                ("o", "Holo overlay"),
                ("t", "Card text"),
                ("3", "3D preview (mouse tilts)"),
                ("s", "Save card"),
                ("Esc", "Back to gallery"),
            ],
        ),
    };

    let dialog_width = 48.min(area.width.saturating_sub(4));
    let dialog_height = (entries.len() as u16 + 4).min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let mut lines = vec![Line::from("")];
    for (keys, what) in entries {
        lines.push(Line::from(format!("  {:<14} {}", keys, what)));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    frame.render_widget(paragraph, dialog_area);
}
