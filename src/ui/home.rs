//! Home view: one tile per category plus a create tile.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::StatefulImage;

use crate::app::App;

const CELL_WIDTH: u16 = 30;
const CELL_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let header = Paragraph::new(format!(
        " MyBag | {} collections | {} photos",
        app.store.categories().len(),
        app.store.photos().len()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(header, chunks[0]);

    render_tiles(frame, app, chunks[1]);

    let help = Paragraph::new(
        " h/l:move | Enter:open | n:new | r:rename | c:cover | d:delete | t:theme | q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn render_tiles(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = (area.width / CELL_WIDTH).max(1) as usize;
    let tile_count = app.store.categories().len() + 1;

    for tile in 0..tile_count {
        let row = tile / columns;
        let col = tile % columns;
        let cell = Rect::new(
            area.x + col as u16 * CELL_WIDTH,
            area.y + row as u16 * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        );
        if cell.bottom() > area.bottom() || cell.right() > area.right() {
            continue;
        }

        let selected = tile == app.home_selected;
        if tile == app.store.categories().len() {
            render_create_tile(frame, cell, selected);
        } else {
            render_category_tile(frame, app, tile, cell, selected);
        }
    }
}

fn render_category_tile(frame: &mut Frame, app: &mut App, index: usize, area: Rect, selected: bool) {
    let Some(category) = app.store.categories().get(index) else {
        return;
    };
    let count = app.store.photo_count(category);
    let cover = app.store.cover_for(category).map(|c| c.to_string());
    let title = format!(" {} ({}) ", category.name, count);
    let cover_key = format!("cover:{}", category.id);

    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    match cover {
        Some(uri) => {
            if let Some(protocol) = app.thumbs.get(&cover_key, &uri) {
                let image = StatefulImage::new(None);
                frame.render_stateful_widget(image, inner, protocol);
            } else {
                render_centered(frame, inner, "Loading...", Color::DarkGray);
            }
        }
        None => render_centered(frame, inner, "No photos yet", Color::DarkGray),
    }
}

fn render_create_tile(frame: &mut Frame, area: Rect, selected: bool) {
    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_centered(frame, inner, "+ New collection", border_color);
}

fn render_centered(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered);
}
