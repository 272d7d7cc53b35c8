//! Gallery view: photo grid for the open category, plus the lightbox.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::StatefulImage;

use crate::app::{App, AppMode};

const CELL_WIDTH: u16 = 26;
const CELL_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let category_name = app
        .current_category
        .as_deref()
        .and_then(|id| app.store.category(id))
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let photo_ids: Vec<String> = match app.current_category.as_deref() {
        Some(id) => app.store.photos_in(id).iter().map(|p| p.id.clone()).collect(),
        None => Vec::new(),
    };

    let header = Paragraph::new(format!(
        " {} | {} photos",
        category_name,
        photo_ids.len()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(header, chunks[0]);

    render_grid(frame, app, &photo_ids, chunks[1]);

    let help = Paragraph::new(
        " arrows:move | Enter:view | m:card | i:import | d:delete | Esc:back",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    if app.mode == AppMode::Lightbox {
        render_lightbox(frame, app, &photo_ids, area);
    }
}

fn render_grid(frame: &mut Frame, app: &mut App, photo_ids: &[String], area: Rect) {
    let columns = (area.width / CELL_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CELL_HEIGHT).max(1) as usize;
    app.gallery_columns = columns;
    ensure_visible(app, columns, visible_rows);

    if photo_ids.is_empty() {
        let empty = Paragraph::new("No photos yet. Press i to import some.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        frame.render_widget(empty, centered);
        return;
    }

    for row in 0..visible_rows {
        let actual_row = app.gallery_scroll + row;
        for col in 0..columns {
            let index = actual_row * columns + col;
            let Some(id) = photo_ids.get(index) else {
                continue;
            };
            let cell = Rect::new(
                area.x + col as u16 * CELL_WIDTH,
                area.y + row as u16 * CELL_HEIGHT,
                CELL_WIDTH,
                CELL_HEIGHT,
            );
            if cell.bottom() > area.bottom() || cell.right() > area.right() {
                continue;
            }
            render_photo_cell(frame, app, id, cell, index == app.gallery_selected);
        }
    }
}

fn ensure_visible(app: &mut App, columns: usize, visible_rows: usize) {
    let selected_row = app.gallery_selected / columns;
    if selected_row < app.gallery_scroll {
        app.gallery_scroll = selected_row;
    }
    if selected_row >= app.gallery_scroll + visible_rows {
        app.gallery_scroll = selected_row - visible_rows + 1;
    }
}

fn render_photo_cell(frame: &mut Frame, app: &mut App, id: &str, area: Rect, selected: bool) {
    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    let Some(url) = app.store.photo(id).map(|p| p.url.clone()) else {
        return;
    };
    if let Some(protocol) = app.thumbs.get(id, &url) {
        let image = StatefulImage::new(None);
        frame.render_stateful_widget(image, inner, protocol);
    } else if app.thumbs.is_loading(id) {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        frame.render_widget(loading, centered);
    }
}

fn render_lightbox(frame: &mut Frame, app: &mut App, photo_ids: &[String], area: Rect) {
    let Some(id) = photo_ids.get(app.gallery_selected) else {
        return;
    };

    let width = area.width.saturating_sub(8).max(10).min(area.width);
    let height = area.height.saturating_sub(4).max(6).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);

    let title = format!(" {}/{} ", app.gallery_selected + 1, photo_ids.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_bottom(" h/l:prev/next | m:card | d:delete | Esc:close ");
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let Some(url) = app.store.photo(id).map(|p| p.url.clone()) else {
        return;
    };
    if let Some(protocol) = app.thumbs.get(id, &url) {
        let image = StatefulImage::new(None);
        frame.render_stateful_widget(image, inner, protocol);
    }
}
