//! Card maker view: live preview pane plus a controls panel.

use image::{DynamicImage, RgbaImage};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{protocol::StatefulProtocol, StatefulImage};

use crate::app::App;
use crate::card::{tilt_warp, Tilt};

/// Cached preview bitmaps. The flat card is recomposed only when styling
/// changes; tilt just rewarps the cached bitmap.
pub struct MakerPreview {
    flat: Option<RgbaImage>,
    protocol: Option<StatefulProtocol>,
    dirty: bool,
    last_tilt: Tilt,
    error: Option<String>,
}

impl MakerPreview {
    pub fn new() -> Self {
        Self {
            flat: None,
            protocol: None,
            dirty: true,
            last_tilt: Tilt::default(),
            error: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }
}

impl Default for MakerPreview {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(36)])
        .split(area);

    render_preview(frame, app, chunks[0]);
    render_controls(frame, app, chunks[1]);
}

fn render_preview(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Card ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.maker_preview_area = Some(inner);

    let Some(session) = app.maker.as_ref() else {
        return;
    };

    if app.maker_preview.dirty {
        app.maker_preview.dirty = false;
        app.maker_preview.protocol = None;
        match app.store.photo(&session.photo_id) {
            Some(photo) => {
                match session.compose(photo, app.rasterizer.as_ref(), 1.0) {
                    Ok(flat) => {
                        app.maker_preview.flat = Some(flat);
                        app.maker_preview.error = None;
                    }
                    Err(err) => {
                        app.maker_preview.flat = None;
                        app.maker_preview.error = Some(err.to_string());
                    }
                }
            }
            None => {
                app.maker_preview.flat = None;
                app.maker_preview.error = Some("Photo no longer exists".to_string());
            }
        }
    }

    if let Some(err) = app.maker_preview.error.clone() {
        let message = Paragraph::new(err)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        frame.render_widget(message, centered);
        return;
    }

    let tilt = session.tilt;
    if app.maker_preview.protocol.is_none() || tilt != app.maker_preview.last_tilt {
        if let Some(flat) = app.maker_preview.flat.as_ref() {
            let shown = if tilt.is_flat() {
                flat.clone()
            } else {
                tilt_warp(flat, tilt)
            };
            app.maker_preview.protocol =
                app.thumbs.protocol_from(DynamicImage::ImageRgba8(shown));
            app.maker_preview.last_tilt = tilt;
        }
    }

    if let Some(protocol) = app.maker_preview.protocol.as_mut() {
        let image = StatefulImage::new(None);
        frame.render_stateful_widget(image, inner, protocol);
    }
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.maker.as_ref() else {
        return;
    };
    let style = &session.style;

    let on_off = |v: bool| if v { "on" } else { "off" };
    let mut lines = vec![
        Line::from(Span::styled(
            "Photo",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  scale   {:.1}  (+/-)", style.transform.scale)),
        Line::from(format!("  rotate  {:.0}°  ([/])", style.transform.rotate)),
        Line::from(format!(
            "  offset  {:.0},{:.0}  (arrows, 0 resets)",
            style.transform.x, style.transform.y
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Frame",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!("  border  {}px  (b/B)  ", style.border_width)),
            Span::styled("██", Style::default().fg(style.border_color.into())),
            Span::raw(" (c)"),
        ]),
        Line::from(format!("  filter  {}  (f/F)", style.filter.label())),
        Line::from(format!("  holo    {}  (o)", on_off(style.holo))),
        Line::from(format!(
            "  text    {}  (t)",
            style.label().unwrap_or("-")
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Preview",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  3D      {}  (3)", on_off(session.three_d))),
        Line::from(format!(
            "  tilt    {:.0}°,{:.0}°",
            session.tilt.x, session.tilt.y
        )),
        Line::from(""),
    ];

    if session.export_in_progress() {
        lines.push(Line::from(Span::styled(
            "  exporting...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  s: save card   Esc: back",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Controls "),
    );
    frame.render_widget(panel, area);
}
