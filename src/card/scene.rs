//! Builds the SVG scene for a card: border frame, photo layer with its
//! transform, optional holographic overlay and label pill.
//!
//! The scene is a pure function of the photo data URI and the style; tilt is
//! deliberately absent so a capture of the scene is always flat. Filters are
//! baked into the photo pixels before it gets here (see `card::filter`).

use std::fmt::Write;

use super::{CardStyle, CARD_HEIGHT, CARD_WIDTH};

/// Corner radius of the outer frame.
const FRAME_RADIUS: u32 = 16;
/// Vertical clearance between the label pill and the card bottom.
const LABEL_MARGIN: u32 = 24;
const LABEL_HEIGHT: u32 = 30;
const LABEL_FONT_SIZE: u32 = 18;

/// Render the card as an SVG document. `photo_uri` must be an inline data
/// URI; the scene never references external resources.
pub fn card_scene(photo_uri: &str, style: &CardStyle) -> String {
    let b = style.border_width;
    let w = CARD_WIDTH + 2 * b;
    let h = CARD_HEIGHT + 2 * b;
    // Center of the photo viewport, the transform origin.
    let cx = (b + CARD_WIDTH / 2) as f32;
    let cy = (b + CARD_HEIGHT / 2) as f32;
    let t = style.transform;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    if style.holo {
        svg.push_str(
            r##"<defs><linearGradient id="holo" gradientTransform="rotate(120)">
<stop offset="0%" stop-color="#ff9ff3"/>
<stop offset="25%" stop-color="#feca57"/>
<stop offset="50%" stop-color="#48dbfb"/>
<stop offset="75%" stop-color="#ff6b6b"/>
<stop offset="100%" stop-color="#f368e0"/>
</linearGradient></defs>"##,
        );
    }

    // Border frame.
    let _ = write!(
        svg,
        r#"<rect width="{w}" height="{h}" rx="{FRAME_RADIUS}" fill="{}"/>"#,
        style.border_color.to_hex()
    );

    // Card face, clipped so the transformed photo cannot spill over the
    // border.
    let _ = write!(
        svg,
        r#"<clipPath id="face"><rect x="{b}" y="{b}" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" rx="4"/></clipPath>"#
    );
    let _ = write!(
        svg,
        r##"<g clip-path="url(#face)"><rect x="{b}" y="{b}" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="#ffffff"/>"##
    );

    // Photo layer: cover-fit, then translate/scale/rotate about the center.
    let _ = write!(
        svg,
        r#"<image href="{photo_uri}" x="{b}" y="{b}" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" preserveAspectRatio="xMidYMid slice" transform="translate({tx} {ty}) scale({s}) rotate({r}) translate({ntx} {nty})"/>"#,
        tx = cx + t.x,
        ty = cy + t.y,
        s = t.scale,
        r = t.rotate,
        ntx = -cx,
        nty = -cy,
    );

    if style.holo {
        let _ = write!(
            svg,
            r#"<rect x="{b}" y="{b}" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="url(#holo)" opacity="0.4"/>"#
        );
    }
    svg.push_str("</g>");

    if let Some(label) = style.label() {
        let label = label.to_uppercase();
        // Rough pill sizing from the glyph count; the text is centered in it
        // either way.
        let pill_w = (label.chars().count() as u32 * (LABEL_FONT_SIZE * 2 / 3) + 36).min(CARD_WIDTH);
        let pill_x = b + (CARD_WIDTH.saturating_sub(pill_w)) / 2;
        let pill_y = b + CARD_HEIGHT - LABEL_MARGIN - LABEL_HEIGHT;
        let _ = write!(
            svg,
            r##"<rect x="{pill_x}" y="{pill_y}" width="{pill_w}" height="{LABEL_HEIGHT}" rx="{}" fill="#ffffff" opacity="0.8"/>"##,
            LABEL_HEIGHT / 2
        );
        let _ = write!(
            svg,
            r##"<text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{LABEL_FONT_SIZE}" font-weight="bold" letter-spacing="3" fill="#1e293b">{}</text>"##,
            b + CARD_WIDTH / 2,
            pill_y + LABEL_HEIGHT - 9,
            xml_escape(&label),
        );
    }

    svg.push_str("</svg>");
    svg
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Rgb;

    const URI: &str = "data:image/png;base64,AA==";

    #[test]
    fn test_scene_dimensions_include_border() {
        let style = CardStyle {
            border_width: 20,
            ..Default::default()
        };
        let svg = card_scene(URI, &style);
        assert!(svg.contains(r#"width="340" height="500""#));
    }

    #[test]
    fn test_border_color_lands_on_frame() {
        let style = CardStyle {
            border_color: Rgb::new(0x12, 0x34, 0x56),
            ..Default::default()
        };
        let svg = card_scene(URI, &style);
        assert!(svg.contains(r##"fill="#123456""##));
    }

    #[test]
    fn test_label_only_when_nonempty() {
        let mut style = CardStyle::default();
        assert!(!card_scene(URI, &style).contains("<text"));
        style.text = "trip".to_string();
        let svg = card_scene(URI, &style);
        assert!(svg.contains("<text"));
        assert!(svg.contains(">TRIP</text>"));
    }

    #[test]
    fn test_label_is_escaped() {
        let style = CardStyle {
            text: "a<b".to_string(),
            ..Default::default()
        };
        assert!(card_scene(URI, &style).contains("A&lt;B"));
    }

    #[test]
    fn test_holo_overlay_toggles() {
        let mut style = CardStyle::default();
        assert!(!card_scene(URI, &style).contains("url(#holo)"));
        style.holo = true;
        let svg = card_scene(URI, &style);
        assert!(svg.contains(r#"<linearGradient id="holo""#));
        assert!(svg.contains("url(#holo)"));
    }

    #[test]
    fn test_gradient_stops_keep_hex_colors() {
        let style = CardStyle {
            holo: true,
            ..Default::default()
        };
        let svg = card_scene(URI, &style);
        for stop in ["#ff9ff3", "#feca57", "#48dbfb", "#ff6b6b", "#f368e0"] {
            assert!(svg.contains(stop), "missing gradient stop {stop}");
        }
        assert!(svg.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_transform_centers_on_photo_viewport() {
        let style = CardStyle {
            border_width: 16,
            transform: crate::model::PhotoTransform {
                scale: 1.5,
                rotate: 30.0,
                x: 10.0,
                y: -5.0,
            },
            ..Default::default()
        };
        let svg = card_scene(URI, &style);
        // Origin is (16 + 150, 16 + 230) shifted by the offset.
        assert!(svg.contains("translate(176 241) scale(1.5) rotate(30) translate(-166 -246)"));
    }
}
