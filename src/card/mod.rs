//! Card composition: styling state, filters, tilt, SVG scene and capture.

pub mod filter;
pub mod raster;
pub mod scene;

use image::RgbaImage;

use crate::model::{FilterType, PhotoTransform};
use crate::theme::Rgb;

/// Card face size in CSS pixels; the border frame grows the canvas.
pub const CARD_WIDTH: u32 = 300;
pub const CARD_HEIGHT: u32 = 460;

pub const BORDER_WIDTH_MIN: u32 = 0;
pub const BORDER_WIDTH_MAX: u32 = 40;

/// Border color swatches offered by the maker controls.
pub const BORDER_PALETTE: [&str; 10] = [
    "#ffffff", "#000000", "#ffdde1", "#ee9ca7", "#fbc2eb", "#a18cd1", "#fad0c4", "#ffd1ff",
    "#c2e9fb", "#a1c4fd",
];

/// One maker session's editable styling. Plain data; every setter in the UI
/// is a direct field replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub border_color: Rgb,
    pub border_width: u32,
    pub holo: bool,
    pub filter: FilterType,
    pub transform: PhotoTransform,
    pub text: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            border_color: Rgb::new(0xff, 0xff, 0xff),
            border_width: 16,
            holo: false,
            filter: FilterType::None,
            transform: PhotoTransform::default(),
            text: String::new(),
        }
    }
}

impl CardStyle {
    /// Label shown on the card front, if any. Whitespace-only labels render
    /// nothing.
    pub fn label(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Pointer-driven 3D rotation of the card preview. Ephemeral: reset when the
/// pointer leaves the preview, ignored entirely by export.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Rotation around the X axis, degrees.
    pub x: f32,
    /// Rotation around the Y axis, degrees.
    pub y: f32,
}

impl Tilt {
    /// Maximum rotation on each axis, keeping the effect subtle and the card
    /// from flipping.
    pub const MAX_DEG: f32 = 20.0;

    /// Tilt for a pointer at `(px, py)` inside a container of `w` x `h`.
    pub fn from_pointer(px: f32, py: f32, w: f32, h: f32) -> Self {
        if w <= 0.0 || h <= 0.0 {
            return Self::default();
        }
        let x_ratio = px / w - 0.5;
        let y_ratio = py / h - 0.5;
        Self {
            x: (-y_ratio * Self::MAX_DEG).clamp(-Self::MAX_DEG, Self::MAX_DEG),
            y: (x_ratio * Self::MAX_DEG).clamp(-Self::MAX_DEG, Self::MAX_DEG),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Cheap perspective approximation for the terminal preview: shear rows by
/// the Y tilt and columns by the X tilt. Good enough to read as "the card
/// leans with the pointer"; the export path never sees this.
pub fn tilt_warp(src: &RgbaImage, tilt: Tilt) -> RgbaImage {
    if tilt.is_flat() {
        return src.clone();
    }
    let (w, h) = src.dimensions();
    let shear_x = (tilt.y / Tilt::MAX_DEG) * w as f32 * 0.08;
    let shear_y = (-tilt.x / Tilt::MAX_DEG) * h as f32 * 0.08;

    let mut out = RgbaImage::new(w, h);
    for y in 0..h {
        let row_t = y as f32 / h.max(1) as f32 - 0.5;
        let dx = (shear_x * row_t).round() as i64;
        for x in 0..w {
            let col_t = x as f32 / w.max(1) as f32 - 0.5;
            let dy = (shear_y * col_t).round() as i64;
            let sx = x as i64 + dx;
            let sy = y as i64 + dy;
            if sx >= 0 && sy >= 0 && (sx as u32) < w && (sy as u32) < h {
                out.put_pixel(x, y, *src.get_pixel(sx as u32, sy as u32));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_from_pointer_matches_contract() {
        // Pointer at 75%/75% of a 400x600 container.
        let tilt = Tilt::from_pointer(300.0, 450.0, 400.0, 600.0);
        assert!((tilt.x - -5.0).abs() < f32::EPSILON);
        assert!((tilt.y - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tilt_clamps_to_max() {
        let tilt = Tilt::from_pointer(4000.0, -4000.0, 400.0, 600.0);
        assert_eq!(tilt.y, Tilt::MAX_DEG);
        assert_eq!(tilt.x, Tilt::MAX_DEG);
    }

    #[test]
    fn test_tilt_center_and_reset_are_flat() {
        assert!(Tilt::from_pointer(200.0, 300.0, 400.0, 600.0).is_flat());
        assert!(Tilt::default().is_flat());
        assert!(Tilt::from_pointer(1.0, 1.0, 0.0, 0.0).is_flat());
    }

    #[test]
    fn test_label_skips_whitespace() {
        let mut style = CardStyle::default();
        assert!(style.label().is_none());
        style.text = "   ".to_string();
        assert!(style.label().is_none());
        style.text = " Wonyoung ".to_string();
        assert_eq!(style.label(), Some("Wonyoung"));
    }

    #[test]
    fn test_tilt_warp_flat_is_identity() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
        let out = tilt_warp(&img, Tilt::default());
        assert_eq!(out, img);
    }

    #[test]
    fn test_tilt_warp_keeps_dimensions() {
        let img = RgbaImage::from_pixel(10, 20, image::Rgba([9, 9, 9, 255]));
        let out = tilt_warp(&img, Tilt { x: 12.0, y: -8.0 });
        assert_eq!(out.dimensions(), (10, 20));
    }
}
