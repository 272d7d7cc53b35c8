//! Global background theme: a two-color linear gradient filling the screen.
//!
//! The gradient holds the start color up to `split - 20`%, blends across a
//! 40% band, and holds the end color from `split + 20`% on, projected along
//! the configured angle. Views only ever read colors from here; the picker
//! dialog mutates the fields through the app.

use ratatui::style::Color;

/// Width of the blend band around the split point, in percent.
const BLEND_BAND: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex color. Short forms are not accepted.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub start: Rgb,
    pub end: Rgb,
    /// Gradient direction in degrees, 0 pointing up, clockwise (CSS style).
    pub angle: u16,
    /// Split point between the two colors, 0-100 percent.
    pub split: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            start: Rgb::new(0xff, 0xdd, 0xe1),
            end: Rgb::new(0xee, 0x9c, 0xa7),
            angle: 135,
            split: 50,
        }
    }
}

impl Theme {
    pub const ANGLE_STEP: u16 = 5;
    pub const SPLIT_STEP: u8 = 5;

    /// Color of the gradient at a normalized screen position, both axes in
    /// `0.0..=1.0`.
    pub fn color_at(&self, x: f32, y: f32) -> Rgb {
        let rad = (self.angle as f32).to_radians();
        // Project the position onto the gradient axis. 0deg points up,
        // 90deg points right.
        let dx = rad.sin();
        let dy = -rad.cos();
        let t = ((x - 0.5) * dx + (y - 0.5) * dy) / (dx.abs() + dy.abs()).max(f32::EPSILON);
        let pos = (t + 0.5) * 100.0;

        let lo = self.split as f32 - BLEND_BAND;
        let hi = self.split as f32 + BLEND_BAND;
        if pos <= lo {
            self.start
        } else if pos >= hi {
            self.end
        } else {
            self.start.lerp(self.end, (pos - lo) / (hi - lo))
        }
    }

    pub fn rotate(&mut self, delta: i32) {
        self.angle = (self.angle as i32 + delta).rem_euclid(360) as u16;
    }

    pub fn shift_split(&mut self, delta: i32) {
        self.split = (self.split as i32 + delta).clamp(0, 100) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::from_hex("#ffdde1").unwrap();
        assert_eq!(c, Rgb::new(0xff, 0xdd, 0xe1));
        assert_eq!(c.to_hex(), "#ffdde1");
    }

    #[test]
    fn test_hex_rejects_malformed() {
        assert!(Rgb::from_hex("ffdde1").is_none());
        assert!(Rgb::from_hex("#fff").is_none());
        assert!(Rgb::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_gradient_holds_colors_outside_blend_band() {
        let theme = Theme {
            angle: 90, // left to right
            split: 50,
            ..Default::default()
        };
        assert_eq!(theme.color_at(0.0, 0.5), theme.start);
        assert_eq!(theme.color_at(1.0, 0.5), theme.end);
    }

    #[test]
    fn test_gradient_blends_at_split() {
        let theme = Theme {
            start: Rgb::new(0, 0, 0),
            end: Rgb::new(200, 100, 50),
            angle: 90,
            split: 50,
        };
        let mid = theme.color_at(0.5, 0.5);
        assert_eq!(mid, Rgb::new(100, 50, 25));
    }

    #[test]
    fn test_angle_wraps() {
        let mut theme = Theme::default();
        theme.angle = 355;
        theme.rotate(10);
        assert_eq!(theme.angle, 5);
        theme.rotate(-10);
        assert_eq!(theme.angle, 355);
    }

    #[test]
    fn test_split_clamps() {
        let mut theme = Theme::default();
        theme.shift_split(100);
        assert_eq!(theme.split, 100);
        theme.shift_split(-250);
        assert_eq!(theme.split, 0);
    }
}
