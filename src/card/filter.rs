//! Pixel-level application of the card filter presets.
//!
//! Each `FilterType` maps to one fixed set of adjustments applied to the
//! photo before it is embedded in the card scene. The numbers mirror the
//! presets the filters were designed around: a desaturate/contrast punch for
//! grayscale, a warm faded look for vintage, and so on.

use image::RgbaImage;

use crate::model::FilterType;

/// Adjustment amounts for one filter preset. Multipliers are 1.0-neutral;
/// `sepia` and `grayscale` are 0..=1 mix amounts; `blur` is a sigma in
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub sepia: f32,
    pub grayscale: f32,
    pub blur: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            sepia: 0.0,
            grayscale: 0.0,
            blur: 0.0,
        }
    }
}

impl FilterSettings {
    pub fn for_filter(filter: FilterType) -> Self {
        match filter {
            FilterType::None => Self::default(),
            FilterType::Grayscale => Self {
                grayscale: 1.0,
                contrast: 1.25,
                ..Self::default()
            },
            FilterType::Vintage => Self {
                sepia: 1.0,
                brightness: 0.9,
                contrast: 0.9,
                ..Self::default()
            },
            FilterType::Vibrant => Self {
                saturation: 1.5,
                contrast: 1.1,
                ..Self::default()
            },
            FilterType::Dreamy => Self {
                brightness: 1.1,
                contrast: 0.9,
                saturation: 1.25,
                blur: 0.5,
                ..Self::default()
            },
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply a preset to an image. The identity preset returns the input
/// untouched.
pub fn apply(img: RgbaImage, filter: FilterType) -> RgbaImage {
    let settings = FilterSettings::for_filter(filter);
    if settings.is_identity() {
        return img;
    }

    let mut img = img;
    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        let mut r = r as f32 / 255.0;
        let mut g = g as f32 / 255.0;
        let mut b = b as f32 / 255.0;

        if settings.grayscale > 0.0 {
            let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            r = r + (luma - r) * settings.grayscale;
            g = g + (luma - g) * settings.grayscale;
            b = b + (luma - b) * settings.grayscale;
        }

        if settings.sepia > 0.0 {
            let sr = (0.393 * r + 0.769 * g + 0.189 * b).min(1.0);
            let sg = (0.349 * r + 0.686 * g + 0.168 * b).min(1.0);
            let sb = (0.272 * r + 0.534 * g + 0.131 * b).min(1.0);
            r = r + (sr - r) * settings.sepia;
            g = g + (sg - g) * settings.sepia;
            b = b + (sb - b) * settings.sepia;
        }

        if settings.saturation != 1.0 {
            let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            r = luma + (r - luma) * settings.saturation;
            g = luma + (g - luma) * settings.saturation;
            b = luma + (b - luma) * settings.saturation;
        }

        if settings.contrast != 1.0 {
            r = (r - 0.5) * settings.contrast + 0.5;
            g = (g - 0.5) * settings.contrast + 0.5;
            b = (b - 0.5) * settings.contrast + 0.5;
        }

        if settings.brightness != 1.0 {
            r *= settings.brightness;
            g *= settings.brightness;
            b *= settings.brightness;
        }

        px.0 = [
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            a,
        ];
    }

    if settings.blur > 0.0 {
        img = image::imageops::blur(&img, settings.blur);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_none_is_identity() {
        assert!(FilterSettings::for_filter(FilterType::None).is_identity());
        let img = RgbaImage::from_pixel(3, 3, Rgba([120, 30, 200, 255]));
        assert_eq!(apply(img.clone(), FilterType::None), img);
    }

    #[test]
    fn test_grayscale_removes_color() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([200, 40, 90, 255]));
        let out = apply(img, FilterType::Grayscale);
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_vintage_warms_midtones() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let out = apply(img, FilterType::Vintage);
        let [r, g, b, _] = out.get_pixel(0, 0).0;
        // Sepia pushes red above blue.
        assert!(r > b, "expected warm cast, got r={r} b={b}");
        assert!(g > b);
    }

    #[test]
    fn test_vibrant_boosts_saturation() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([180, 100, 100, 255]));
        let out = apply(img, FilterType::Vibrant);
        let [r, g, _, _] = out.get_pixel(0, 0).0;
        // The dominant channel pulls further away from the others.
        assert!(r as i32 - g as i32 > 80);
    }

    #[test]
    fn test_alpha_preserved() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 77]));
        for filter in FilterType::ALL {
            if filter == FilterType::Dreamy {
                continue; // blur resamples alpha at the edges
            }
            let out = apply(img.clone(), filter);
            assert_eq!(out.get_pixel(0, 0).0[3], 77, "{filter:?}");
        }
    }
}
