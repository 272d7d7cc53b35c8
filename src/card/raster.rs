//! The capture seam between the card scene and an encodable bitmap.
//!
//! Export talks to a `Rasterizer` trait object, never to resvg directly, so
//! a missing or failing backend degrades to a user-visible message instead
//! of a crash, and tests can substitute failing implementations.

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("no rasterizer backend is available")]
    Unavailable,

    #[error("card scene did not parse: {0}")]
    Scene(#[from] usvg::Error),

    #[error("could not allocate a {width}x{height} capture surface")]
    Surface { width: u32, height: u32 },
}

/// Capture parameters. Export uses a fixed upscale with a transparent
/// background; previews use 1x.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    pub upscale: f32,
    pub transparent: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            upscale: 1.0,
            transparent: true,
        }
    }
}

/// Renders an SVG card scene into an RGBA bitmap.
pub trait Rasterizer {
    fn capture(&self, scene: &str, opts: &CaptureOptions) -> Result<RgbaImage, RasterError>;
}

/// The shipped backend: usvg parsing + resvg CPU rendering, with system
/// fonts loaded for the label text.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
}

impl SvgRasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SvgRasterizer {
    fn capture(&self, scene: &str, opts: &CaptureOptions) -> Result<RgbaImage, RasterError> {
        let tree = usvg::Tree::from_str(scene, &self.options)?;
        let size = tree.size();
        let width = (size.width() * opts.upscale).round().max(1.0) as u32;
        let height = (size.height() * opts.upscale).round().max(1.0) as u32;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(RasterError::Surface { width, height })?;
        if !opts.transparent {
            pixmap.fill(resvg::tiny_skia::Color::WHITE);
        }

        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(opts.upscale, opts.upscale),
            &mut pixmap.as_mut(),
        );

        let mut out = RgbaImage::new(width, height);
        for (src, dst) in pixmap.pixels().iter().zip(out.pixels_mut()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        Ok(out)
    }
}
