//! One photo-to-card editing session.
//!
//! The session owns all card styling plus the 3D preview state, and nothing
//! else owns any of it: navigating back drops the session and the styling
//! with it. Export captures a flattened scene; whatever tilt the preview had
//! is restored on every path out, including failures.

use std::path::{Path, PathBuf};

use chrono::Utc;
use image::RgbaImage;
use thiserror::Error;
use tracing::{info, warn};

use crate::card::raster::{CaptureOptions, RasterError, Rasterizer};
use crate::card::scene::card_scene;
use crate::card::{filter, CardStyle, Tilt};
use crate::ingest;
use crate::model::Photo;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    Busy,

    #[error("photo bytes did not decode")]
    BadPhoto,

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("could not encode the card image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("could not write the card file: {0}")]
    Io(#[from] std::io::Error),
}

pub struct MakerSession {
    pub photo_id: String,
    pub style: CardStyle,
    pub three_d: bool,
    pub tilt: Tilt,
    export_in_progress: bool,
}

impl MakerSession {
    pub fn new(photo_id: String) -> Self {
        Self {
            photo_id,
            style: CardStyle::default(),
            three_d: false,
            tilt: Tilt::default(),
            export_in_progress: false,
        }
    }

    pub fn toggle_three_d(&mut self) {
        self.three_d = !self.three_d;
        if !self.three_d {
            self.tilt = Tilt::default();
        }
    }

    /// Pointer moved inside the preview area. Ignored outside 3D mode.
    pub fn pointer_moved(&mut self, px: f32, py: f32, w: f32, h: f32) {
        if self.three_d {
            self.tilt = Tilt::from_pointer(px, py, w, h);
        }
    }

    /// Pointer left the preview area.
    pub fn pointer_left(&mut self) {
        self.tilt = Tilt::default();
    }

    pub fn export_in_progress(&self) -> bool {
        self.export_in_progress
    }

    /// Decode the photo and compose the flat card bitmap at the given
    /// upscale. Shared by export and the preview pane (at 1x).
    pub fn compose(
        &self,
        photo: &Photo,
        rasterizer: &dyn Rasterizer,
        upscale: f32,
    ) -> Result<RgbaImage, ExportError> {
        let bytes = ingest::decode_data_uri(&photo.url).ok_or(ExportError::BadPhoto)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|_| ExportError::BadPhoto)?
            .to_rgba8();
        let filtered = filter::apply(decoded, self.style.filter);

        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(filtered).write_to(&mut png, image::ImageFormat::Png)?;
        let uri = ingest::encode_data_uri(&png.into_inner(), "image/png");

        let scene = card_scene(&uri, &self.style);
        let captured = rasterizer.capture(
            &scene,
            &CaptureOptions {
                upscale,
                transparent: true,
            },
        )?;
        Ok(captured)
    }

    /// Capture the card flat at the export upscale and write it as a PNG
    /// named `<prefix>-<epoch millis>.png`. Rejects concurrent requests, and
    /// restores the live tilt whether or not the capture succeeds.
    pub fn export(
        &mut self,
        photo: &Photo,
        rasterizer: &dyn Rasterizer,
        dir: &Path,
        prefix: &str,
        upscale: f32,
    ) -> Result<PathBuf, ExportError> {
        if self.export_in_progress {
            return Err(ExportError::Busy);
        }
        self.export_in_progress = true;
        let stashed_tilt = self.tilt;
        self.tilt = Tilt::default();

        let result = self.write_card(photo, rasterizer, dir, prefix, upscale);

        self.tilt = stashed_tilt;
        self.export_in_progress = false;

        match &result {
            Ok(path) => info!(path = %path.display(), "card exported"),
            Err(err) => warn!(%err, "card export failed"),
        }
        result
    }

    fn write_card(
        &self,
        photo: &Photo,
        rasterizer: &dyn Rasterizer,
        dir: &Path,
        prefix: &str,
        upscale: f32,
    ) -> Result<PathBuf, ExportError> {
        let captured = self.compose(photo, rasterizer, upscale)?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-{}.png", prefix, Utc::now().timestamp_millis()));
        captured.save_with_format(&path, image::ImageFormat::Png)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterType, PhotoTransform};

    struct OkRasterizer;
    impl Rasterizer for OkRasterizer {
        fn capture(&self, _scene: &str, opts: &CaptureOptions) -> Result<RgbaImage, RasterError> {
            let side = (4.0 * opts.upscale) as u32;
            Ok(RgbaImage::new(side, side))
        }
    }

    struct MissingRasterizer;
    impl Rasterizer for MissingRasterizer {
        fn capture(&self, _scene: &str, _opts: &CaptureOptions) -> Result<RgbaImage, RasterError> {
            Err(RasterError::Unavailable)
        }
    }

    fn test_photo() -> Photo {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        Photo {
            id: "p1".to_string(),
            url: ingest::encode_data_uri(&buf.into_inner(), "image/png"),
            tag: "1".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_transform_round_trip() {
        let mut session = MakerSession::new("p1".to_string());
        let transform = PhotoTransform {
            scale: 1.5,
            rotate: 30.0,
            x: 10.0,
            y: -5.0,
        };
        session.style.transform = transform;
        assert_eq!(session.style.transform, transform);

        // A second session is untouched.
        let other = MakerSession::new("p2".to_string());
        assert_eq!(other.style.transform, PhotoTransform::default());
    }

    #[test]
    fn test_export_writes_named_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MakerSession::new("p1".to_string());
        let path = session
            .export(&test_photo(), &OkRasterizer, dir.path(), "mybag-card", 3.0)
            .unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("mybag-card-"));
        assert!(name.ends_with(".png"));
        assert!(!session.export_in_progress());
    }

    #[test]
    fn test_export_failure_restores_tilt_and_style() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MakerSession::new("p1".to_string());
        session.three_d = true;
        session.tilt = Tilt { x: -5.0, y: 5.0 };
        session.style.filter = FilterType::Vibrant;
        session.style.border_width = 24;
        let style_before = session.style.clone();

        let err = session
            .export(&test_photo(), &MissingRasterizer, dir.path(), "mybag-card", 3.0)
            .unwrap_err();

        assert!(matches!(err, ExportError::Raster(RasterError::Unavailable)));
        assert_eq!(session.tilt, Tilt { x: -5.0, y: 5.0 });
        assert_eq!(session.style, style_before);
        assert!(!session.export_in_progress());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_concurrent_export_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MakerSession::new("p1".to_string());
        session.export_in_progress = true;
        let err = session
            .export(&test_photo(), &OkRasterizer, dir.path(), "mybag-card", 3.0)
            .unwrap_err();
        assert!(matches!(err, ExportError::Busy));
    }

    #[test]
    fn test_pointer_updates_only_in_three_d() {
        let mut session = MakerSession::new("p1".to_string());
        session.pointer_moved(300.0, 450.0, 400.0, 600.0);
        assert!(session.tilt.is_flat());

        session.toggle_three_d();
        session.pointer_moved(300.0, 450.0, 400.0, 600.0);
        assert_eq!(session.tilt, Tilt { x: -5.0, y: 5.0 });

        session.pointer_left();
        assert!(session.tilt.is_flat());
    }

    #[test]
    fn test_leaving_three_d_flattens() {
        let mut session = MakerSession::new("p1".to_string());
        session.toggle_three_d();
        session.pointer_moved(400.0, 0.0, 400.0, 600.0);
        assert!(!session.tilt.is_flat());
        session.toggle_three_d();
        assert!(session.tilt.is_flat());
    }
}
