//! Shared entity definitions: photos, categories, transforms, filters.

/// Id of the bootstrap "Unsorted" category. Photos orphaned by a category
/// deletion are retagged to this id.
pub const DEFAULT_CATEGORY_ID: &str = "1";

/// Display name of the bootstrap category.
pub const DEFAULT_CATEGORY_NAME: &str = "Unsorted";

/// A single photo. Immutable once created, except for the retag that happens
/// when its owning category is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    /// Inline `data:image/...;base64,` URI holding the photo bytes.
    pub url: String,
    /// Foreign key referencing a category id. Legacy imports may carry a
    /// category *name* here instead; see `Store::photo_count`.
    pub tag: String,
    /// Creation instant in milliseconds since epoch, newest-first ordering.
    pub timestamp: i64,
}

/// A named grouping of photos ("collection").
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Custom cover overriding the computed one, as an inline data URI.
    pub cover_image: Option<String>,
    /// True only for the single bootstrap category.
    pub is_default: bool,
}

impl Category {
    /// The always-present "Unsorted" category.
    pub fn unsorted() -> Self {
        Self {
            id: DEFAULT_CATEGORY_ID.to_string(),
            name: DEFAULT_CATEGORY_NAME.to_string(),
            cover_image: None,
            is_default: true,
        }
    }
}

/// View-state transform applied to the photo inside a card. Lives only in a
/// maker session, never on the photo itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoTransform {
    /// Display size multiplier.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotate: f32,
    /// Horizontal offset from center, in card pixels.
    pub x: f32,
    /// Vertical offset from center, in card pixels.
    pub y: f32,
}

impl PhotoTransform {
    pub const SCALE_MIN: f32 = 0.5;
    pub const SCALE_MAX: f32 = 3.0;
    pub const SCALE_STEP: f32 = 0.1;
    pub const ROTATE_MIN: f32 = -180.0;
    pub const ROTATE_MAX: f32 = 180.0;
    pub const ROTATE_STEP: f32 = 1.0;
    pub const X_MIN: f32 = -150.0;
    pub const X_MAX: f32 = 150.0;
    pub const Y_MIN: f32 = -200.0;
    pub const Y_MAX: f32 = 200.0;
    pub const OFFSET_STEP: f32 = 1.0;

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotate: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Closed set of visual-adjustment presets for the card image layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    None,
    Grayscale,
    Vintage,
    Vibrant,
    Dreamy,
}

impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Grayscale,
        FilterType::Vintage,
        FilterType::Vibrant,
        FilterType::Dreamy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterType::None => "None",
            FilterType::Grayscale => "Grayscale",
            FilterType::Vintage => "Vintage",
            FilterType::Vibrant => "Vibrant",
            FilterType::Dreamy => "Dreamy",
        }
    }

    pub fn cycle_next(&self) -> Self {
        match self {
            FilterType::None => FilterType::Grayscale,
            FilterType::Grayscale => FilterType::Vintage,
            FilterType::Vintage => FilterType::Vibrant,
            FilterType::Vibrant => FilterType::Dreamy,
            FilterType::Dreamy => FilterType::None,
        }
    }

    pub fn cycle_prev(&self) -> Self {
        match self {
            FilterType::None => FilterType::Dreamy,
            FilterType::Grayscale => FilterType::None,
            FilterType::Vintage => FilterType::Grayscale,
            FilterType::Vibrant => FilterType::Vintage,
            FilterType::Dreamy => FilterType::Vibrant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform_is_identity() {
        assert!(PhotoTransform::default().is_identity());
        let moved = PhotoTransform {
            x: 1.0,
            ..Default::default()
        };
        assert!(!moved.is_identity());
    }

    #[test]
    fn test_filter_cycle_covers_all() {
        let mut f = FilterType::None;
        for _ in 0..FilterType::ALL.len() {
            f = f.cycle_next();
        }
        assert_eq!(f, FilterType::None);

        for filter in FilterType::ALL {
            assert_eq!(filter.cycle_next().cycle_prev(), filter);
        }
    }

    #[test]
    fn test_unsorted_category() {
        let cat = Category::unsorted();
        assert_eq!(cat.id, DEFAULT_CATEGORY_ID);
        assert!(cat.is_default);
        assert!(cat.cover_image.is_none());
    }
}
