//! Capacity model: how many character cells a viewport holds
//!
//! Every glyph occupies a square cell of `font_size` pixels along the text direction;
//! adjacent lines (rows or columns) are `font_size × line_height` pixels apart.

use crate::error::CapacityError;
use crate::types::{CharacterCapacity, Orientation};
use serde::{Deserialize, Serialize};

/// Root font size used to resolve `rem` when nothing else is given
pub const ROOT_FONT_SIZE: f32 = 16.0;

/// A length in one of the supported units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Multiple of the root font size
    Rem(f32),
    /// Multiple of the parent font size
    Em(f32),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

/// Resolve a length to pixels. `Em` falls back to `base_size` without a parent.
pub fn to_pixels(value: Length, base_size: f32, parent_size: Option<f32>) -> f32 {
    match value {
        Length::Px(px) => px,
        Length::Rem(rem) => rem * base_size,
        Length::Em(em) => em * parent_size.unwrap_or(base_size),
    }
}

/// Pixel size of the reading surface
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Font size and line pitch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FontMetrics {
    pub font_size: Length,
    /// Line pitch as a multiple of the font size
    pub line_height: f32,
    /// Root size that `rem` resolves against
    pub root_font_size: f32,
}

impl FontMetrics {
    pub fn new(font_size: Length, line_height: f32) -> Self {
        Self {
            font_size,
            line_height,
            root_font_size: ROOT_FONT_SIZE,
        }
    }

    pub fn px(font_size: f32, line_height: f32) -> Self {
        Self::new(Length::Px(font_size), line_height)
    }

    /// Font size in pixels
    pub fn font_size_px(&self) -> f32 {
        to_pixels(self.font_size, self.root_font_size, None)
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::px(ROOT_FONT_SIZE, 1.8)
    }
}

/// Padding applied on both sides of each axis. `Em` is relative to the font size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub vertical: Length,
    pub horizontal: Length,
}

impl Padding {
    pub fn px(vertical: f32, horizontal: f32) -> Self {
        Self {
            vertical: Length::Px(vertical),
            horizontal: Length::Px(horizontal),
        }
    }
}

/// Character capacity of a viewport; zero everywhere when the metrics are degenerate
pub fn compute_capacity(
    viewport: Viewport,
    font: FontMetrics,
    padding: Padding,
    orientation: Orientation,
) -> CharacterCapacity {
    match try_compute_capacity(viewport, font, padding, orientation) {
        Ok(capacity) => capacity,
        Err(err) => {
            tracing::debug!(%err, "degenerate metrics, capacity is zero");
            CharacterCapacity::default()
        }
    }
}

/// Character capacity of a viewport, rejecting non-positive font size or line height
pub fn try_compute_capacity(
    viewport: Viewport,
    font: FontMetrics,
    padding: Padding,
    orientation: Orientation,
) -> Result<CharacterCapacity, CapacityError> {
    let font_size = font.font_size_px();
    // NaN fails both comparisons and is rejected too
    if !(font_size > 0.0 && font.line_height > 0.0) {
        return Err(CapacityError::InvalidCapacity {
            font_size,
            line_height: font.line_height,
        });
    }

    let pad_v = to_pixels(padding.vertical, font.root_font_size, Some(font_size)).max(0.0);
    let pad_h = to_pixels(padding.horizontal, font.root_font_size, Some(font_size)).max(0.0);
    let usable_width = (viewport.width - 2.0 * pad_h).max(0.0);
    let usable_height = (viewport.height - 2.0 * pad_v).max(0.0);
    let line_pitch = font_size * font.line_height;

    let capacity = match orientation {
        Orientation::Vertical => {
            let rows = cells(usable_height, font_size);
            let cols = cells(usable_width, line_pitch);
            CharacterCapacity::from_grid(rows, cols)
        }
        Orientation::Horizontal => {
            let rows = cells(usable_height, line_pitch);
            let cols = cells(usable_width, font_size);
            CharacterCapacity::from_grid(rows, cols)
        }
    };

    tracing::debug!(
        rows = capacity.rows,
        cols = capacity.cols,
        total = capacity.total_characters,
        ?orientation,
        "computed capacity"
    );
    Ok(capacity)
}

fn cells(extent: f32, pitch: f32) -> usize {
    let count = (extent / pitch).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}
