//! Reader settings consumed from the settings store
//!
//! Every field has a default, so partial JSON documents are accepted. No setting changes
//! the markup grammar; they only toggle layout stages.

use crate::capacity::{compute_capacity, try_compute_capacity, FontMetrics, Padding, Viewport};
use crate::error::{CapacityError, Result};
use crate::paginator::PaginationOptions;
use crate::types::{CharacterCapacity, Orientation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout configuration for one reader
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    /// Vertical (tategaki) or horizontal (yokogaki) layout
    pub vertical_mode: bool,
    /// Font size in pixels
    pub font_size: f32,
    /// Line pitch as a multiple of the font size
    pub line_height: f32,
    /// Padding in pixels at the top and bottom
    pub padding_vertical: f32,
    /// Padding in pixels at the left and right
    pub padding_horizontal: f32,
    pub enable_semantic_boundaries: bool,
    pub enable_content_aware_capacity: bool,
    pub enable_line_breaking: bool,
    pub use_capacity_based_wrapping: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        let options = PaginationOptions::default();
        Self {
            vertical_mode: true,
            font_size: 18.0,
            line_height: 1.8,
            padding_vertical: 24.0,
            padding_horizontal: 24.0,
            enable_semantic_boundaries: options.enable_semantic_boundaries,
            enable_content_aware_capacity: options.enable_content_aware_capacity,
            enable_line_breaking: options.enable_line_breaking,
            use_capacity_based_wrapping: options.use_capacity_based_wrapping,
        }
    }
}

impl ReaderSettings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_vertical_mode(self.vertical_mode)
    }

    pub fn font_metrics(&self) -> FontMetrics {
        FontMetrics::px(self.font_size, self.line_height)
    }

    pub fn padding(&self) -> Padding {
        Padding::px(self.padding_vertical, self.padding_horizontal)
    }

    pub fn pagination_options(&self) -> PaginationOptions {
        PaginationOptions {
            enable_semantic_boundaries: self.enable_semantic_boundaries,
            enable_content_aware_capacity: self.enable_content_aware_capacity,
            enable_line_breaking: self.enable_line_breaking,
            use_capacity_based_wrapping: self.use_capacity_based_wrapping,
        }
    }

    /// Capacity of `viewport` under these settings; zero when the metrics are degenerate
    pub fn capacity(&self, viewport: Viewport) -> CharacterCapacity {
        compute_capacity(viewport, self.font_metrics(), self.padding(), self.orientation())
    }

    /// Capacity of `viewport`, rejecting degenerate metrics
    pub fn try_capacity(
        &self,
        viewport: Viewport,
    ) -> std::result::Result<CharacterCapacity, CapacityError> {
        try_compute_capacity(viewport, self.font_metrics(), self.padding(), self.orientation())
    }
}
