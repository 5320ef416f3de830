//! CLI command implementations

mod batch;
mod info;
mod paginate;
mod validate;

pub use batch::batch;
pub use info::info;
pub use paginate::paginate;
pub use validate::validate;

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tategaki_core::capacity::Viewport;
use tategaki_core::decoder::decoder_for_extension;
use tategaki_core::{divide_into_pages, CharacterCapacity, Page, ParsedDocument, ReaderSettings};

/// Viewport and reader settings shared by the layout commands
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Viewport width in pixels
    #[arg(long, default_value = "600")]
    pub width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "900")]
    pub height: f32,

    /// Reader settings JSON file
    #[arg(short, long)]
    pub settings: Option<String>,

    /// Horizontal layout instead of vertical
    #[arg(long)]
    pub horizontal: bool,

    /// Font size in pixels, overriding the settings file
    #[arg(long)]
    pub font_size: Option<f32>,
}

impl LayoutArgs {
    /// Settings from the file (or defaults) with command-line overrides applied
    pub fn reader_settings(&self) -> Result<ReaderSettings> {
        let mut settings = match &self.settings {
            Some(path) => ReaderSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path))?,
            None => ReaderSettings::default(),
        };
        if self.horizontal {
            settings.vertical_mode = false;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
        Ok(settings)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// Decode a text file with the decoder registered for its extension
pub fn decode_file(input_path: &Path) -> Result<ParsedDocument> {
    let ext = input_path
        .extension()
        .and_then(|e| e.to_str())
        .context("Could not determine input file extension")?;

    let decoder = decoder_for_extension(ext)
        .with_context(|| format!("No decoder available for .{} files", ext))?;

    let file = File::open(input_path)
        .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
    let mut reader = BufReader::new(file);

    decoder
        .decode(&mut reader)
        .with_context(|| format!("Failed to decode {}", input_path.display()))
}

/// Paginate a decoded document under the given settings
pub fn layout(
    document: &ParsedDocument,
    settings: &ReaderSettings,
    viewport: Viewport,
) -> Result<(CharacterCapacity, Vec<Page>)> {
    let capacity = settings
        .try_capacity(viewport)
        .context("Cannot lay out with these settings")?;
    let pages = divide_into_pages(
        &document.nodes,
        capacity,
        settings.orientation(),
        &settings.pagination_options(),
    );
    Ok((capacity, pages))
}
