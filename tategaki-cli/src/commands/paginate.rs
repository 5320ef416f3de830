//! Paginate command implementation

use super::{decode_file, layout, LayoutArgs};
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;
use tategaki_core::{CharacterCapacity, Orientation, Page};

/// Pagination output
#[derive(Serialize)]
struct PaginationReport<'a> {
    orientation: Orientation,
    capacity: CharacterCapacity,
    page_count: usize,
    pages: Vec<&'a Page>,
}

/// Lay a text out into pages and print them
pub fn paginate(input: &str, args: &LayoutArgs, page: Option<usize>, json: bool) -> Result<()> {
    let settings = args.reader_settings()?;
    let document = decode_file(Path::new(input))?;
    let (capacity, pages) = layout(&document, &settings, args.viewport())?;

    if capacity.is_empty() {
        bail!(
            "Viewport {}x{} holds no characters at font size {}",
            args.width,
            args.height,
            settings.font_size
        );
    }

    let selected: Vec<(usize, &Page)> = match page {
        Some(number) => match pages.get(number.wrapping_sub(1)) {
            Some(p) => vec![(number, p)],
            None => bail!("Page {} out of range (1-{})", number, pages.len()),
        },
        None => pages.iter().enumerate().map(|(i, p)| (i + 1, p)).collect(),
    };

    tracing::debug!(pages = pages.len(), "paginated {}", input);

    if json {
        let report = PaginationReport {
            orientation: settings.orientation(),
            capacity,
            page_count: pages.len(),
            pages: selected.iter().map(|(_, p)| *p).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (number, p) in selected {
            println!(
                "=== Page {}/{} [{}..{}] ===",
                number,
                pages.len(),
                p.start_index,
                p.end_index
            );
            println!("{}", p.text());
        }
    }

    Ok(())
}
