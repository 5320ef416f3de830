//! Tategaki Core Library
//!
//! This crate parses Aozora Bunko markup into a document tree and lays that tree out
//! into pages for vertical (tategaki) or horizontal reading. Layout works in integer
//! character slots: a viewport becomes a [`CharacterCapacity`], and the page divider
//! fills pages with lines cut at semantic boundaries under kinsoku rules.

pub mod boundary;
pub mod capacity;
pub mod charclass;
pub mod decoder;
pub mod error;
pub mod line_breaker;
pub mod paginator;
pub mod parser;
pub mod settings;
pub mod types;

pub use boundary::{
    detect_boundaries, score_complexity, Boundary, BoundaryKind, ContentComplexity,
};
pub use capacity::{
    compute_capacity, to_pixels, try_compute_capacity, FontMetrics, Length, Padding, Viewport,
};
pub use decoder::{AozoraDecoder, Decoder};
pub use error::{CapacityError, ParseError, Result, TategakiError};
pub use line_breaker::{break_long_line, find_break, BreakCandidate, BreakKind};
pub use paginator::{divide_into_pages, reassemble_pages, PaginationOptions};
pub use parser::parse;
pub use settings::ReaderSettings;
pub use types::{
    extract_text, nodes_from_page, text_length, CharacterCapacity, Diagnostic, DiagnosticKind,
    DocumentMetadata, DocumentSummary, HeadingLevel, Line, Node, Orientation, Page,
    ParsedDocument, TextSizeKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_paginate() {
        let document = parse("｜青空《あおぞら》文庫\n本文です。");
        let capacity = CharacterCapacity::from_grid(10, 4);
        let pages = divide_into_pages(
            &document.nodes,
            capacity,
            Orientation::Vertical,
            &PaginationOptions::default(),
        );
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text(), "青空文庫\n本文です。");
    }
}
