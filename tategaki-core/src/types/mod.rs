//! Core types: the document tree and the layout results

mod document;
mod layout;
mod node;

pub use document::{
    Diagnostic, DiagnosticKind, DocumentMetadata, DocumentSummary, ParsedDocument, PREVIEW_CHARS,
};
pub use layout::{
    nodes_from_page, CharacterCapacity, Line, Orientation, Page, BLANK_LINE_PLACEHOLDER,
};
pub use node::{extract_text, text_length, HeadingLevel, Node, TextSizeKind, SESAME_DOT};
