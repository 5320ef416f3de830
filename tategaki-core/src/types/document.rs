//! Parsed document, its metadata and the recovery diagnostics

use super::node::{extract_text, text_length, Node};
use serde::{Deserialize, Serialize};

/// Number of characters kept in a [`DocumentSummary::preview`]
pub const PREVIEW_CHARS: usize = 100;

/// Result of parsing one input text. Read-only once produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedDocument {
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,

    /// Title/author/encoding
    pub metadata: DocumentMetadata,

    /// Authoring errors the parser recovered from
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedDocument {
    /// Plain text of the whole document
    pub fn text(&self) -> String {
        extract_text(&self.nodes)
    }

    /// Extracted text length in characters
    pub fn text_length(&self) -> usize {
        text_length(&self.nodes)
    }

    /// Whether the parser had to recover from any markup error
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Summary handed to the library catalog
    pub fn summary(&self) -> DocumentSummary {
        let text = self.text();
        let preview: String = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(PREVIEW_CHARS)
            .collect();

        DocumentSummary {
            title: self.metadata.title.clone(),
            author: self.metadata.author.clone(),
            length: text.chars().count(),
            preview,
        }
    }
}

/// Document metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Source encoding, filled in by whoever decoded the bytes
    pub encoding: Option<String>,
}

impl DocumentMetadata {
    /// Derive title and author from the leading lines of a document's extracted text.
    ///
    /// Title is the first non-blank line. Author is the second non-blank line, taken only
    /// when a body follows it.
    pub fn from_text(text: &str) -> Self {
        let mut lines = text
            .lines()
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\u{3000}'))
            .filter(|line| !line.is_empty());

        let title = lines.next().map(str::to_string);
        let author = match (lines.next(), lines.next()) {
            (Some(author), Some(_body)) => Some(author.to_string()),
            _ => None,
        };

        Self {
            title,
            author,
            encoding: None,
        }
    }

    /// Set the source encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// Library catalog entry derived from a parsed document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSummary {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Extracted text length in characters
    pub length: usize,
    /// First characters of the body, blank lines collapsed
    pub preview: String,
}

/// Markup error the parser recovered from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Character offset into the source where the offending tag starts
    pub position: usize,
    /// Tag text involved
    pub detail: String,
}

/// Kinds of recovered markup errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A size or indent scope was still open at end of input and was closed implicitly
    UnterminatedScope,
    /// A closing tag had no matching open scope and was kept as literal text
    UnmatchedClose,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            DiagnosticKind::UnterminatedScope => "unterminated scope",
            DiagnosticKind::UnmatchedClose => "closing tag without open scope",
        };
        write!(f, "{} at {}: {}", what, self.position, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_source() {
        let meta = DocumentMetadata::from_text("羅生門\n芥川龍之介\n\n　ある日の暮方の事である。");
        assert_eq!(meta.title.as_deref(), Some("羅生門"));
        assert_eq!(meta.author.as_deref(), Some("芥川龍之介"));
        assert_eq!(meta.encoding, None);
    }

    #[test]
    fn test_metadata_without_body_has_no_author() {
        let meta = DocumentMetadata::from_text("一行目\n二行目");
        assert_eq!(meta.title.as_deref(), Some("一行目"));
        assert_eq!(meta.author, None);
    }

    #[test]
    fn test_summary_length_and_preview() {
        let doc = ParsedDocument {
            nodes: vec![Node::ruby("団扇", "うちわ"), Node::text("を\n\n持つ")],
            ..Default::default()
        };
        let summary = doc.summary();
        assert_eq!(summary.length, 7);
        assert_eq!(summary.preview, "団扇を 持つ");
    }
}
