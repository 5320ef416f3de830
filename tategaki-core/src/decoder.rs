//! Decoders for turning input byte streams into parsed documents

use crate::error::ParseError;
use crate::parser::parse;
use crate::types::ParsedDocument;
use std::io::Read;

/// Trait for decoding an input format into a [`ParsedDocument`]
pub trait Decoder: Send + Sync {
    /// Decode a document from a reader
    fn decode(&self, reader: &mut dyn Read) -> Result<ParsedDocument, ParseError>;

    /// File extensions this decoder supports
    fn supported_extensions(&self) -> &[&str];
}

/// Decoder for UTF-8 Aozora Bunko text files
pub struct AozoraDecoder {
    /// Whether to drop a leading byte-order mark
    strip_bom: bool,
    /// Whether to turn `\r\n` and lone `\r` into `\n`
    normalize_newlines: bool,
}

impl AozoraDecoder {
    pub fn new() -> Self {
        Self {
            strip_bom: true,
            normalize_newlines: true,
        }
    }

    /// Enable or disable byte-order-mark stripping
    pub fn with_bom_stripping(mut self, enable: bool) -> Self {
        self.strip_bom = enable;
        self
    }

    /// Enable or disable newline normalization
    pub fn with_newline_normalization(mut self, enable: bool) -> Self {
        self.normalize_newlines = enable;
        self
    }

    /// Apply the configured clean-ups to decoded text
    fn prepare(&self, content: String) -> String {
        let content = if self.strip_bom {
            match content.strip_prefix('\u{FEFF}') {
                Some(rest) => rest.to_string(),
                None => content,
            }
        } else {
            content
        };

        if self.normalize_newlines && content.contains('\r') {
            content.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            content
        }
    }
}

impl Default for AozoraDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for AozoraDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<ParsedDocument, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let content = String::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to(),
        })?;

        let mut document = parse(&self.prepare(content));
        document.metadata = document.metadata.with_encoding("UTF-8");

        tracing::debug!(
            characters = document.text_length(),
            diagnostics = document.diagnostics.len(),
            "decoded text"
        );
        Ok(document)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }
}

/// Get the appropriate decoder for a file extension
pub fn decoder_for_extension(ext: &str) -> Option<Box<dyn Decoder>> {
    match ext.to_lowercase().as_str() {
        "txt" => Some(Box::new(AozoraDecoder::new())),
        _ => None,
    }
}
