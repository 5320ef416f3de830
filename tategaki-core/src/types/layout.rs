//! Capacity, line and page types shared by the layout stages

use super::node::{extract_text, text_length, Node};
use serde::{Deserialize, Serialize};

/// Placeholder text for a blank source line
pub const BLANK_LINE_PLACEHOLDER: &str = "\u{00A0}";

/// Writing orientation of the reading surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Columns run top to bottom, right to left
    #[default]
    Vertical,
    /// Rows run left to right, top to bottom
    Horizontal,
}

impl Orientation {
    pub fn from_vertical_mode(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// How many character cells fit on a page.
///
/// The page is a `rows × cols` grid. In vertical mode `rows` is the number of glyphs
/// stacked in one column and `cols` the number of columns; in horizontal mode `rows` is
/// the number of text rows and `cols` the glyphs per row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CharacterCapacity {
    pub total_characters: usize,
    pub rows: usize,
    pub cols: usize,
    pub characters_per_row: usize,
    pub characters_per_column: usize,
}

impl CharacterCapacity {
    /// Build a capacity from grid dimensions
    pub fn from_grid(rows: usize, cols: usize) -> Self {
        Self {
            total_characters: rows * cols,
            rows,
            cols,
            characters_per_row: cols,
            characters_per_column: rows,
        }
    }

    /// Zero capacity means "cannot paginate yet"
    pub fn is_empty(&self) -> bool {
        self.total_characters == 0
    }
}

/// One logical line (or one part of a split logical line)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub nodes: Vec<Node>,
    pub text: String,
    /// Characters in `text`
    pub character_count: usize,
    /// Capacity slots consumed after quota rounding
    pub normalized_count: usize,
    pub is_continuation: bool,
    /// Zero-based part index when the logical line was split
    pub continuation_index: Option<usize>,
    /// Number of parts the logical line was split into
    pub total_parts: Option<usize>,
    /// Stand-in for a blank source line
    pub is_placeholder: bool,
}

impl Line {
    /// Build a line from nodes, deriving its text and counts
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let text = extract_text(&nodes);
        let character_count = text_length(&nodes);
        Self {
            nodes,
            text,
            character_count,
            normalized_count: character_count,
            ..Self::default()
        }
    }

    /// Placeholder line standing for a blank source line
    pub fn placeholder() -> Self {
        let mut line = Self::from_nodes(vec![Node::text(BLANK_LINE_PLACEHOLDER)]);
        line.is_placeholder = true;
        line
    }

    /// Whether a heading starts a fresh page at this line
    pub fn has_heading(&self) -> bool {
        self.nodes.iter().any(Node::is_heading)
    }

    /// Mark this line as part `index` of `total`
    pub fn with_part(mut self, index: usize, total: usize) -> Self {
        self.is_continuation = index > 0;
        self.continuation_index = Some(index);
        self.total_parts = Some(total);
        self
    }

    /// Whether this line is the last (or only) part of its logical line
    pub fn ends_logical_line(&self) -> bool {
        match (self.continuation_index, self.total_parts) {
            (Some(index), Some(total)) => index + 1 >= total,
            _ => true,
        }
    }

    /// Label such as `1/3` for renderers that mark split lines
    pub fn part_label(&self) -> Option<String> {
        match (self.continuation_index, self.total_parts) {
            (Some(index), Some(total)) if total > 1 => Some(format!("{}/{}", index + 1, total)),
            _ => None,
        }
    }
}

/// One laid-out page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
    /// Sum of the lines' normalized counts
    pub total_characters: usize,
    /// Offset of the first character of the page in the document's extracted text
    pub start_index: usize,
    /// Offset just past the last character of the page
    pub end_index: usize,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain text of the page, one logical line per `\n`
    pub fn text(&self) -> String {
        extract_text(&nodes_from_page(self))
    }
}

/// Nodes of a page in reading order.
///
/// Logical lines are separated by `Text("\n")` markers, continuation parts are joined
/// directly and placeholder lines contribute no content.
pub fn nodes_from_page(page: &Page) -> Vec<Node> {
    let mut nodes = Vec::new();
    let count = page.lines.len();
    for (i, line) in page.lines.iter().enumerate() {
        if !line.is_placeholder {
            nodes.extend(line.nodes.iter().cloned());
        }
        if i + 1 < count && line.ends_logical_line() {
            nodes.push(Node::text("\n"));
        }
    }
    nodes
}
