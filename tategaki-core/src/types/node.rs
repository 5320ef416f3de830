//! Document tree produced by the markup parser

use serde::{Deserialize, Serialize};

/// Glyph used for plain sesame-dot emphasis (`傍点`)
pub const SESAME_DOT: &str = "﹅";

/// Heading size named by a `大見出し` / `中見出し` / `小見出し` directive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    Large,
    Medium,
    Small,
}

impl HeadingLevel {
    /// Map the size character of a heading directive
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '大' => Some(Self::Large),
            '中' => Some(Self::Medium),
            '小' => Some(Self::Small),
            _ => None,
        }
    }
}

/// Direction of an inline size change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextSizeKind {
    Small,
    Large,
}

/// A node of the parsed document
///
/// `TextSize` and `BlockIndent` are scoped regions whose children are nodes themselves;
/// every other variant is a leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Plain text run
    Text { content: String },

    /// Base run annotated with a phonetic reading
    Ruby { base: String, reading: String },

    /// Emphasis marks applied to `text`; `content` is the mark glyph
    EmphasisDots { content: String, text: String },

    /// Legacy emphasis, also emitted when a `傍点` target is missing from the text
    Emphasis { content: String, level: u8 },

    /// Legacy heading
    Header { content: String, level: u8 },

    /// Heading directive
    Heading { content: String, level: HeadingLevel },

    /// Inline size change region
    TextSize {
        content: Vec<Node>,
        size: TextSizeKind,
        steps: u8,
    },

    /// Block indentation region
    BlockIndent { content: Vec<Node>, indent: u32 },

    /// A glyph that could not be encoded in the source text, with its description
    SpecialCharNote {
        #[serde(rename = "char")]
        character: String,
        description: String,
        unicode: Option<String>,
        code: Option<String>,
    },
}

impl Node {
    /// Create a plain text node
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text { content: s.into() }
    }

    /// Create a ruby node
    pub fn ruby(base: impl Into<String>, reading: impl Into<String>) -> Self {
        Node::Ruby {
            base: base.into(),
            reading: reading.into(),
        }
    }

    /// Create a heading node
    pub fn heading(content: impl Into<String>, level: HeadingLevel) -> Self {
        Node::Heading {
            content: content.into(),
            level,
        }
    }

    /// Whether this node forces a page break before the line holding it
    pub fn is_heading(&self) -> bool {
        match self {
            Node::Heading { .. } | Node::Header { .. } => true,
            Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => {
                content.iter().any(Node::is_heading)
            }
            _ => false,
        }
    }

    /// Whether this node is an indivisible leaf other than plain text
    pub fn is_atomic(&self) -> bool {
        !matches!(
            self,
            Node::Text { .. } | Node::TextSize { .. } | Node::BlockIndent { .. }
        )
    }

    /// Children of a scoped node
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Rebuild a scoped node around new children, keeping its attributes.
    ///
    /// Leaves are returned unchanged.
    pub fn with_children(&self, children: Vec<Node>) -> Node {
        match self {
            Node::TextSize { size, steps, .. } => Node::TextSize {
                content: children,
                size: *size,
                steps: *steps,
            },
            Node::BlockIndent { indent, .. } => Node::BlockIndent {
                content: children,
                indent: *indent,
            },
            other => other.clone(),
        }
    }

    /// Number of characters this node contributes to the extracted text
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text { content } => content.chars().count(),
            Node::Ruby { base, .. } => base.chars().count(),
            Node::EmphasisDots { text, .. } => text.chars().count(),
            Node::Emphasis { content, .. }
            | Node::Header { content, .. }
            | Node::Heading { content, .. } => content.chars().count(),
            Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => {
                text_length(content)
            }
            Node::SpecialCharNote { .. } => 1,
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Text { content } => out.push_str(content),
            Node::Ruby { base, .. } => out.push_str(base),
            Node::EmphasisDots { text, .. } => out.push_str(text),
            Node::Emphasis { content, .. }
            | Node::Header { content, .. }
            | Node::Heading { content, .. } => out.push_str(content),
            Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => {
                for child in content {
                    child.write_text(out);
                }
            }
            Node::SpecialCharNote { character, .. } => {
                // A note always stands for exactly one glyph
                match character.chars().next() {
                    Some(c) => out.push(c),
                    None => out.push('※'),
                }
            }
        }
    }
}

/// Flatten nodes into the plain text a reader sees (ruby contributes only its base)
pub fn extract_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_text(&mut out);
    }
    out
}

/// Length of [`extract_text`] in characters, without allocating it
pub fn text_length(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::text_len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_uses_ruby_base() {
        let nodes = vec![Node::ruby("団扇", "うちわ"), Node::text("を持つ")];
        assert_eq!(extract_text(&nodes), "団扇を持つ");
        assert_eq!(text_length(&nodes), 5);
    }

    #[test]
    fn test_extract_text_walks_scopes() {
        let nodes = vec![Node::TextSize {
            content: vec![
                Node::text("小さい"),
                Node::BlockIndent {
                    content: vec![Node::ruby("字", "じ")],
                    indent: 2,
                },
            ],
            size: TextSizeKind::Small,
            steps: 1,
        }];
        assert_eq!(extract_text(&nodes), "小さい字");
        assert_eq!(text_length(&nodes), 4);
    }

    #[test]
    fn test_special_char_note_counts_one() {
        let note = Node::SpecialCharNote {
            character: "※".to_string(),
            description: "木＋吶のつくり".to_string(),
            unicode: None,
            code: Some("第3水準1-85-54".to_string()),
        };
        assert_eq!(note.text_len(), 1);
        assert_eq!(extract_text(&[note]), "※");
    }

    #[test]
    fn test_heading_detection_inside_scope() {
        let scoped = Node::BlockIndent {
            content: vec![Node::heading("第一章", HeadingLevel::Large)],
            indent: 3,
        };
        assert!(scoped.is_heading());
        assert!(!Node::text("本文").is_heading());
    }

    #[test]
    fn test_node_serialization_tag() {
        let json = serde_json::to_value(Node::ruby("漢字", "かんじ")).unwrap();
        assert_eq!(json["type"], "ruby");
        assert_eq!(json["reading"], "かんじ");
    }
}
