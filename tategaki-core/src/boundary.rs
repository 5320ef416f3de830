//! Boundary analysis: semantic break candidates and content complexity

use crate::charclass::{
    is_clause_marker, is_dialogue_bracket, is_dialogue_close, is_dialogue_open, is_sentence_ender,
};
use crate::types::{extract_text, Node};
use serde::{Deserialize, Serialize};

/// Weight of ruby-base density in the complexity score
pub const RUBY_WEIGHT: f32 = 0.4;
/// Weight of emphasis density
pub const EMPHASIS_WEIGHT: f32 = 0.3;
/// Weight of special-character-note density
pub const SPECIAL_CHAR_WEIGHT: f32 = 0.2;
/// Weight of dialogue-bracket density
pub const DIALOGUE_WEIGHT: f32 = 0.1;
/// Lowest complexity score any content receives
pub const MIN_COMPLEXITY: f32 = 0.1;
/// Largest share of capacity that dense content can take away
pub const MAX_CAPACITY_REDUCTION: f32 = 0.3;

/// Kind of a semantic boundary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    SentenceEnd,
    Paragraph,
    DialogueOpen,
    DialogueClose,
    Clause,
}

impl BoundaryKind {
    /// Fixed strength of this kind of boundary
    pub fn strength(self) -> f32 {
        match self {
            BoundaryKind::SentenceEnd => 1.0,
            BoundaryKind::Paragraph => 0.8,
            BoundaryKind::DialogueOpen | BoundaryKind::DialogueClose => 0.6,
            BoundaryKind::Clause => 0.3,
        }
    }
}

/// A break candidate at a character offset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Boundary {
    /// Offset in characters; the break falls before the character at this offset
    pub position: usize,
    pub kind: BoundaryKind,
    pub strength: f32,
}

impl Boundary {
    fn new(position: usize, kind: BoundaryKind) -> Self {
        Self {
            position,
            kind,
            strength: kind.strength(),
        }
    }
}

/// Find semantic break candidates in `text`, sorted by position
pub fn detect_boundaries(text: &str) -> Vec<Boundary> {
    let chars: Vec<char> = text.chars().collect();
    let mut boundaries = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_sentence_ender(c) {
            boundaries.push(Boundary::new(i + 1, BoundaryKind::SentenceEnd));
        } else if is_clause_marker(c) {
            boundaries.push(Boundary::new(i + 1, BoundaryKind::Clause));
        } else if is_dialogue_open(c) {
            boundaries.push(Boundary::new(i, BoundaryKind::DialogueOpen));
        } else if is_dialogue_close(c) {
            boundaries.push(Boundary::new(i + 1, BoundaryKind::DialogueClose));
        } else if c == '\n' {
            // A blank line ends a paragraph; the boundary sits where the next one begins
            let mut end = i + 1;
            while end < chars.len() && chars[end] == '\n' {
                end += 1;
            }
            if end - i >= 2 {
                boundaries.push(Boundary::new(end, BoundaryKind::Paragraph));
            }
            i = end;
            continue;
        }
        i += 1;
    }

    boundaries.sort_by_key(|b| b.position);
    boundaries
}

/// Density profile of a node sequence
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentComplexity {
    pub ruby_density: f32,
    pub emphasis_density: f32,
    pub special_char_density: f32,
    pub dialogue_density: f32,
    /// Weighted score, never below [`MIN_COMPLEXITY`]
    pub score: f32,
}

impl ContentComplexity {
    /// Share of capacity to withhold for this content
    pub fn capacity_reduction(&self) -> f32 {
        (self.score * MAX_CAPACITY_REDUCTION).clamp(0.0, MAX_CAPACITY_REDUCTION)
    }
}

#[derive(Default)]
struct Counts {
    ruby: usize,
    emphasis: usize,
    special: usize,
}

impl Counts {
    fn visit(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Ruby { base, .. } => self.ruby += base.chars().count(),
                Node::EmphasisDots { text, .. } => self.emphasis += text.chars().count(),
                Node::Emphasis { content, .. } => self.emphasis += content.chars().count(),
                Node::SpecialCharNote { .. } => self.special += 1,
                Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => {
                    self.visit(content)
                }
                Node::Text { .. } | Node::Header { .. } | Node::Heading { .. } => {}
            }
        }
    }
}

/// Score how dense the annotations in `nodes` are
pub fn score_complexity(nodes: &[Node]) -> ContentComplexity {
    let text = extract_text(nodes);
    let total = text.chars().count();
    if total == 0 {
        return ContentComplexity {
            score: MIN_COMPLEXITY,
            ..Default::default()
        };
    }

    let mut counts = Counts::default();
    counts.visit(nodes);
    let dialogue = text.chars().filter(|&c| is_dialogue_bracket(c)).count();

    let total = total as f32;
    let ruby_density = counts.ruby as f32 / total;
    let emphasis_density = counts.emphasis as f32 / total;
    let special_char_density = counts.special as f32 / total;
    let dialogue_density = dialogue as f32 / total;

    let weighted = ruby_density * RUBY_WEIGHT
        + emphasis_density * EMPHASIS_WEIGHT
        + special_char_density * SPECIAL_CHAR_WEIGHT
        + dialogue_density * DIALOGUE_WEIGHT;

    ContentComplexity {
        ruby_density,
        emphasis_density,
        special_char_density,
        dialogue_density,
        score: weighted.max(MIN_COMPLEXITY),
    }
}
