//! Line breaking with kinsoku shori
//!
//! A long logical line is cut into parts no longer than a maximum length. Break
//! positions are ranked by a fixed ladder (sentence end, clause, dialogue, particle, any
//! kinsoku-legal position) and a cut never falls inside a ruby, emphasis, heading or
//! special-character node, so every part's nodes reproduce its text exactly.

use crate::charclass::{
    is_clause_marker, is_dialogue_close, is_dialogue_open, is_legal_break, is_sentence_ender,
    PARTICLES,
};
use crate::types::{extract_text, Line, Node};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Share of the maximum length where the ideal break window starts
pub const IDEAL_WINDOW_RATIO: f32 = 0.7;

/// How far a forced cut may run past the maximum length to keep kinsoku
const MAX_HANGING: usize = 2;

/// Break candidate kinds, highest priority first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    Sentence,
    Clause,
    Dialogue,
    Particle,
    Kinsoku,
    Forced,
}

impl BreakKind {
    pub fn penalty(self) -> f32 {
        match self {
            BreakKind::Sentence => 0.1,
            BreakKind::Clause => 0.3,
            BreakKind::Dialogue => 0.2,
            BreakKind::Particle => 0.5,
            BreakKind::Kinsoku => 0.8,
            BreakKind::Forced => 1.0,
        }
    }
}

/// A place to cut: the line ends before the character at `position`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BreakCandidate {
    pub position: usize,
    pub kind: BreakKind,
    pub penalty: f32,
}

impl BreakCandidate {
    fn new(position: usize, kind: BreakKind) -> Self {
        Self {
            position,
            kind,
            penalty: kind.penalty(),
        }
    }

    fn rank(&self) -> (BreakKind, u32) {
        (self.kind, (self.penalty * 1000.0) as u32)
    }
}

/// Split `text` (the extracted text of `nodes`) into lines of at most `max_length`
/// characters where a legal break allows it
pub fn break_long_line(text: &str, nodes: &[Node], max_length: usize) -> Vec<Line> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_length || max_length == 0 {
        return vec![line_from(nodes, text).with_part(0, 1)];
    }

    let nodes = matching_nodes(text, nodes);
    let atomic = atomic_ranges(&nodes);
    let mut cuts = Vec::new();
    let mut start = 0;
    while chars.len() - start > max_length {
        match choose_break(&chars, start, max_length, &atomic) {
            Some(candidate) => {
                cuts.push(candidate.position);
                start = candidate.position;
            }
            None => break,
        }
    }

    let total = cuts.len() + 1;
    let mut bounds = Vec::with_capacity(total + 1);
    bounds.push(0);
    bounds.extend(cuts);
    bounds.push(chars.len());

    tracing::debug!(length = chars.len(), max_length, parts = total, "broke long line");

    bounds
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let is_last = i + 1 == total;
            Line::from_nodes(slice_nodes(&nodes, w[0], w[1], is_last)).with_part(i, total)
        })
        .collect()
}

/// Best place to end a line that starts at `start` and holds at most `max_length`
/// characters. `None` when the rest of the text cannot be cut at all.
pub fn find_break(
    text: &str,
    nodes: &[Node],
    start: usize,
    max_length: usize,
) -> Option<BreakCandidate> {
    let chars: Vec<char> = text.chars().collect();
    if max_length == 0 || start >= chars.len() {
        return None;
    }
    choose_break(
        &chars,
        start,
        max_length,
        &atomic_ranges(&matching_nodes(text, nodes)),
    )
}

/// `nodes` when they spell out `text`, otherwise a single plain node holding `text`
fn matching_nodes<'a>(text: &str, nodes: &'a [Node]) -> Cow<'a, [Node]> {
    if extract_text(nodes) == text {
        Cow::Borrowed(nodes)
    } else {
        Cow::Owned(vec![Node::text(text)])
    }
}

fn line_from(nodes: &[Node], text: &str) -> Line {
    let mut line = Line::from_nodes(nodes.to_vec());
    if line.text != text {
        // Callers may hand in text that differs from the nodes; keep what they gave
        line.text = text.to_string();
        line.character_count = text.chars().count();
        line.normalized_count = line.character_count;
    }
    line
}

/// Pick the cut for the segment starting at `start`
fn choose_break(
    chars: &[char],
    start: usize,
    max_length: usize,
    atomic: &[Range<usize>],
) -> Option<BreakCandidate> {
    let limit = (start + max_length).min(chars.len().saturating_sub(1));
    let window_start = start + ((max_length as f32 * IDEAL_WINDOW_RATIO).ceil() as usize).max(1);

    let candidates: Vec<BreakCandidate> = (start + 1..=limit)
        .filter(|&p| !inside_atomic(p, atomic) && is_legal_break(chars[p - 1], chars[p]))
        .map(|p| BreakCandidate::new(p, classify(chars, start, p)))
        .collect();

    let in_window = candidates
        .iter()
        .filter(|c| c.position >= window_start)
        .min_by(|a, b| {
            a.rank()
                .cmp(&b.rank())
                .then_with(|| b.position.cmp(&a.position))
        });
    if let Some(best) = in_window {
        return Some(*best);
    }
    if let Some(last) = candidates.last() {
        return Some(*last);
    }

    forced_break(chars, start, max_length, atomic)
}

/// Kind of a kinsoku-legal break at `p`
fn classify(chars: &[char], start: usize, p: usize) -> BreakKind {
    let before = chars[p - 1];
    let after = chars[p];
    if is_sentence_ender(before) {
        BreakKind::Sentence
    } else if is_clause_marker(before) {
        BreakKind::Clause
    } else if is_dialogue_open(after) || (is_dialogue_close(before) && after != '、') {
        BreakKind::Dialogue
    } else if ends_with_particle(&chars[start..p]) {
        BreakKind::Particle
    } else {
        BreakKind::Kinsoku
    }
}

fn ends_with_particle(segment: &[char]) -> bool {
    PARTICLES.iter().any(|particle| {
        let len = particle.chars().count();
        len < segment.len()
            && segment[segment.len() - len..]
                .iter()
                .copied()
                .eq(particle.chars())
    })
}

/// Cut at `max_length` when no candidate exists, nudged off forbidden edges and out of
/// structured nodes
fn forced_break(
    chars: &[char],
    start: usize,
    max_length: usize,
    atomic: &[Range<usize>],
) -> Option<BreakCandidate> {
    let hard = start + max_length;
    let last = chars.len().saturating_sub(1);
    if hard > last {
        return None;
    }

    let legal = |p: usize| !inside_atomic(p, atomic) && is_legal_break(chars[p - 1], chars[p]);
    if let Some(p) = (hard + 1..=(hard + MAX_HANGING).min(last)).find(|&p| legal(p)) {
        return Some(BreakCandidate::new(p, BreakKind::Forced));
    }

    let position = match atomic.iter().find(|r| r.start < hard && hard < r.end) {
        None => hard,
        Some(range) if range.start > start => range.start,
        Some(range) if range.end <= last => range.end,
        Some(_) => return None,
    };
    Some(BreakCandidate::new(position, BreakKind::Forced))
}

fn inside_atomic(p: usize, atomic: &[Range<usize>]) -> bool {
    atomic.iter().any(|r| r.start < p && p < r.end)
}

/// Character ranges covered by indivisible nodes, scopes included
pub(crate) fn atomic_ranges(nodes: &[Node]) -> Vec<Range<usize>> {
    fn walk(nodes: &[Node], offset: &mut usize, out: &mut Vec<Range<usize>>) {
        for node in nodes {
            match node.children() {
                Some(children) => walk(children, offset, out),
                None => {
                    let len = node.text_len();
                    if node.is_atomic() && len > 1 {
                        out.push(*offset..*offset + len);
                    }
                    *offset += len;
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, &mut 0, &mut out);
    out
}

/// Nodes covering the extracted-text range `start..end`.
///
/// Text is cut at the offsets, scoped nodes are rebuilt around the sliced children and
/// other nodes are kept only when they lie fully inside the range. Zero-length nodes
/// belong to the range containing their offset; `include_end` also claims those
/// sitting exactly at `end`.
pub fn slice_nodes(nodes: &[Node], start: usize, end: usize, include_end: bool) -> Vec<Node> {
    let mut out = Vec::new();
    let mut offset = 0;
    for node in nodes {
        let len = node.text_len();
        let (node_start, node_end) = (offset, offset + len);
        offset = node_end;

        if len == 0 {
            if node_start >= start && (node_start < end || (include_end && node_start == end)) {
                out.push(node.clone());
            }
            continue;
        }
        if node_end <= start || node_start >= end {
            continue;
        }

        match node {
            Node::Text { content } => {
                let from = start.saturating_sub(node_start);
                let to = end.min(node_end) - node_start;
                let piece: String = content.chars().skip(from).take(to - from).collect();
                out.push(Node::Text { content: piece });
            }
            Node::TextSize { content, .. } | Node::BlockIndent { content, .. } => {
                let from = start.saturating_sub(node_start);
                let to = end.min(node_end) - node_start;
                let children = slice_nodes(content, from, to, include_end || end > node_end);
                out.push(node.with_children(children));
            }
            _ if node_start >= start && node_end <= end => out.push(node.clone()),
            _ => {}
        }
    }
    out
}
