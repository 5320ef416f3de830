//! Page divider: lays a node tree out into pages under a character capacity
//!
//! The tree is first flattened into logical lines (one per source line). Lines are then
//! placed page by page: vertical layouts budget whole columns, horizontal layouts budget
//! visible rows. A heading always opens a fresh page.

use crate::boundary::{detect_boundaries, score_complexity, ContentComplexity};
use crate::line_breaker::{atomic_ranges, break_long_line, slice_nodes};
use crate::types::{
    extract_text, nodes_from_page, CharacterCapacity, Line, Node, Orientation, Page,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Lowest boundary strength used to split a line across pages
const SEMANTIC_SPLIT_STRENGTH: f32 = 0.6;

/// Share of the remaining space a semantic split must fill
const SEMANTIC_SPLIT_MIN_FILL: f32 = 0.5;

/// Stages of pagination that can be toggled independently
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct PaginationOptions {
    /// Split lines across pages at sentence/dialogue/paragraph boundaries
    pub enable_semantic_boundaries: bool,
    /// Shrink capacity for content dense with ruby and emphasis
    pub enable_content_aware_capacity: bool,
    /// Use kinsoku-aware line breaking for lines longer than the space they need
    pub enable_line_breaking: bool,
    /// Horizontal mode: wrap overflowing lines into rows instead of breaking the page
    pub use_capacity_based_wrapping: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            enable_semantic_boundaries: true,
            enable_content_aware_capacity: false,
            enable_line_breaking: true,
            use_capacity_based_wrapping: true,
        }
    }
}

/// Lay `nodes` out into pages.
///
/// An empty node list or a zero capacity yields no pages.
pub fn divide_into_pages(
    nodes: &[Node],
    capacity: CharacterCapacity,
    orientation: Orientation,
    options: &PaginationOptions,
) -> Vec<Page> {
    if nodes.is_empty() || capacity.is_empty() {
        return Vec::new();
    }

    let capacity = if options.enable_content_aware_capacity {
        content_aware_capacity(capacity, &score_complexity(nodes), orientation)
    } else {
        capacity
    };

    let lines = flatten_lines(nodes);
    let line_count = lines.len();
    let mut layout = Layout::new(capacity, orientation, *options);
    layout.run(lines.into());
    let pages = layout.finish();

    tracing::debug!(
        pages = pages.len(),
        lines = line_count,
        ?orientation,
        total = capacity.total_characters,
        "divided into pages"
    );
    pages
}

/// Shrink the page-direction dimension of `capacity` for dense content
pub fn content_aware_capacity(
    capacity: CharacterCapacity,
    complexity: &ContentComplexity,
    orientation: Orientation,
) -> CharacterCapacity {
    if capacity.is_empty() {
        return capacity;
    }
    let keep = 1.0 - complexity.capacity_reduction();
    let shrink = |n: usize| ((n as f32 * keep).floor() as usize).max(1);
    match orientation {
        Orientation::Vertical => CharacterCapacity::from_grid(capacity.rows, shrink(capacity.cols)),
        Orientation::Horizontal => {
            CharacterCapacity::from_grid(shrink(capacity.rows), capacity.cols)
        }
    }
}

/// Nodes of every page in order, with `Text("\n")` wherever a logical line ends
pub fn reassemble_pages(pages: &[Page]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            let previous_ends_line = pages[i - 1]
                .lines
                .last()
                .map_or(true, Line::ends_logical_line);
            if previous_ends_line {
                nodes.push(Node::text("\n"));
            }
        }
        nodes.extend(nodes_from_page(page));
    }
    nodes
}

/// A line (or part of one) with its place in the document text
#[derive(Debug, Clone)]
struct Placed {
    line: Line,
    /// Index of the logical line it came from
    source: usize,
    /// Offset of its first character in the document text
    start: usize,
    /// Offset just past its last character
    end: usize,
    /// Not the first part of its logical line
    continued: bool,
}

impl Placed {
    /// Split off everything from character `at` onwards
    fn split_at(self, at: usize) -> (Placed, Placed) {
        let len = self.line.character_count;
        let head = Line::from_nodes(slice_nodes(&self.line.nodes, 0, at, false));
        let tail = Line::from_nodes(slice_nodes(&self.line.nodes, at, len, true));
        (
            Placed {
                line: head,
                source: self.source,
                start: self.start,
                end: self.start + at,
                continued: self.continued,
            },
            Placed {
                line: tail,
                source: self.source,
                start: self.start + at,
                end: self.end,
                continued: true,
            },
        )
    }

    /// Split into the parts produced by the line breaker
    fn break_into(self, max_length: usize) -> Vec<Placed> {
        let parts = break_long_line(&self.line.text, &self.line.nodes, max_length);
        let mut start = self.start;
        parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| {
                let end = start + part.character_count;
                let placed = Placed {
                    line: part,
                    source: self.source,
                    start,
                    end,
                    continued: self.continued || i > 0,
                };
                start = end;
                placed
            })
            .collect()
    }
}

/// Split the document into logical lines on `\n`, blank lines becoming placeholders
fn flatten_lines(nodes: &[Node]) -> Vec<Placed> {
    let text = extract_text(nodes);
    let chars: Vec<char> = text.chars().collect();

    let mut bounds: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            bounds.push((start, i));
            start = i + 1;
        }
    }
    bounds.push((start, chars.len()));

    bounds
        .into_iter()
        .enumerate()
        .map(|(source, (start, end))| {
            let line = if start == end {
                Line::placeholder()
            } else {
                Line::from_nodes(slice_nodes(nodes, start, end, true))
            };
            Placed {
                line,
                source,
                start,
                end,
                continued: false,
            }
        })
        .collect()
}

/// Where to split a line so that its head fills at most `budget` characters, using the
/// strongest semantic boundary in the upper part of the budget
fn semantic_split(line: &Line, budget: usize) -> Option<usize> {
    if line.is_placeholder || budget == 0 {
        return None;
    }
    let len = line.character_count;
    let min_fill = ((budget as f32 * SEMANTIC_SPLIT_MIN_FILL).ceil() as usize).max(1);

    detect_boundaries(&line.text)
        .into_iter()
        .filter(|b| b.strength >= SEMANTIC_SPLIT_STRENGTH)
        .filter(|b| b.position >= min_fill && b.position <= budget && b.position < len)
        .filter(|b| splits_cleanly(&line.nodes, b.position))
        .max_by(|a, b| {
            a.strength
                .total_cmp(&b.strength)
                .then(a.position.cmp(&b.position))
        })
        .map(|b| b.position)
}

/// Whether cutting at `at` keeps every structured node whole
fn splits_cleanly(nodes: &[Node], at: usize) -> bool {
    atomic_ranges(nodes)
        .iter()
        .all(|r| !(r.start < at && at < r.end))
}

/// Page-building state for one pagination run
struct Layout {
    capacity: CharacterCapacity,
    orientation: Orientation,
    options: PaginationOptions,
    pages: Vec<Vec<Placed>>,
    current: Vec<Placed>,
    /// Slots used on the current page (vertical)
    used: usize,
    /// Rows still free on the current page (horizontal)
    remaining_rows: usize,
}

impl Layout {
    fn new(
        capacity: CharacterCapacity,
        orientation: Orientation,
        options: PaginationOptions,
    ) -> Self {
        Self {
            capacity,
            orientation,
            options,
            pages: Vec::new(),
            current: Vec::new(),
            used: 0,
            remaining_rows: capacity.rows,
        }
    }

    fn run(&mut self, mut queue: VecDeque<Placed>) {
        while let Some(item) = queue.pop_front() {
            if !item.continued && item.line.has_heading() && !self.current.is_empty() {
                self.flush();
            }
            match self.orientation {
                Orientation::Vertical => self.place_vertical(item, &mut queue),
                Orientation::Horizontal => self.place_horizontal(item, &mut queue),
            }
        }
    }

    /// Column quota: every line takes whole columns
    fn quota(&self, count: usize) -> usize {
        let per_column = self.capacity.characters_per_column;
        if count < per_column {
            per_column
        } else {
            count.div_ceil(per_column) * per_column
        }
    }

    fn place_vertical(&mut self, mut item: Placed, queue: &mut VecDeque<Placed>) {
        let total = self.capacity.total_characters;
        let normalized = self.quota(item.line.character_count);

        if self.used + normalized <= total {
            item.line.normalized_count = normalized;
            self.used += normalized;
            self.current.push(item);
            return;
        }

        if self.options.enable_semantic_boundaries {
            if let Some(at) = semantic_split(&item.line, total - self.used) {
                let (head, tail) = item.split_at(at);
                queue.push_front(tail);
                queue.push_front(head);
                return;
            }
        }

        if !self.current.is_empty() {
            self.flush();
            queue.push_front(item);
            return;
        }

        // Alone on an empty page and still too long
        if self.options.enable_line_breaking {
            let parts = item.clone().break_into(total);
            if parts.len() > 1 {
                for part in parts.into_iter().rev() {
                    queue.push_front(part);
                }
                return;
            }
        }
        self.place_overflow(item, normalized);
    }

    fn place_horizontal(&mut self, mut item: Placed, queue: &mut VecDeque<Placed>) {
        if self.remaining_rows == 0 {
            self.flush();
        }
        let per_row = self.capacity.characters_per_row;
        let rows = item.line.character_count.div_ceil(per_row).max(1);

        if rows <= self.remaining_rows {
            item.line.normalized_count = rows * per_row;
            self.remaining_rows -= rows;
            self.current.push(item);
            return;
        }

        if !self.options.use_capacity_based_wrapping {
            if !self.current.is_empty() {
                self.flush();
                queue.push_front(item);
            } else {
                self.place_overflow(item, rows * per_row);
            }
            return;
        }

        if self.options.enable_semantic_boundaries {
            if let Some(at) = semantic_split(&item.line, self.remaining_rows * per_row) {
                let (head, tail) = item.split_at(at);
                queue.push_front(tail);
                queue.push_front(head);
                return;
            }
        }

        // Wrap into row-width segments that flow across pages
        let segments = if self.options.enable_line_breaking {
            item.clone().break_into(per_row)
        } else {
            width_segments(item.clone(), per_row)
        };
        if segments.len() > 1 {
            for segment in segments.into_iter().rev() {
                queue.push_front(segment);
            }
        } else if !self.current.is_empty() {
            self.flush();
            queue.push_front(item);
        } else {
            self.place_overflow(item, rows * per_row);
        }
    }

    /// Put a line that cannot be split on its own page
    fn place_overflow(&mut self, mut item: Placed, normalized: usize) {
        tracing::debug!(
            characters = item.line.character_count,
            capacity = self.capacity.total_characters,
            "line exceeds a whole page"
        );
        item.line.normalized_count = normalized;
        self.current.push(item);
        self.flush();
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.used = 0;
        self.remaining_rows = self.capacity.rows;
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        number_parts(&mut self.pages);
        self.pages
            .into_iter()
            .map(|placed| {
                let start_index = placed.first().map_or(0, |p| p.start);
                let end_index = placed.last().map_or(0, |p| p.end);
                let lines: Vec<Line> = placed.into_iter().map(|p| p.line).collect();
                Page {
                    total_characters: lines.iter().map(|l| l.normalized_count).sum(),
                    lines,
                    start_index,
                    end_index,
                }
            })
            .collect()
    }
}

/// Plain width cuts, moved off structured nodes where needed
fn width_segments(item: Placed, width: usize) -> Vec<Placed> {
    let mut segments = Vec::new();
    let mut rest = item;
    while rest.line.character_count > width {
        let Some(at) = clean_cut(&rest.line, width) else {
            break;
        };
        let (head, tail) = rest.split_at(at);
        segments.push(head);
        rest = tail;
    }
    segments.push(rest);
    segments
}

/// Nearest cut to `at` that leaves structured nodes whole
fn clean_cut(line: &Line, at: usize) -> Option<usize> {
    let len = line.character_count;
    match atomic_ranges(&line.nodes)
        .into_iter()
        .find(|r| r.start < at && at < r.end)
    {
        None => Some(at),
        Some(r) if r.start > 0 => Some(r.start),
        Some(r) if r.end < len => Some(r.end),
        Some(_) => None,
    }
}

/// Give every split logical line its `index/total` part numbers
fn number_parts(pages: &mut [Vec<Placed>]) {
    let mut totals: HashMap<usize, usize> = HashMap::new();
    for placed in pages.iter().flatten() {
        *totals.entry(placed.source).or_default() += 1;
    }

    let mut seen: HashMap<usize, usize> = HashMap::new();
    for placed in pages.iter_mut().flatten() {
        let total = totals[&placed.source];
        if total < 2 {
            continue;
        }
        let index = seen.entry(placed.source).or_default();
        let line = std::mem::take(&mut placed.line);
        placed.line = line.with_part(*index, total);
        *index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HeadingLevel;

    fn plain() -> PaginationOptions {
        PaginationOptions {
            enable_semantic_boundaries: false,
            enable_content_aware_capacity: false,
            enable_line_breaking: true,
            use_capacity_based_wrapping: false,
        }
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input_or_capacity() {
        let capacity = CharacterCapacity::from_grid(10, 10);
        assert!(divide_into_pages(&[], capacity, Orientation::Vertical, &plain()).is_empty());
        let nodes = vec![Node::text("本文")];
        let none = CharacterCapacity::default();
        assert!(divide_into_pages(&nodes, none, Orientation::Vertical, &plain()).is_empty());
    }

    #[test]
    fn test_vertical_column_quota() {
        let nodes = vec![Node::text("あいう\nかきくけこさしすせそたち\nなに")];
        let capacity = CharacterCapacity::from_grid(10, 3);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Vertical, &plain());

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["あいう", "かきくけこさしすせそたち"]);
        assert_eq!(pages[0].lines[0].normalized_count, 10);
        assert_eq!(pages[0].lines[1].normalized_count, 20);
        assert_eq!(pages[0].total_characters, 30);
        assert_eq!((pages[0].start_index, pages[0].end_index), (0, 16));
        assert_eq!(texts(&pages[1]), vec!["なに"]);
        assert_eq!((pages[1].start_index, pages[1].end_index), (17, 19));
    }

    #[test]
    fn test_heading_starts_new_page() {
        let nodes = vec![
            Node::text("本文\n"),
            Node::heading("第一章", HeadingLevel::Large),
            Node::text("\n続き"),
        ];
        let capacity = CharacterCapacity::from_grid(10, 10);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Vertical, &plain());

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["本文"]);
        assert_eq!(texts(&pages[1]), vec!["第一章", "続き"]);
        assert_eq!(pages[1].start_index, 3);
    }

    #[test]
    fn test_vertical_long_line_is_broken_across_pages() {
        let nodes = vec![Node::text("アイウエオカキクケコサシ")];
        let capacity = CharacterCapacity::from_grid(5, 1);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Vertical, &plain());

        assert_eq!(pages.len(), 3);
        assert_eq!(texts(&pages[0]), vec!["アイウエオ"]);
        assert_eq!(texts(&pages[2]), vec!["サシ"]);
        assert_eq!(pages[1].lines[0].part_label().as_deref(), Some("2/3"));
        assert!(pages[1].lines[0].is_continuation);
        assert_eq!((pages[2].start_index, pages[2].end_index), (10, 12));
    }

    #[test]
    fn test_vertical_semantic_split_fills_page() {
        let nodes = vec![Node::text("あいう\nかきく。さしすせそた")];
        let capacity = CharacterCapacity::from_grid(5, 2);
        let options = PaginationOptions {
            enable_semantic_boundaries: true,
            ..plain()
        };
        let pages = divide_into_pages(&nodes, capacity, Orientation::Vertical, &options);

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["あいう", "かきく。"]);
        assert_eq!(texts(&pages[1]), vec!["さしすせそた"]);
        assert_eq!(pages[0].end_index, 8);
        assert_eq!(pages[1].start_index, 8);
        assert_eq!(
            extract_text(&reassemble_pages(&pages)),
            "あいう\nかきく。さしすせそた"
        );
    }

    #[test]
    fn test_horizontal_visible_rows() {
        let nodes = vec![Node::text("あいうえおかき\nさし\nたち")];
        let capacity = CharacterCapacity::from_grid(3, 5);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Horizontal, &plain());

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["あいうえおかき", "さし"]);
        assert_eq!(pages[0].lines[0].normalized_count, 10);
        assert_eq!(pages[0].total_characters, 15);
        assert_eq!(texts(&pages[1]), vec!["たち"]);
    }

    #[test]
    fn test_horizontal_wrapping_flows_rows() {
        let source = "アイウエオカキクケコサシ";
        let nodes = vec![Node::text(source)];
        let capacity = CharacterCapacity::from_grid(2, 5);
        let options = PaginationOptions {
            use_capacity_based_wrapping: true,
            enable_line_breaking: false,
            ..plain()
        };
        let pages = divide_into_pages(&nodes, capacity, Orientation::Horizontal, &options);

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["アイウエオ", "カキクケコ"]);
        assert_eq!(texts(&pages[1]), vec!["サシ"]);
        assert!(pages[1].lines[0].ends_logical_line());
        assert_eq!(extract_text(&reassemble_pages(&pages)), source);
    }

    #[test]
    fn test_horizontal_without_wrapping_isolates_oversized_line() {
        let nodes = vec![Node::text("あ\nアイウエオカキクケコサシ\nい")];
        let capacity = CharacterCapacity::from_grid(2, 5);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Horizontal, &plain());

        assert_eq!(pages.len(), 3);
        assert_eq!(texts(&pages[0]), vec!["あ"]);
        assert_eq!(texts(&pages[1]), vec!["アイウエオカキクケコサシ"]);
        assert_eq!(pages[1].total_characters, 15);
        assert_eq!(texts(&pages[2]), vec!["い"]);
    }

    #[test]
    fn test_blank_lines_become_placeholders() {
        let nodes = vec![Node::text("一\n\n二")];
        let capacity = CharacterCapacity::from_grid(10, 10);
        let pages = divide_into_pages(&nodes, capacity, Orientation::Vertical, &plain());

        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines[1].is_placeholder);
        assert_eq!(pages[0].lines[1].text, "\u{00A0}");
        assert_eq!(pages[0].text(), "一\n\n二");
    }

    #[test]
    fn test_content_aware_capacity() {
        let dense = ContentComplexity {
            score: 1.0,
            ..Default::default()
        };
        let capacity = CharacterCapacity::from_grid(9, 9);
        let vertical = content_aware_capacity(capacity, &dense, Orientation::Vertical);
        assert_eq!((vertical.rows, vertical.cols), (9, 6));
        let horizontal = content_aware_capacity(capacity, &dense, Orientation::Horizontal);
        assert_eq!((horizontal.rows, horizontal.cols), (6, 9));

        let narrow = CharacterCapacity::from_grid(10, 1);
        let shrunk = content_aware_capacity(narrow, &dense, Orientation::Vertical);
        assert_eq!(shrunk.cols, 1);
    }
}
