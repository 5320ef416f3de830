//! Markup parser: Aozora-style annotated text into a document tree
//!
//! The parser never fails. Markup it cannot make sense of is kept as literal text, and
//! scopes left open at end of input are closed implicitly and reported through
//! [`ParsedDocument::diagnostics`].

mod tag;

use crate::charclass::is_ideograph;
use crate::types::{
    extract_text, Diagnostic, DiagnosticKind, DocumentMetadata, Node, ParsedDocument,
    TextSizeKind,
};
use tag::{resolve_unicode, Tag};

const TAG_OPEN: char = '［';
const TAG_MARK: char = '＃';
const TAG_CLOSE: char = '］';
const RUBY_OPEN: char = '《';
const RUBY_CLOSE: char = '》';
const RUBY_PIPE: char = '｜';
const NOTE_PLACEHOLDER: char = '※';
const INDENT_SPACE: char = '\u{3000}';

/// Parse annotated text into a document
pub fn parse(text: &str) -> ParsedDocument {
    let mut state = ParserState::new(text);
    state.run();
    let (nodes, diagnostics) = state.finish();

    tracing::debug!(
        nodes = nodes.len(),
        diagnostics = diagnostics.len(),
        "parsed document"
    );

    ParsedDocument {
        metadata: DocumentMetadata::from_text(&extract_text(&nodes)),
        nodes,
        diagnostics,
    }
}

/// Kind of an open scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    TextSize { size: TextSizeKind, steps: u8 },
    BlockIndent { indent: u32 },
}

/// An open scope collecting its children
struct Frame {
    kind: ScopeKind,
    nodes: Vec<Node>,
    /// Offset of the opening tag
    opened_at: usize,
    /// Text of the opening tag
    tag: String,
}

impl Frame {
    fn into_node(self) -> Node {
        match self.kind {
            ScopeKind::TextSize { size, steps } => Node::TextSize {
                content: self.nodes,
                size,
                steps,
            },
            ScopeKind::BlockIndent { indent } => Node::BlockIndent {
                content: self.nodes,
                indent,
            },
        }
    }
}

/// Parser state threaded through every step of one parse
struct ParserState {
    chars: Vec<char>,
    pos: usize,
    root: Vec<Node>,
    stack: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
}

impl ParserState {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            let consumed = match c {
                TAG_OPEN if self.peek(1) == Some(TAG_MARK) => self.try_tag(),
                RUBY_PIPE => self.try_explicit_ruby(),
                RUBY_OPEN => self.try_implicit_ruby(),
                _ => false,
            };
            if !consumed {
                self.push_char(c);
                self.pos += 1;
            }
        }
    }

    /// Close every scope still open, innermost first, and hand back the tree
    fn finish(mut self) -> (Vec<Node>, Vec<Diagnostic>) {
        while let Some(frame) = self.stack.pop() {
            tracing::warn!(
                position = frame.opened_at,
                tag = %frame.tag,
                "unterminated scope closed at end of input"
            );
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnterminatedScope,
                position: frame.opened_at,
                detail: frame.tag.clone(),
            });
            let node = frame.into_node();
            self.push_node(node);
        }
        (self.root, self.diagnostics)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Find `target` at or after `from`, without crossing a line end
    fn find_on_line(&self, from: usize, target: char) -> Option<usize> {
        self.chars
            .get(from..)?
            .iter()
            .take_while(|&&c| c != '\n')
            .position(|&c| c == target)
            .map(|i| from + i)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    // ---------------------------------------------------------------------
    // Node emission
    // ---------------------------------------------------------------------

    /// Nodes of the innermost open scope, or the document root
    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.nodes,
            None => &mut self.root,
        }
    }

    fn push_char(&mut self, c: char) {
        let nodes = self.current();
        if let Some(Node::Text { content }) = nodes.last_mut() {
            content.push(c);
        } else {
            nodes.push(Node::Text {
                content: c.to_string(),
            });
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let nodes = self.current();
        if let Some(Node::Text { content }) = nodes.last_mut() {
            content.push_str(text);
        } else {
            nodes.push(Node::text(text));
        }
    }

    fn push_node(&mut self, node: Node) {
        match node {
            Node::Text { content } => self.push_text(&content),
            other => self.current().push(other),
        }
    }

    /// Detach the maximal run of ideographs ending the current text run
    fn take_trailing_ideographs(&mut self) -> String {
        let nodes = self.current();
        let Some(Node::Text { content }) = nodes.last_mut() else {
            return String::new();
        };

        let split = content
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_ideograph(c))
            .last()
            .map(|(i, _)| i);
        let Some(split) = split else {
            return String::new();
        };

        let base = content.split_off(split);
        if content.is_empty() {
            nodes.pop();
        }
        base
    }

    /// Replace the last occurrence of `target` in the current text run with a node.
    ///
    /// Returns false when the trailing node is not text or does not contain `target`.
    fn replace_trailing(&mut self, target: &str, node: Node) -> bool {
        let nodes = self.current();
        let Some(Node::Text { content }) = nodes.last_mut() else {
            return false;
        };
        let Some(at) = content.rfind(target) else {
            return false;
        };

        let after = content.split_off(at + target.len());
        content.truncate(at);
        if content.is_empty() {
            nodes.pop();
        }
        nodes.push(node);
        if !after.is_empty() {
            nodes.push(Node::Text { content: after });
        }
        true
    }

    /// Drop a `※` placeholder ending the current text run
    fn take_note_placeholder(&mut self) {
        let nodes = self.current();
        if let Some(Node::Text { content }) = nodes.last_mut() {
            if content.ends_with(NOTE_PLACEHOLDER) {
                content.pop();
                if content.is_empty() {
                    nodes.pop();
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Ruby
    // ---------------------------------------------------------------------

    /// `｜BASE《READING》`
    fn try_explicit_ruby(&mut self) -> bool {
        let base_start = self.pos + 1;
        let Some(open) = self.find_on_line(base_start, RUBY_OPEN) else {
            return false;
        };
        if open == base_start || self.chars[base_start..open].contains(&RUBY_PIPE) {
            return false;
        }
        let Some(close) = self.find_on_line(open + 1, RUBY_CLOSE) else {
            return false;
        };

        let node = Node::ruby(self.slice(base_start, open), self.slice(open + 1, close));
        self.push_node(node);
        self.pos = close + 1;
        true
    }

    /// `漢字《かんじ》`, where the base is the ideograph run before `《`
    fn try_implicit_ruby(&mut self) -> bool {
        let Some(close) = self.find_on_line(self.pos + 1, RUBY_CLOSE) else {
            return false;
        };
        let base = self.take_trailing_ideographs();
        if base.is_empty() {
            return false;
        }

        let reading = self.slice(self.pos + 1, close);
        self.push_node(Node::ruby(base, reading));
        self.pos = close + 1;
        true
    }

    // ---------------------------------------------------------------------
    // Tags
    // ---------------------------------------------------------------------

    /// `［＃...］`
    fn try_tag(&mut self) -> bool {
        let start = self.pos;
        let Some(end) = self.find_on_line(start + 2, TAG_CLOSE) else {
            return false;
        };
        let content = self.slice(start + 2, end);
        let Some(tag) = Tag::recognize(&content) else {
            return false;
        };

        if self.apply_tag(tag, start, &content) {
            self.pos = end + 1;
            true
        } else {
            false
        }
    }

    /// Apply a recognized tag; false keeps the tag text as literal
    fn apply_tag(&mut self, tag: Tag, start: usize, content: &str) -> bool {
        match tag {
            Tag::Emphasis { target, mark } => {
                let node = Node::EmphasisDots {
                    content: mark.to_string(),
                    text: target.clone(),
                };
                if !self.replace_trailing(&target, node) {
                    self.push_node(Node::Emphasis {
                        content: target,
                        level: 1,
                    });
                }
            }
            Tag::Heading { target, level } => {
                let node = Node::heading(target.clone(), level);
                if !self.replace_trailing(&target, node.clone()) {
                    self.push_node(node);
                }
            }
            Tag::Indent(count) => {
                let spaces: String = std::iter::repeat(INDENT_SPACE)
                    .take(count as usize)
                    .collect();
                self.push_text(&spaces);
            }
            Tag::BlockIndentOpen(indent) => {
                self.open_scope(ScopeKind::BlockIndent { indent }, start, content);
            }
            Tag::BlockIndentClose => {
                return self.close_scope(
                    |kind| matches!(kind, ScopeKind::BlockIndent { .. }),
                    start,
                    content,
                );
            }
            Tag::TextSizeOpen { size, steps } => {
                self.open_scope(ScopeKind::TextSize { size, steps }, start, content);
            }
            Tag::TextSizeClose(size) => {
                return self.close_scope(
                    |kind| matches!(kind, ScopeKind::TextSize { size: open, .. } if *open == size),
                    start,
                    content,
                );
            }
            Tag::SpecialChar {
                description,
                unicode,
                code,
            } => {
                self.take_note_placeholder();
                let character = unicode
                    .as_deref()
                    .and_then(resolve_unicode)
                    .unwrap_or(NOTE_PLACEHOLDER)
                    .to_string();
                self.push_node(Node::SpecialCharNote {
                    character,
                    description,
                    unicode,
                    code,
                });
            }
        }
        true
    }

    fn open_scope(&mut self, kind: ScopeKind, start: usize, content: &str) {
        self.stack.push(Frame {
            kind,
            nodes: Vec::new(),
            opened_at: start,
            tag: content.to_string(),
        });
    }

    /// Close the innermost scope matching `is_match`, closing any scope nested inside it
    /// first. Returns false when no such scope is open.
    fn close_scope(
        &mut self,
        is_match: impl Fn(&ScopeKind) -> bool,
        start: usize,
        content: &str,
    ) -> bool {
        let Some(index) = self.stack.iter().rposition(|frame| is_match(&frame.kind)) else {
            tracing::warn!(position = start, tag = %content, "closing tag without open scope");
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnmatchedClose,
                position: start,
                detail: content.to_string(),
            });
            return false;
        };

        while self.stack.len() > index {
            if let Some(frame) = self.stack.pop() {
                let node = frame.into_node();
                self.push_node(node);
            }
        }
        true
    }
}
