//! Statement classification and label extraction.
//!
//! A trimmed source line is split into `;`-separated statements. Each
//! statement is classified as a header, a directive, a bare node declaration,
//! or a chain of edges, and node segments are read by a small recursive-descent
//! extractor over the four label syntaxes (`[..]`, `(..)`, `{..}`, `>".."`).

use super::ast::{Direction, NodeType};

/// Mermaid keywords that are accepted but carry nothing this dialect renders.
/// Matched case-sensitively, so `End` or `Click` stay usable as node ids.
const DIRECTIVES: &[&str] = &[
    "subgraph",
    "end",
    "classDef",
    "class",
    "style",
    "linkStyle",
    "click",
    "direction",
];

/// Why a single statement could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("missing node identifier in `{segment}`")]
    MissingIdentifier { segment: String },
    #[error("label opened with `{open}` is never closed")]
    UnclosedLabel { open: char },
    #[error("edge label opened with `|` is never closed")]
    UnclosedEdgeLabel,
    #[error("asymmetric label must be a quoted string: `{segment}`")]
    MalformedAsymmetricLabel { segment: String },
    #[error("unexpected input `{found}`")]
    UnexpectedInput { found: String },
}

/// A node as written in one segment of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    pub id: String,
    pub label: Option<String>,
    pub node_type: NodeType,
}

impl NodeDecl {
    /// Display text: the label, or the id when the label is absent or empty.
    #[must_use]
    pub fn text(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.id,
        }
    }
}

/// One arrow of a chain and the node it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub label: Option<String>,
    pub target: NodeDecl,
}

/// A classified statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `graph TD` / `flowchart LR`.
    Header(Option<Direction>),
    /// A recognized keyword line that is skipped.
    Directive(String),
    /// A bare node declaration such as `A[Start]`.
    Node(NodeDecl),
    /// `A --> B -->|label| C`.
    Chain { head: NodeDecl, hops: Vec<Hop> },
}

/// Split a trimmed line into its top-level `;`-separated statements.
#[must_use]
pub fn split_statements(line: &str) -> Vec<&str> {
    let mut nesting = Nesting::default();
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if nesting.step(c) && c == ';' {
            out.push(&line[start..i]);
            start = i + 1;
        }
    }
    out.push(&line[start..]);
    out.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Classify one statement.
///
/// `allow_header` is true only for the first statement of the input; a
/// `graph`/`flowchart` line anywhere else is skipped as a directive.
///
/// # Errors
///
/// Returns a [`LineError`] when a node segment or edge label is malformed.
pub fn classify(stmt: &str, allow_header: bool) -> Result<Statement, LineError> {
    let segments = split_arrows(stmt);
    let Some((first, rest)) = segments.split_first() else {
        return Err(LineError::MissingIdentifier { segment: stmt.to_owned() });
    };

    // A statement with an arrow is always a chain, whatever its first word.
    if rest.is_empty() {
        if let Some(keyword) = keyword_statement(stmt, allow_header) {
            return Ok(keyword);
        }
    }

    let head = parse_node(first)?;
    if rest.is_empty() {
        return Ok(Statement::Node(head));
    }

    let hops = rest
        .iter()
        .map(|segment| {
            let (label, remainder) = take_edge_label(segment)?;
            Ok(Hop { label, target: parse_node(&remainder)? })
        })
        .collect::<Result<Vec<_>, LineError>>()?;

    Ok(Statement::Chain { head, hops })
}

fn keyword_statement(stmt: &str, allow_header: bool) -> Option<Statement> {
    let mut words = stmt.split_whitespace();
    let keyword = words.next()?;
    if keyword == "graph" || keyword == "flowchart" {
        if allow_header {
            return Some(Statement::Header(words.next().and_then(Direction::from_token)));
        }
        return Some(Statement::Directive(keyword.to_owned()));
    }
    DIRECTIVES
        .contains(&keyword)
        .then(|| Statement::Directive(keyword.to_owned()))
}

/// Split a statement on top-level arrows (`->`, `-->`, `--->`, ...).
///
/// Arrows inside labels, quotes, or `|edge labels|` are left alone.
#[must_use]
pub fn split_arrows(stmt: &str) -> Vec<&str> {
    let mut nesting = Nesting::default();
    let mut segments = Vec::new();
    let mut seg_start = 0;
    let mut dash_run: Option<usize> = None;

    for (i, c) in stmt.char_indices() {
        let top = nesting.step(c);
        match c {
            '-' if top => {
                dash_run.get_or_insert(i);
            }
            '>' if top => {
                if let Some(run) = dash_run.take() {
                    segments.push(&stmt[seg_start..run]);
                    seg_start = i + 1;
                }
            }
            _ => dash_run = None,
        }
    }
    segments.push(&stmt[seg_start..]);
    segments
}

/// Remove the first top-level `|label|` from a target segment.
///
/// Returns the trimmed label (`None` when absent or blank) and the segment
/// with the label cut out.
///
/// # Errors
///
/// [`LineError::UnclosedEdgeLabel`] when the opening `|` has no partner.
pub fn take_edge_label(segment: &str) -> Result<(Option<String>, String), LineError> {
    let mut nesting = Nesting::default();
    let open = segment
        .char_indices()
        .find(|&(_, c)| nesting.step(c) && c == '|')
        .map(|(i, _)| i);

    let Some(open) = open else {
        return Ok((None, segment.to_owned()));
    };
    let body_start = open + 1;
    let close = segment[body_start..]
        .find('|')
        .map(|offset| body_start + offset)
        .ok_or(LineError::UnclosedEdgeLabel)?;

    let label = segment[body_start..close].trim();
    let remainder = format!("{}{}", &segment[..open], &segment[close + 1..]);
    let label = (!label.is_empty()).then(|| decode_entities(label));
    Ok((label, remainder))
}

/// Read a node segment: `identifier [shape] [:::class]`.
///
/// # Errors
///
/// Returns a [`LineError`] describing the first problem found.
pub fn parse_node(segment: &str) -> Result<NodeDecl, LineError> {
    let segment = segment.trim();
    let mut cur = Cursor::new(segment);

    let id = cur.take_while(is_ident_char);
    if id.is_empty() {
        return Err(LineError::MissingIdentifier { segment: segment.to_owned() });
    }
    cur.skip_ws();

    let (label, node_type) = match cur.peek() {
        Some('[') => (Some(read_delimited(&mut cur, '[', ']')?), NodeType::Process),
        Some('(') => (Some(read_delimited(&mut cur, '(', ')')?), NodeType::Subprocess),
        Some('{') => (Some(read_delimited(&mut cur, '{', '}')?), NodeType::Decision),
        Some('>') => (Some(read_asymmetric(&mut cur, segment)?), classify_by_brackets(segment)),
        _ => (None, NodeType::Default),
    };

    cur.skip_ws();
    if cur.eat_str(":::") {
        if cur.take_while(is_class_char).is_empty() {
            return Err(LineError::UnexpectedInput { found: format!(":::{}", cur.rest()) });
        }
        cur.skip_ws();
    }
    if !cur.rest().is_empty() {
        return Err(LineError::UnexpectedInput { found: cur.rest().to_owned() });
    }

    Ok(NodeDecl { id: id.to_owned(), label, node_type })
}

/// Fallback type when the label syntax does not name one: `[` wins over `(`,
/// which wins over `{`.
#[must_use]
pub fn classify_by_brackets(text: &str) -> NodeType {
    if text.contains('[') {
        NodeType::Process
    } else if text.contains('(') {
        NodeType::Subprocess
    } else if text.contains('{') {
        NodeType::Decision
    } else {
        NodeType::Default
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_class_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Read `open body close`, balancing nested `open`/`close` pairs.
fn read_delimited(cur: &mut Cursor<'_>, open: char, close: char) -> Result<String, LineError> {
    cur.bump();

    let before_body = cur.pos;
    cur.skip_ws();
    if cur.eat('"') {
        let text = cur.take_until('"').ok_or(LineError::UnclosedLabel { open: '"' })?;
        cur.bump();
        cur.skip_ws();
        if cur.eat(close) {
            return Ok(decode_entities(text));
        }
        if cur.rest().is_empty() {
            return Err(LineError::UnclosedLabel { open });
        }
        return Err(LineError::UnexpectedInput { found: cur.rest().to_owned() });
    }
    cur.pos = before_body;

    let body_start = cur.pos;
    let mut depth = 1_usize;
    loop {
        match cur.bump() {
            None => return Err(LineError::UnclosedLabel { open }),
            Some(c) if c == open => depth += 1,
            Some(c) if c == close => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Some(_) => {}
        }
    }
    let body = &cur.src[body_start..cur.pos - close.len_utf8()];
    Ok(decode_entities(strip_wrappers(body.trim())))
}

/// Read `>"text"` with an optional trailing `]`. The cursor sits on `>`.
fn read_asymmetric(cur: &mut Cursor<'_>, segment: &str) -> Result<String, LineError> {
    let malformed = || LineError::MalformedAsymmetricLabel { segment: segment.to_owned() };
    cur.bump();
    cur.skip_ws();
    if !cur.eat('"') {
        return Err(malformed());
    }
    let text = cur.take_until('"').ok_or_else(malformed)?;
    cur.bump();
    cur.skip_ws();
    cur.eat(']');
    Ok(decode_entities(text))
}

/// Strip doubled shape wrappers such as the inner `(..)` of `((circle))`,
/// then any surrounding quotes.
fn strip_wrappers(mut text: &str) -> &str {
    loop {
        let inner = [('[', ']'), ('(', ')'), ('{', '}')]
            .into_iter()
            .find(|&(open, close)| wrapped_by(text, open, close))
            .map(|(open, close)| text[open.len_utf8()..text.len() - close.len_utf8()].trim());
        match inner {
            Some(inner) => text = inner,
            None => break,
        }
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = &text[1..text.len() - 1];
    }
    text
}

/// True when the `open` at the start is closed by the `close` at the very end.
fn wrapped_by(text: &str, open: char, close: char) -> bool {
    if text.len() < 2 || !text.starts_with(open) || !text.ends_with(close) {
        return false;
    }
    let mut depth = 0_usize;
    let last = text.len() - close.len_utf8();
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i == last;
            }
        }
    }
    false
}

/// Decode the Mermaid entities the exporter writes: `#quot;` and `#124;`.
fn decode_entities(text: &str) -> String {
    text.replace("#quot;", "\"").replace("#124;", "|")
}

/// Tracks whether a character sits inside a label.
///
/// Inside a bracket label only the opening family nests; quotes and
/// `|edge labels|` are opaque until their closing character.
#[derive(Debug, Default)]
struct Nesting {
    label: Option<OpenLabel>,
    in_quote: bool,
    in_pipe: bool,
}

#[derive(Debug, Clone, Copy)]
struct OpenLabel {
    open: char,
    close: char,
    depth: usize,
}

impl Nesting {
    /// Advance over `c`, returning whether `c` itself is at top level.
    fn step(&mut self, c: char) -> bool {
        let top = self.label.is_none() && !self.in_quote && !self.in_pipe;
        if self.in_quote {
            if c == '"' {
                self.in_quote = false;
            }
            return false;
        }
        if self.in_pipe {
            if c == '|' {
                self.in_pipe = false;
            }
            return false;
        }
        if let Some(label) = self.label.as_mut() {
            if c == label.close {
                label.depth -= 1;
                if label.depth == 0 {
                    self.label = None;
                }
            } else if c == label.open {
                label.depth += 1;
            } else if c == '"' {
                self.in_quote = true;
            }
            return false;
        }
        match c {
            '"' => self.in_quote = true,
            '|' => self.in_pipe = true,
            '[' => self.label = Some(OpenLabel { open: '[', close: ']', depth: 1 }),
            '(' => self.label = Some(OpenLabel { open: '(', close: ')', depth: 1 }),
            '{' => self.label = Some(OpenLabel { open: '{', close: '}', depth: 1 }),
            _ => {}
        }
        top
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Consume up to (not including) `end`; `None` if `end` never appears.
    fn take_until(&mut self, end: char) -> Option<&'a str> {
        let offset = self.rest().find(end)?;
        let start = self.pos;
        self.pos += offset;
        Some(&self.src[start..self.pos])
    }
}

#[cfg(test)]
#[path = "lex_test.rs"]
mod tests;
