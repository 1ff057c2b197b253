//! Fold flowchart statements into a node and edge graph.
//!
//! Parsing never fails: a malformed statement is logged, recorded in the
//! [`ParseReport`], and skipped. Input with no usable nodes yields the
//! placeholder graph so a renderer always has something to draw.

use std::collections::HashSet;

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{debug, warn};

use super::ast::{Direction, Flowchart, FlowchartEdge, FlowchartNode, NodeType};
use super::lex::{self, LineError, NodeDecl, Statement};

const EDGE_ID_SUFFIX_LEN: usize = 6;

/// A statement dropped because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based source line number.
    pub line: usize,
    pub text: String,
    pub error: LineError,
}

/// A flowchart together with every statement that was skipped.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub flowchart: Flowchart,
    pub skipped: Vec<SkippedLine>,
}

/// Parse flowchart text into nodes and edges.
///
/// Accepts input with or without a `graph`/`flowchart` header. The returned
/// graph always has at least one node and every edge endpoint is a node.
#[must_use]
pub fn parse(input: &str) -> Flowchart {
    parse_report(input).flowchart
}

/// Like [`parse`], also returning the statements that were skipped.
#[must_use]
pub fn parse_report(input: &str) -> ParseReport {
    let normalized = input.replace("\r\n", "\n");
    normalized
        .lines()
        .enumerate()
        .flat_map(|(idx, line)| statements(idx + 1, line))
        .fold(Builder::default(), Builder::apply)
        .finish()
}

/// Add a `Default` node for every edge endpoint missing from the node list.
#[must_use]
pub fn resolve_dangling_edges(mut flowchart: Flowchart) -> Flowchart {
    let mut known: HashSet<String> = flowchart.nodes.iter().map(|n| n.id.clone()).collect();
    for edge in &flowchart.edges {
        for endpoint in [&edge.from, &edge.to] {
            if known.insert(endpoint.clone()) {
                debug!(id = %endpoint, "flowchart: synthesizing node for dangling edge endpoint");
                flowchart.nodes.push(FlowchartNode {
                    id: endpoint.clone(),
                    text: endpoint.clone(),
                    node_type: NodeType::Default,
                });
            }
        }
    }
    flowchart
}

/// Statements of one physical line, tagged with its line number.
fn statements(line_no: usize, line: &str) -> Vec<(usize, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('%') {
        return Vec::new();
    }
    lex::split_statements(line)
        .into_iter()
        .map(|stmt| (line_no, stmt))
        .collect()
}

fn edge_id(from: &str, to: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(EDGE_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{from}-{to}-{suffix}")
}

#[derive(Debug, Default)]
struct Builder {
    direction: Option<Direction>,
    seen_statement: bool,
    nodes: Vec<FlowchartNode>,
    node_ids: HashSet<String>,
    edges: Vec<FlowchartEdge>,
    skipped: Vec<SkippedLine>,
}

impl Builder {
    fn apply(mut self, (line, text): (usize, &str)) -> Self {
        let allow_header = !self.seen_statement;
        self.seen_statement = true;

        match lex::classify(text, allow_header) {
            Ok(Statement::Header(direction)) => self.direction = direction,
            Ok(Statement::Directive(keyword)) => {
                debug!(line, %keyword, "flowchart: skipping directive");
            }
            Ok(Statement::Node(decl)) => self.register(decl),
            Ok(Statement::Chain { head, hops }) => {
                let mut from = head.id.clone();
                self.register(head);
                for hop in hops {
                    let to = hop.target.id.clone();
                    self.register(hop.target);
                    self.edges.push(FlowchartEdge {
                        id: edge_id(&from, &to),
                        from,
                        to: to.clone(),
                        text: hop.label,
                    });
                    from = to;
                }
            }
            Err(error) => {
                warn!(line, %error, statement = text, "flowchart: skipping malformed statement");
                self.skipped.push(SkippedLine { line, text: text.to_owned(), error });
            }
        }
        self
    }

    /// First declaration of an id wins.
    fn register(&mut self, decl: NodeDecl) {
        if self.node_ids.contains(&decl.id) {
            return;
        }
        self.node_ids.insert(decl.id.clone());
        self.nodes.push(FlowchartNode {
            text: decl.text().to_owned(),
            id: decl.id,
            node_type: decl.node_type,
        });
    }

    fn finish(self) -> ParseReport {
        let graph = resolve_dangling_edges(Flowchart {
            direction: self.direction,
            nodes: self.nodes,
            edges: self.edges,
        });

        let flowchart = if graph.nodes.is_empty() {
            debug!("flowchart: no valid nodes, using placeholder");
            Flowchart::placeholder(graph.direction)
        } else {
            graph
        };

        debug!(
            nodes = flowchart.nodes.len(),
            edges = flowchart.edges.len(),
            skipped = self.skipped.len(),
            "flowchart: parsed"
        );
        ParseReport { flowchart, skipped: self.skipped }
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
