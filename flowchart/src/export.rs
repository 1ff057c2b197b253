//! Write a flowchart back out as Mermaid text.

use super::ast::{Direction, Flowchart, FlowchartEdge, FlowchartNode, NodeType};

/// Characters that force a node label into quoted form.
const QUOTE_TRIGGERS: &[char] = &['[', ']', '(', ')', '{', '}', '|', '"', ';', '%'];

/// Render a flowchart as normalized Mermaid flowchart text.
///
/// The output re-parses to the same nodes and edge endpoints/labels. The
/// placeholder graph exports as a bare header.
#[must_use]
pub fn to_mermaid(flowchart: &Flowchart) -> String {
    let direction = flowchart.direction.unwrap_or(Direction::TopDown);
    let mut lines = vec![format!("flowchart {}", direction.as_token())];

    if !flowchart.is_placeholder() {
        lines.extend(flowchart.nodes.iter().map(|n| format!("    {}", node_decl(n))));
        lines.extend(flowchart.edges.iter().map(|e| format!("    {}", edge_line(e))));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn node_decl(node: &FlowchartNode) -> String {
    let id = &node.id;
    match node.node_type {
        NodeType::Process => format!("{id}[{}]", label_body(&node.text)),
        NodeType::Subprocess => format!("{id}({})", label_body(&node.text)),
        NodeType::Decision => format!("{id}{{{}}}", label_body(&node.text)),
        NodeType::Default if node.text == node.id => id.clone(),
        NodeType::Default => format!("{id}>\"{}\"]", node.text.replace('"', "#quot;")),
    }
}

fn edge_line(edge: &FlowchartEdge) -> String {
    match edge.text.as_deref() {
        Some(text) => format!("{} -->|{}| {}", edge.from, text.replace('|', "#124;"), edge.to),
        None => format!("{} --> {}", edge.from, edge.to),
    }
}

fn label_body(text: &str) -> String {
    if text.contains(QUOTE_TRIGGERS) {
        format!("\"{}\"", text.replace('"', "#quot;"))
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
