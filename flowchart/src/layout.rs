//! Layout engine: converts a parsed flowchart into positioned object descriptors.
//!
//! Nodes are ranked breadth-first from their roots and placed rank by rank
//! along the header direction; edges become arrows between the facing sides
//! of their endpoint boxes.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use super::ast::{Direction, Flowchart, FlowchartEdge, NodeType};
use super::config::LayoutConfig;

const LABEL_CHAR_WIDTH: f64 = 8.0;
const LABEL_MIN_WIDTH: f64 = 40.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const NODE_FONT_SIZE: f64 = 14.0;
const TEXT_COLOR: &str = "#1F1A17";

/// A descriptor for a drawable object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDescriptor {
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub props: serde_json::Value,
}

/// Convert a flowchart into node boxes, edge arrows, and edge label text.
///
/// Objects are positioned starting from `(origin_x, origin_y)` and scaled by
/// `scale`. Node boxes come first, in node order, then each edge's arrow
/// followed by its label when it has one.
#[must_use]
pub fn render_to_objects(
    flowchart: &Flowchart,
    config: &LayoutConfig,
    origin_x: f64,
    origin_y: f64,
    scale: f64,
) -> Vec<ObjectDescriptor> {
    let mut objects = Vec::new();
    if flowchart.nodes.is_empty() {
        return objects;
    }

    let direction = flowchart.direction.unwrap_or(Direction::TopDown);
    let transform = Transform { origin_x, origin_y, scale };
    let centers = node_centers(flowchart, config, direction);

    // --- Node boxes ---
    for (node, &(cx, cy)) in flowchart.nodes.iter().zip(&centers) {
        let (kind, fill, stroke) = node_style(node.node_type);
        let (x, y) = transform.point(cx - config.node_width / 2.0, cy - config.node_height / 2.0);
        objects.push(ObjectDescriptor {
            kind: kind.into(),
            x,
            y,
            width: transform.length(config.node_width),
            height: transform.length(config.node_height),
            props: serde_json::json!({
                "id": node.id,
                "text": node.text,
                "fill": fill,
                "stroke": stroke,
                "strokeWidth": 2,
                "fontSize": NODE_FONT_SIZE,
                "textColor": TEXT_COLOR
            }),
        });
    }

    // --- Edges ---
    let index: HashMap<&str, usize> = flowchart
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    for edge in &flowchart.edges {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) else {
            continue;
        };
        let a = exit_point(centers[from], config, direction);
        let b = if from == to { a } else { entry_point(centers[to], config, direction) };
        objects.push(make_arrow(edge, transform.point(a.0, a.1), transform.point(b.0, b.1), from == to));

        if let Some(label) = edge.text.as_deref() {
            let label_w = f64::max(to_f64(label.chars().count()) * LABEL_CHAR_WIDTH, LABEL_MIN_WIDTH);
            let mid_x = f64::midpoint(a.0, b.0);
            let mid_y = f64::midpoint(a.1, b.1);
            let (x, y) = transform.point(mid_x - label_w / 2.0, mid_y - LABEL_FONT_SIZE);
            objects.push(make_text(
                x,
                y,
                transform.length(label_w),
                transform.length(LABEL_FONT_SIZE + 4.0),
                label,
            ));
        }
    }

    objects
}

/// Rank of every node, in node order.
///
/// Roots (no incoming edge) start at rank 0 and ranks spread breadth-first.
/// Nodes only reachable through a cycle start a fresh search at rank 0 in
/// node order. Self-loops do not affect ranking.
#[must_use]
pub fn assign_ranks(flowchart: &Flowchart) -> Vec<usize> {
    let count = flowchart.nodes.len();
    let index: HashMap<&str, usize> = flowchart
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut has_incoming = vec![false; count];
    for edge in &flowchart.edges {
        if let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
            if from != to {
                outgoing[from].push(to);
                has_incoming[to] = true;
            }
        }
    }

    let mut ranks: Vec<Option<usize>> = vec![None; count];
    let mut queue = VecDeque::new();
    for root in (0..count).filter(|&i| !has_incoming[i]) {
        ranks[root] = Some(0);
        queue.push_back(root);
    }
    spread(&outgoing, &mut ranks, &mut queue);

    for start in 0..count {
        if ranks[start].is_none() {
            ranks[start] = Some(0);
            queue.push_back(start);
            spread(&outgoing, &mut ranks, &mut queue);
        }
    }

    ranks.into_iter().map(|r| r.unwrap_or(0)).collect()
}

fn spread(outgoing: &[Vec<usize>], ranks: &mut [Option<usize>], queue: &mut VecDeque<usize>) {
    while let Some(i) = queue.pop_front() {
        let next = ranks[i].unwrap_or(0) + 1;
        for &t in &outgoing[i] {
            if ranks[t].is_none() {
                ranks[t] = Some(next);
                queue.push_back(t);
            }
        }
    }
}

/// Logical (unscaled) center of every node box, in node order.
fn node_centers(flowchart: &Flowchart, config: &LayoutConfig, direction: Direction) -> Vec<(f64, f64)> {
    let ranks = assign_ranks(flowchart);
    let max_rank = ranks.iter().copied().max().unwrap_or(0);

    let mut rank_sizes = vec![0_usize; max_rank + 1];
    let mut slots = Vec::with_capacity(ranks.len());
    for &rank in &ranks {
        slots.push(rank_sizes[rank]);
        rank_sizes[rank] += 1;
    }
    let widest = rank_sizes.iter().copied().max().unwrap_or(1);

    ranks
        .iter()
        .zip(&slots)
        .map(|(&rank, &slot)| {
            // Center narrower ranks against the widest one.
            let offset = to_f64(widest - rank_sizes[rank]) * config.node_spacing / 2.0;
            let across = offset + to_f64(slot) * config.node_spacing;
            let along = to_f64(rank) * config.rank_spacing;
            let reversed = to_f64(max_rank - rank) * config.rank_spacing;
            match direction {
                Direction::TopDown => (across, along),
                Direction::BottomUp => (across, reversed),
                Direction::LeftRight => (along, across),
                Direction::RightLeft => (reversed, across),
            }
        })
        .collect()
}

/// Midpoint of the side an edge leaves from.
fn exit_point((cx, cy): (f64, f64), config: &LayoutConfig, direction: Direction) -> (f64, f64) {
    let (half_w, half_h) = (config.node_width / 2.0, config.node_height / 2.0);
    match direction {
        Direction::TopDown => (cx, cy + half_h),
        Direction::BottomUp => (cx, cy - half_h),
        Direction::LeftRight => (cx + half_w, cy),
        Direction::RightLeft => (cx - half_w, cy),
    }
}

/// Midpoint of the side an edge arrives at.
fn entry_point((cx, cy): (f64, f64), config: &LayoutConfig, direction: Direction) -> (f64, f64) {
    let (half_w, half_h) = (config.node_width / 2.0, config.node_height / 2.0);
    match direction {
        Direction::TopDown => (cx, cy - half_h),
        Direction::BottomUp => (cx, cy + half_h),
        Direction::LeftRight => (cx - half_w, cy),
        Direction::RightLeft => (cx + half_w, cy),
    }
}

fn node_style(node_type: NodeType) -> (&'static str, &'static str, &'static str) {
    match node_type {
        NodeType::Process => ("rectangle", "#E3F2FD", "#1565C0"),
        NodeType::Subprocess => ("rounded_rectangle", "#E8F5E9", "#2E7D32"),
        NodeType::Decision => ("diamond", "#FFF8E1", "#F9A825"),
        NodeType::Default => ("rectangle", "#ECEFF1", "#607D8B"),
    }
}

#[derive(Debug, Clone, Copy)]
struct Transform {
    origin_x: f64,
    origin_y: f64,
    scale: f64,
}

impl Transform {
    fn point(self, x: f64, y: f64) -> (f64, f64) {
        (self.origin_x + x * self.scale, self.origin_y + y * self.scale)
    }

    fn length(self, v: f64) -> f64 {
        v * self.scale
    }
}

// ---- helpers ----

fn make_arrow(edge: &FlowchartEdge, a: (f64, f64), b: (f64, f64), self_loop: bool) -> ObjectDescriptor {
    let mut props = serde_json::json!({
        "id": edge.id,
        "from": edge.from,
        "to": edge.to,
        "a": { "x": a.0, "y": a.1 },
        "b": { "x": b.0, "y": b.1 },
        "stroke": TEXT_COLOR,
        "strokeWidth": 1.5
    });
    if self_loop {
        if let Some(map) = props.as_object_mut() {
            map.insert("selfLoop".into(), serde_json::json!(true));
        }
    }
    ObjectDescriptor {
        kind: "arrow".into(),
        x: a.0.min(b.0),
        y: a.1.min(b.1),
        width: (a.0 - b.0).abs(),
        height: (a.1 - b.1).abs(),
        props,
    }
}

fn make_text(x: f64, y: f64, w: f64, h: f64, text: &str) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: "text".into(),
        x,
        y,
        width: w,
        height: h,
        props: serde_json::json!({
            "text": text,
            "fontSize": LABEL_FONT_SIZE,
            "textColor": TEXT_COLOR
        }),
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
