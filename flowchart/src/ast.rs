//! Graph types produced by the flowchart parser.

use serde::{Deserialize, Serialize};

/// Id of the node returned when a parse discovers nothing to draw.
pub const PLACEHOLDER_ID: &str = "placeholder";
/// Text of the placeholder node.
pub const PLACEHOLDER_TEXT: &str = "No valid nodes found";

/// A parsed flowchart: the node and edge lists handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub nodes: Vec<FlowchartNode>,
    pub edges: Vec<FlowchartEdge>,
}

impl Flowchart {
    /// The single-node graph returned for input with no usable nodes.
    #[must_use]
    pub fn placeholder(direction: Option<Direction>) -> Self {
        Self {
            direction,
            nodes: vec![FlowchartNode {
                id: PLACEHOLDER_ID.to_owned(),
                text: PLACEHOLDER_TEXT.to_owned(),
                node_type: NodeType::Default,
            }],
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FlowchartNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// True when this is the fallback graph rather than parsed content.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.edges.is_empty()
            && self.nodes.len() == 1
            && self.nodes[0].id == PLACEHOLDER_ID
            && self.nodes[0].text == PLACEHOLDER_TEXT
    }
}

/// A labeled vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

/// Shape family of a node, taken from the delimiter around its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// `[text]`
    Process,
    /// `(text)`
    Subprocess,
    /// `{text}`
    Decision,
    /// Bare identifier.
    Default,
}

/// A directed, optionally labeled connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Flow direction declared in the diagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `TD` or `TB`
    #[serde(rename = "TD")]
    TopDown,
    /// `BT`
    #[serde(rename = "BT")]
    BottomUp,
    /// `LR`
    #[serde(rename = "LR")]
    LeftRight,
    /// `RL`
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    /// Parse a header direction token (case-insensitive).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomUp),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::BottomUp => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    /// Whether ranks advance along the horizontal axis.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}
