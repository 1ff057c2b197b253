//! Mermaid flowchart parser, layout, and export.
//!
//! Parses a line-oriented subset of Mermaid flowchart syntax into a node and
//! edge graph for a graph renderer. Parsing is best-effort: malformed
//! statements are skipped, dangling edge endpoints become plain nodes, and an
//! input with nothing drawable yields a single placeholder node.
//!
//! ```
//! let chart = flowchart::parse("graph TD\nA[Start] -->|go| B{Done?}");
//! assert_eq!(chart.nodes.len(), 2);
//! assert_eq!(chart.edges[0].text.as_deref(), Some("go"));
//! ```

pub mod ast;
pub mod config;
pub mod export;
pub mod layout;
pub mod lex;
pub mod parse;

pub use ast::{Direction, Flowchart, FlowchartEdge, FlowchartNode, NodeType};
pub use config::{ConfigError, LayoutConfig};
pub use export::to_mermaid;
pub use layout::{ObjectDescriptor, render_to_objects};
pub use lex::LineError;
pub use parse::{ParseReport, SkippedLine, parse, parse_report, resolve_dangling_edges};
