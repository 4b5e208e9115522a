//! Card records and the reference graph built from them.

mod error;
pub mod graph;
pub mod references;
pub mod scale;
mod types;

pub use error::CardError;
pub use graph::{CardGraph, DEFAULT_MAX_DEPTH, EdgeKind, GraphEdge, GraphNode, build_graph};
pub use references::{ReferenceIndex, extract_references};
pub use types::{Card, STEP_COUNT, load_cards, sample_deck};
