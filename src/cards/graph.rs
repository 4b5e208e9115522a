//! Breadth-first reference graph around a center card.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use super::references::ReferenceIndex;
use super::scale::{node_size, tier_color};
use super::types::Card;

/// Hops explored from the center when the caller gives no depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// A card placed in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// The underlying record.
	pub card: Card,
	/// BFS distance from the center.
	pub level: usize,
	/// Outgoing plus incoming references across the whole collection.
	pub connections: usize,
	/// Radius in graph units.
	pub size: f64,
	/// Fill colour keyed by tier.
	pub color: &'static str,
}

impl GraphNode {
	/// The card id.
	pub fn id(&self) -> &str {
		&self.card.id
	}
}

/// Relation kind carried by an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	/// `source` names `target` in one of its steps.
	Reference,
}

/// Directed edge between two cards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	/// Citing card.
	pub source: String,
	/// Cited card.
	pub target: String,
	/// Always [`EdgeKind::Reference`] today.
	pub kind: EdgeKind,
}

/// Nodes in discovery order (center first) and the edges between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardGraph {
	/// Discovered nodes.
	pub nodes: Vec<GraphNode>,
	/// Reference edges, one per distinct `(source, target)`.
	pub edges: Vec<GraphEdge>,
}

impl CardGraph {
	/// Look a node up by card id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id() == id)
	}

	/// True when no center was found.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Ids one edge away from `id`, either direction.
	pub fn neighbors<'a>(&'a self, id: &str) -> Vec<&'a str> {
		let mut out: Vec<&str> = Vec::new();
		for edge in &self.edges {
			let other = if edge.source == id {
				edge.target.as_str()
			} else if edge.target == id {
				edge.source.as_str()
			} else {
				continue;
			};
			if other != id && !out.contains(&other) {
				out.push(other);
			}
		}
		out
	}
}

/// Build the subgraph reachable from `center_id` within `max_depth` hops.
///
/// Both "references" and "referenced by" count as a hop. Only the citing
/// side emits an edge, so a node reached through an incoming reference gets
/// its edge when it is dequeued. Nodes at `max_depth` are not expanded but
/// still emit edges to cards already in the graph. An unknown center yields
/// an empty graph.
pub fn build_graph(cards: &[Card], center_id: &str, max_depth: usize) -> CardGraph {
	let by_id: HashMap<&str, &Card> = cards.iter().map(|c| (c.id.as_str(), c)).collect();
	if !by_id.contains_key(center_id) {
		debug!("center {center_id} not in collection, empty graph");
		return CardGraph::default();
	}

	let index = ReferenceIndex::new(cards);
	let mut visited: HashSet<&str> = HashSet::from([center_id]);
	let mut discovered: Vec<(&str, usize)> = vec![(center_id, 0)];
	let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(center_id, 0)]);
	let mut seen_edges: HashSet<(&str, &str)> = HashSet::new();
	let mut edges = Vec::new();

	while let Some((current, level)) = queue.pop_front() {
		if level >= max_depth {
			// Last level: link back into the graph, discover nothing new.
			if max_depth > 0 {
				for target in index.references(current) {
					let target = target.as_str();
					if visited.contains(target) && seen_edges.insert((current, target)) {
						edges.push(GraphEdge {
							source: current.to_owned(),
							target: target.to_owned(),
							kind: EdgeKind::Reference,
						});
					}
				}
			}
			continue;
		}

		for target in index.references(current) {
			let target = target.as_str();
			if seen_edges.insert((current, target)) {
				edges.push(GraphEdge {
					source: current.to_owned(),
					target: target.to_owned(),
					kind: EdgeKind::Reference,
				});
			}
			if visited.insert(target) {
				discovered.push((target, level + 1));
				queue.push_back((target, level + 1));
			}
		}

		for source in index.referenced_by(current) {
			let source = source.as_str();
			if visited.insert(source) {
				discovered.push((source, level + 1));
				queue.push_back((source, level + 1));
			}
		}
	}

	let nodes: Vec<GraphNode> = discovered
		.into_iter()
		.filter_map(|(id, level)| {
			let card = by_id.get(id)?;
			let connections = index.connection_count(id);
			Some(GraphNode {
				card: (*card).clone(),
				level,
				connections,
				size: node_size(connections),
				color: tier_color(&card.tier),
			})
		})
		.collect();

	debug!(
		"built graph around {center_id}: {} nodes, {} edges (depth {max_depth})",
		nodes.len(),
		edges.len()
	);
	CardGraph { nodes, edges }
}
