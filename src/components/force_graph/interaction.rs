//! Search filtering, hover highlighting and selection.

use std::collections::HashSet;

use crate::cards::CardGraph;

/// The part of a [`CardGraph`] that survives the search filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
	pub nodes: HashSet<String>,
	/// Indices into `CardGraph::edges`.
	pub edges: Vec<usize>,
}

impl VisibleGraph {
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}
}

/// Keep nodes whose name, tier or leverage type contains `query`
/// (case-insensitive) and the edges between them. Only `""` matches all.
pub fn filter_graph(graph: &CardGraph, query: &str) -> VisibleGraph {
	let query = query.to_lowercase();
	let nodes: HashSet<String> = graph
		.nodes
		.iter()
		.filter(|node| {
			query.is_empty()
				|| [&node.card.name, &node.card.tier, &node.card.leverage_type]
					.iter()
					.any(|field| field.to_lowercase().contains(&query))
		})
		.map(|node| node.card.id.clone())
		.collect();
	let edges = graph
		.edges
		.iter()
		.enumerate()
		.filter(|(_, e)| nodes.contains(&e.source) && nodes.contains(&e.target))
		.map(|(i, _)| i)
		.collect();
	VisibleGraph { nodes, edges }
}

/// Hover and selection state of one graph view.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	pub hovered: Option<String>,
	/// Hovered node plus every node sharing a visible edge with it.
	pub highlighted_nodes: HashSet<String>,
	/// Visible edges touching the hovered node.
	pub highlighted_edges: HashSet<usize>,
	pub selected: Option<String>,
	/// 0 to 1 fade of the highlight, eased by the renderer.
	pub highlight_t: f64,
	prev_nodes: HashSet<String>,
	prev_edges: HashSet<usize>,
	delay_t: f64,
}

impl Interaction {
	/// Point the highlight at `node`, or clear it with `None`.
	pub fn hover(&mut self, node: Option<&str>, graph: &CardGraph, visible: &VisibleGraph) {
		let node = node.filter(|id| visible.contains(id));
		if self.hovered.as_deref() == node {
			return;
		}
		let was_hovering = self.hovered.is_some();

		// Keep the old sets around so they can fade out.
		if was_hovering && node.is_none() {
			self.prev_nodes = std::mem::take(&mut self.highlighted_nodes);
			self.prev_edges = std::mem::take(&mut self.highlighted_edges);
		} else {
			self.prev_nodes.clear();
			self.prev_edges.clear();
		}
		self.highlighted_nodes.clear();
		self.highlighted_edges.clear();
		self.hovered = node.map(str::to_owned);

		let Some(id) = node else {
			return;
		};
		if !was_hovering {
			self.delay_t = 0.0;
		}
		self.highlighted_nodes.insert(id.to_owned());
		for &i in &visible.edges {
			let edge = &graph.edges[i];
			if edge.source == id {
				self.highlighted_nodes.insert(edge.target.clone());
				self.highlighted_edges.insert(i);
			} else if edge.target == id {
				self.highlighted_nodes.insert(edge.source.clone());
				self.highlighted_edges.insert(i);
			}
		}
	}

	/// Drop hover state that no longer matches the visible graph.
	pub fn refresh(&mut self, graph: &CardGraph, visible: &VisibleGraph) {
		let hovered = self.hovered.take();
		self.highlighted_nodes.clear();
		self.highlighted_edges.clear();
		self.hover(hovered.as_deref(), graph, visible);
		if self.selected.as_deref().is_some_and(|id| !visible.contains(id)) {
			self.selected = None;
		}
	}

	pub fn select(&mut self, id: &str) {
		self.selected = Some(id.to_owned());
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hovered.as_deref() == Some(id)
	}

	/// Highlighted now or still fading out.
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.highlighted_nodes.contains(id) || self.prev_nodes.contains(id)
	}

	pub fn is_edge_highlighted(&self, edge: usize) -> bool {
		self.highlighted_edges.contains(&edge) || self.prev_edges.contains(&edge)
	}

	pub fn has_active_highlight(&self) -> bool {
		!self.highlighted_nodes.is_empty() || !self.prev_nodes.is_empty()
	}

	/// Advance the fade animation.
	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hovered.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hovered.is_some() {
			self.delay_t = (self.delay_t + dt).min(delay);
			if self.delay_t >= delay {
				self.highlight_t += (target - self.highlight_t) * speed * dt;
			}
		} else {
			self.highlight_t += (target - self.highlight_t) * speed * dt;
			if self.highlight_t < 0.01 {
				self.highlight_t = 0.0;
				self.prev_nodes.clear();
				self.prev_edges.clear();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;
	use crate::cards::{Card, build_graph};

	fn deck() -> Vec<Card> {
		vec![
			Card::new("anchor", "Anchor High")
				.with_tier("S")
				.with_leverage_type("Information")
				.with_steps(["open with `silence`", "then `deadline`"]),
			Card::new("silence", "Strategic Silence")
				.with_tier("A")
				.with_leverage_type("Time"),
			Card::new("deadline", "Deadline Pressure")
				.with_tier("B")
				.with_leverage_type("Time")
				.with_steps(["pair with `silence`"]),
			Card::new("loner", "Walk Away").with_tier("C"),
		]
	}

	fn set(ids: &[&str]) -> HashSet<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn empty_query_keeps_everything() {
		let graph = build_graph(&deck(), "anchor", 3);
		let visible = filter_graph(&graph, "");
		assert_eq!(visible.nodes.len(), graph.nodes.len());
		assert_eq!(visible.edges.len(), graph.edges.len());
	}

	#[test]
	fn whitespace_is_part_of_the_query() {
		let graph = build_graph(&deck(), "anchor", 3);
		assert!(filter_graph(&graph, "  ").nodes.is_empty());
		assert!(filter_graph(&graph, " time").nodes.is_empty());
		assert_eq!(filter_graph(&graph, "e p").nodes, set(&["deadline"]));
	}

	#[test]
	fn query_matches_name_tier_or_leverage() {
		let graph = build_graph(&deck(), "anchor", 3);
		assert_eq!(filter_graph(&graph, "TIME").nodes, set(&["silence", "deadline"]));
		assert_eq!(filter_graph(&graph, "anchor h").nodes, set(&["anchor"]));
		assert!(filter_graph(&graph, "s").nodes.contains("anchor"));
	}

	#[test]
	fn edges_need_both_endpoints() {
		let graph = build_graph(&deck(), "anchor", 3);
		let visible = filter_graph(&graph, "time");
		let pairs: Vec<(&str, &str)> = visible
			.edges
			.iter()
			.map(|&i| (graph.edges[i].source.as_str(), graph.edges[i].target.as_str()))
			.collect();
		assert_eq!(pairs, vec![("deadline", "silence")]);
	}

	#[test]
	fn hover_highlights_neighbourhood() {
		let graph = build_graph(&deck(), "anchor", 3);
		let visible = filter_graph(&graph, "");
		let mut ui = Interaction::default();

		ui.hover(Some("silence"), &graph, &visible);
		assert_eq!(ui.highlighted_nodes, set(&["silence", "anchor", "deadline"]));
		assert_eq!(ui.highlighted_edges.len(), 2);

		ui.hover(None, &graph, &visible);
		assert!(ui.highlighted_nodes.is_empty());
		assert!(ui.highlighted_edges.is_empty());
		// Still fading.
		assert!(ui.is_highlighted("anchor"));
		for _ in 0..400 {
			ui.tick(0.016);
		}
		assert!(!ui.has_active_highlight());
	}

	#[test]
	fn hover_follows_the_filter() {
		let graph = build_graph(&deck(), "anchor", 3);
		let mut ui = Interaction::default();

		let visible = filter_graph(&graph, "time");
		ui.hover(Some("silence"), &graph, &visible);
		assert_eq!(ui.highlighted_nodes, set(&["silence", "deadline"]));

		ui.hover(Some("anchor"), &graph, &visible);
		assert!(ui.hovered.is_none());
	}

	#[test]
	fn isolated_node_highlights_itself() {
		let cards = deck();
		let graph = build_graph(&cards, "loner", 3);
		let visible = filter_graph(&graph, "");
		let mut ui = Interaction::default();
		ui.hover(Some("loner"), &graph, &visible);
		assert_eq!(ui.highlighted_nodes, set(&["loner"]));
		assert!(ui.highlighted_edges.is_empty());
	}

	#[test]
	fn refresh_drops_hidden_selection() {
		let graph = build_graph(&deck(), "anchor", 3);
		let mut ui = Interaction::default();
		ui.select("anchor");
		ui.hover(Some("anchor"), &graph, &filter_graph(&graph, ""));

		ui.refresh(&graph, &filter_graph(&graph, "time"));
		assert!(ui.selected.is_none());
		assert!(ui.hovered.is_none());
		assert!(ui.highlighted_nodes.is_empty());
	}

	proptest! {
		#[test]
		fn highlight_is_node_plus_edge_neighbours(
			refs in proptest::collection::vec(proptest::collection::vec(0..6usize, 0..4), 6),
			query in "[0-9]?",
			hover in 0..6usize,
		) {
			let cards: Vec<Card> = refs
				.iter()
				.enumerate()
				.map(|(i, targets)| {
					let step: String = targets.iter().map(|t| format!("`n{t}` ")).collect();
					Card::new(format!("n{i}"), format!("Node {i}")).with_steps([step])
				})
				.collect();
			let graph = build_graph(&cards, "n0", 6);
			let visible = filter_graph(&graph, &query);
			let id = format!("n{hover}");
			prop_assume!(visible.contains(&id));

			let mut ui = Interaction::default();
			ui.hover(Some(id.as_str()), &graph, &visible);

			let mut expected = HashSet::from([id.clone()]);
			for &i in &visible.edges {
				let e = &graph.edges[i];
				if e.source == id {
					expected.insert(e.target.clone());
				}
				if e.target == id {
					expected.insert(e.source.clone());
				}
			}
			prop_assert_eq!(&ui.highlighted_nodes, &expected);
		}
	}
}
