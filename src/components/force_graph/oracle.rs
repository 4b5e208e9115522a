use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::types::GraphSettings;
use crate::cards::CardGraph;

/// Extra world-space slack around a node for pointer hits.
pub const HIT_SLACK: f64 = 4.0;

/// Zoom bounds for the view transform.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Point `t` of the way from `self` to `to`.
	pub fn lerp(self, to: Point, t: f64) -> Point {
		Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
	}
}

/// What the renderer needs to know about a node.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	pub size: f64,
	pub level: usize,
}

/// The physics engine as seen by the stabilizer and interaction code.
pub trait LayoutOracle {
	fn add_node(&mut self, info: NodeInfo, at: Point);
	fn add_edge(&mut self, source: &str, target: &str);
	fn position(&self, id: &str) -> Option<Point>;
	/// Hold `id` at `at`, out of the simulation's reach.
	fn pin(&mut self, id: &str, at: Point);
	/// Hand `id` back to the simulation.
	fn unpin(&mut self, id: &str);
	/// Pan so `id` sits in the middle of the viewport.
	fn recenter_on(&mut self, id: &str);
	fn zoom(&mut self, k: f64);
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

/// [`LayoutOracle`] backed by a `force_graph` simulation plus a pan/zoom view.
pub struct ForceLayout {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	index: HashMap<String, DefaultNodeIdx>,
}

impl ForceLayout {
	pub fn new(settings: &GraphSettings, width: f64, height: f64) -> Self {
		Self {
			graph: ForceGraph::new(settings.simulation_parameters()),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			index: HashMap::new(),
		}
	}

	/// Seed a layout with every node of `graph`, placed on rings by level.
	pub fn from_graph(graph: &CardGraph, settings: &GraphSettings, width: f64, height: f64) -> Self {
		let mut layout = Self::new(settings, width, height);
		let mut per_level: HashMap<usize, usize> = HashMap::new();
		for node in &graph.nodes {
			*per_level.entry(node.level).or_default() += 1;
		}

		let mut placed: HashMap<usize, usize> = HashMap::new();
		for node in &graph.nodes {
			let slot = placed.entry(node.level).or_default();
			let count = per_level.get(&node.level).copied().unwrap_or(1);
			let angle = (*slot as f64) * 2.0 * PI / count as f64;
			let radius = settings.level_spacing * node.level as f64;
			*slot += 1;

			layout.add_node(
				NodeInfo {
					id: node.card.id.clone(),
					label: node.card.name.clone(),
					color: node.color.to_owned(),
					size: node.size,
					level: node.level,
				},
				Point::new(radius * angle.cos(), radius * angle.sin()),
			);
		}
		for edge in &graph.edges {
			layout.add_edge(&edge.source, &edge.target);
		}
		layout
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point that `accept` lets through.
	pub fn node_at_position(&self, sx: f64, sy: f64, accept: impl Fn(&str) -> bool) -> Option<String> {
		let p = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let (dx, dy) = (node.x() as f64 - p.x, node.y() as f64 - p.y);
			if (dx * dx + dy * dy).sqrt() < info.size + HIT_SLACK && accept(&info.id) {
				found = Some(info.id.clone());
			}
		});
		found
	}

	/// Set the zoom to `k`, clamped, keeping the screen point `pivot` fixed.
	pub fn zoom_about(&mut self, pivot: Point, k: f64) {
		let k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		let t = &mut self.transform;
		let ratio = k / t.k;
		t.x = pivot.x - (pivot.x - t.x) * ratio;
		t.y = pivot.y - (pivot.y - t.y) * ratio;
		t.k = k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn with_node_mut(&mut self, id: &str, f: impl FnOnce(&mut NodeData<NodeInfo>)) {
		let Some(&idx) = self.index.get(id) else {
			return;
		};
		let mut f = Some(f);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				if let Some(f) = f.take() {
					f(&mut node.data);
				}
			}
		});
	}
}

impl LayoutOracle for ForceLayout {
	fn add_node(&mut self, info: NodeInfo, at: Point) {
		if self.index.contains_key(&info.id) {
			return;
		}
		let id = info.id.clone();
		let idx = self.graph.add_node(NodeData {
			x: at.x as f32,
			y: at.y as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: info,
		});
		self.index.insert(id, idx);
	}

	fn add_edge(&mut self, source: &str, target: &str) {
		// Self-references have no length to spring against.
		if source == target {
			return;
		}
		if let (Some(&src), Some(&tgt)) = (self.index.get(source), self.index.get(target)) {
			self.graph.add_edge(src, tgt, EdgeData::default());
		}
	}

	fn position(&self, id: &str) -> Option<Point> {
		let idx = *self.index.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(Point::new(node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	fn pin(&mut self, id: &str, at: Point) {
		self.with_node_mut(id, |data| {
			data.x = at.x as f32;
			data.y = at.y as f32;
			data.is_anchor = true;
		});
	}

	fn unpin(&mut self, id: &str) {
		self.with_node_mut(id, |data| data.is_anchor = false);
	}

	fn recenter_on(&mut self, id: &str) {
		if let Some(p) = self.position(id) {
			self.transform.x = self.width / 2.0 - p.x * self.transform.k;
			self.transform.y = self.height / 2.0 - p.y * self.transform.k;
		}
	}

	fn zoom(&mut self, k: f64) {
		let center = Point::new(self.width / 2.0, self.height / 2.0);
		self.zoom_about(center, k);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cards::{Card, build_graph};

	fn layout() -> ForceLayout {
		let cards = vec![
			Card::new("a", "A").with_steps(["`b` `c`"]),
			Card::new("b", "B"),
			Card::new("c", "C").with_steps(["`c`"]),
		];
		let graph = build_graph(&cards, "a", 2);
		ForceLayout::from_graph(&graph, &GraphSettings::default(), 800.0, 600.0)
	}

	#[test]
	fn seeds_center_at_origin() {
		let layout = layout();
		assert_eq!(layout.len(), 3);
		assert_eq!(layout.position("a"), Some(Point::new(0.0, 0.0)));
		assert!(layout.position("missing").is_none());
	}

	#[test]
	fn pin_moves_and_unpin_keeps_position() {
		let mut layout = layout();
		layout.pin("b", Point::new(40.0, -20.0));
		assert_eq!(layout.position("b"), Some(Point::new(40.0, -20.0)));
		layout.unpin("b");
		assert_eq!(layout.position("b"), Some(Point::new(40.0, -20.0)));
	}

	#[test]
	fn recenter_puts_node_mid_viewport() {
		let mut layout = layout();
		layout.pin("c", Point::new(100.0, 50.0));
		layout.zoom(2.0);
		layout.recenter_on("c");
		let p = layout.position("c").unwrap();
		let sx = p.x * layout.transform.k + layout.transform.x;
		let sy = p.y * layout.transform.k + layout.transform.y;
		assert!((sx - 400.0).abs() < 1e-9);
		assert!((sy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_pivot_and_clamps() {
		let mut layout = layout();
		let pivot = Point::new(120.0, 80.0);
		let under = layout.screen_to_graph(pivot.x, pivot.y);
		layout.zoom_about(pivot, 3.0);
		assert_eq!(layout.transform.k, 3.0);
		let after = layout.screen_to_graph(pivot.x, pivot.y);
		assert!((after.x - under.x).abs() < 1e-9 && (after.y - under.y).abs() < 1e-9);

		layout.zoom_about(pivot, 1e6);
		assert_eq!(layout.transform.k, MAX_ZOOM);
		layout.zoom(0.0);
		assert_eq!(layout.transform.k, MIN_ZOOM);
	}

	#[test]
	fn hit_test_respects_filter() {
		let layout = layout();
		// Origin in screen space is the viewport center.
		assert_eq!(layout.node_at_position(400.0, 300.0, |_| true), Some("a".into()));
		assert_eq!(layout.node_at_position(400.0, 300.0, |id| id != "a"), None);
	}

	#[test]
	fn lerp_halfway() {
		let mid = Point::new(0.0, 10.0).lerp(Point::new(10.0, 30.0), 0.5);
		assert_eq!(mid, Point::new(5.0, 20.0));
	}
}
