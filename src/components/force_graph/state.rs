use log::debug;

use super::interaction::{Interaction, VisibleGraph, filter_graph};
use super::oracle::{ForceLayout, LayoutOracle, Point};
use super::stabilizer::{DragPhase, LayoutStabilizer, SettleTicket};
use super::types::GraphSettings;
use crate::cards::{Card, CardGraph};

/// Screen distance under which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Where the pointer went down on a node.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
}

/// Everything one open graph view owns.
pub struct CardGraphState {
	pub graph: CardGraph,
	pub layout: ForceLayout,
	pub stabilizer: LayoutStabilizer,
	pub interaction: Interaction,
	pub visible: VisibleGraph,
	pub pan: PanState,
	pub press: PressState,
	pub settings: GraphSettings,
	pub animation_running: bool,
	pub flow_time: f64,
}

impl CardGraphState {
	pub fn new(graph: CardGraph, settings: GraphSettings, width: f64, height: f64) -> Self {
		let layout = ForceLayout::from_graph(&graph, &settings, width, height);
		let visible = filter_graph(&graph, "");
		debug!(
			"graph view ready: {} nodes placed, {} edges",
			layout.len(),
			graph.edges.len()
		);
		Self {
			stabilizer: LayoutStabilizer::new(settings.relax_factor),
			graph,
			layout,
			interaction: Interaction::default(),
			visible,
			pan: PanState::default(),
			press: PressState::default(),
			settings,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn width(&self) -> f64 {
		self.layout.width
	}

	pub fn height(&self) -> f64 {
		self.layout.height
	}

	/// Re-run the search filter; hover and selection follow.
	pub fn set_search(&mut self, query: &str) {
		self.visible = filter_graph(&self.graph, query);
		self.interaction.refresh(&self.graph, &self.visible);
	}

	/// Visible node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		self.layout
			.node_at_position(sx, sy, |id| self.visible.contains(id))
	}

	pub fn hover_at(&mut self, sx: f64, sy: f64) {
		let hovered = self.node_at_position(sx, sy);
		self.interaction
			.hover(hovered.as_deref(), &self.graph, &self.visible);
	}

	pub fn clear_hover(&mut self) {
		self.interaction.hover(None, &self.graph, &self.visible);
	}

	/// Pointer down: grab a node, or start panning on empty canvas.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.node_at_position(sx, sy) {
			let neighbors = self.graph.neighbors(&id);
			self.stabilizer
				.drag_start(Some(&mut self.layout), &id, &neighbors);
			self.press = PressState {
				node: Some(id),
				start_x: sx,
				start_y: sy,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.layout.transform.x,
				transform_start_y: self.layout.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.stabilizer.phase() == DragPhase::Dragging {
			let p = self.layout.screen_to_graph(sx, sy);
			self.stabilizer.drag_move(Some(&mut self.layout), p);
		} else if self.pan.active {
			self.layout.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.layout.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			self.hover_at(sx, sy);
		}
	}

	/// Pointer up. Returns the settle ticket of a finished drag and the card
	/// to report when the gesture was a click.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> (Option<SettleTicket>, Option<Card>) {
		let press = self.press.clone();
		let ticket = self.pointer_cancel(sx, sy);

		let clicked = press.node.filter(|_| {
			let (dx, dy) = (sx - press.start_x, sy - press.start_y);
			(dx * dx + dy * dy).sqrt() < CLICK_SLOP
		});
		let card = clicked.and_then(|id| self.select(&id));
		(ticket, card)
	}

	/// End any drag or pan without treating it as a click.
	pub fn pointer_cancel(&mut self, sx: f64, sy: f64) -> Option<SettleTicket> {
		self.pan.active = false;
		self.press = PressState::default();
		let p = self.layout.screen_to_graph(sx, sy);
		self.stabilizer.drag_end(Some(&mut self.layout), p)
	}

	/// Mark `id` selected and bring it into focus.
	pub fn select(&mut self, id: &str) -> Option<Card> {
		let card = self.graph.node(id)?.card.clone();
		self.interaction.select(id);
		self.layout.zoom(self.settings.focus_zoom);
		self.layout.recenter_on(id);
		Some(card)
	}

	/// Hand a settled node back to the simulation.
	pub fn release(&mut self, ticket: &SettleTicket) {
		self.stabilizer.release(Some(&mut self.layout), ticket);
	}

	/// Wheel zoom about the pointer.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let k = self.layout.transform.k * factor;
		self.layout.zoom_about(Point::new(sx, sy), k);
	}

	pub fn tick(&mut self, dt: f32) {
		self.layout.tick(dt);
		self.flow_time += dt as f64;
		self.interaction.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.layout.resize(width, height);
	}

	/// Graph-space position of a node, for the renderer.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.layout.position(id)
	}
}
