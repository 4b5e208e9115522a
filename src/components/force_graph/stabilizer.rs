//! Drag handling that lets part of a manual stretch survive the simulation.
//!
//! `Idle -> Dragging -> Settling -> Idle`. On release the node is pinned at
//! `start + relax_factor * (end - start)` and handed back to the physics once
//! the caller redeems the [`SettleTicket`] after the settle delay.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::oracle::{LayoutOracle, Point};

/// Ticket generations are unique across stabilizers, so a timer scheduled
/// before a rebuild cannot match a ticket issued after it.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
	Idle,
	Dragging,
	Settling,
}

/// Proof of a finished drag, redeemed by [`LayoutStabilizer::release`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettleTicket {
	pub node: String,
	generation: u64,
}

#[derive(Clone, Debug)]
pub struct LayoutStabilizer {
	relax_factor: f64,
	dragging: Option<String>,
	/// Positions captured at drag start: the dragged node and its neighbours.
	session: HashMap<String, Point>,
	/// Latest unreleased ticket generation per settling node.
	pending: HashMap<String, u64>,
}

impl LayoutStabilizer {
	pub fn new(relax_factor: f64) -> Self {
		Self {
			relax_factor,
			dragging: None,
			session: HashMap::new(),
			pending: HashMap::new(),
		}
	}

	pub fn phase(&self) -> DragPhase {
		if self.dragging.is_some() {
			DragPhase::Dragging
		} else if !self.pending.is_empty() {
			DragPhase::Settling
		} else {
			DragPhase::Idle
		}
	}

	pub fn dragged(&self) -> Option<&str> {
		self.dragging.as_deref()
	}

	pub fn captured(&self, id: &str) -> Option<Point> {
		self.session.get(id).copied()
	}

	/// Start dragging `node`. Returns false when nothing could be captured.
	///
	/// A settle still pending for `node` is superseded: its ticket will no
	/// longer unpin the node.
	pub fn drag_start<O: LayoutOracle + ?Sized>(
		&mut self,
		oracle: Option<&mut O>,
		node: &str,
		neighbors: &[&str],
	) -> bool {
		let Some(oracle) = oracle else {
			return false;
		};
		let Some(start) = oracle.position(node) else {
			return false;
		};

		self.session.clear();
		self.session.insert(node.to_owned(), start);
		for &neighbor in neighbors {
			if let Some(p) = oracle.position(neighbor) {
				self.session.insert(neighbor.to_owned(), p);
			}
		}
		self.pending.remove(node);
		self.dragging = Some(node.to_owned());
		oracle.pin(node, start);
		true
	}

	/// Keep the dragged node under the pointer.
	pub fn drag_move<O: LayoutOracle + ?Sized>(&mut self, oracle: Option<&mut O>, pointer: Point) {
		if let (Some(oracle), Some(node)) = (oracle, self.dragging.as_deref()) {
			oracle.pin(node, pointer);
		}
	}

	/// Finish the drag with the pointer at `pointer`.
	///
	/// The session map is cleared whatever happens.
	pub fn drag_end<O: LayoutOracle + ?Sized>(
		&mut self,
		oracle: Option<&mut O>,
		pointer: Point,
	) -> Option<SettleTicket> {
		let node = self.dragging.take();
		let start = node.as_ref().and_then(|n| self.session.get(n).copied());
		self.session.clear();

		let (oracle, node, start) = (oracle?, node?, start?);
		oracle.pin(&node, start.lerp(pointer, self.relax_factor));

		let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
		self.pending.insert(node.clone(), generation);
		Some(SettleTicket { node, generation })
	}

	/// Unpin the ticket's node unless a newer drag took it over.
	pub fn release<O: LayoutOracle + ?Sized>(
		&mut self,
		oracle: Option<&mut O>,
		ticket: &SettleTicket,
	) -> bool {
		if self.pending.get(&ticket.node) != Some(&ticket.generation) {
			return false;
		}
		self.pending.remove(&ticket.node);
		if let Some(oracle) = oracle {
			oracle.unpin(&ticket.node);
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use proptest::prelude::*;

	use super::*;
	use crate::components::force_graph::oracle::NodeInfo;

	/// Positions only; no physics.
	#[derive(Default)]
	struct StillOracle {
		positions: HashMap<String, Point>,
		pinned: HashSet<String>,
	}

	impl StillOracle {
		fn with(nodes: &[(&str, f64, f64)]) -> Self {
			let mut oracle = Self::default();
			for &(id, x, y) in nodes {
				oracle.positions.insert(id.into(), Point::new(x, y));
			}
			oracle
		}
	}

	impl LayoutOracle for StillOracle {
		fn add_node(&mut self, info: NodeInfo, at: Point) {
			self.positions.insert(info.id, at);
		}
		fn add_edge(&mut self, _: &str, _: &str) {}
		fn position(&self, id: &str) -> Option<Point> {
			self.positions.get(id).copied()
		}
		fn pin(&mut self, id: &str, at: Point) {
			self.positions.insert(id.into(), at);
			self.pinned.insert(id.into());
		}
		fn unpin(&mut self, id: &str) {
			self.pinned.remove(id);
		}
		fn recenter_on(&mut self, _: &str) {}
		fn zoom(&mut self, _: f64) {}
	}

	#[test]
	fn full_cycle() {
		let mut oracle = StillOracle::with(&[("a", 0.0, 0.0), ("b", 10.0, 0.0), ("c", 0.0, 10.0)]);
		let mut stab = LayoutStabilizer::new(0.5);
		assert_eq!(stab.phase(), DragPhase::Idle);

		assert!(stab.drag_start(Some(&mut oracle), "a", &["b", "c"]));
		assert_eq!(stab.phase(), DragPhase::Dragging);
		assert_eq!(stab.captured("b"), Some(Point::new(10.0, 0.0)));
		assert!(oracle.pinned.contains("a"));

		stab.drag_move(Some(&mut oracle), Point::new(50.0, 50.0));
		assert_eq!(oracle.position("a"), Some(Point::new(50.0, 50.0)));

		let ticket = stab
			.drag_end(Some(&mut oracle), Point::new(100.0, -40.0))
			.unwrap();
		assert_eq!(stab.phase(), DragPhase::Settling);
		assert_eq!(oracle.position("a"), Some(Point::new(50.0, -20.0)));
		assert!(oracle.pinned.contains("a"));
		assert!(stab.captured("a").is_none());

		assert!(stab.release(Some(&mut oracle), &ticket));
		assert_eq!(stab.phase(), DragPhase::Idle);
		assert!(!oracle.pinned.contains("a"));
	}

	#[test]
	fn missing_oracle_is_a_no_op() {
		let mut stab = LayoutStabilizer::new(0.5);
		assert!(!stab.drag_start(None::<&mut StillOracle>, "a", &[]));
		stab.drag_move(None::<&mut StillOracle>, Point::new(1.0, 1.0));
		assert!(stab.drag_end(None::<&mut StillOracle>, Point::new(1.0, 1.0)).is_none());
		assert_eq!(stab.phase(), DragPhase::Idle);
	}

	#[test]
	fn unknown_node_does_not_start() {
		let mut oracle = StillOracle::with(&[("a", 0.0, 0.0)]);
		let mut stab = LayoutStabilizer::new(0.5);
		assert!(!stab.drag_start(Some(&mut oracle), "ghost", &[]));
		assert!(stab.drag_end(Some(&mut oracle), Point::default()).is_none());
	}

	#[test]
	fn stale_ticket_does_not_unpin_a_new_drag() {
		let mut oracle = StillOracle::with(&[("a", 0.0, 0.0)]);
		let mut stab = LayoutStabilizer::new(0.5);

		stab.drag_start(Some(&mut oracle), "a", &[]);
		let first = stab.drag_end(Some(&mut oracle), Point::new(10.0, 0.0)).unwrap();

		stab.drag_start(Some(&mut oracle), "a", &[]);
		assert!(!stab.release(Some(&mut oracle), &first));
		assert!(oracle.pinned.contains("a"));

		let second = stab.drag_end(Some(&mut oracle), Point::new(20.0, 0.0)).unwrap();
		assert!(!stab.release(Some(&mut oracle), &first));
		assert!(stab.release(Some(&mut oracle), &second));
		assert!(!oracle.pinned.contains("a"));
	}

	#[test]
	fn ticket_from_a_replaced_stabilizer_is_ignored() {
		let mut old_oracle = StillOracle::with(&[("a", 0.0, 0.0)]);
		let mut old = LayoutStabilizer::new(0.5);
		old.drag_start(Some(&mut old_oracle), "a", &[]);
		let stale = old.drag_end(Some(&mut old_oracle), Point::new(10.0, 0.0)).unwrap();

		let mut oracle = StillOracle::with(&[("a", 0.0, 0.0)]);
		let mut fresh = LayoutStabilizer::new(0.5);
		fresh.drag_start(Some(&mut oracle), "a", &[]);
		let current = fresh.drag_end(Some(&mut oracle), Point::new(10.0, 0.0)).unwrap();
		assert_ne!(stale, current);

		assert!(!fresh.release(Some(&mut oracle), &stale));
		assert_eq!(fresh.phase(), DragPhase::Settling);
		assert!(oracle.pinned.contains("a"));
		assert!(fresh.release(Some(&mut oracle), &current));
	}

	#[test]
	fn other_nodes_settle_independently() {
		let mut oracle = StillOracle::with(&[("a", 0.0, 0.0), ("b", 5.0, 5.0)]);
		let mut stab = LayoutStabilizer::new(0.5);

		stab.drag_start(Some(&mut oracle), "a", &[]);
		let ticket_a = stab.drag_end(Some(&mut oracle), Point::new(10.0, 0.0)).unwrap();
		stab.drag_start(Some(&mut oracle), "b", &[]);

		assert!(stab.release(Some(&mut oracle), &ticket_a));
		assert!(!oracle.pinned.contains("a"));
		assert!(oracle.pinned.contains("b"));
		assert_eq!(stab.phase(), DragPhase::Dragging);
	}

	proptest! {
		#[test]
		fn settles_halfway(
			sx in -1e4..1e4f64, sy in -1e4..1e4f64,
			ex in -1e4..1e4f64, ey in -1e4..1e4f64,
			mx in -1e4..1e4f64, my in -1e4..1e4f64,
		) {
			let mut oracle = StillOracle::with(&[("n", sx, sy)]);
			let mut stab = LayoutStabilizer::new(0.5);
			stab.drag_start(Some(&mut oracle), "n", &[]);
			stab.drag_move(Some(&mut oracle), Point::new(mx, my));
			stab.drag_end(Some(&mut oracle), Point::new(ex, ey));

			let settled = oracle.position("n").unwrap();
			prop_assert!((settled.x - (sx + ex) / 2.0).abs() < 1e-6);
			prop_assert!((settled.y - (sy + ey) / 2.0).abs() < 1e-6);
		}
	}
}
