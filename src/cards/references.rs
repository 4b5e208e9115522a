//! Inline `` `card-id` `` references between cards.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::types::Card;

static MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"`([^`]+?)`").expect("reference marker pattern"));

/// Ids referenced by `steps`, in order of appearance, restricted to `known`.
///
/// Markers naming unknown ids are dropped. A card citing the same id twice
/// yields it twice.
pub fn extract_references<S, I>(steps: &[S], known: &HashSet<I>) -> Vec<String>
where
	S: AsRef<str>,
	I: std::borrow::Borrow<str> + std::hash::Hash + Eq,
{
	steps
		.iter()
		.flat_map(|step| MARKER.captures_iter(step.as_ref()))
		.filter_map(|caps| caps.get(1))
		.map(|m| m.as_str())
		.filter(|id| known.contains(*id))
		.map(str::to_owned)
		.collect()
}

/// Outgoing and incoming references for every card in a collection.
#[derive(Clone, Debug, Default)]
pub struct ReferenceIndex {
	outgoing: HashMap<String, Vec<String>>,
	incoming: HashMap<String, Vec<String>>,
}

impl ReferenceIndex {
	/// Scan every card once.
	pub fn new(cards: &[Card]) -> Self {
		let known: HashSet<&str> = cards.iter().map(|c| c.id.as_str()).collect();
		let mut outgoing = HashMap::with_capacity(cards.len());
		let mut incoming: HashMap<String, Vec<String>> = HashMap::new();

		for card in cards {
			let refs = extract_references(&card.steps, &known);
			for target in &refs {
				let sources = incoming.entry(target.clone()).or_default();
				if !sources.contains(&card.id) {
					sources.push(card.id.clone());
				}
			}
			outgoing.insert(card.id.clone(), refs);
		}

		Self { outgoing, incoming }
	}

	/// Ids `id` refers to (duplicates kept).
	pub fn references(&self, id: &str) -> &[String] {
		self.outgoing.get(id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Distinct ids of cards that refer to `id`, in collection order.
	pub fn referenced_by(&self, id: &str) -> &[String] {
		self.incoming.get(id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Outgoing plus incoming reference count.
	pub fn connection_count(&self, id: &str) -> usize {
		let incoming: usize = self
			.referenced_by(id)
			.iter()
			.map(|src| self.references(src).iter().filter(|t| *t == id).count())
			.sum();
		self.references(id).len() + incoming
	}
}
