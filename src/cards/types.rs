use std::collections::HashSet;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::CardError;

/// Number of steps every card is expected to carry.
pub const STEP_COUNT: usize = 3;

const SAMPLE_DECK: &str = include_str!("../../assets/cards.json");

/// One negotiation tactic as stored by the document store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
	/// Unique within a collection.
	pub id: String,
	/// Display name.
	pub name: String,
	/// One-paragraph description.
	pub summary: String,
	/// Step texts; may contain `` `card-id` `` references to other cards.
	pub steps: Vec<String>,
	/// Tier label; drives node colour.
	pub tier: String,
	/// Kind of leverage the tactic applies.
	pub leverage_type: String,
	/// What the tactic is meant to achieve.
	pub intent: String,
	/// Phrasings for stating the tactic openly.
	pub direct_phrasings: Vec<String>,
	/// Phrasings that lead the counterpart to the idea on their own.
	pub inception_phrasings: Vec<String>,
}

impl Card {
	/// Convenience constructor used by tests and the sample tooling.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			..Default::default()
		}
	}

	/// Replace the step list.
	pub fn with_steps<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
		self.steps = steps.into_iter().map(Into::into).collect();
		self
	}

	/// Set the tier.
	pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
		self.tier = tier.into();
		self
	}

	/// Set the leverage type.
	pub fn with_leverage_type(mut self, leverage_type: impl Into<String>) -> Self {
		self.leverage_type = leverage_type.into();
		self
	}
}

/// Parse a JSON array of cards, rejecting duplicate identifiers.
pub fn load_cards(json: &str) -> Result<Vec<Card>, CardError> {
	let cards: Vec<Card> = serde_json::from_str(json)?;
	let mut seen = HashSet::with_capacity(cards.len());
	for card in &cards {
		if !seen.insert(card.id.as_str()) {
			return Err(CardError::DuplicateId(card.id.clone()));
		}
		if card.steps.len() != STEP_COUNT {
			warn!(
				"card {} has {} steps, expected {}",
				card.id,
				card.steps.len(),
				STEP_COUNT
			);
		}
	}
	info!("loaded {} cards", cards.len());
	Ok(cards)
}

/// The bundled deck shown when no store is attached.
pub fn sample_deck() -> Result<Vec<Card>, CardError> {
	load_cards(SAMPLE_DECK)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_camel_case_records() {
		let json = r#"[{
			"id": "anchor",
			"name": "Anchor High",
			"steps": ["a", "b", "c"],
			"tier": "S",
			"leverageType": "information",
			"directPhrasings": ["Our number is 120."],
			"inceptionPhrasings": []
		}]"#;
		let cards = load_cards(json).unwrap();
		assert_eq!(cards.len(), 1);
		assert_eq!(cards[0].leverage_type, "information");
		assert_eq!(cards[0].direct_phrasings, vec!["Our number is 120."]);
		assert!(cards[0].intent.is_empty());
	}

	#[test]
	fn rejects_duplicate_ids() {
		let json = r#"[{"id": "a"}, {"id": "b"}, {"id": "a"}]"#;
		match load_cards(json) {
			Err(CardError::DuplicateId(id)) => assert_eq!(id, "a"),
			other => panic!("expected duplicate id error, got {other:?}"),
		}
	}

	#[test]
	fn rejects_non_array_payload() {
		assert!(matches!(
			load_cards(r#"{"id": "a"}"#),
			Err(CardError::Parse(_))
		));
	}

	#[test]
	fn sample_deck_loads() {
		let deck = sample_deck().unwrap();
		assert!(!deck.is_empty());
		assert!(deck.iter().all(|c| c.steps.len() == STEP_COUNT));
	}
}
