use thiserror::Error;

/// Failures while loading a card collection.
#[derive(Debug, Error)]
pub enum CardError {
	/// The payload is not a JSON array of cards.
	#[error("invalid card payload: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two records share an identifier.
	#[error("duplicate card id: {0}")]
	DuplicateId(String),
}
