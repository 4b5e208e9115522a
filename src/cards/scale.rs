//! Visual scales for graph nodes.

/// Colour for cards whose tier is not in the palette.
pub const NEUTRAL_COLOR: &str = "#7f7f7f";

/// Smallest node radius, used for isolated cards.
pub const MIN_NODE_SIZE: f64 = 4.0;
/// Largest node radius.
pub const MAX_NODE_SIZE: f64 = 12.0;

const SIZE_PER_CONNECTION: f64 = 1.0;

/// Node radius for a card with `connections` references in and out.
pub fn node_size(connections: usize) -> f64 {
	(MIN_NODE_SIZE + connections as f64 * SIZE_PER_CONNECTION).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// Fixed colour per tier, case-insensitive.
pub fn tier_color(tier: &str) -> &'static str {
	match tier.trim().to_ascii_uppercase().as_str() {
		"S" => "#d62728",
		"A" => "#ff7f0e",
		"B" => "#2ca02c",
		"C" => "#1f77b4",
		"D" => "#9467bd",
		_ => NEUTRAL_COLOR,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn size_grows_then_clamps() {
		assert_eq!(node_size(0), MIN_NODE_SIZE);
		assert!(node_size(3) > node_size(1));
		assert_eq!(node_size(500), MAX_NODE_SIZE);
	}

	#[test]
	fn unknown_tier_is_neutral() {
		assert_eq!(tier_color("s"), tier_color("S"));
		assert_eq!(tier_color(" b "), "#2ca02c");
		assert_eq!(tier_color("legendary"), NEUTRAL_COLOR);
		assert_eq!(tier_color(""), NEUTRAL_COLOR);
	}
}
