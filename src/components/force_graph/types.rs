use force_graph::SimulationParameters;
use log::warn;
use serde::Deserialize;

const SETTINGS_JSON: &str = include_str!("../../../assets/graph.json");

/// Knobs for the card graph view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
	/// Share of a drag kept after release (0 snaps back, 1 keeps it all).
	pub relax_factor: f64,
	/// How long a released node stays pinned before the simulation takes over.
	pub settle_delay_ms: u64,
	/// Zoom applied when a node is clicked.
	pub focus_zoom: f64,
	/// Radius between BFS rings in the initial layout.
	pub level_spacing: f64,
	pub physics: PhysicsSettings,
}

/// Mirror of `force_graph::SimulationParameters` that can be deserialised.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for GraphSettings {
	fn default() -> Self {
		Self {
			relax_factor: 0.5,
			settle_delay_ms: 1500,
			focus_zoom: 2.0,
			level_spacing: 80.0,
			physics: PhysicsSettings::default(),
		}
	}
}

impl Default for PhysicsSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

impl GraphSettings {
	/// Settings bundled with the app; defaults when the file is unreadable.
	pub fn bundled() -> Self {
		Self::from_json(SETTINGS_JSON).unwrap_or_else(|e| {
			warn!("ignoring bundled graph settings: {e}");
			Self::default()
		})
	}

	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.physics.force_charge,
			force_spring: self.physics.force_spring,
			force_max: self.physics.force_max,
			node_speed: self.physics.node_speed,
			damping_factor: self.physics.damping_factor,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let settings = GraphSettings::from_json(r#"{"settle_delay_ms": 900, "physics": {"force_spring": 0.1}}"#).unwrap();
		assert_eq!(settings.settle_delay_ms, 900);
		assert_eq!(settings.relax_factor, 0.5);
		assert_eq!(settings.physics.force_spring, 0.1);
		assert_eq!(settings.physics.force_charge, 150.0);
	}

	#[test]
	fn bundled_settings_parse() {
		assert!(GraphSettings::from_json(SETTINGS_JSON).is_ok());
		assert_eq!(GraphSettings::bundled().relax_factor, 0.5);
	}
}
