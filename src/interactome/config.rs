//! Viewer tuning knobs.
//!
//! Every section has working defaults; [`ViewerConfig::from_json`] overlays
//! whatever subset of fields the caller provides.

use serde::Deserialize;

use super::color::DEFAULT_TARGET_BRIGHTNESS;
use super::error::LoadError;

/// All viewer settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
	/// Markov clustering parameters.
	pub clustering: MclParams,
	/// Cluster color generation.
	pub coloring: ColoringParams,
	/// Focus emphasis styling.
	pub focus: FocusStyle,
	/// Force layout simulation.
	pub layout: LayoutParams,
}

impl ViewerConfig {
	/// Parse a (possibly partial) JSON config.
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		serde_json::from_str(text).map_err(LoadError::Config)
	}
}

/// Markov clustering parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MclParams {
	/// Matrix power applied in each expansion step.
	pub expansion: u32,
	/// Entry-wise exponent applied in each inflation step.
	pub inflation: f64,
	/// Weight of the self-loop added to every node.
	pub self_loop_weight: f64,
	/// Hard cap on expansion/inflation rounds.
	pub max_iterations: usize,
	/// Entries below this are zeroed after inflation.
	pub prune_threshold: f64,
	/// Components larger than this are kept whole instead of clustered.
	pub max_component_size: usize,
}

impl Default for MclParams {
	fn default() -> Self {
		Self {
			expansion: 2,
			inflation: 2.0,
			self_loop_weight: 1.0,
			max_iterations: 20,
			prune_threshold: 1e-4,
			max_component_size: 5000,
		}
	}
}

/// Cluster color generation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColoringParams {
	/// Value the brightest channel of every cluster color is scaled to.
	pub target_brightness: u8,
}

impl Default for ColoringParams {
	fn default() -> Self {
		Self {
			target_brightness: DEFAULT_TARGET_BRIGHTNESS,
		}
	}
}

/// Opacity of focused and dimmed elements and the fade between them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FocusStyle {
	/// Opacity of elements in the current view.
	pub focused_opacity: f64,
	/// Opacity of everything else.
	pub dimmed_opacity: f64,
	/// Fade and viewport-fit duration in seconds.
	pub transition_secs: f64,
}

impl Default for FocusStyle {
	fn default() -> Self {
		Self {
			focused_opacity: 0.9,
			dimmed_opacity: 0.07,
			transition_secs: 0.35,
		}
	}
}

/// Parameters handed to the force simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
	/// Node repulsion.
	pub force_charge: f32,
	/// Edge spring stiffness.
	pub force_spring: f32,
	/// Force clamp.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Per-tick velocity damping.
	pub damping_factor: f32,
}

impl Default for LayoutParams {
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

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config = ViewerConfig::from_json(
			r#"{"clustering": {"inflation": 1.8}, "focus": {"dimmed_opacity": 0.2}}"#,
		)
		.unwrap();
		assert_eq!(config.clustering.inflation, 1.8);
		assert_eq!(config.clustering.max_iterations, 20);
		assert_eq!(config.clustering.max_component_size, 5000);
		assert_eq!(config.focus.dimmed_opacity, 0.2);
		assert_eq!(config.focus.focused_opacity, 0.9);
		assert_eq!(config.coloring.target_brightness, 181);
		assert_eq!(config.layout, LayoutParams::default());
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
	}

	#[test]
	fn wrong_types_are_rejected() {
		assert!(matches!(
			ViewerConfig::from_json(r#"{"coloring": {"target_brightness": 999}}"#),
			Err(LoadError::Config(_))
		));
	}
}
