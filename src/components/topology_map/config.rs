//! Engine configuration.

/// Visual and layout options recognized by the engine.
///
/// `width`/`height` left unset are resolved to the container's measured
/// size by the canvas component.
#[derive(Clone, Debug)]
pub struct MapConfig {
	/// Node circle radius in graph units.
	pub radius: f64,
	/// Explicit canvas width.
	pub width: Option<f64>,
	/// Explicit canvas height.
	pub height: Option<f64>,
	/// Node label color.
	pub text_color: String,
	/// Link path and arrowhead color.
	pub line_color: String,
	/// Link midpoint label color.
	pub line_text_color: String,
	/// Outline color of the selection highlight shapes.
	pub stroke_active_color: String,
	/// Hide the relationship-type text on links.
	pub line_text_hide: bool,
	/// Horizontal node spacing for layered placement.
	pub level_spacing_x: f64,
	/// Vertical node spacing for layered placement.
	pub level_spacing_y: f64,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			radius: 30.0,
			width: None,
			height: None,
			text_color: "#555".to_string(),
			line_color: "#555".to_string(),
			line_text_color: "#555".to_string(),
			stroke_active_color: "rgb(51, 161, 255)".to_string(),
			line_text_hide: false,
			level_spacing_x: 200.0,
			level_spacing_y: 200.0,
		}
	}
}
