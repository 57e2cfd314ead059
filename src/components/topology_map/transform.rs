//! View transform for pan and zoom.

/// Pan/zoom transform applied to the whole scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor. The wheel gesture clamps it to 0.1..10.0.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Map a canvas-relative point into graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Set the transform outright. Reapplying the same arguments is a
	/// no-op, so the host can call this to reset or recenter at will.
	pub fn set(&mut self, x: f64, y: f64, k: f64) {
		self.x = x;
		self.y = y;
		self.k = k;
	}

	/// Zoom one wheel notch, keeping the graph point under the cursor
	/// fixed on screen.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_is_idempotent() {
		let mut t = ViewTransform::default();
		t.set(12.0, -7.5, 2.0);
		let once = t;
		t.set(12.0, -7.5, 2.0);
		assert_eq!(t, once);
	}

	#[test]
	fn screen_to_graph_inverts_the_transform() {
		let mut t = ViewTransform::default();
		t.set(50.0, 20.0, 2.0);
		let (gx, gy) = t.screen_to_graph(150.0, 120.0);
		assert_eq!((gx, gy), (50.0, 50.0));
		// back to screen: g * k + translation
		assert_eq!((gx * t.k + t.x, gy * t.k + t.y), (150.0, 120.0));
	}

	#[test]
	fn wheel_zoom_anchors_the_cursor() {
		let mut t = ViewTransform::default();
		t.set(30.0, 40.0, 1.5);
		let before = t.screen_to_graph(200.0, 140.0);
		t.zoom_at(200.0, 140.0, -1.0);
		let after = t.screen_to_graph(200.0, 140.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!((t.k - 1.65).abs() < 1e-12);
	}

	#[test]
	fn wheel_zoom_clamps_the_factor() {
		let mut t = ViewTransform::default();
		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, 1.0);
		}
		assert!((t.k - 0.1).abs() < 1e-9);
		for _ in 0..200 {
			t.zoom_at(0.0, 0.0, -1.0);
		}
		assert!((t.k - 10.0).abs() < 1e-9);
	}
}
