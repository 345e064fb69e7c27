//! # Layout Scaler
//!
//! The card is authored in a fixed 1200-unit-wide design space. At runtime
//! the embedding host reports a viewport width and every positional or size
//! attribute is multiplied by `viewport_width / 1200` before it becomes a
//! pixel value.
//!
//! Scaling is exact floating point: no rounding, no clamping. Fractional
//! pixel values are expected; only the raster pipeline rounds, via
//! [`ScaleContext::scale_px`]. A zero or negative viewport width yields a
//! zero or negative scale, accepted without validation.

/// Width of the reference design space, in design units.
pub const DESIGN_WIDTH: f64 = 1200.0;

/// Height of the reference design space, in design units.
pub const DESIGN_HEIGHT: f64 = 799.0;

/// Derived scaling state for one viewport width.
///
/// Cheap to copy; recompute with [`ScaleContext::for_viewport`] whenever the
/// host delivers a resize notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    viewport_width: f64,
    scale_factor: f64,
}

impl ScaleContext {
    /// Build a context for the given viewport width.
    pub fn for_viewport(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            scale_factor: viewport_width / DESIGN_WIDTH,
        }
    }

    /// The viewport width this context was built for.
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// The ratio of viewport width to [`DESIGN_WIDTH`].
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Map a design-unit value to pixels: `scale_factor * value`.
    pub fn scale(&self, value: f64) -> f64 {
        self.scale_factor * value
    }

    /// Map a design-unit value to a whole pixel coordinate.
    ///
    /// Only the raster pipeline uses this; the scaling contract itself stays
    /// un-rounded.
    pub fn scale_px(&self, value: f64) -> i64 {
        self.scale(value).round() as i64
    }

    /// Pixel dimensions of the full card canvas at this scale.
    ///
    /// Clamped to at least 1x1 so a degenerate viewport still yields an
    /// encodable image.
    pub fn canvas_size(&self) -> (u32, u32) {
        let w = self.scale_px(DESIGN_WIDTH).max(1) as u32;
        let h = self.scale_px(DESIGN_HEIGHT).max(1) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_ratio() {
        let ctx = ScaleContext::for_viewport(600.0);
        assert_eq!(ctx.scale_factor(), 0.5);
        assert_eq!(ctx.scale(1200.0), 600.0);
        assert_eq!(ctx.scale(100.0), 50.0);
    }

    #[test]
    fn test_scale_zero_fixpoint() {
        let ctx = ScaleContext::for_viewport(937.0);
        assert_eq!(ctx.scale(0.0), 0.0);
    }

    #[test]
    fn test_scale_is_linear() {
        let ctx = ScaleContext::for_viewport(431.0);
        let a = 123.25;
        let b = 77.5;
        assert!((ctx.scale(a + b) - (ctx.scale(a) + ctx.scale(b))).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_pixels_pass_through() {
        let ctx = ScaleContext::for_viewport(500.0);
        // 500/1200 * 100 = 41.666...
        assert!((ctx.scale(100.0) - 41.666_666_666_666_664).abs() < 1e-12);
    }

    #[test]
    fn test_negative_viewport_accepted() {
        let ctx = ScaleContext::for_viewport(-600.0);
        assert_eq!(ctx.scale(100.0), -50.0);
        // Raster pipeline still clamps to a drawable canvas
        assert_eq!(ctx.canvas_size(), (1, 1));
    }

    #[test]
    fn test_canvas_size() {
        let ctx = ScaleContext::for_viewport(600.0);
        assert_eq!(ctx.canvas_size(), (600, 400)); // 799/2 = 399.5 rounds up
    }
}
