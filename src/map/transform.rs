use crate::map::artwork::Bounds;
use glam::DVec2;

/// Multiplicative zoom step applied per zoom action.
pub const ZOOM_STEP: f64 = 1.2;

/// Baseline transform constants. These are tied to the projection of the
/// bundled artwork; substituting other artwork means substituting these too.
pub const BASELINE_SCALE: f64 = 1.3352563711313101;
pub const BASELINE_TRANSLATE_X: f64 = 0.7585313481757964;
pub const BASELINE_TRANSLATE_Y: f64 = 0.0;

/// Affine transform applied to the artwork root group: `scale(s) translate(t)`,
/// i.e. a point `p` maps to `s * (p + t)`. Zoom actions scale all three
/// scalars in lockstep, keeping the zoom anchored to the projection origin.
/// No bounds are enforced on the scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
    pub scale: f64,
    pub translate: DVec2,
}

impl ZoomState {
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate: DVec2::new(translate_x, translate_y),
        }
    }

    pub fn baseline() -> Self {
        Self::new(BASELINE_SCALE, BASELINE_TRANSLATE_X, BASELINE_TRANSLATE_Y)
    }

    pub fn zoom_in(&mut self) {
        self.scale *= ZOOM_STEP;
        self.translate *= ZOOM_STEP;
    }

    /// Exact inverse of `zoom_in` up to floating-point rounding.
    pub fn zoom_out(&mut self) {
        self.scale /= ZOOM_STEP;
        self.translate /= ZOOM_STEP;
    }

    /// Transform an artwork-space point.
    pub fn apply(&self, p: DVec2) -> DVec2 {
        (p + self.translate) * self.scale
    }

    /// Invert the transform (screen-side artwork units back to raw artwork
    /// units).
    pub fn unapply(&self, q: DVec2) -> DVec2 {
        q / self.scale - self.translate
    }

    /// The transform attribute string reapplied to the artwork root group
    /// after every zoom step.
    pub fn attr(&self) -> String {
        format!(
            "scale({}) translate({}, {})",
            self.scale, self.translate.x, self.translate.y
        )
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Projection from artwork units to braille pixels: fits the artwork bounds
/// into the canvas, preserving aspect ratio, with the zoom transform applied
/// in artwork space first. Zoomed content may project outside the canvas and
/// is clipped at draw time.
#[derive(Clone)]
pub struct MapView {
    pub zoom: ZoomState,
    /// Canvas pixel width.
    pub width: usize,
    /// Canvas pixel height.
    pub height: usize,
    bounds: Bounds,
}

impl MapView {
    pub fn new(bounds: Bounds, zoom: ZoomState, width: usize, height: usize) -> Self {
        Self {
            zoom,
            width,
            height,
            bounds,
        }
    }

    /// Update canvas size when the terminal resizes.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Pixels per artwork unit at the current canvas size (zoom excluded).
    fn fit_scale(&self) -> f64 {
        let (w, h) = (self.bounds.width(), self.bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return 1.0;
        }
        (self.width as f64 / w).min(self.height as f64 / h)
    }

    /// Project an artwork-space point to canvas pixels.
    pub fn project(&self, p: DVec2) -> (i32, i32) {
        let q = self.zoom.apply(p);
        let k = self.fit_scale();
        let px = (q.x - self.bounds.min.x) * k;
        let py = (q.y - self.bounds.min.y) * k;
        (px.round() as i32, py.round() as i32)
    }

    /// Unproject canvas pixels back to an artwork-space point.
    pub fn unproject(&self, px: i32, py: i32) -> DVec2 {
        let k = self.fit_scale();
        let q = DVec2::new(
            px as f64 / k + self.bounds.min.x,
            py as f64 / k + self.bounds.min.y,
        );
        self.zoom.unapply(q)
    }
}
