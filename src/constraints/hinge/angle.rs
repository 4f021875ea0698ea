use std::f32::consts::TAU;

/// Keeps the hinge angle continuous across the ±π seam.
///
/// Each measurement is a wrapped angle in `(-π, π]` taken from the bodies'
/// transforms. The tracked value is that measurement plus the whole number of
/// turns that keeps it closest to the previous tracked value, so it never
/// accumulates integration drift and never jumps by 2π between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleTracker {
    angle: f32,
}

impl AngleTracker {
    pub fn new(measured: f32) -> Self {
        Self { angle: measured }
    }

    /// The last tracked (unwrapped) angle
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Unwraps `measured` against the tracked angle without committing it
    #[inline]
    pub fn unwrap(&self, measured: f32) -> f32 {
        let turns = ((self.angle - measured) / TAU).round();
        measured + turns * TAU
    }

    /// Commits a new measurement and returns the continuous angle
    pub fn update(&mut self, measured: f32) -> f32 {
        self.angle = self.unwrap(measured);
        self.angle
    }
}
