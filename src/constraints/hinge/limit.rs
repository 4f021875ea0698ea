#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Default fraction of the bias correction applied per step
pub const DEFAULT_LIMIT_SOFTNESS: f32 = 0.9;

/// Default positional correction factor of the limit row
pub const DEFAULT_LIMIT_BIAS_FACTOR: f32 = 0.3;

/// Default scale of the limit row's impulses
pub const DEFAULT_LIMIT_RELAXATION_FACTOR: f32 = 1.0;

/// Smallest accepted softness and relaxation factor. At zero the limit row
/// would produce no correction or no impulse at all.
pub const MIN_LIMIT_FACTOR: f32 = 1e-3;

/// Where the hinge angle sits relative to its limits.
///
/// A pure function of the current angle and the bounds; see [`HingeLimit::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum LimitState {
    /// Within the limits, or the hinge is unlimited
    #[default]
    Free,

    /// At or below the lower limit
    AtLower,

    /// At or above the upper limit
    AtUpper,
}

/// Angle limits of a hinge, in radians, with soft-limit tuning.
///
/// `lower > upper` means the hinge is unlimited. `lower == upper` locks the
/// hinge at that angle. Angles are the continuous (unwrapped) hinge angle, so
/// limits wider than a full turn are meaningful.
///
/// Tuning factors:
/// - `softness` is the fraction of the positional correction applied per step,
///   clamped into `[MIN_LIMIT_FACTOR, 1]`.
/// - `bias_factor` scales the correction velocity `penetration / dt`, clamped
///   into `[0, 1]`.
/// - `relaxation_factor` scales every impulse the limit row produces, clamped
///   into `[MIN_LIMIT_FACTOR, 1]`.
///
/// A NaN bound makes the limit free.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct HingeLimit {
    pub lower: f32,
    pub upper: f32,
    pub softness: f32,
    pub bias_factor: f32,
    pub relaxation_factor: f32,
}

impl HingeLimit {
    /// Limits `[lower, upper]` with default tuning
    pub fn new(lower: f32, upper: f32) -> Self {
        Self {
            lower,
            upper,
            softness: DEFAULT_LIMIT_SOFTNESS,
            bias_factor: DEFAULT_LIMIT_BIAS_FACTOR,
            relaxation_factor: DEFAULT_LIMIT_RELAXATION_FACTOR,
        }
    }

    /// An unlimited hinge
    pub fn free() -> Self {
        Self::new(1.0, -1.0)
    }

    /// A hinge locked at `angle`
    pub fn locked(angle: f32) -> Self {
        Self::new(angle, angle)
    }

    pub fn with_softness(mut self, softness: f32) -> Self {
        self.softness = clamp_factor("softness", softness, MIN_LIMIT_FACTOR);
        self
    }

    pub fn with_bias_factor(mut self, bias_factor: f32) -> Self {
        self.bias_factor = clamp_factor("bias_factor", bias_factor, 0.0);
        self
    }

    pub fn with_relaxation_factor(mut self, relaxation_factor: f32) -> Self {
        self.relaxation_factor = clamp_factor("relaxation_factor", relaxation_factor, MIN_LIMIT_FACTOR);
        self
    }

    /// Applies the bound and factor policies to fields set directly
    pub(crate) fn sanitized(self) -> Self {
        let (lower, upper) = if self.lower.is_nan() || self.upper.is_nan() {
            log::warn!("hinge limit [{}, {}] has a NaN bound, leaving the hinge free", self.lower, self.upper);
            (1.0, -1.0)
        } else {
            (self.lower, self.upper)
        };

        Self {
            lower,
            upper,
            softness: clamp_factor("softness", self.softness, MIN_LIMIT_FACTOR),
            bias_factor: clamp_factor("bias_factor", self.bias_factor, 0.0),
            relaxation_factor: clamp_factor("relaxation_factor", self.relaxation_factor, MIN_LIMIT_FACTOR),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.lower > self.upper
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lower == self.upper
    }

    /// Returns the limit state for `angle` and the non-negative distance past
    /// the violated bound.
    ///
    /// A locked hinge is always at a bound: `AtUpper` above the lock angle,
    /// `AtLower` otherwise.
    pub fn evaluate(&self, angle: f32) -> (LimitState, f32) {
        if self.is_free() {
            return (LimitState::Free, 0.0);
        }

        if self.is_locked() {
            return if angle > self.upper {
                (LimitState::AtUpper, angle - self.upper)
            } else {
                (LimitState::AtLower, self.lower - angle)
            };
        }

        if angle <= self.lower {
            (LimitState::AtLower, self.lower - angle)
        } else if angle >= self.upper {
            (LimitState::AtUpper, angle - self.upper)
        } else {
            (LimitState::Free, 0.0)
        }
    }

    /// Clamps `angle` into the limits (identity for a free hinge or a NaN bound)
    pub fn clamp_angle(&self, angle: f32) -> f32 {
        if self.is_free() || self.lower.is_nan() || self.upper.is_nan() {
            angle
        } else {
            angle.clamp(self.lower, self.upper)
        }
    }

    /// Correction velocity for `penetration`, given the inverse step length
    #[inline]
    pub(crate) fn bias_velocity(&self, penetration: f32, inv_dt: f32) -> f32 {
        self.softness * self.bias_factor * penetration * inv_dt
    }
}

impl Default for HingeLimit {
    fn default() -> Self {
        Self::free()
    }
}

fn clamp_factor(name: &str, value: f32, min: f32) -> f32 {
    if value.is_nan() {
        log::warn!("hinge limit {} is NaN, using {}", name, min);
        return min;
    }

    let clamped = value.clamp(min, 1.0);
    if clamped != value {
        log::warn!("hinge limit {} {} clamped to {}", name, value, clamped);
    }
    clamped
}
