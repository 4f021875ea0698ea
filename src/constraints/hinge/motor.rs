use crate::constraints::ImpulseBounds;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Angular motor acting about the hinge axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct HingeMotor {
    /// Whether or not the motor is active.
    pub enabled: bool,
    /// The relative angular velocity (rad/s) the motor drives the hinge towards.
    pub target_velocity: f32,
    /// Largest impulse magnitude the motor may apply in one step. Never negative.
    pub max_impulse: f32,
}

impl HingeMotor {
    /// Creates a motor; a negative `max_impulse` is clamped to zero.
    pub fn new(enabled: bool, target_velocity: f32, max_impulse: f32) -> Self {
        let max_impulse = if max_impulse < 0.0 || max_impulse.is_nan() {
            log::warn!("negative hinge motor impulse {} clamped to 0", max_impulse);
            0.0
        } else {
            max_impulse
        };

        HingeMotor {
            enabled,
            target_velocity,
            max_impulse,
        }
    }

    /// The limits of the impulse applicable by the motor in one step.
    pub fn impulse_bounds(&self) -> ImpulseBounds {
        ImpulseBounds::symmetric(self.max_impulse)
    }

    /// True if the motor would produce a row this step.
    pub fn is_active(&self) -> bool {
        self.enabled && self.max_impulse > 0.0
    }
}

impl Default for HingeMotor {
    fn default() -> Self {
        HingeMotor {
            enabled: false,
            target_velocity: 0.0,
            max_impulse: 0.0,
        }
    }
}
