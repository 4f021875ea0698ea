use crate::core::GravityType;
use crate::error::PhysicsError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the physics simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// The fixed time step for the simulation
    pub time_step: f32,

    /// The maximum number of substeps for variable time step simulation
    pub max_substeps: u32,

    pub gravity: GravityType,

    /// Sweeps the sequential impulse solver makes over all constraint rows per step
    pub velocity_iterations: u32,

    /// Global damping factor for linear velocity
    pub linear_damping: f32,

    /// Global damping factor for angular velocity
    pub angular_damping: f32,

    /// Whether to allow sleeping bodies
    pub allow_sleeping: bool,

    /// The linear velocity threshold below which bodies can sleep
    pub linear_sleep_threshold: f32,

    /// The angular velocity threshold below which bodies can sleep
    pub angular_sleep_threshold: f32,

    /// The time a body must be inactive before sleeping
    pub sleep_time_threshold: f32,
}

impl SimulationConfig {
    /// Checks that the configuration can drive a stable simulation
    pub fn validate(&self) -> Result<()> {
        if self.time_step <= 0.0 || !self.time_step.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }

        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidParameter("max_substeps must be at least 1".into()));
        }

        if self.velocity_iterations == 0 {
            return Err(PhysicsError::InvalidParameter("velocity_iterations must be at least 1".into()));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_substeps: 10,
            gravity: GravityType::default(),
            velocity_iterations: 10,
            linear_damping: 0.0,
            angular_damping: 0.0,
            allow_sleeping: true,
            linear_sleep_threshold: 0.001,
            angular_sleep_threshold: 0.001,
            sleep_time_threshold: 1.0,
        }
    }
}
