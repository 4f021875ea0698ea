//! Hinge (revolute) joints for rigid-body dynamics.
//!
//! A [`HingeConstraint`](constraints::HingeConstraint) couples two rigid bodies so
//! that they may only rotate relative to each other about one axis. It carries an
//! angular motor and soft angle limits, and exposes its per-step Jacobian rows to
//! the sequential impulse solver driven by [`PhysicsWorld`].
//!
//! Units and conventions: radians, radians per second, right-hand rule. The hinge
//! axis is the local Z axis of each joint frame and the angle reference is the
//! local X axis.

pub mod math;
pub mod core;
pub mod bodies;
pub mod constraints;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsWorld, SimulationConfig};
pub use crate::bodies::{RigidBody, RigidBodyType, RigidBodyHandle};
pub use crate::constraints::{HingeConstraint, HingeLimit, HingeMotor, LimitState};
pub use crate::math::{Vector3, Transform, Quaternion};

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        /// Malformed construction or configuration input
        #[error("Invalid argument: {0}")]
        InvalidArgument(String),

        /// A hinge axis could not be derived from the supplied frames or vectors
        #[error("Degenerate hinge axis: {0}")]
        DegenerateAxis(String),

        /// A body handle does not refer to a live body
        #[error("Invalid body reference: {0}")]
        InvalidBodyReference(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
