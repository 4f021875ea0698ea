pub mod world;
pub mod config;
pub mod storage;
pub mod solver;

pub use self::world::PhysicsWorld;
pub use self::config::SimulationConfig;
pub use self::storage::{BodyStorage, ConstraintStorage, Storage};
pub use self::solver::{ConstraintSolver, SequentialImpulseSolver};

use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A stable identifier for a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// A stable identifier for a constraint in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub(crate) u32);

/// The gravity to apply to the physics world
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum GravityType {
    /// No gravity
    None,

    /// Constant gravity in a direction (typically downward along y-axis)
    Constant(Vector3),
}

impl Default for GravityType {
    fn default() -> Self {
        Self::Constant(Vector3::new(0.0, -9.81, 0.0))
    }
}
