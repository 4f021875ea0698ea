#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Type of rigid body, determining how it responds to constraint impulses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// Fully simulated: finite mass, moved by forces and joint impulses
    Dynamic,

    /// Moved programmatically; behaves as infinite mass towards joints
    Kinematic,

    /// Never moves
    Static,
}

impl RigidBodyType {
    /// Returns true for bodies that respond to impulses
    #[inline]
    pub fn is_dynamic(self) -> bool {
        self == Self::Dynamic
    }
}
