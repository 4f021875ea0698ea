mod rigid_body;
mod body_type;

pub use self::rigid_body::{RigidBody, RigidBodyHandle};
pub use self::body_type::RigidBodyType;

use crate::math::Vector3;

/// Loads queued on a body and consumed by the next force integration
#[derive(Debug, Clone, Copy)]
pub enum ForceType {
    /// Force applied at the center of mass
    Force(Vector3),

    /// Force applied at a world-space point (can cause torque)
    ForceAtPoint {
        /// The force to apply
        force: Vector3,

        /// The point to apply the force at, in world space
        point: Vector3,
    },

    /// Torque that causes angular acceleration
    Torque(Vector3),

    /// Impulse applied at the center of mass
    Impulse(Vector3),

    /// Angular impulse (instantaneous change in angular momentum)
    AngularImpulse(Vector3),
}

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct BodyFlags: u32 {
            /// Body can go to sleep when inactive
            const CAN_SLEEP = 0x01;

            /// Body is currently sleeping
            const SLEEPING = 0x02;

            /// Body is affected by gravity
            const AFFECTED_BY_GRAVITY = 0x04;
        }
    }
}
