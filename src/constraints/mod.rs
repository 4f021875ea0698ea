mod constraint;
mod row;
mod hinge;

pub use self::constraint::Constraint;
pub use self::row::{ImpulseBounds, JacobianRow, RowKind};
pub use self::hinge::{
    AngleTracker, HingeConstraint, HingeLimit, HingeMotor, LimitState, DEFAULT_HINGE_ERP,
    DEFAULT_LIMIT_BIAS_FACTOR, DEFAULT_LIMIT_RELAXATION_FACTOR, DEFAULT_LIMIT_SOFTNESS, MIN_LIMIT_FACTOR,
};
