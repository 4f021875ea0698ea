use crate::bodies::RigidBody;
use crate::math::Vector3;

/// Which part of a joint a Jacobian row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Point-to-point coupling along one world axis
    Linear,

    /// Keeps the two hinge axes aligned (one of two perpendicular directions)
    Angular,

    /// Angle limit along the hinge axis
    Limit,

    /// Angular motor along the hinge axis
    Motor,
}

/// The range the accumulated impulse of a row may take within one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseBounds {
    /// Smallest allowed accumulated impulse
    pub lower: f32,

    /// Largest allowed accumulated impulse
    pub upper: f32,
}

impl ImpulseBounds {
    /// Equality row: the impulse may take any value
    #[inline]
    pub fn unbounded() -> Self {
        Self { lower: f32::NEG_INFINITY, upper: f32::INFINITY }
    }

    /// Motor row: `[-max, max]`. Negative input is treated as zero.
    #[inline]
    pub fn symmetric(max: f32) -> Self {
        let max = max.max(0.0);
        Self { lower: -max, upper: max }
    }

    /// Inequality row: the impulse may only push in the row direction
    #[inline]
    pub fn non_negative() -> Self {
        Self { lower: 0.0, upper: f32::INFINITY }
    }

    #[inline]
    pub fn clamp(&self, impulse: f32) -> f32 {
        impulse.max(self.lower).min(self.upper)
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.lower == f32::NEG_INFINITY && self.upper == f32::INFINITY
    }
}

/// One scalar velocity constraint `J · v = target_velocity`.
///
/// `v` stacks both bodies' velocities as `(v_a, ω_a, v_b, ω_b)`. An impulse `λ`
/// along the row changes the velocities by `M⁻¹ Jᵀ λ`.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianRow {
    pub kind: RowKind,

    pub linear_a: Vector3,
    pub angular_a: Vector3,
    pub linear_b: Vector3,
    pub angular_b: Vector3,

    /// Desired value of `J · v` after the solve, including any position bias
    pub target_velocity: f32,

    pub bounds: ImpulseBounds,

    /// Scales every impulse the solver computes for this row
    pub relaxation: f32,
}

impl JacobianRow {
    /// A row acting only on the bodies' angular velocities: `(ω_b - ω_a) · direction`
    pub fn angular(kind: RowKind, direction: Vector3, target_velocity: f32, bounds: ImpulseBounds) -> Self {
        Self {
            kind,
            linear_a: Vector3::zero(),
            angular_a: -direction,
            linear_b: Vector3::zero(),
            angular_b: direction,
            target_velocity,
            bounds,
            relaxation: 1.0,
        }
    }

    /// Point-to-point row along `normal` between anchors offset `r_a`/`r_b` from
    /// the bodies' centers of mass
    pub fn linear(normal: Vector3, r_a: Vector3, r_b: Vector3, target_velocity: f32) -> Self {
        Self {
            kind: RowKind::Linear,
            linear_a: -normal,
            angular_a: -r_a.cross(&normal),
            linear_b: normal,
            angular_b: r_b.cross(&normal),
            target_velocity,
            bounds: ImpulseBounds::unbounded(),
            relaxation: 1.0,
        }
    }

    pub fn with_relaxation(mut self, relaxation: f32) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Current value of `J · v`
    pub fn relative_velocity(&self, body_a: &RigidBody, body_b: &RigidBody) -> f32 {
        self.linear_a.dot(&body_a.get_linear_velocity())
            + self.angular_a.dot(&body_a.get_angular_velocity())
            + self.linear_b.dot(&body_b.get_linear_velocity())
            + self.angular_b.dot(&body_b.get_angular_velocity())
    }

    /// `J M⁻¹ Jᵀ`, the inverse of the row's effective mass
    pub fn inverse_effective_mass(&self, body_a: &RigidBody, body_b: &RigidBody) -> f32 {
        body_a.get_inverse_mass() * self.linear_a.length_squared()
            + body_a.get_inverse_inertia_tensor_world().quadratic_form(self.angular_a)
            + body_b.get_inverse_mass() * self.linear_b.length_squared()
            + body_b.get_inverse_inertia_tensor_world().quadratic_form(self.angular_b)
    }

    /// Linear/angular impulse pair `λ` produces on the first body
    #[inline]
    pub fn impulse_on_a(&self, impulse: f32) -> (Vector3, Vector3) {
        (self.linear_a * impulse, self.angular_a * impulse)
    }

    /// Linear/angular impulse pair `λ` produces on the second body
    #[inline]
    pub fn impulse_on_b(&self, impulse: f32) -> (Vector3, Vector3) {
        (self.linear_b * impulse, self.angular_b * impulse)
    }
}
