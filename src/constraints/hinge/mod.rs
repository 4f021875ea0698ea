mod angle;
mod limit;
mod motor;

pub use self::angle::AngleTracker;
pub use self::limit::{
    HingeLimit, LimitState, DEFAULT_LIMIT_BIAS_FACTOR, DEFAULT_LIMIT_RELAXATION_FACTOR,
    DEFAULT_LIMIT_SOFTNESS, MIN_LIMIT_FACTOR,
};
pub use self::motor::HingeMotor;

use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ImpulseBounds, JacobianRow, RowKind};
use crate::core::{BodyHandle, BodyStorage};
use crate::error::PhysicsError;
use crate::math::{self, Quaternion, Transform, Vector3};
use crate::Result;
use std::any::Any;

/// Default error reduction of the point-to-point and axis-alignment rows
pub const DEFAULT_HINGE_ERP: f32 = 0.2;

/// A hinge (revolute) constraint that allows rotation around a single axis.
///
/// Each body carries a local frame. The frame origin is the pivot, the frame's
/// local Z axis is the hinge axis and its local X axis is the angle reference.
/// The hinge angle is the signed angle, in radians, from frame A's X axis to
/// frame B's X axis about frame A's Z axis: positive when body B turns
/// right-handedly about the axis relative to body A.
///
/// Per step the constraint produces, in order: three point-to-point rows (unless
/// angular-only), two axis-alignment rows, an optional motor row and an optional
/// limit row.
#[derive(Debug, Clone)]
pub struct HingeConstraint {
    body_a: BodyHandle,
    body_b: BodyHandle,

    /// The bodies involved in the constraint (cached for quick lookup)
    bodies: [BodyHandle; 2],

    /// Pivot and axis relative to the first body
    frame_a: Transform,

    /// Pivot and axis relative to the second body
    frame_b: Transform,

    /// Skip the point-to-point rows
    angular_only: bool,

    enabled: bool,

    motor: HingeMotor,

    limit: HingeLimit,

    /// Error reduction of the base lock rows
    erp: f32,

    breaking_impulse_threshold: f32,

    tracker: AngleTracker,

    /// Relative angular velocity about the axis (calculated during prepare)
    angular_velocity: f32,

    limit_state: LimitState,

    /// World hinge axis (calculated during prepare)
    hinge_axis: Vector3,

    rows: Vec<JacobianRow>,

    /// Impulse accumulated per row since the last prepare
    applied_impulses: Vec<f32>,
}

impl HingeConstraint {
    /// Creates a hinge from per-body local frames.
    ///
    /// Fails with `InvalidArgument` if both handles are the same body,
    /// `InvalidBodyReference` if either body does not exist, and `DegenerateAxis`
    /// if a frame's rotation cannot define an axis. The frames are otherwise
    /// trusted to describe the same physical axis; see [`HingeConstraint::new_strict`].
    pub fn new(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        frame_a: Transform,
        frame_b: Transform,
    ) -> Result<Self> {
        if body_a == body_b {
            return Err(PhysicsError::InvalidArgument(format!(
                "hinge needs two distinct bodies, got {:?} twice",
                body_a
            )));
        }

        let (rb_a, rb_b) = bodies.get_pair(body_a, body_b)?;
        let frame_a = checked_frame(frame_a, "frame A")?;
        let frame_b = checked_frame(frame_b, "frame B")?;

        let mut hinge = Self {
            body_a,
            body_b,
            bodies: [body_a, body_b],
            frame_a,
            frame_b,
            angular_only: false,
            enabled: true,
            motor: HingeMotor::default(),
            limit: HingeLimit::free(),
            erp: DEFAULT_HINGE_ERP,
            breaking_impulse_threshold: f32::INFINITY,
            tracker: AngleTracker::default(),
            angular_velocity: 0.0,
            limit_state: LimitState::Free,
            hinge_axis: Vector3::unit_z(),
            rows: Vec::new(),
            applied_impulses: Vec::new(),
        };

        let (world_a, world_b) = hinge.world_frames(rb_a, rb_b);
        hinge.hinge_axis = world_a.axis(2);
        hinge.tracker = AngleTracker::new(measure_angle(&world_a, &world_b));

        log::debug!(
            "hinge {:?}-{:?} created at angle {}",
            body_a,
            body_b,
            hinge.tracker.angle()
        );

        Ok(hinge)
    }

    /// Like [`HingeConstraint::new`], but also requires both frames' axes to
    /// agree in world space within `tolerance` radians at the current poses.
    pub fn new_strict(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        frame_a: Transform,
        frame_b: Transform,
        tolerance: f32,
    ) -> Result<Self> {
        let hinge = Self::new(bodies, body_a, body_b, frame_a, frame_b)?;
        let (rb_a, rb_b) = bodies.get_pair(body_a, body_b)?;
        let (world_a, world_b) = hinge.world_frames(rb_a, rb_b);

        let axis_a = world_a.axis(2);
        let axis_b = world_b.axis(2);
        let misalignment = axis_a.cross(&axis_b).length().atan2(axis_a.dot(&axis_b));

        if misalignment > tolerance {
            return Err(PhysicsError::DegenerateAxis(format!(
                "frame axes differ by {} rad in world space (tolerance {})",
                misalignment, tolerance
            )));
        }

        Ok(hinge)
    }

    /// Creates a hinge from a world-space pivot and axis at the bodies' current
    /// poses. Both local frames are derived from the same world frame, so the
    /// initial hinge angle is zero.
    pub fn from_world_pivot_axis(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        pivot: Vector3,
        axis: Vector3,
    ) -> Result<Self> {
        let axis = axis.try_normalize().ok_or_else(|| {
            PhysicsError::DegenerateAxis(format!("world hinge axis {} has no direction", axis))
        })?;

        let (rb_a, rb_b) = bodies.get_pair(body_a, body_b)?;
        let (reference, binormal) = math::plane_space(axis);
        let world_frame = Transform::new(pivot, Quaternion::from_basis(reference, binormal, axis));

        let frame_a = rb_a.get_transform().inverse().compose(&world_frame);
        let frame_b = rb_b.get_transform().inverse().compose(&world_frame);

        Self::new(bodies, body_a, body_b, frame_a, frame_b)
    }

    /// Frame A and frame B expressed in world space
    pub fn world_frames(&self, body_a: &RigidBody, body_b: &RigidBody) -> (Transform, Transform) {
        (
            body_a.get_transform().compose(&self.frame_a),
            body_b.get_transform().compose(&self.frame_b),
        )
    }

    /// Continuous hinge angle at the bodies' current poses, without updating
    /// the tracked angle
    pub fn current_hinge_angle(&self, bodies: &BodyStorage<RigidBody>) -> Result<f32> {
        let (rb_a, rb_b) = bodies.get_pair(self.body_a, self.body_b)?;
        let (world_a, world_b) = self.world_frames(rb_a, rb_b);
        Ok(self.tracker.unwrap(measure_angle(&world_a, &world_b)))
    }

    pub fn get_body_a(&self) -> BodyHandle {
        self.body_a
    }

    pub fn get_body_b(&self) -> BodyHandle {
        self.body_b
    }

    pub fn get_frame_a(&self) -> Transform {
        self.frame_a
    }

    pub fn get_frame_b(&self) -> Transform {
        self.frame_b
    }

    /// Replaces both local frames; takes effect on the next prepare
    pub fn set_frames(&mut self, frame_a: Transform, frame_b: Transform) -> Result<()> {
        self.frame_a = checked_frame(frame_a, "frame A")?;
        self.frame_b = checked_frame(frame_b, "frame B")?;
        Ok(())
    }

    pub fn is_angular_only(&self) -> bool {
        self.angular_only
    }

    /// Toggles the point-to-point rows; the angular rows are unaffected
    pub fn set_angular_only(&mut self, angular_only: bool) {
        self.angular_only = angular_only;
    }

    /// Configures the angular motor. A negative `max_impulse` is clamped to zero.
    pub fn enable_angular_motor(&mut self, enable: bool, target_velocity: f32, max_impulse: f32) {
        self.motor = HingeMotor::new(enable, target_velocity, max_impulse);
    }

    pub fn set_motor(&mut self, motor: HingeMotor) {
        self.motor = HingeMotor::new(motor.enabled, motor.target_velocity, motor.max_impulse);
    }

    pub fn get_motor(&self) -> HingeMotor {
        self.motor
    }

    /// Sets the motor velocity that reaches `target_angle` (clamped into the
    /// limits) in one step of length `dt`, starting from the tracked angle
    pub fn set_motor_target(&mut self, target_angle: f32, dt: f32) -> Result<()> {
        if dt <= 0.0 || !dt.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "motor target step must be positive, got {}",
                dt
            )));
        }

        let target = self.limit.clamp_angle(target_angle);
        self.motor.target_velocity = (target - self.tracker.angle()) / dt;
        Ok(())
    }

    pub fn get_enable_angular_motor(&self) -> bool {
        self.motor.enabled
    }

    pub fn get_motor_target_velocity(&self) -> f32 {
        self.motor.target_velocity
    }

    pub fn get_max_motor_impulse(&self) -> f32 {
        self.motor.max_impulse
    }

    /// Sets the limits and their tuning. `lower > upper` frees the hinge,
    /// `lower == upper` locks it. Tuning factors are clamped into `[0, 1]`.
    pub fn set_limit(&mut self, limit: HingeLimit) {
        self.limit = limit.sanitized();
        log::debug!(
            "hinge {:?}-{:?} limit set to [{}, {}]",
            self.body_a,
            self.body_b,
            self.limit.lower,
            self.limit.upper
        );
    }

    pub fn get_limit(&self) -> HingeLimit {
        self.limit
    }

    pub fn get_lower_limit(&self) -> f32 {
        self.limit.lower
    }

    pub fn get_upper_limit(&self) -> f32 {
        self.limit.upper
    }

    /// The hinge angle computed by the last prepare (or at construction)
    pub fn get_hinge_angle(&self) -> f32 {
        self.tracker.angle()
    }

    /// Relative angular velocity about the hinge axis at the last prepare
    pub fn get_hinge_angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn get_limit_state(&self) -> LimitState {
        self.limit_state
    }

    /// World-space hinge axis at the last prepare (or at construction)
    pub fn get_hinge_axis(&self) -> Vector3 {
        self.hinge_axis
    }

    pub fn get_error_reduction(&self) -> f32 {
        self.erp
    }

    /// Fraction of the base lock's positional error corrected per step
    pub fn set_error_reduction(&mut self, erp: f32) {
        self.erp = erp.clamp(0.0, 1.0);
    }

    pub fn set_breaking_impulse_threshold(&mut self, threshold: f32) {
        self.breaking_impulse_threshold = threshold.max(0.0);
    }

    /// Impulse applied along rows of `kind` since the last prepare
    pub fn get_row_impulse(&self, kind: RowKind) -> f32 {
        self.rows
            .iter()
            .zip(&self.applied_impulses)
            .filter(|(row, _)| row.kind == kind)
            .map(|(_, impulse)| *impulse)
            .sum()
    }

    fn push_row(&mut self, row: JacobianRow) {
        self.rows.push(row);
        self.applied_impulses.push(0.0);
    }
}

impl Constraint for HingeConstraint {
    fn constraint_type(&self) -> &'static str {
        "Hinge"
    }

    fn get_bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn prepare(&mut self, dt: f32, bodies: &BodyStorage<RigidBody>) {
        self.rows.clear();
        self.applied_impulses.clear();

        if !self.enabled {
            return;
        }

        let (rb_a, rb_b) = match bodies.get_pair(self.body_a, self.body_b) {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("hinge {:?}-{:?} skipped: {}", self.body_a, self.body_b, err);
                return;
            }
        };

        let inv_dt = if dt > math::EPSILON { 1.0 / dt } else { 0.0 };

        let (world_a, world_b) = self.world_frames(rb_a, rb_b);
        let axis = world_a.axis(2);
        self.hinge_axis = axis;

        let angle = self.tracker.update(measure_angle(&world_a, &world_b));
        self.angular_velocity = (rb_b.get_angular_velocity() - rb_a.get_angular_velocity()).dot(&axis);

        let (state, penetration) = self.limit.evaluate(angle);
        if state != self.limit_state {
            log::debug!(
                "hinge {:?}-{:?} limit state {:?} -> {:?} at angle {}",
                self.body_a,
                self.body_b,
                self.limit_state,
                state,
                angle
            );
        }
        self.limit_state = state;

        if !self.angular_only {
            let r_a = world_a.position - rb_a.get_position();
            let r_b = world_b.position - rb_b.get_position();
            let separation = world_b.position - world_a.position;

            for i in 0..3 {
                let normal = Vector3::unit(i);
                let target = -self.erp * inv_dt * separation.dot(&normal);
                self.push_row(JacobianRow::linear(normal, r_a, r_b, target));
            }
        }

        // Rotation about the two directions perpendicular to the hinge axis is locked.
        let misalignment = axis.cross(&world_b.axis(2));
        let (p, q) = math::plane_space(axis);
        for direction in [p, q] {
            let target = -self.erp * inv_dt * misalignment.dot(&direction);
            self.push_row(JacobianRow::angular(
                RowKind::Angular,
                direction,
                target,
                ImpulseBounds::unbounded(),
            ));
        }

        // A locked hinge can't turn, so the motor would only fight the lock.
        if self.motor.is_active() && !self.limit.is_locked() {
            self.push_row(JacobianRow::angular(
                RowKind::Motor,
                axis,
                self.motor.target_velocity,
                self.motor.impulse_bounds(),
            ));
        }

        if state != LimitState::Free {
            let row = if self.limit.is_locked() {
                // Single equality row: drives the angle back to the lock from either side.
                let target = -self.limit.bias_velocity(angle - self.limit.lower, inv_dt);
                JacobianRow::angular(RowKind::Limit, axis, target, ImpulseBounds::unbounded())
            } else {
                // One-sided: pushes towards the allowed range only.
                let direction = if state == LimitState::AtLower { axis } else { -axis };
                let target = self.limit.bias_velocity(penetration, inv_dt);
                JacobianRow::angular(RowKind::Limit, direction, target, ImpulseBounds::non_negative())
            };
            self.push_row(row.with_relaxation(self.limit.relaxation_factor));
        }

        log::trace!(
            "hinge {:?}-{:?} prepared {} rows, angle {}, state {:?}",
            self.body_a,
            self.body_b,
            self.rows.len(),
            angle,
            state
        );
    }

    fn jacobian_rows(&self) -> &[JacobianRow] {
        &self.rows
    }

    fn apply_impulse(&mut self, row: usize, impulse: f32, bodies: &mut BodyStorage<RigidBody>) {
        let Some(jacobian) = self.rows.get(row) else {
            return;
        };

        let (linear_a, angular_a) = jacobian.impulse_on_a(impulse);
        let (linear_b, angular_b) = jacobian.impulse_on_b(impulse);

        if let Ok(body_a) = bodies.get_body_mut(self.body_a) {
            body_a.apply_impulse_pair(linear_a, angular_a);
        }

        if let Ok(body_b) = bodies.get_body_mut(self.body_b) {
            body_b.apply_impulse_pair(linear_b, angular_b);
        }

        self.applied_impulses[row] += impulse;
    }

    fn applied_impulse(&self) -> f32 {
        self.applied_impulses.iter().map(|impulse| impulse.abs()).sum()
    }

    fn breaking_impulse_threshold(&self) -> f32 {
        self.breaking_impulse_threshold
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_constraint(&self) -> Box<dyn Constraint> {
        Box::new(self.clone())
    }
}

/// Wrapped hinge angle in `(-π, π]` between two world frames
fn measure_angle(world_a: &Transform, world_b: &Transform) -> f32 {
    math::signed_angle_about_axis(world_a.axis(0), world_b.axis(0), world_a.axis(2))
}

fn checked_frame(frame: Transform, name: &str) -> Result<Transform> {
    let length_squared = frame.rotation.length_squared();
    if !length_squared.is_finite() || length_squared < math::EPSILON {
        return Err(PhysicsError::DegenerateAxis(format!(
            "{} rotation {} cannot define a hinge axis",
            name, frame.rotation
        )));
    }

    if !frame.position.length_squared().is_finite() {
        return Err(PhysicsError::InvalidArgument(format!(
            "{} pivot {} is not finite",
            name, frame.position
        )));
    }

    Ok(Transform::new(frame.position, frame.rotation.normalize()))
}
