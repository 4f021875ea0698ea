use crate::constraints::JacobianRow;
use crate::core::{BodyHandle, BodyStorage};
use crate::bodies::RigidBody;
use std::any::Any;

/// Base trait for physics constraints driven by the sequential impulse solver.
///
/// Each step the solver calls [`Constraint::prepare`] once, reads the rows from
/// [`Constraint::jacobian_rows`], and feeds impulse deltas back through
/// [`Constraint::apply_impulse`]. Rows and impulses are only valid until the
/// next `prepare`.
pub trait Constraint: Send + Sync + 'static {
    /// Returns the type name of the constraint
    fn constraint_type(&self) -> &'static str;

    /// Returns the bodies involved in the constraint, first body first
    fn get_bodies(&self) -> &[BodyHandle];

    /// Checks if the constraint involves a specific body
    fn involves_body(&self, body: BodyHandle) -> bool {
        self.get_bodies().contains(&body)
    }

    fn is_enabled(&self) -> bool;

    /// Disabled constraints are skipped by the solver
    fn set_enabled(&mut self, enabled: bool);

    /// Recomputes derived state and the active rows for a step of length `dt`.
    /// Only reads the bodies. A disabled constraint produces no rows.
    fn prepare(&mut self, dt: f32, bodies: &BodyStorage<RigidBody>);

    /// Rows produced by the last `prepare`
    fn jacobian_rows(&self) -> &[JacobianRow];

    /// Applies `impulse` along row `row` to both bodies and records it
    fn apply_impulse(&mut self, row: usize, impulse: f32, bodies: &mut BodyStorage<RigidBody>);

    /// Sum of absolute impulses applied since the last `prepare`
    fn applied_impulse(&self) -> f32;

    /// Impulse above which the world disables this constraint
    fn breaking_impulse_threshold(&self) -> f32 {
        f32::INFINITY
    }

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Clone the constraint to create a new box
    fn clone_constraint(&self) -> Box<dyn Constraint>;
}
