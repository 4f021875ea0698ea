use crate::core::{BodyStorage, ConstraintHandle, ConstraintStorage, Storage};
use crate::bodies::RigidBody;
use crate::constraints::Constraint;
use crate::math::EPSILON;

/// Trait for constraint solvers driven by the world each step
pub trait ConstraintSolver: Send + Sync {
    /// Prepares every enabled constraint and resolves their rows for `iterations` sweeps
    fn solve(
        &mut self,
        dt: f32,
        iterations: u32,
        constraints: &mut ConstraintStorage<Box<dyn Constraint>>,
        bodies: &mut BodyStorage<RigidBody>,
    );

    /// Returns the solver's name
    fn name(&self) -> &str;
}

/// Solver-side state of one Jacobian row
#[derive(Debug, Clone, Copy)]
struct SolverRow {
    constraint: ConstraintHandle,
    index: usize,

    /// `1 / (J M⁻¹ Jᵀ)`
    effective_mass: f32,

    /// Impulse accumulated over this step's iterations
    accumulated: f32,
}

/// Projected Gauss-Seidel over all constraint rows.
///
/// Each iteration computes `λ = relaxation · m_eff · (target - J·v)` per row,
/// clamps the accumulated impulse into the row's bounds and applies only the
/// difference, so inequality and motor rows never exceed their limits within a
/// step.
#[derive(Debug, Default)]
pub struct SequentialImpulseSolver {
    rows: Vec<SolverRow>,
}

impl SequentialImpulseSolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare_rows(
        &mut self,
        dt: f32,
        constraints: &mut ConstraintStorage<Box<dyn Constraint>>,
        bodies: &BodyStorage<RigidBody>,
    ) {
        self.rows.clear();

        for (handle, constraint) in constraints.iter_mut() {
            // Disabled constraints still prepare so their stale rows are dropped
            constraint.prepare(dt, bodies);

            if !constraint.is_enabled() {
                continue;
            }

            let (body_a, body_b) = match constraint.get_bodies() {
                [a, b] => (*a, *b),
                _ => continue,
            };

            let (rb_a, rb_b) = match bodies.get_pair(body_a, body_b) {
                Ok(pair) => pair,
                Err(_) => continue,
            };

            for (index, row) in constraint.jacobian_rows().iter().enumerate() {
                let k = row.inverse_effective_mass(rb_a, rb_b);

                // Both bodies immovable along this row
                if k <= EPSILON {
                    log::trace!("skipping {:?} row {} of {:?}: no effective mass", row.kind, index, handle);
                    continue;
                }

                self.rows.push(SolverRow {
                    constraint: handle,
                    index,
                    effective_mass: 1.0 / k,
                    accumulated: 0.0,
                });
            }
        }
    }
}

impl ConstraintSolver for SequentialImpulseSolver {
    fn solve(
        &mut self,
        dt: f32,
        iterations: u32,
        constraints: &mut ConstraintStorage<Box<dyn Constraint>>,
        bodies: &mut BodyStorage<RigidBody>,
    ) {
        self.prepare_rows(dt, constraints, bodies);

        if self.rows.is_empty() {
            return;
        }

        for _ in 0..iterations {
            for solver_row in self.rows.iter_mut() {
                let constraint = match constraints.get_mut(solver_row.constraint) {
                    Some(constraint) => constraint,
                    None => continue,
                };

                let row = match constraint.jacobian_rows().get(solver_row.index) {
                    Some(row) => row.clone(),
                    None => continue,
                };

                let (body_a, body_b) = match constraint.get_bodies() {
                    [a, b] => (*a, *b),
                    _ => continue,
                };

                let velocity_error = match bodies.get_pair(body_a, body_b) {
                    Ok((rb_a, rb_b)) => row.target_velocity - row.relative_velocity(rb_a, rb_b),
                    Err(_) => continue,
                };

                let lambda = row.relaxation * solver_row.effective_mass * velocity_error;

                let previous = solver_row.accumulated;
                solver_row.accumulated = row.bounds.clamp(previous + lambda);
                let delta = solver_row.accumulated - previous;

                if delta != 0.0 {
                    constraint.apply_impulse(solver_row.index, delta, bodies);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "SequentialImpulse"
    }
}
