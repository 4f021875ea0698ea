use crate::core::{
    BodyHandle, ConstraintHandle, SimulationConfig, GravityType, BodyStorage,
    ConstraintStorage, ConstraintSolver, SequentialImpulseSolver,
};
use crate::core::storage::Storage;
use crate::bodies::{RigidBody, RigidBodyType};
use crate::constraints::Constraint;
use crate::error::PhysicsError;
use crate::math::Transform;
use crate::Result;

/// The main physics world that owns all bodies and constraints and steps them
pub struct PhysicsWorld {
    /// All rigid bodies in the world
    bodies: BodyStorage<RigidBody>,

    /// All constraints in the world
    constraints: ConstraintStorage<Box<dyn Constraint>>,

    config: SimulationConfig,

    solver: Box<dyn ConstraintSolver>,

    /// The total elapsed simulation time
    time: f32,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            constraints: ConstraintStorage::new(),
            config,
            solver: Box::new(SequentialImpulseSolver::new()),
            time: 0.0,
        }
    }

    /// Like [`PhysicsWorld::with_config`], but rejects an unusable configuration
    pub fn try_with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Replaces the constraint solver
    pub fn with_solver(mut self, solver: Box<dyn ConstraintSolver>) -> Self {
        log::debug!("using constraint solver {}", solver.name());
        self.solver = solver;
        self
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    pub fn set_gravity(&mut self, gravity: GravityType) {
        self.config.gravity = gravity;
    }

    pub fn get_gravity(&self) -> GravityType {
        self.config.gravity
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the simulation configuration
    pub fn get_config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let body_type = body.get_body_type();
        let handle = self.bodies.add(body);
        log::debug!("added {:?} body {:?}", body_type, handle);
        handle
    }

    /// Removes a rigid body and every constraint that references it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::InvalidBodyReference(format!(
                "Body with handle {:?} not found",
                handle
            )));
        }

        let constraint_handles: Vec<ConstraintHandle> = self.constraints
            .iter()
            .filter_map(|(c_handle, constraint)| {
                if constraint.involves_body(handle) {
                    Some(c_handle)
                } else {
                    None
                }
            })
            .collect();

        for c_handle in constraint_handles {
            self.remove_constraint(c_handle)?;
        }

        log::debug!("removed body {:?}", handle);

        self.bodies.remove(handle).ok_or_else(|| {
            PhysicsError::InvalidBodyReference(format!("Body with handle {:?} not found", handle))
        })
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Read access to all bodies, e.g. for constructing constraints
    pub fn bodies(&self) -> &BodyStorage<RigidBody> {
        &self.bodies
    }

    /// Gets the transform of a rigid body
    pub fn get_transform(&self, handle: BodyHandle) -> Result<Transform> {
        let body = self.bodies.get_body(handle)?;
        Ok(body.get_transform())
    }

    /// Sets the transform of a rigid body, waking it up
    pub fn set_transform(&mut self, handle: BodyHandle, transform: Transform) -> Result<()> {
        let body = self.bodies.get_body_mut(handle)?;
        body.set_transform(transform);
        body.wake_up();
        Ok(())
    }

    /// Adds a constraint to the world and returns its handle.
    ///
    /// Fails with `InvalidBodyReference` if a body it references is not in this world.
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<ConstraintHandle> {
        for &body_handle in constraint.get_bodies() {
            self.bodies.get_body(body_handle)?;
        }

        for &body_handle in constraint.get_bodies() {
            if let Ok(body) = self.bodies.get_body_mut(body_handle) {
                body.wake_up();
            }
        }

        let constraint_type = constraint.constraint_type();
        let handle = self.constraints.add(constraint);
        log::debug!("added {} constraint {:?}", constraint_type, handle);

        Ok(handle)
    }

    /// Removes a constraint from the world
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Box<dyn Constraint>> {
        let constraint = self.constraints.get_constraint(handle)?;

        // Wake up bodies involved in the constraint
        for &body_handle in constraint.get_bodies() {
            if let Ok(body) = self.bodies.get_body_mut(body_handle) {
                body.wake_up();
            }
        }

        log::debug!("removed constraint {:?}", handle);

        self.constraints.remove(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle))
        })
    }

    /// Gets a reference to a constraint by its handle
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&Box<dyn Constraint>> {
        self.constraints.get_constraint(handle)
    }

    /// Gets a mutable reference to a constraint by its handle
    pub fn get_constraint_mut(&mut self, handle: ConstraintHandle) -> Result<&mut Box<dyn Constraint>> {
        self.constraints.get_constraint_mut(handle)
    }

    /// Gets a constraint as its concrete type.
    ///
    /// Fails with `InvalidArgument` if the constraint is of another type.
    pub fn get_constraint_as<T: Constraint>(&self, handle: ConstraintHandle) -> Result<&T> {
        let constraint = self.constraints.get_constraint(handle)?;
        let constraint_type = constraint.constraint_type();

        constraint.as_any().downcast_ref::<T>().ok_or_else(|| {
            PhysicsError::InvalidArgument(format!(
                "Constraint {:?} is a {} constraint",
                handle, constraint_type
            ))
        })
    }

    /// Mutable variant of [`PhysicsWorld::get_constraint_as`]
    pub fn get_constraint_as_mut<T: Constraint>(&mut self, handle: ConstraintHandle) -> Result<&mut T> {
        let constraint = self.constraints.get_constraint_mut(handle)?;
        let constraint_type = constraint.constraint_type();

        constraint.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
            PhysicsError::InvalidArgument(format!(
                "Constraint {:?} is a {} constraint",
                handle, constraint_type
            ))
        })
    }

    /// Runs the physics simulation for the given time in fixed substeps
    pub fn step(&mut self, time_step: f32) {
        let fixed_step = self.config.time_step;
        let max_steps = self.config.max_substeps;

        let mut remaining_time = time_step;
        let mut steps = 0;

        while remaining_time > crate::math::EPSILON && steps < max_steps {
            let dt = fixed_step.min(remaining_time);

            self.step_simulation(dt);

            remaining_time -= dt;
            steps += 1;
        }

        if remaining_time > crate::math::EPSILON {
            log::warn!("step dropped {}s after {} substeps", remaining_time, steps);
        }

        self.time += time_step;
    }

    /// Performs a single step of length `dt`
    pub fn step_simulation(&mut self, dt: f32) {
        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() != RigidBodyType::Dynamic || body.is_sleeping() {
                continue;
            }

            if let GravityType::Constant(gravity) = self.config.gravity {
                if body.is_affected_by_gravity() {
                    body.apply_force(gravity * body.get_mass());
                }
            }

            body.apply_damping(self.config.linear_damping, self.config.angular_damping);
            body.integrate_forces(dt);
        }

        self.wake_constrained_bodies();

        self.solver.solve(dt, self.config.velocity_iterations, &mut self.constraints, &mut self.bodies);

        self.break_overloaded_constraints();

        for (_, body) in self.bodies.iter_mut() {
            body.integrate_velocity(dt);
        }

        if self.config.allow_sleeping {
            self.update_sleeping(dt);
        }
    }

    /// A sleeping body constrained to an awake dynamic body wakes up
    fn wake_constrained_bodies(&mut self) {
        let mut to_wake = Vec::new();

        for (_, constraint) in self.constraints.iter() {
            if !constraint.is_enabled() {
                continue;
            }

            let awake = constraint.get_bodies().iter().any(|&handle| {
                self.bodies
                    .get_body(handle)
                    .map(|body| body.get_body_type().is_dynamic() && !body.is_sleeping())
                    .unwrap_or(false)
            });

            if awake {
                to_wake.extend_from_slice(constraint.get_bodies());
            }
        }

        for handle in to_wake {
            if let Ok(body) = self.bodies.get_body_mut(handle) {
                body.wake_up();
            }
        }
    }

    /// Disables every constraint whose applied impulse exceeded its threshold this step
    fn break_overloaded_constraints(&mut self) {
        for (handle, constraint) in self.constraints.iter_mut() {
            if !constraint.is_enabled() {
                continue;
            }

            let impulse = constraint.applied_impulse();
            if impulse > constraint.breaking_impulse_threshold() {
                log::info!(
                    "{} constraint {:?} broke: impulse {} exceeds {}",
                    constraint.constraint_type(),
                    handle,
                    impulse,
                    constraint.breaking_impulse_threshold()
                );
                constraint.set_enabled(false);
            }
        }
    }

    fn update_sleeping(&mut self, dt: f32) {
        let linear_threshold = self.config.linear_sleep_threshold.powi(2);
        let angular_threshold = self.config.angular_sleep_threshold.powi(2);
        let time_threshold = self.config.sleep_time_threshold;

        for (handle, body) in self.bodies.iter_mut() {
            if !body.get_body_type().is_dynamic() || body.is_sleeping() || !body.can_sleep() {
                continue;
            }

            if body.get_linear_velocity().length_squared() > linear_threshold
                || body.get_angular_velocity().length_squared() > angular_threshold
            {
                body.set_sleeping_time(0.0);
                continue;
            }

            let sleeping_time = body.get_sleeping_time() + dt;
            if sleeping_time >= time_threshold {
                log::trace!("body {:?} fell asleep", handle);
                body.put_to_sleep();
            } else {
                body.set_sleeping_time(sleeping_time);
            }
        }
    }

    /// Clears the world of all bodies and constraints
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.time = 0.0;
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of constraints in the world
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
