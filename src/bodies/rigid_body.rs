use crate::bodies::{body_flags::BodyFlags, RigidBodyType, ForceType};
use crate::core::BodyHandle;
use crate::math::{Vector3, Transform, Matrix3, Quaternion};

/// Type alias for a handle to a rigid body
pub type RigidBodyHandle = BodyHandle;

/// A rigid body for physics simulation
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// The body's transform in world space (origin at the center of mass)
    transform: Transform,

    linear_velocity: Vector3,

    angular_velocity: Vector3,

    /// The body's type (dynamic, kinematic, or static)
    body_type: RigidBodyType,

    mass: f32,

    /// Inverse of the body's mass, zero for non-dynamic bodies
    inv_mass: f32,

    /// The body's inertia tensor in local space
    inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in local space
    inv_inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in world space
    inv_inertia_tensor_world: Matrix3,

    linear_damping: f32,

    angular_damping: f32,

    flags: BodyFlags,

    /// How long the body has been "inactive" (for sleeping)
    sleeping_time: f32,

    /// Forces to be applied in the next integration step
    forces: Vec<ForceType>,
}

impl RigidBody {
    /// Creates a body with unit mass and unit inertia
    pub fn new(transform: Transform, body_type: RigidBodyType) -> Self {
        let mut body = Self {
            transform,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            body_type,
            mass: 1.0,
            inv_mass: 1.0,
            inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor_world: Matrix3::identity(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            flags: BodyFlags::CAN_SLEEP | BodyFlags::AFFECTED_BY_GRAVITY,
            sleeping_time: 0.0,
            forces: Vec::new(),
        };

        body.update_mass_properties();

        body
    }

    /// Creates a new dynamic rigid body at the given position
    pub fn new_dynamic(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Dynamic)
    }

    /// Creates a new kinematic rigid body at the given position
    pub fn new_kinematic(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Kinematic)
    }

    /// Creates a new static rigid body at the given position
    pub fn new_static(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Static)
    }

    /// Builder-style mass and local inertia assignment
    pub fn with_mass_properties(mut self, mass: f32, inertia_tensor: Matrix3) -> Self {
        self.set_mass(mass);
        self.set_inertia_tensor(inertia_tensor);
        self
    }

    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_inertia_tensor_world();
    }

    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
    }

    pub fn get_rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.rotation = rotation.normalize();
        self.update_inertia_tensor_world();
    }

    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        self.linear_velocity = velocity;
        self.wake_up();
    }

    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
        self.wake_up();
    }

    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass (and inverse mass)
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if self.body_type.is_dynamic() && mass > 0.0 {
            1.0 / mass
        } else {
            0.0
        };
    }

    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the body's inertia tensor in local space
    pub fn get_inertia_tensor(&self) -> &Matrix3 {
        &self.inertia_tensor
    }

    /// Sets the body's inertia tensor in local space
    pub fn set_inertia_tensor(&mut self, tensor: Matrix3) {
        self.inertia_tensor = tensor;

        self.inv_inertia_tensor = if self.body_type.is_dynamic() {
            tensor.inverse().unwrap_or_else(Matrix3::zero)
        } else {
            Matrix3::zero()
        };
        self.update_inertia_tensor_world();
    }

    /// Returns the body's inverse inertia tensor in world space
    pub fn get_inverse_inertia_tensor_world(&self) -> &Matrix3 {
        &self.inv_inertia_tensor_world
    }

    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Sets the body type and updates mass properties accordingly
    pub fn set_body_type(&mut self, body_type: RigidBodyType) {
        self.body_type = body_type;
        self.update_mass_properties();

        if !body_type.is_dynamic() {
            self.forces.clear();
            if body_type == RigidBodyType::Static {
                self.linear_velocity = Vector3::zero();
                self.angular_velocity = Vector3::zero();
            }
        }
    }

    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    pub fn get_linear_damping(&self) -> f32 {
        self.linear_damping
    }

    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.max(0.0);
    }

    pub fn get_angular_damping(&self) -> f32 {
        self.angular_damping
    }

    pub fn is_sleeping(&self) -> bool {
        self.flags.contains(BodyFlags::SLEEPING)
    }

    /// Puts the body to sleep, zeroing its velocities
    pub fn put_to_sleep(&mut self) {
        if self.body_type.is_dynamic() && !self.is_sleeping() {
            self.flags.insert(BodyFlags::SLEEPING);
            self.linear_velocity = Vector3::zero();
            self.angular_velocity = Vector3::zero();
            self.forces.clear();
        }
    }

    pub fn wake_up(&mut self) {
        if self.is_sleeping() {
            self.flags.remove(BodyFlags::SLEEPING);
            self.sleeping_time = 0.0;
        }
    }

    pub fn can_sleep(&self) -> bool {
        self.flags.contains(BodyFlags::CAN_SLEEP)
    }

    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.flags.set(BodyFlags::CAN_SLEEP, can_sleep);
        if !can_sleep {
            self.wake_up();
        }
    }

    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.flags.set(BodyFlags::AFFECTED_BY_GRAVITY, affected);
    }

    pub fn get_sleeping_time(&self) -> f32 {
        self.sleeping_time
    }

    pub fn set_sleeping_time(&mut self, time: f32) {
        self.sleeping_time = time;
    }

    /// Recomputes inverse mass and inertia from the body type
    fn update_mass_properties(&mut self) {
        if self.body_type.is_dynamic() {
            self.set_mass(self.mass.max(crate::math::EPSILON));
            self.inv_inertia_tensor = self.inertia_tensor.inverse().unwrap_or_else(Matrix3::zero);
        } else {
            self.inv_mass = 0.0;
            self.inv_inertia_tensor = Matrix3::zero();
        }
        self.update_inertia_tensor_world();
    }

    /// Updates the inverse inertia tensor in world space: R * inv_I * R^T
    fn update_inertia_tensor_world(&mut self) {
        if !self.body_type.is_dynamic() {
            self.inv_inertia_tensor_world = Matrix3::zero();
            return;
        }

        let rotation = self.transform.rotation.to_rotation_matrix();
        self.inv_inertia_tensor_world = rotation
            .multiply_matrix(&self.inv_inertia_tensor)
            .multiply_matrix(&rotation.transpose());
    }

    fn queue(&mut self, force: ForceType) {
        if self.body_type.is_dynamic() {
            self.wake_up();
            self.forces.push(force);
        }
    }

    /// Applies a force at the center of mass for the next step
    pub fn apply_force(&mut self, force: Vector3) {
        self.queue(ForceType::Force(force));
    }

    /// Applies a force at a world-space point for the next step
    pub fn apply_force_at_point(&mut self, force: Vector3, point: Vector3) {
        self.queue(ForceType::ForceAtPoint { force, point });
    }

    /// Applies a torque for the next step
    pub fn apply_torque(&mut self, torque: Vector3) {
        self.queue(ForceType::Torque(torque));
    }

    /// Queues a linear impulse for the next step
    pub fn apply_impulse(&mut self, impulse: Vector3) {
        self.queue(ForceType::Impulse(impulse));
    }

    /// Queues an angular impulse for the next step
    pub fn apply_angular_impulse(&mut self, impulse: Vector3) {
        self.queue(ForceType::AngularImpulse(impulse));
    }

    /// Immediately changes the velocities by a linear/angular impulse pair.
    ///
    /// This is the entry point used by the constraint solver; queued loads go
    /// through [`RigidBody::integrate_forces`] instead.
    pub fn apply_impulse_pair(&mut self, linear: Vector3, angular: Vector3) {
        if !self.body_type.is_dynamic() {
            return;
        }

        self.wake_up();
        self.linear_velocity += linear * self.inv_mass;
        self.angular_velocity += self.inv_inertia_tensor_world.multiply_vector(angular);
    }

    /// Applies damping to the body's velocities
    pub fn apply_damping(&mut self, linear_damping: f32, angular_damping: f32) {
        if !self.body_type.is_dynamic() || self.is_sleeping() {
            return;
        }

        self.linear_velocity *= 1.0 - (self.linear_damping + linear_damping).clamp(0.0, 1.0);
        self.angular_velocity *= 1.0 - (self.angular_damping + angular_damping).clamp(0.0, 1.0);
    }

    /// Integrates queued forces and impulses into the velocities
    pub fn integrate_forces(&mut self, dt: f32) {
        if !self.body_type.is_dynamic() || self.is_sleeping() {
            self.forces.clear();
            return;
        }

        for force in std::mem::take(&mut self.forces) {
            match force {
                ForceType::Force(force) => {
                    self.linear_velocity += force * (self.inv_mass * dt);
                }
                ForceType::ForceAtPoint { force, point } => {
                    self.linear_velocity += force * (self.inv_mass * dt);

                    // τ = r × F
                    let torque = (point - self.transform.position).cross(&force);
                    self.angular_velocity += self.inv_inertia_tensor_world.multiply_vector(torque) * dt;
                }
                ForceType::Torque(torque) => {
                    self.angular_velocity += self.inv_inertia_tensor_world.multiply_vector(torque) * dt;
                }
                ForceType::Impulse(impulse) => {
                    self.linear_velocity += impulse * self.inv_mass;
                }
                ForceType::AngularImpulse(impulse) => {
                    self.angular_velocity += self.inv_inertia_tensor_world.multiply_vector(impulse);
                }
            }
        }
    }

    /// Integrates velocities to update the pose
    pub fn integrate_velocity(&mut self, dt: f32) {
        if self.body_type == RigidBodyType::Static || self.is_sleeping() {
            return;
        }

        self.transform.position += self.linear_velocity * dt;

        let speed = self.angular_velocity.length();
        if speed > crate::math::EPSILON {
            let angle = speed * dt;
            let rotation = Quaternion::from_axis_angle(self.angular_velocity, angle);
            self.transform.rotation = (rotation * self.transform.rotation).normalize();

            self.update_inertia_tensor_world();
        }
    }
}
