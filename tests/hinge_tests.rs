use phys_hinge::{
    HingeConstraint, HingeLimit, LimitState, PhysicsWorld, RigidBody, RigidBodyType,
    SimulationConfig,
    constraints::{
        AngleTracker, Constraint, RowKind, DEFAULT_LIMIT_BIAS_FACTOR,
        DEFAULT_LIMIT_RELAXATION_FACTOR, DEFAULT_LIMIT_SOFTNESS, MIN_LIMIT_FACTOR,
    },
    core::{BodyHandle, ConstraintHandle, GravityType},
    error::PhysicsError,
    math::{self, Matrix3, Quaternion, Transform, Vector3},
};
use std::f32::consts::{PI, TAU};
use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

fn test_world() -> PhysicsWorld {
    let mut config = SimulationConfig::default();
    config.gravity = GravityType::None;
    config.allow_sleeping = false;
    PhysicsWorld::with_config(config)
}

/// Static body at the origin and a dynamic body at `position`
fn body_pair(world: &mut PhysicsWorld, position: Vector3) -> (BodyHandle, BodyHandle) {
    let a = world.add_body(RigidBody::new_static(Vector3::zero()));
    let b = world.add_body(RigidBody::new_dynamic(position));
    (a, b)
}

/// A hinge about world Z through the dynamic body's center
fn z_hinge(world: &mut PhysicsWorld) -> (BodyHandle, BodyHandle, ConstraintHandle) {
    let (a, b) = body_pair(world, Vector3::zero());
    let hinge = HingeConstraint::from_world_pivot_axis(
        world.bodies(),
        a,
        b,
        Vector3::zero(),
        Vector3::unit_z(),
    )
    .unwrap();
    let handle = world.add_constraint(Box::new(hinge)).unwrap();
    (a, b, handle)
}

fn get_hinge(world: &PhysicsWorld, handle: ConstraintHandle) -> &HingeConstraint {
    world.get_constraint_as::<HingeConstraint>(handle).unwrap()
}

fn get_hinge_mut(world: &mut PhysicsWorld, handle: ConstraintHandle) -> &mut HingeConstraint {
    world.get_constraint_as_mut::<HingeConstraint>(handle).unwrap()
}

fn row_kinds(hinge: &HingeConstraint) -> Vec<RowKind> {
    hinge.jacobian_rows().iter().map(|row| row.kind).collect()
}

#[test]
fn test_initial_angle_is_zero() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    let hinge = get_hinge(&world, handle);
    assert_relative_eq!(hinge.get_hinge_angle(), 0.0, epsilon = 1e-6);
    assert_relative_eq!(hinge.get_hinge_axis(), Vector3::unit_z(), epsilon = 1e-6);
    assert_eq!(hinge.get_limit_state(), LimitState::Free);
    assert_eq!(hinge.constraint_type(), "Hinge");
    assert!(hinge.is_enabled());
    assert!(!hinge.get_enable_angular_motor());
}

#[test]
fn test_free_hinge_is_continuous_past_pi() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    let spin = 3.0;
    world.get_body_mut(b).unwrap().set_angular_velocity(Vector3::new(0.0, 0.0, spin));

    let mut previous = get_hinge(&world, handle).get_hinge_angle();
    for _ in 0..120 {
        world.step(DT);

        let hinge = get_hinge(&world, handle);
        let angle = hinge.current_hinge_angle(world.bodies()).unwrap();
        assert!(angle > previous, "angle went from {} to {}", previous, angle);
        assert!(angle - previous < 0.1);
        previous = angle;

        assert_eq!(hinge.get_limit_state(), LimitState::Free);
        assert_eq!(hinge.jacobian_rows().len(), 5);
    }

    // Two seconds at 3 rad/s is past the ±π seam
    let angle = get_hinge(&world, handle).current_hinge_angle(world.bodies()).unwrap();
    assert!(angle > PI);
    assert_relative_eq!(angle, spin * 120.0 * DT, epsilon = 1e-2);
    assert_relative_eq!(get_hinge(&world, handle).get_hinge_angular_velocity(), spin, epsilon = 1e-4);
}

#[test]
fn test_locked_hinge_holds_under_torque() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    {
        let hinge = get_hinge_mut(&mut world, handle);
        hinge.set_limit(HingeLimit::locked(0.0));
        hinge.enable_angular_motor(true, 5.0, 100.0);
    }

    for _ in 0..60 {
        world.get_body_mut(b).unwrap().apply_torque(Vector3::new(0.0, 0.0, 50.0));
        world.step(DT);

        let hinge = get_hinge(&world, handle);
        assert!(hinge.get_hinge_angle().abs() < 1e-3);

        // The lock replaces the motor row
        let kinds = row_kinds(hinge);
        assert_eq!(kinds.len(), 6);
        assert!(!kinds.contains(&RowKind::Motor));
        assert_eq!(kinds.last(), Some(&RowKind::Limit));
    }

    let angle = get_hinge(&world, handle).current_hinge_angle(world.bodies()).unwrap();
    assert!(angle.abs() < 1e-3);
}

#[test]
fn test_locked_limit_row_is_unbounded() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    get_hinge_mut(&mut world, handle).set_limit(HingeLimit::locked(0.25));
    world.step(DT);

    let hinge = get_hinge(&world, handle);
    let row = hinge.jacobian_rows().last().unwrap();
    assert_eq!(row.kind, RowKind::Limit);
    assert!(row.bounds.is_unbounded());

    // At 0 below a lock at 0.25: driven towards positive angles
    assert!(row.target_velocity > 0.0);
    assert_eq!(hinge.get_limit_state(), LimitState::AtLower);
}

#[test]
fn test_motor_reaches_target_velocity() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    get_hinge_mut(&mut world, handle).enable_angular_motor(true, 2.0, 10.0);

    for _ in 0..10 {
        world.step(DT);
    }

    let omega = world.get_body(b).unwrap().get_angular_velocity();
    assert_relative_eq!(omega.z, 2.0, epsilon = 1e-4);
    assert_relative_eq!(omega.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(omega.y, 0.0, epsilon = 1e-5);

    let hinge = get_hinge(&world, handle);
    assert!(row_kinds(hinge).contains(&RowKind::Motor));
    assert_relative_eq!(hinge.get_motor_target_velocity(), 2.0);
    assert_relative_eq!(hinge.get_max_motor_impulse(), 10.0);
}

#[test]
fn test_motor_impulse_is_bounded() {
    let mut world = test_world();
    let a = world.add_body(RigidBody::new_static(Vector3::zero()));
    let b = world.add_body(
        RigidBody::new_dynamic(Vector3::zero())
            .with_mass_properties(1.0, Matrix3::from_diagonal(Vector3::new(2.0, 2.0, 2.0))),
    );

    let mut hinge = HingeConstraint::from_world_pivot_axis(
        world.bodies(),
        a,
        b,
        Vector3::zero(),
        Vector3::unit_z(),
    )
    .unwrap();
    hinge.enable_angular_motor(true, 100.0, 0.01);
    let handle = world.add_constraint(Box::new(hinge)).unwrap();

    world.step(DT);

    // Δω = max_impulse / I about the axis
    let omega = world.get_body(b).unwrap().get_angular_velocity().z;
    assert!(omega <= 0.005 + 1e-6);
    assert_relative_eq!(omega, 0.005, epsilon = 1e-6);
    assert_relative_eq!(get_hinge(&world, handle).get_row_impulse(RowKind::Motor), 0.01, epsilon = 1e-6);

    for _ in 0..9 {
        world.step(DT);
    }

    let omega = world.get_body(b).unwrap().get_angular_velocity().z;
    assert_relative_eq!(omega, 0.05, epsilon = 1e-5);
}

#[test]
fn test_negative_max_impulse_is_clamped() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    get_hinge_mut(&mut world, handle).enable_angular_motor(true, 1.0, -5.0);

    let hinge_ref = get_hinge(&world, handle);
    assert_eq!(hinge_ref.get_max_motor_impulse(), 0.0);
    assert!(hinge_ref.get_enable_angular_motor());

    world.step(DT);

    assert_eq!(get_hinge(&world, handle).jacobian_rows().len(), 5);
    assert_relative_eq!(world.get_body(b).unwrap().get_angular_velocity().z, 0.0);
}

#[test]
fn test_limit_change_applies_on_next_step() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    world
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), 0.5));
    world.step(DT);

    assert_eq!(get_hinge(&world, handle).get_limit_state(), LimitState::Free);
    assert_eq!(get_hinge(&world, handle).jacobian_rows().len(), 5);
    assert_relative_eq!(get_hinge(&world, handle).get_hinge_angle(), 0.5, epsilon = 1e-5);

    get_hinge_mut(&mut world, handle).set_limit(HingeLimit::new(-0.2, 0.2));

    // Nothing changes until the next prepare
    assert_eq!(get_hinge(&world, handle).get_limit_state(), LimitState::Free);
    assert_eq!(get_hinge(&world, handle).jacobian_rows().len(), 5);

    world.step(DT);

    let hinge_ref = get_hinge(&world, handle);
    assert_eq!(hinge_ref.get_limit_state(), LimitState::AtUpper);
    assert_eq!(hinge_ref.jacobian_rows().len(), 6);

    let row = hinge_ref.jacobian_rows().last().unwrap();
    assert_eq!(row.kind, RowKind::Limit);
    assert_relative_eq!(row.angular_b, -Vector3::unit_z(), epsilon = 1e-6);
    assert_eq!(row.bounds.lower, 0.0);
    assert!(hinge_ref.get_row_impulse(RowKind::Limit) > 0.0);

    // Pushed back towards the allowed range
    assert!(world.get_body(b).unwrap().get_angular_velocity().z < 0.0);
}

#[test]
fn test_limit_stops_motor() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    {
        let hinge = get_hinge_mut(&mut world, handle);
        hinge.set_limit(HingeLimit::new(-0.5, 0.5));
        hinge.enable_angular_motor(true, 1.0, 0.05);
    }

    for _ in 0..240 {
        world.step(DT);
    }

    // Settles against the upper limit instead of spinning on
    let angle = get_hinge(&world, handle).get_hinge_angle();
    assert!(angle < 0.55, "angle {}", angle);
    assert!(angle > 0.45, "angle {}", angle);
}

#[test]
fn test_swapped_bodies_negate_angle() {
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..10 {
        let mut world = test_world();

        let random_vector = |rng: &mut StdRng| {
            Vector3::new(
                rng.gen_range(-1.0f32..1.0),
                rng.gen_range(-1.0f32..1.0),
                rng.gen_range(-1.0f32..1.0),
            )
        };

        let rot_a = Quaternion::from_axis_angle(
            random_vector(&mut rng).try_normalize().unwrap_or(Vector3::unit_x()),
            rng.gen_range(-PI..PI),
        );
        let rot_b = Quaternion::from_axis_angle(
            random_vector(&mut rng).try_normalize().unwrap_or(Vector3::unit_y()),
            rng.gen_range(-PI..PI),
        );
        let a = world.add_body(RigidBody::new(
            Transform::new(random_vector(&mut rng), rot_a),
            RigidBodyType::Dynamic,
        ));
        let b = world.add_body(RigidBody::new(
            Transform::new(random_vector(&mut rng), rot_b),
            RigidBodyType::Dynamic,
        ));

        let pivot = random_vector(&mut rng);
        let axis = random_vector(&mut rng).try_normalize().unwrap_or(Vector3::unit_z());

        let forward = HingeConstraint::from_world_pivot_axis(world.bodies(), a, b, pivot, axis).unwrap();
        let reverse = HingeConstraint::from_world_pivot_axis(world.bodies(), b, a, pivot, axis).unwrap();

        assert_relative_eq!(forward.get_hinge_axis(), axis, epsilon = 1e-4);
        assert_relative_eq!(reverse.get_hinge_axis(), axis, epsilon = 1e-4);

        let theta = rng.gen_range(-2.5f32..2.5);
        world
            .get_body_mut(b)
            .unwrap()
            .set_rotation(Quaternion::from_axis_angle(axis, theta) * rot_b);

        let forward_angle = forward.current_hinge_angle(world.bodies()).unwrap();
        let reverse_angle = reverse.current_hinge_angle(world.bodies()).unwrap();

        assert_relative_eq!(forward_angle, theta, epsilon = 1e-3);
        assert_relative_eq!(reverse_angle, -theta, epsilon = 1e-3);
    }
}

#[test]
fn test_explicit_frames_match_world_pivot_axis() {
    let mut world = test_world();
    let (a, b) = body_pair(&mut world, Vector3::new(2.0, 0.0, 0.0));

    let (p, q) = math::plane_space(Vector3::unit_z());
    let basis = Quaternion::from_basis(p, q, Vector3::unit_z());

    let explicit = HingeConstraint::new(
        world.bodies(),
        a,
        b,
        Transform::new(Vector3::new(1.0, 0.0, 0.0), basis),
        Transform::new(Vector3::new(-1.0, 0.0, 0.0), basis),
    )
    .unwrap();
    let derived = HingeConstraint::from_world_pivot_axis(
        world.bodies(),
        a,
        b,
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::unit_z(),
    )
    .unwrap();

    for (lhs, rhs) in [
        (explicit.get_frame_a(), derived.get_frame_a()),
        (explicit.get_frame_b(), derived.get_frame_b()),
    ] {
        assert_relative_eq!(lhs.position, rhs.position, epsilon = 1e-5);
        assert_relative_eq!(lhs.axis(0), rhs.axis(0), epsilon = 1e-5);
        assert_relative_eq!(lhs.axis(2), rhs.axis(2), epsilon = 1e-5);
    }

    world
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), 0.7));

    assert_relative_eq!(explicit.current_hinge_angle(world.bodies()).unwrap(), 0.7, epsilon = 1e-5);
    assert_relative_eq!(derived.current_hinge_angle(world.bodies()).unwrap(), 0.7, epsilon = 1e-5);
}

#[test]
fn test_identity_frames_hinge_about_z() {
    let mut world = test_world();
    let (a, b) = body_pair(&mut world, Vector3::zero());

    let hinge = HingeConstraint::new(
        world.bodies(),
        a,
        b,
        Transform::identity(),
        Transform::identity(),
    )
    .unwrap();

    world
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), -1.2));

    assert_relative_eq!(hinge.current_hinge_angle(world.bodies()).unwrap(), -1.2, epsilon = 1e-5);
}

#[test]
fn test_pendulum_keeps_pivot() {
    let mut world = test_world();
    world.set_gravity(GravityType::Constant(Vector3::new(0.0, -9.81, 0.0)));

    let (a, b) = body_pair(&mut world, Vector3::new(1.0, 0.0, 0.0));
    let hinge = HingeConstraint::from_world_pivot_axis(
        world.bodies(),
        a,
        b,
        Vector3::zero(),
        Vector3::unit_z(),
    )
    .unwrap();
    let handle = world.add_constraint(Box::new(hinge)).unwrap();

    for _ in 0..20 {
        world.step(DT);
    }

    // Swinging down is a negative rotation about +Z
    assert!(get_hinge(&world, handle).get_hinge_angle() < 0.0);

    for _ in 0..40 {
        world.step(DT);
    }

    let position = world.get_body(b).unwrap().get_position();
    assert_relative_eq!(position.length(), 1.0, epsilon = 0.05);
    assert!(position.z.abs() < 1e-4);
}

#[test]
fn test_angular_only_drops_point_rows() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    get_hinge_mut(&mut world, handle).set_angular_only(true);
    world.step(DT);
    assert_eq!(row_kinds(get_hinge(&world, handle)), vec![RowKind::Angular, RowKind::Angular]);

    get_hinge_mut(&mut world, handle).enable_angular_motor(true, 1.0, 1.0);
    world.step(DT);
    assert_eq!(
        row_kinds(get_hinge(&world, handle)),
        vec![RowKind::Angular, RowKind::Angular, RowKind::Motor]
    );

    get_hinge_mut(&mut world, handle).set_angular_only(false);
    world.step(DT);
    assert_eq!(get_hinge(&world, handle).jacobian_rows().len(), 6);
    assert!(!get_hinge(&world, handle).is_angular_only());
}

#[test]
fn test_breaking_threshold_disables_hinge() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    {
        let hinge = get_hinge_mut(&mut world, handle);
        hinge.enable_angular_motor(true, 10.0, 5.0);
        hinge.set_breaking_impulse_threshold(1.0);
    }

    world.step(DT);
    assert!(!get_hinge(&world, handle).is_enabled());

    world.step(DT);
    assert!(get_hinge(&world, handle).jacobian_rows().is_empty());
}

#[test]
fn test_set_motor_target() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    let hinge = get_hinge_mut(&mut world, handle);
    hinge.set_motor_target(0.3, 0.1).unwrap();
    assert_relative_eq!(hinge.get_motor_target_velocity(), 3.0, epsilon = 1e-5);

    // Clamped into the limits first
    hinge.set_limit(HingeLimit::new(-1.0, 1.0));
    hinge.set_motor_target(2.0, 0.5).unwrap();
    assert_relative_eq!(hinge.get_motor_target_velocity(), 2.0, epsilon = 1e-5);

    assert!(matches!(
        hinge.set_motor_target(1.0, 0.0),
        Err(PhysicsError::InvalidArgument(_))
    ));
}

#[test]
fn test_construction_errors() {
    let mut world = test_world();
    let (a, b) = body_pair(&mut world, Vector3::new(1.0, 0.0, 0.0));

    let same = HingeConstraint::new(world.bodies(), a, a, Transform::identity(), Transform::identity());
    assert!(matches!(same, Err(PhysicsError::InvalidArgument(_))));

    let degenerate = Transform::new(Vector3::zero(), Quaternion::new(0.0, 0.0, 0.0, 0.0));
    let result = HingeConstraint::new(world.bodies(), a, b, degenerate, Transform::identity());
    assert!(matches!(result, Err(PhysicsError::DegenerateAxis(_))));

    let result = HingeConstraint::from_world_pivot_axis(world.bodies(), a, b, Vector3::zero(), Vector3::zero());
    assert!(matches!(result, Err(PhysicsError::DegenerateAxis(_))));

    let tilted = Transform::new(
        Vector3::zero(),
        Quaternion::from_axis_angle(Vector3::unit_x(), 0.5),
    );
    let result = HingeConstraint::new_strict(world.bodies(), a, b, Transform::identity(), tilted, 0.1);
    assert!(matches!(result, Err(PhysicsError::DegenerateAxis(_))));
    assert!(HingeConstraint::new_strict(world.bodies(), a, b, Transform::identity(), tilted, 1.0).is_ok());

    let stale = world.add_body(RigidBody::new_dynamic(Vector3::zero()));
    world.remove_body(stale).unwrap();
    let result = HingeConstraint::new(world.bodies(), a, stale, Transform::identity(), Transform::identity());
    assert!(matches!(result, Err(PhysicsError::InvalidBodyReference(_))));
}

#[test]
fn test_add_constraint_with_removed_body_fails() {
    let mut world = test_world();
    let (a, b) = body_pair(&mut world, Vector3::zero());

    let hinge = HingeConstraint::new(world.bodies(), a, b, Transform::identity(), Transform::identity()).unwrap();
    world.remove_body(b).unwrap();

    let result = world.add_constraint(Box::new(hinge));
    assert!(matches!(result, Err(PhysicsError::InvalidBodyReference(_))));
    assert_eq!(world.constraint_count(), 0);
}

#[test]
fn test_limit_evaluation() {
    let limit = HingeLimit::new(-1.0, 1.0);

    assert_eq!(limit.evaluate(0.0), (LimitState::Free, 0.0));
    assert_eq!(limit.evaluate(1.5), (LimitState::AtUpper, 0.5));
    assert_eq!(limit.evaluate(-1.0), (LimitState::AtLower, 0.0));
    assert_eq!(HingeLimit::free().evaluate(100.0), (LimitState::Free, 0.0));

    let locked = HingeLimit::locked(0.2);
    assert!(locked.is_locked());
    assert_eq!(locked.evaluate(0.2).0, LimitState::AtLower);
    assert_eq!(locked.evaluate(0.3).0, LimitState::AtUpper);

    assert_eq!(limit.clamp_angle(3.0), 1.0);
    assert_eq!(HingeLimit::free().clamp_angle(3.0), 3.0);
}

#[test]
fn test_limit_factors_are_clamped() {
    let limit = HingeLimit::new(-1.0, 1.0)
        .with_softness(1.5)
        .with_bias_factor(-0.5)
        .with_relaxation_factor(0.5);

    assert_eq!(limit.softness, 1.0);
    assert_eq!(limit.bias_factor, 0.0);
    assert_eq!(limit.relaxation_factor, 0.5);

    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    let mut raw = HingeLimit::new(-1.0, 1.0);
    raw.softness = 7.0;
    get_hinge_mut(&mut world, handle).set_limit(raw);
    assert_eq!(get_hinge(&world, handle).get_limit().softness, 1.0);

    // Zero softness or relaxation would leave the limit row without effect
    let limit = HingeLimit::new(-1.0, 1.0)
        .with_softness(0.0)
        .with_relaxation_factor(0.0);
    assert_eq!(limit.softness, MIN_LIMIT_FACTOR);
    assert_eq!(limit.relaxation_factor, MIN_LIMIT_FACTOR);
    assert!(limit.relaxation_factor > 0.0);

    let mut raw = HingeLimit::new(-1.0, 1.0);
    raw.relaxation_factor = f32::NAN;
    get_hinge_mut(&mut world, handle).set_limit(raw);
    assert_eq!(get_hinge(&world, handle).get_limit().relaxation_factor, MIN_LIMIT_FACTOR);
}

/// Hinge about Z turned to 0.5 rad, then limited to [-0.2, 0.2] and stepped once
fn step_past_upper_limit(limit: HingeLimit) -> (PhysicsWorld, ConstraintHandle) {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    world
        .get_body_mut(b)
        .unwrap()
        .set_rotation(Quaternion::from_axis_angle(Vector3::unit_z(), 0.5));
    get_hinge_mut(&mut world, handle).set_limit(limit);
    world.step(DT);

    (world, handle)
}

#[test]
fn test_limit_row_uses_softness_and_bias_factor() {
    let limit = HingeLimit::new(-0.2, 0.2)
        .with_softness(0.5)
        .with_bias_factor(0.4)
        .with_relaxation_factor(0.6);
    let (world, handle) = step_past_upper_limit(limit);

    let hinge = get_hinge(&world, handle);
    assert_eq!(hinge.get_limit_state(), LimitState::AtUpper);

    let row = hinge.jacobian_rows().last().unwrap();
    assert_eq!(row.kind, RowKind::Limit);

    let penetration = 0.5 - 0.2;
    assert_relative_eq!(row.target_velocity, 0.5 * 0.4 * penetration / DT, epsilon = 1e-3);
    assert_relative_eq!(row.relaxation, 0.6);

    // Defaults give a different correction speed
    let (world, handle) = step_past_upper_limit(HingeLimit::new(-0.2, 0.2));
    let row = get_hinge(&world, handle).jacobian_rows().last().unwrap().clone();
    assert_relative_eq!(
        row.target_velocity,
        DEFAULT_LIMIT_SOFTNESS * DEFAULT_LIMIT_BIAS_FACTOR * penetration / DT,
        epsilon = 1e-3
    );
    assert_relative_eq!(row.relaxation, DEFAULT_LIMIT_RELAXATION_FACTOR);
}

#[test]
fn test_smaller_relaxation_gives_smaller_limit_impulse() {
    let (stiff_world, stiff) = step_past_upper_limit(HingeLimit::new(-0.2, 0.2).with_relaxation_factor(1.0));
    let (soft_world, soft) = step_past_upper_limit(HingeLimit::new(-0.2, 0.2).with_relaxation_factor(0.1));

    let stiff_impulse = get_hinge(&stiff_world, stiff).get_row_impulse(RowKind::Limit);
    let soft_impulse = get_hinge(&soft_world, soft).get_row_impulse(RowKind::Limit);

    assert!(soft_impulse > 0.0);
    assert!(
        soft_impulse < stiff_impulse,
        "relaxation 0.1 gave {}, relaxation 1.0 gave {}",
        soft_impulse,
        stiff_impulse
    );
}

#[test]
fn test_nan_limit_bound_leaves_hinge_free() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    let hinge = get_hinge_mut(&mut world, handle);
    hinge.set_limit(HingeLimit::new(f32::NAN, 1.0));
    assert!(hinge.get_limit().is_free());

    hinge.set_motor_target(0.5, DT).unwrap();
    assert_relative_eq!(hinge.get_motor_target_velocity(), 0.5 / DT, epsilon = 1e-3);

    // Unsanitized limits don't panic either
    assert_eq!(HingeLimit::new(-1.0, f32::NAN).clamp_angle(3.0), 3.0);

    world.step(DT);
    assert_eq!(get_hinge(&world, handle).get_limit_state(), LimitState::Free);
}

#[test]
fn test_angle_tracker_unwraps() {
    let mut tracker = AngleTracker::new(3.0);

    assert_relative_eq!(tracker.update(-3.0), TAU - 3.0, epsilon = 1e-5);
    assert_relative_eq!(tracker.update(-2.0), TAU - 2.0, epsilon = 1e-5);
    assert_relative_eq!(tracker.update(3.0), 3.0, epsilon = 1e-5);
    assert_relative_eq!(tracker.update(-3.0), TAU - 3.0, epsilon = 1e-5);
}

#[test]
fn test_frames_and_tuning_setters() {
    let mut world = test_world();
    let (_, b, handle) = z_hinge(&mut world);

    let hinge = get_hinge_mut(&mut world, handle);
    hinge.set_error_reduction(3.0);
    assert_eq!(hinge.get_error_reduction(), 1.0);

    let degenerate = Transform::new(Vector3::zero(), Quaternion::new(0.0, 0.0, 0.0, 0.0));
    assert!(matches!(
        hinge.set_frames(degenerate, Transform::identity()),
        Err(PhysicsError::DegenerateAxis(_))
    ));

    // Turning frame B about the hinge axis shifts the measured angle
    let quarter = Transform::new(
        Vector3::zero(),
        Quaternion::from_axis_angle(Vector3::unit_z(), -0.5),
    );
    let frame_a = hinge.get_frame_a();
    hinge.set_frames(frame_a, frame_a.compose(&quarter)).unwrap();

    assert_eq!(hinge.get_body_b(), b);
    let angle = get_hinge(&world, handle).current_hinge_angle(world.bodies()).unwrap();
    assert_relative_eq!(angle, -0.5, epsilon = 1e-5);
}

#[test]
fn test_cloned_constraint_is_independent() {
    let mut world = test_world();
    let (_, _, handle) = z_hinge(&mut world);

    let mut copy = get_hinge(&world, handle).clone_constraint();
    copy.set_enabled(false);

    assert!(!copy.is_enabled());
    assert!(get_hinge(&world, handle).is_enabled());
    assert!(copy.as_any().downcast_ref::<HingeConstraint>().is_some());
}
