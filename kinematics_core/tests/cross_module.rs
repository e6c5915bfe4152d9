use kinematics_core::chain::implicit_chain;
use kinematics_core::ik::{self, IkConstraints};
use kinematics_core::intent::{self, MotionSample};
use kinematics_core::math::Vec3;
use kinematics_core::{fk, presets, trajectory};

#[test]
fn ik_solution_is_consistent_with_fk_evaluation() {
    let preset = presets::get("robotic_arm_6dof").unwrap();
    let constraints = IkConstraints::default();
    let target = Vec3::new(0.2, 0.3, 0.1);

    let solution = ik::solve(&preset.chain, target, None, &constraints, None).unwrap();
    assert_eq!(solution.joint_angles.len(), preset.chain.dof());

    let fk_out = fk::evaluate(&preset.chain, &solution.joint_angles).unwrap();
    if solution.converged {
        let err = (target - fk_out.end_effector_position).norm();
        assert!(err <= constraints.tolerance + 1e-9);
    }
}

#[test]
fn all_presets_produce_finite_fk_output_at_zero_pose() {
    for preset in presets::all() {
        let q = vec![0.0; preset.chain.dof()];
        let out = fk::evaluate(&preset.chain, &q).unwrap();
        assert!(out.end_effector_position.validate().is_ok());
    }
}

#[test]
fn implicit_chain_round_trips_through_ik_and_fk() {
    let lengths = vec![0.2, 0.2, 0.2, 0.2];
    let chain = implicit_chain(&lengths).unwrap();
    let constraints = IkConstraints {
        max_iterations: 200,
        tolerance: 1e-6,
    };
    let target = Vec3::new(0.3, 0.2, 0.0);
    let solution = ik::solve(&chain, target, None, &constraints, None).unwrap();
    let fk_out = fk::evaluate(&chain, &solution.joint_angles).unwrap();
    if solution.converged {
        assert!((target - fk_out.end_effector_position).norm() < 1e-4);
    }
}

#[test]
fn intent_classification_feeds_a_plausible_trajectory() {
    let samples: Vec<MotionSample> = (0..12)
        .map(|i| MotionSample {
            timestamp: i as f64 * 0.05,
            position: Vec3::new(i as f64 * 0.05, 0.0, 0.0),
            velocity: None,
        })
        .collect();
    let compressed = intent::compress(&samples, 20.0).unwrap();

    let waypoints = vec![
        samples.first().unwrap().position,
        samples.last().unwrap().position,
    ];
    let profile = trajectory::optimize(&waypoints, 1.0).unwrap();

    assert!(profile.total_distance > 0.0);
    assert!(compressed.magnitude > 0.0);
}

#[test]
fn delta_robot_prismatic_chain_reaches_within_stroke() {
    let preset = presets::get("delta_robot").unwrap();
    let constraints = IkConstraints::default();
    let target = Vec3::new(0.0, 0.0, 0.25);
    let solution = ik::solve(&preset.chain, target, None, &constraints, None).unwrap();
    assert_eq!(solution.joint_angles.len(), 3);
}
