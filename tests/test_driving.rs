use std::path::PathBuf;

use assert_approx_eq::assert_approx_eq;

use rust_dsim::simulation::config::DriverConfig;
use rust_dsim::simulation::logging::init_std_out_logging_thread_local;
use rust_dsim::simulation::models::acc::Acc;
use rust_dsim::simulation::models::idm::Idm;
use rust_dsim::simulation::models::mobil::Mobil;
use rust_dsim::simulation::models::LongitudinalModel;
use rust_dsim::simulation::random::vehicle_rng;

/// Minimal stand-in for the external stepper: integrates one follower behind
/// a leader driving at constant speed and returns the follower's speed and
/// gap trajectory.
fn follow_leader(
    model: &dyn LongitudinalModel,
    seed: u64,
    v_leader: f64,
    mut s: f64,
    mut v: f64,
    steps: usize,
) -> Vec<(f64, f64)> {
    let dt = 0.25;
    let mut rng = vehicle_rng(seed, "follower");
    let mut trajectory = Vec::with_capacity(steps);

    for _ in 0..steps {
        let acc = model.calc_acc(s, v, v_leader, 0., &mut rng);
        v = f64::max(0., v + acc * dt);
        s += (v_leader - v) * dt;
        trajectory.push((v, s));
    }
    trajectory
}

#[test]
fn idm_worked_example() {
    // accFree ~ 0.518, s* = 39.5, accInt ~ -0.624, so roughly -0.106 up to
    // the +-0.15 noise band
    let idm = Idm::new(30., 1.5, 2., 1., 1.5);
    let acc = idm.calc_acc(50., 25., 25., 0., &mut vehicle_rng(42, 1u32));
    assert_approx_eq!(acc, -0.106, 0.16);
}

#[test]
fn mobil_worked_example() {
    let mobil = Mobil::new(4., 8., 0., 0.2, 0.1);
    assert!(mobil.realize_lane_change(1., 0., 0.5, -2., true));
}

#[test]
fn follower_settles_behind_slower_leader() {
    let _guard = init_std_out_logging_thread_local();

    let idm = Idm::new(30., 1.5, 2., 1., 1.5);
    let acc = Acc::new(30., 1.5, 2., 1., 1.5);
    let models: [&dyn LongitudinalModel; 2] = [&idm, &acc];

    for model in models {
        // fast follower closing in on a 15 m/s leader from 150 m behind
        let trajectory = follow_leader(model, 42, 15., 150., 25., 4000);

        for (_, s) in &trajectory {
            assert!(*s > 0.5, "follower crashed into leader");
        }

        // settled close to the leader speed with roughly the desired gap
        let (v_end, s_end) = trajectory[trajectory.len() - 1];
        assert_approx_eq!(v_end, 15., 1.);
        assert_approx_eq!(s_end, 2. + 15. * 1.5, 5.);
    }
}

#[test]
fn trajectories_are_reproducible() {
    let acc = Acc::new(30., 1.5, 2., 1., 1.5);

    let first = follow_leader(&acc, 42, 15., 150., 25., 500);
    let second = follow_leader(&acc, 42, 15., 150., 25., 500);
    assert_eq!(first, second);

    let other_seed = follow_leader(&acc, 43, 15., 150., 25., 500);
    assert_ne!(first, other_seed);
}

#[test]
fn lane_change_pipeline() {
    // the shape of a stepper's lane-change evaluation: one longitudinal model
    // produces all four accelerations, MOBIL turns them into a decision
    let config = DriverConfig::from(PathBuf::from("./tests/resources/driver_config.yml"));
    let car = config.vehicle_class("car");
    let model = car.create_longitudinal();
    let mobil = car.create_lane_change().unwrap();
    let mut rng = vehicle_rng(config.seed, "veh_0");

    let v = 20.;
    let v0 = car.longitudinal.v0;

    // stuck behind a slow leader, target lane wide open, new follower far back
    let acc = model.calc_acc(20., v, 12., 0., &mut rng);
    let acc_new = model.calc_acc(500., v, 25., 0., &mut rng);
    let acc_lag_new = model.calc_acc(80., 22., v, 0., &mut rng);
    assert!(mobil.realize_lane_change(v / v0, acc, acc_new, acc_lag_new, false));

    // same incentive, but the change would cut off a fast follower
    let acc_lag_new = model.calc_acc(1., 30., v, 0., &mut rng);
    assert!(!mobil.realize_lane_change(v / v0, acc, acc_new, acc_lag_new, false));
}

#[test]
fn give_way_through_trait_object() {
    let config = DriverConfig::from(PathBuf::from("./tests/resources/driver_config.yml"));
    let mut rng = vehicle_rng(config.seed, "veh_1");

    // the corrected IDM contract: explicit pre-merge acceleration, returned
    // when yielding would mean emergency braking
    let truck = config.vehicle_class("truck").create_longitudinal();
    let kept = truck.calc_acc_give_way(0.5, 22., 0., 0.25, &mut rng);
    assert_eq!(kept, 0.25);

    // the ACC give-way response is an unresolved placeholder
    let car = config.vehicle_class("car").create_longitudinal();
    let placeholder = car.calc_acc_give_way(40., 20., 20., 0.25, &mut rng);
    assert_eq!(placeholder, -4.);
}
