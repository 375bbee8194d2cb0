use super::orbital_math::{burn_time, circularization_dv, local_gravity, twr, vis_viva};
use super::{PidGains, PidRegulator, PitchHysteresis, PitchProgram};
use crate::flight_control::guidance_error::GuidanceError;
use itertools::Itertools;
use rand::Rng;

const KERBIN_MU: f64 = 3.5316e12;

fn gains(kp: f64, ki: f64, kd: f64) -> PidGains { PidGains { kp, ki, kd, anti_windup: true } }

#[test]
fn test_pid_zero_error_keeps_integral() {
    let mut pid = PidRegulator::new(gains(0.5, 0.2, 0.1), 20_000.0, 0.0, 1.0);
    for _ in 0..100 {
        let out = pid.update(20_000.0, 0.05).unwrap();
        assert_eq!(out, 0.0);
        assert_eq!(pid.integral(), 0.0);
    }
}

#[test]
fn test_pid_proportional_step() {
    let mut pid = PidRegulator::new(gains(0.01, 0.0, 0.0), 100.0, -10.0, 10.0);
    for _ in 0..10 {
        let out = pid.update(40.0, 0.1).unwrap();
        assert!((out - 0.6).abs() < 1e-12);
    }
}

#[test]
fn test_pid_step_approaches_proportional_term() {
    let error = 50.0;
    let outputs = [1e-1, 1e-2, 1e-3, 1e-4]
        .iter()
        .map(|k| {
            let mut pid = PidRegulator::new(gains(0.02, *k, *k), error, -100.0, 100.0);
            pid.update(0.0, 0.1).unwrap();
            pid.update(0.0, 0.1).unwrap()
        })
        .collect_vec();
    let proportional = 0.02 * error;
    for (a, b) in outputs.iter().tuple_windows() {
        assert!((b - proportional).abs() <= (a - proportional).abs());
    }
    assert!((outputs[3] - proportional).abs() < 1e-2);
}

#[test]
fn test_pid_anti_windup_resets_on_upper_saturation() {
    let mut pid = PidRegulator::new(gains(0.1, 1.0, 0.0), 100.0, 0.0, 1.0);
    let out = pid.update(0.0, 1.0).unwrap();
    assert!(out >= 1.0);
    assert_eq!(pid.integral(), 0.0);
    assert_eq!(pid.clamp(out), 1.0);
}

#[test]
fn test_pid_lower_saturation_keeps_integrating() {
    let mut pid = PidRegulator::new(gains(0.1, 1.0, 0.0), 0.0, 0.0, 1.0);
    pid.update(100.0, 1.0).unwrap();
    let out = pid.update(100.0, 1.0).unwrap();
    assert!(out < 0.0);
    assert_eq!(pid.integral(), -200.0);
    assert_eq!(pid.clamp(out), 0.0);
}

#[test]
fn test_pid_windup_guard_can_be_disabled() {
    let mut pid =
        PidRegulator::new(PidGains { kp: 0.1, ki: 1.0, kd: 0.0, anti_windup: false }, 100.0, 0.0, 1.0);
    pid.update(0.0, 1.0).unwrap();
    assert_eq!(pid.integral(), 100.0);
}

#[test]
fn test_pid_rejects_invalid_interval() {
    let mut pid = PidRegulator::new(gains(1.0, 1.0, 1.0), 10.0, 0.0, 1.0);
    pid.update(5.0, 0.5).unwrap();
    let (integral, previous) = (pid.integral(), pid.previous_error());
    for dt in [0.0, -0.1, f64::NAN] {
        assert!(matches!(pid.update(0.0, dt), Err(GuidanceError::InvalidInterval(_))));
    }
    assert_eq!(pid.integral(), integral);
    assert_eq!(pid.previous_error(), previous);
}

#[test]
fn test_pid_retarget_clears_state() {
    let mut pid = PidRegulator::new(gains(0.5, 0.5, 0.0), 20_000.0, 0.0, 1.0);
    pid.update(19_999.0, 0.1).unwrap();
    assert!(pid.integral() != 0.0);
    pid.retarget(2.0);
    assert_eq!(pid.setpoint(), 2.0);
    assert_eq!(pid.integral(), 0.0);
    assert_eq!(pid.previous_error(), 0.0);
}

#[test]
fn test_linear_fraction_endpoints_and_monotonic() {
    let program = PitchProgram::LinearFraction { turn_start: 250.0, turn_end: 45_000.0 };
    assert_eq!(program.target_pitch(250.0, 0.0), 90.0);
    assert_eq!(program.target_pitch(45_000.0, 0.0), 0.0);
    assert_eq!(program.target_pitch(0.0, 0.0), 90.0);
    assert_eq!(program.target_pitch(80_000.0, 0.0), 0.0);
    assert!((program.target_pitch(22_625.0, 0.0) - 45.0).abs() < 1e-9);
    let pitches = (0..=1000).map(|i| program.target_pitch(f64::from(i) * 50.0, 0.0)).collect_vec();
    assert!(pitches.iter().tuple_windows().all(|(a, b)| b <= a));
}

#[test]
fn test_linear_tangent_guarded_near_target() {
    let program = PitchProgram::LinearTangent { orbit_height: 80_000.0, steepness: 1.0 };
    assert_eq!(program.target_pitch(0.0, 0.0), 90.0);
    assert!((program.target_pitch(40_000.0, 0.0) - 45.0).abs() < 1e-9);
    for alt in [79_999.5, 80_000.0, 120_000.0] {
        let pitch = program.target_pitch(alt, 0.0);
        assert!(pitch.is_finite());
        assert!(pitch < 0.01);
    }
    let pitches = (0..=800).map(|i| program.target_pitch(f64::from(i) * 100.0, 0.0)).collect_vec();
    assert!(pitches.iter().tuple_windows().all(|(a, b)| b <= a));
}

#[test]
fn test_square_root_apoapsis_profile() {
    let program =
        PitchProgram::SquareRootApoapsis { switch_altitude: 1_000.0, atmosphere_depth: 70_000.0 };
    assert_eq!(program.target_pitch(0.0, 500.0), 90.0);
    assert_eq!(program.target_pitch(0.0, 70_000.0), 0.0);
    assert_eq!(program.target_pitch(0.0, 90_000.0), 0.0);
    let quarter = 1_000.0 + 0.25 * 69_000.0;
    assert!((program.target_pitch(0.0, quarter) - 45.0).abs() < 1e-9);
}

#[test]
fn test_pitch_hysteresis() {
    let mut hyst = PitchHysteresis::new(0.5);
    assert_eq!(hyst.filter(90.0), Some(90.0));
    assert_eq!(hyst.filter(89.7), None);
    assert_eq!(hyst.filter(89.5), None);
    assert_eq!(hyst.filter(89.4), Some(89.4));
    assert_eq!(hyst.commanded(), Some(89.4));
}

#[test]
fn test_vis_viva_no_change() {
    let dv = circularization_dv(KERBIN_MU, 650_000.0, 650_000.0, 650_000.0).unwrap();
    assert!(dv.abs() < 1e-9);
}

#[test]
fn test_vis_viva_from_circular_orbit() {
    let r = 700_000.0;
    let a2 = 900_000.0;
    let dv = circularization_dv(KERBIN_MU, r, r, a2).unwrap();
    let circular = (KERBIN_MU / r).sqrt();
    let transfer = (KERBIN_MU * (2.0 / r - 1.0 / a2)).sqrt();
    assert!((dv - (transfer - circular)).abs() < 1e-9);
    assert!(dv > 0.0);
}

#[test]
fn test_circularization_scenario() {
    let dv = circularization_dv(KERBIN_MU, 650_000.0, 600_000.0, 650_000.0).unwrap();
    assert!(dv > 90.0 && dv < 110.0, "dv = {dv}");
    let bt = burn_time(dv, 300.0, 15_000.0, 200_000.0).unwrap();
    assert!(bt.is_finite());
    assert!(bt > 0.0 && bt < 10.0, "burn time = {bt}");
}

#[test]
fn test_vis_viva_rejects_bad_inputs() {
    assert!(matches!(
        circularization_dv(0.0, 650_000.0, 600_000.0, 650_000.0),
        Err(GuidanceError::SensorFault(_))
    ));
    assert!(matches!(
        circularization_dv(KERBIN_MU, f64::NAN, 600_000.0, 650_000.0),
        Err(GuidanceError::SensorFault(_))
    ));
    assert!(vis_viva(KERBIN_MU, 2_000_000.0, 600_000.0).is_err());
}

#[test]
fn test_burn_time_rejects_zero_thrust() {
    assert!(matches!(burn_time(100.0, 300.0, 15_000.0, 0.0), Err(GuidanceError::SensorFault(_))));
    assert!(matches!(burn_time(100.0, 0.0, 15_000.0, 1.0), Err(GuidanceError::SensorFault(_))));
}

#[test]
fn test_burn_time_monotonic() {
    let mut rng = rand::rng();
    let mut dvs = (0..50).map(|_| rng.random_range(1.0..3_000.0)).collect_vec();
    dvs.sort_by(f64::total_cmp);
    let times = dvs.iter().map(|dv| burn_time(*dv, 300.0, 15_000.0, 200_000.0).unwrap()).collect_vec();
    assert!(times.iter().tuple_windows().all(|(a, b)| b >= a));

    let mut thrusts = (0..50).map(|_| rng.random_range(1_000.0..500_000.0)).collect_vec();
    thrusts.sort_by(f64::total_cmp);
    let times = thrusts.iter().map(|t| burn_time(500.0, 300.0, 15_000.0, *t).unwrap()).collect_vec();
    assert!(times.iter().tuple_windows().all(|(a, b)| b <= a));
}

#[test]
fn test_twr_helpers() {
    let g = local_gravity(KERBIN_MU, 600_000.0);
    assert!((g - 9.81).abs() < 0.01);
    assert!((twr(2.0 * 1_000.0 * g, 1_000.0, g).unwrap() - 2.0).abs() < 1e-12);
    assert!(twr(1.0, 0.0, g).is_none());
}
