use super::{Body, OrbitElements, SimVessel, Vec2, VesselModel};
use crate::flight_control::{
    telemetry::Propellant,
    vessel_link::{Actuator, TelemetrySource, TimeWarp},
};
use std::sync::Arc;

#[test]
fn test_circular_orbit_elements() {
    let body = Body::KERBIN;
    let r = body.radius + 100_000.0;
    let orbit = OrbitElements::from_state(body.mu, Vec2::new(0.0, r), Vec2::new((body.mu / r).sqrt(), 0.0));
    assert!(orbit.eccentricity < 1e-9);
    assert!((orbit.semi_major_axis - r).abs() < 1e-3);
    assert!((orbit.apoapsis_radius - r).abs() < 1e-3);
    assert!((orbit.periapsis_radius - r).abs() < 1e-3);
}

#[test]
fn test_time_to_apoapsis_from_periapsis() {
    let body = Body::KERBIN;
    let r = body.radius + 100_000.0;
    // 5 % above circular speed puts the current position at periapsis
    let v = (body.mu / r).sqrt() * 1.05;
    let orbit = OrbitElements::from_state(body.mu, Vec2::new(0.0, r), Vec2::new(v, 0.0));
    let period = 2.0 * std::f64::consts::PI * (orbit.semi_major_axis.powi(3) / body.mu).sqrt();
    assert!((orbit.periapsis_radius - r).abs() < 1.0);
    assert!(orbit.apoapsis_radius > r);
    assert!((orbit.time_to_apoapsis - period / 2.0).abs() < 1.0, "{orbit:?}");
}

#[test]
fn test_escape_has_no_apoapsis() {
    let body = Body::KERBIN;
    let r = body.radius + 100_000.0;
    let v = (2.0 * body.mu / r).sqrt() * 1.1;
    let orbit = OrbitElements::from_state(body.mu, Vec2::new(0.0, r), Vec2::new(v, 0.0));
    assert!(orbit.apoapsis_radius.is_infinite());
    assert!(orbit.time_to_apoapsis.is_infinite());
}

#[test]
fn test_pad_stays_put_without_thrust() {
    let mut model = VesselModel::three_stage();
    for _ in 0..100 {
        model.step(VesselModel::STEP);
    }
    assert_eq!(model.altitude(), 0.0);
    assert_eq!(model.vel, Vec2::default());
    assert!((model.ut - 5.0).abs() < 1e-9);
}

#[test]
fn test_staging_sequence() {
    let mut model = VesselModel::three_stage();
    assert_eq!(model.current_stage, 3);
    assert_eq!(model.available_thrust(), 0.0);
    let full_mass = model.mass();

    assert_eq!(model.activate_next_stage(), Some(2));
    assert_eq!(model.available_thrust(), 350_000.0);
    assert_eq!(model.stage_propellant(1, Propellant::SolidFuel), 3_000.0);
    assert_eq!(model.stage_propellant(1, Propellant::LiquidFuel), 0.0);

    assert_eq!(model.activate_next_stage(), Some(1));
    assert_eq!(model.available_thrust(), 200_000.0);
    assert_eq!(model.stage_propellant(1, Propellant::SolidFuel), 0.0);
    assert!((full_mass - model.mass() - 3_600.0).abs() < 1e-9);

    assert_eq!(model.activate_next_stage(), Some(0));
    assert_eq!(model.available_thrust(), 60_000.0);
    assert!((model.specific_impulse() - 345.0).abs() < 1e-9);

    assert_eq!(model.activate_next_stage(), None);
    assert_eq!(model.staging_log.iter().map(|(_, s)| *s).collect::<Vec<_>>(), vec![2, 1, 0]);
}

#[test]
fn test_solid_motors_ignore_throttle() {
    let mut model = VesselModel::three_stage();
    model.activate_next_stage();
    model.throttle = 0.0;
    assert_eq!(model.current_thrust(), 150_000.0);
    model.throttle = 0.5;
    assert_eq!(model.current_thrust(), 250_000.0);
}

#[test]
fn test_node_delta_v_is_consumed() {
    let mut model = VesselModel::in_orbit(100_000.0);
    let node = model.add_node(model.ut, 20.0);
    assert_eq!(model.node_remaining_dv(), Some(20.0));
    model.autopilot_engaged = true;
    model.tracking_node = true;
    model.throttle = 1.0;
    let start_speed = model.vel.abs();
    for _ in 0..10 {
        model.step(VesselModel::STEP);
    }
    let remaining = model.node_remaining_dv().unwrap();
    assert!(remaining < 20.0);
    assert!(model.vel.abs() > start_speed);
    assert!(model.remove_node(node.id));
    assert!(!model.remove_node(node.id));
    assert_eq!(model.node_remaining_dv(), None);
}

#[tokio::test]
async fn test_sim_vessel_commands() {
    let vessel = Arc::new(SimVessel::new(VesselModel::three_stage()));
    assert!(vessel.set_throttle(1.5).await.is_err());
    vessel.set_throttle(0.5).await.unwrap();
    vessel.engage_autopilot().await.unwrap();
    vessel.set_pitch_and_heading(80.0, 90.0).await.unwrap();
    assert_eq!(vessel.activate_next_stage().await.unwrap(), 2);

    let before = vessel.inspect(|m| m.ut).await;
    let s = vessel.sample().await.unwrap();
    assert!((s.universal_time - before - VesselModel::STEP).abs() < 1e-9);
    assert_eq!(s.current_stage, 2);
    assert_eq!(s.throttle, 0.5);
    assert!(s.attitude_error > 0.0);
    assert!(s.current_thrust > 150_000.0);

    vessel.freeze_clock(true);
    let frozen = vessel.sample().await.unwrap();
    assert_eq!(frozen.universal_time, s.universal_time);
}

#[tokio::test]
async fn test_sim_vessel_nodes_and_warp() {
    let vessel = Arc::new(SimVessel::new(VesselModel::in_orbit(100_000.0)));
    assert!(vessel.next_node().await.unwrap().is_none());
    let node = vessel.add_node(120.0, 15.0).await.unwrap();
    assert_eq!(vessel.next_node().await.unwrap(), Some(node));
    vessel.point_at_node(&node).await.unwrap();

    vessel.warp_to(100.0).await.unwrap();
    let s = vessel.sample().await.unwrap();
    assert!(s.universal_time >= 100.0);
    assert_eq!(s.node_remaining_dv, Some(15.0));

    vessel.remove_node(&node).await.unwrap();
    assert!(vessel.remove_node(&node).await.is_err());
    assert!(vessel.point_at_node(&node).await.is_err());
}

#[tokio::test]
async fn test_attitude_hold_follows_last_target() {
    let vessel = Arc::new(SimVessel::new(VesselModel::in_orbit(100_000.0)));
    let node = vessel.add_node(120.0, -15.0).await.unwrap();

    vessel.point_at_node(&node).await.unwrap();
    let (engaged, tracking) = vessel.inspect(|m| (m.autopilot_engaged, m.tracking_node)).await;
    assert!(engaged && tracking);
    // retrograde node, the nose still points prograde
    assert!(vessel.sample().await.unwrap().attitude_error > 170.0);

    vessel.engage_autopilot().await.unwrap();
    let (engaged, tracking) = vessel.inspect(|m| (m.autopilot_engaged, m.tracking_node)).await;
    assert!(engaged && !tracking);
    assert!(vessel.sample().await.unwrap().attitude_error < 1.0);
}

#[tokio::test]
async fn test_noise_stays_bounded() {
    let vessel = SimVessel::new(VesselModel::three_stage()).with_noise(2.0);
    for _ in 0..50 {
        let s = vessel.sample().await.unwrap();
        assert!(s.altitude.abs() <= 2.0);
        assert!(s.dynamic_pressure >= 0.0);
    }
}

#[tokio::test]
async fn test_exhausted_stages_are_rejected() {
    let vessel = SimVessel::new(VesselModel::in_orbit(100_000.0));
    assert!(vessel.activate_next_stage().await.is_err());
}
