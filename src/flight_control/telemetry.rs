use super::{ascent_phase::AscentPhase, guidance::orbital_math};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Immutable snapshot of the vehicle state as delivered by a [`TelemetrySource`].
///
/// All distances are in meters, masses in kilograms, forces in newtons, times in seconds
/// and angles in degrees.
///
/// [`TelemetrySource`]: super::vessel_link::TelemetrySource
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Mean altitude above the reference body's sea level.
    pub altitude: f64,
    /// Dynamic pressure in pascal.
    pub dynamic_pressure: f64,
    /// Apoapsis altitude above sea level.
    pub apoapsis_altitude: f64,
    /// Apoapsis measured from the center of the reference body.
    pub apoapsis_radius: f64,
    /// Periapsis altitude above sea level.
    pub periapsis_altitude: f64,
    /// Time until the vehicle passes the apoapsis.
    pub time_to_apoapsis: f64,
    /// Total vehicle mass.
    pub mass: f64,
    /// Thrust the active engines could produce at full throttle.
    pub available_thrust: f64,
    /// Thrust currently produced.
    pub current_thrust: f64,
    /// Combined specific impulse of the active engines, zero without an active engine.
    pub specific_impulse: f64,
    /// Distance from the center of the reference body.
    pub orbit_radius: f64,
    /// Semi major axis of the current orbit.
    pub semi_major_axis: f64,
    /// Standard gravitational parameter of the reference body.
    pub gravitational_parameter: f64,
    /// Altitude at which the atmosphere ends, zero for airless bodies.
    pub atmosphere_depth: f64,
    /// Universal time.
    pub universal_time: f64,
    /// Number of stages left to activate, zero when the last stage is active.
    pub current_stage: u32,
    /// Angle between the attitude hold target and the actual vehicle attitude.
    pub attitude_error: f64,
    /// Throttle currently commanded to the engines.
    pub throttle: f64,
    /// Remaining delta-v of the active maneuver node, if there is one.
    pub node_remaining_dv: Option<f64>,
}

impl TelemetrySample {
    /// Local gravitational acceleration at the current orbit radius.
    pub fn local_gravity(&self) -> f64 {
        orbital_math::local_gravity(self.gravitational_parameter, self.orbit_radius)
    }

    /// Thrust to weight ratio using the thrust currently produced.
    pub fn twr(&self) -> f64 {
        orbital_math::twr(self.current_thrust, self.mass, self.local_gravity()).unwrap_or(0.0)
    }

    /// Thrust to weight ratio at full throttle.
    pub fn max_twr(&self) -> f64 {
        orbital_math::twr(self.available_thrust, self.mass, self.local_gravity()).unwrap_or(0.0)
    }

    /// Returns the name of the first field that is not a finite number, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        let fields = [
            ("altitude", self.altitude),
            ("dynamic_pressure", self.dynamic_pressure),
            ("apoapsis_altitude", self.apoapsis_altitude),
            ("mass", self.mass),
            ("available_thrust", self.available_thrust),
            ("current_thrust", self.current_thrust),
            ("specific_impulse", self.specific_impulse),
            ("orbit_radius", self.orbit_radius),
            ("gravitational_parameter", self.gravitational_parameter),
            ("universal_time", self.universal_time),
        ];
        fields.iter().find(|(_, v)| !v.is_finite()).map(|(name, _)| *name)
    }
}

/// Frame in which a maneuver node's delta-v vector is expressed.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceFrame {
    /// Axes aligned with the node's prograde, normal and radial directions.
    Node,
    /// Axes aligned with the current orbital velocity.
    Orbital,
}

/// A planned engine burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManeuverNode {
    /// Identifier assigned by the actuator, needed to remove the node again.
    pub id: u64,
    /// Universal time at which the burn is centered.
    pub time_of_execution: f64,
    /// Delta-v along the prograde direction, negative values burn retrograde.
    pub prograde_delta_v: f64,
    pub reference_frame: ReferenceFrame,
}

/// Propellant kinds a stage can carry.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Propellant {
    SolidFuel,
    LiquidFuel,
}

/// Read-only view of the controller published once per control tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub phase: AscentPhase,
    pub universal_time: f64,
    pub altitude: f64,
    pub apoapsis_altitude: f64,
    pub dynamic_pressure: f64,
    pub pitch: f64,
    pub twr: f64,
    pub throttle: f64,
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            phase: AscentPhase::Launch,
            universal_time: 0.0,
            altitude: 0.0,
            apoapsis_altitude: 0.0,
            dynamic_pressure: 0.0,
            pitch: 90.0,
            twr: 0.0,
            throttle: 0.0,
        }
    }
}
