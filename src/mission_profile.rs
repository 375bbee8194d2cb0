use crate::flight_control::guidance::{PidGains, PitchProgram};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use strum_macros::Display;

/// Quantity the ascent throttle regulator holds at its setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "variable", rename_all = "snake_case")]
pub enum ThrottleRegulation {
    /// Dynamic pressure in pascal.
    DynamicPressure { setpoint: f64 },
    /// Thrust to weight ratio.
    Twr { setpoint: f64 },
}

impl ThrottleRegulation {
    pub fn setpoint(self) -> f64 {
        match self {
            ThrottleRegulation::DynamicPressure { setpoint }
            | ThrottleRegulation::Twr { setpoint } => setpoint,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoosterKind {
    /// Separated once their propellant is gone.
    Solid,
    /// Separated once the available thrust drops below the value recorded at ignition.
    Liquid,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoosterConfig {
    pub kind: BoosterKind,
    /// Stage whose activation drops the boosters.
    pub decouple_stage: u32,
}

/// Tunables of the maneuver burn executor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BurnProfile {
    /// Attitude error in degrees below which the vehicle counts as oriented.
    pub orientation_tolerance: f64,
    /// Attitude error in degrees that triggers a reorientation during the coarse phase.
    pub reorientation_threshold: f64,
    pub orientation_timeout_secs: f64,
    /// Seconds before the burn start at which time warp stops.
    pub warp_lead_secs: f64,
    pub use_time_warp: bool,
    /// The coarse phase stops at `max(coarse_fraction * dv, coarse_floor)` remaining.
    pub coarse_fraction: f64,
    pub coarse_floor: f64,
    pub coarse_tick_ms: u64,
    /// Remaining delta-v at which the fine phase cuts the engine.
    pub fine_tolerance: f64,
    /// Projected time to target below which the fine phase cuts the engine.
    pub fine_min_time_to_target: f64,
    pub fine_tick_budget: u32,
    /// Vessel seconds after a stage activation during which a flameout does not stage again.
    pub staging_cooldown_secs: f64,
    pub poll_interval_ms: u64,
}

impl Default for BurnProfile {
    fn default() -> Self {
        Self {
            orientation_tolerance: 1.0,
            reorientation_threshold: 5.0,
            orientation_timeout_secs: 30.0,
            warp_lead_secs: 20.0,
            use_time_warp: true,
            coarse_fraction: 0.05,
            coarse_floor: 10.0,
            coarse_tick_ms: 10,
            fine_tolerance: 0.05,
            fine_min_time_to_target: 0.1,
            fine_tick_budget: 20_000,
            staging_cooldown_secs: 0.5,
            poll_interval_ms: 100,
        }
    }
}

impl BurnProfile {
    pub fn orientation_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.orientation_timeout_secs.max(0.0))
    }
    pub fn coarse_tick(&self) -> Duration { Duration::from_millis(self.coarse_tick_ms) }
    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }
}

/// Everything the ascent controller can be tuned with.
///
/// Profiles are read from JSON; missing fields fall back to [`MissionProfile::default`], a
/// gravity turn into an 80 km orbit flying east.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MissionProfile {
    pub target_apoapsis: f64,
    pub target_heading: f64,
    /// Altitude above which the launch phase hands over to the roll phase.
    pub roll_altitude: f64,
    pub pitch_program: PitchProgram,
    pub pitch_hysteresis: f64,
    pub throttle_regulation: ThrottleRegulation,
    /// Regulation used once the boosters are gone, if it differs from the launch regulation.
    pub post_separation_regulation: Option<ThrottleRegulation>,
    pub pid: PidGains,
    pub min_throttle: f64,
    pub max_throttle: f64,
    pub boosters: Option<BoosterConfig>,
    /// Fraction of the target apoapsis at which the throttle drops to `coast_throttle`.
    pub coast_fraction: f64,
    pub coast_throttle: f64,
    pub countdown_secs: u32,
    pub tick_ms: u64,
    pub poll_interval_ms: u64,
    /// Consecutive ticks without advancing universal time before telemetry counts as stalled.
    pub stall_ticks: u32,
    pub staging_cooldown_ms: u64,
    pub atmosphere_exit_timeout_secs: f64,
    pub burn: BurnProfile,
}

impl Default for MissionProfile {
    fn default() -> Self {
        Self {
            target_apoapsis: 80_000.0,
            target_heading: 90.0,
            roll_altitude: 50.0,
            pitch_program: PitchProgram::LinearFraction { turn_start: 250.0, turn_end: 45_000.0 },
            pitch_hysteresis: 0.5,
            throttle_regulation: ThrottleRegulation::DynamicPressure { setpoint: 20_000.0 },
            post_separation_regulation: None,
            pid: PidGains { kp: 5e-5, ki: 1e-5, kd: 0.0, anti_windup: true },
            min_throttle: 0.1,
            max_throttle: 1.0,
            boosters: Some(BoosterConfig { kind: BoosterKind::Solid, decouple_stage: 1 }),
            coast_fraction: 0.95,
            coast_throttle: 0.25,
            countdown_secs: 3,
            tick_ms: 50,
            poll_interval_ms: 100,
            stall_ticks: 40,
            staging_cooldown_ms: 500,
            atmosphere_exit_timeout_secs: 600.0,
            burn: BurnProfile::default(),
        }
    }
}

#[derive(Debug, Display)]
pub enum ProfileError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The profile parsed but describes an unflyable ascent.
    Invalid(String),
}

impl std::error::Error for ProfileError {}

impl From<std::io::Error> for ProfileError {
    fn from(value: std::io::Error) -> Self { ProfileError::Io(value) }
}

impl From<serde_json::Error> for ProfileError {
    fn from(value: serde_json::Error) -> Self { ProfileError::Parse(value) }
}

impl MissionProfile {
    /// Reads and validates a JSON profile.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let profile: MissionProfile = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if !self.target_apoapsis.is_finite() || self.target_apoapsis <= 0.0 {
            return Err(ProfileError::Invalid(format!(
                "target apoapsis {} is not positive",
                self.target_apoapsis
            )));
        }
        if !(0.0..=1.0).contains(&self.min_throttle)
            || !(0.0..=1.0).contains(&self.max_throttle)
            || self.min_throttle > self.max_throttle
        {
            return Err(ProfileError::Invalid(format!(
                "throttle bounds [{}, {}] outside [0, 1]",
                self.min_throttle, self.max_throttle
            )));
        }
        if !(0.0..=1.0).contains(&self.coast_throttle) {
            return Err(ProfileError::Invalid(format!(
                "coast throttle {} outside [0, 1]",
                self.coast_throttle
            )));
        }
        if self.tick_ms == 0 {
            return Err(ProfileError::Invalid("control tick of 0 ms".to_string()));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration { Duration::from_millis(self.tick_ms) }
    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }
    pub fn staging_cooldown(&self) -> Duration { Duration::from_millis(self.staging_cooldown_ms) }
    pub fn atmosphere_exit_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.atmosphere_exit_timeout_secs.max(0.0))
    }
}
