use serde::Deserialize;

/// Gravity turn profile mapping ascent progress to a target pitch above the horizon in degrees.
///
/// All policies are pure. Hysteresis against actuator chatter is applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PitchProgram {
    /// Pitch falls linearly from 90 at `turn_start` to 0 at `turn_end`.
    LinearFraction { turn_start: f64, turn_end: f64 },
    /// `90 - atan(altitude * steepness / (orbit_height - altitude))`, reaching the horizon as the
    /// altitude approaches `orbit_height`.
    LinearTangent { orbit_height: f64, steepness: f64 },
    /// Pitch follows the square root of the apoapsis progress between `switch_altitude` and the
    /// top of the atmosphere.
    SquareRootApoapsis { switch_altitude: f64, atmosphere_depth: f64 },
}

impl PitchProgram {
    /// Distance below the target height at which the linear tangent input is clamped.
    const TANGENT_EPSILON: f64 = 1.0;

    pub fn target_pitch(&self, altitude: f64, apoapsis: f64) -> f64 {
        match *self {
            PitchProgram::LinearFraction { turn_start, turn_end } => {
                Self::linear_fraction(altitude, turn_start, turn_end)
            }
            PitchProgram::LinearTangent { orbit_height, steepness } => {
                Self::linear_tangent(altitude, orbit_height, steepness)
            }
            PitchProgram::SquareRootApoapsis { switch_altitude, atmosphere_depth } => {
                Self::square_root_apoapsis(apoapsis, switch_altitude, atmosphere_depth)
            }
        }
    }

    fn linear_fraction(altitude: f64, turn_start: f64, turn_end: f64) -> f64 {
        if altitude <= turn_start {
            return 90.0;
        }
        if altitude >= turn_end || turn_end <= turn_start {
            return 0.0;
        }
        let frac = (altitude - turn_start) / (turn_end - turn_start);
        (90.0 - 90.0 * frac).clamp(0.0, 90.0)
    }

    fn linear_tangent(altitude: f64, orbit_height: f64, steepness: f64) -> f64 {
        let alt = altitude.clamp(0.0, (orbit_height - Self::TANGENT_EPSILON).max(0.0));
        let remaining = orbit_height - alt;
        if remaining <= 0.0 {
            return 0.0;
        }
        (90.0 - (alt * steepness / remaining).atan().to_degrees()).clamp(0.0, 90.0)
    }

    fn square_root_apoapsis(apoapsis: f64, switch_altitude: f64, atmosphere_depth: f64) -> f64 {
        if apoapsis <= switch_altitude {
            return 90.0;
        }
        let span = atmosphere_depth - switch_altitude;
        if span <= 0.0 {
            return 0.0;
        }
        let progress = ((apoapsis - switch_altitude) / span).sqrt();
        90.0 - (90.0 * progress).clamp(0.0, 90.0)
    }
}

/// Suppresses pitch updates smaller than a threshold so the attitude target only moves in
/// noticeable steps.
#[derive(Debug, Clone, Copy)]
pub struct PitchHysteresis {
    threshold: f64,
    commanded: Option<f64>,
}

impl PitchHysteresis {
    pub fn new(threshold: f64) -> Self { Self { threshold, commanded: None } }

    /// Returns the new pitch to command, or `None` if the change is within the threshold.
    pub fn filter(&mut self, target: f64) -> Option<f64> {
        match self.commanded {
            Some(last) if (last - target).abs() <= self.threshold => None,
            _ => {
                self.commanded = Some(target);
                Some(target)
            }
        }
    }

    /// The pitch most recently let through.
    pub fn commanded(&self) -> Option<f64> { self.commanded }
}
