use crate::flight_control::guidance_error::GuidanceError;
use serde::Deserialize;

/// Gains and windup policy of a [`PidRegulator`], as configured in a mission profile.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Reset the integral accumulator whenever the raw output reaches the upper bound.
    #[serde(default = "PidGains::default_anti_windup")]
    pub anti_windup: bool,
}

impl PidGains {
    fn default_anti_windup() -> bool { true }
}

/// Scalar PID regulator.
///
/// [`PidRegulator::update`] returns the raw, unclamped output; callers clamp it with
/// [`PidRegulator::clamp`] before commanding an actuator. The windup guard only watches the
/// upper bound: an output pinned at `min_output` keeps integrating.
#[derive(Debug, Clone)]
pub struct PidRegulator {
    kp: f64,
    ki: f64,
    kd: f64,
    setpoint: f64,
    integral: f64,
    previous_error: f64,
    min_output: f64,
    max_output: f64,
    anti_windup: bool,
}

impl PidRegulator {
    pub fn new(gains: PidGains, setpoint: f64, min_output: f64, max_output: f64) -> Self {
        Self {
            kp: gains.kp,
            ki: gains.ki,
            kd: gains.kd,
            setpoint,
            integral: 0.0,
            previous_error: 0.0,
            min_output,
            max_output,
            anti_windup: gains.anti_windup,
        }
    }

    /// Advances the regulator by one sample.
    ///
    /// # Errors
    /// [`GuidanceError::InvalidInterval`] if `dt` is not a positive finite number. The regulator
    /// state is left untouched in that case.
    pub fn update(&mut self, current_value: f64, dt: f64) -> Result<f64, GuidanceError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(GuidanceError::InvalidInterval(dt));
        }
        let error = self.setpoint - current_value;
        self.integral += error * dt;
        let derivative = (error - self.previous_error) / dt;
        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        if self.anti_windup && output >= self.max_output {
            self.integral = 0.0;
        }
        self.previous_error = error;
        Ok(output)
    }

    pub fn clamp(&self, output: f64) -> f64 { output.clamp(self.min_output, self.max_output) }

    /// Clears the accumulated state, keeping gains and setpoint.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    /// Points the regulator at a new setpoint. The accumulated state refers to the old
    /// regulated quantity and is dropped.
    pub fn retarget(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
        self.reset();
    }

    pub fn setpoint(&self) -> f64 { self.setpoint }
    pub fn integral(&self) -> f64 { self.integral }
    pub fn previous_error(&self) -> f64 { self.previous_error }
}
