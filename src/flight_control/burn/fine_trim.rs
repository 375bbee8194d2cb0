/// What the fine phase commands on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimCommand {
    Throttle(f64),
    /// The burn is close enough to its target; cut the engine now.
    Cutoff,
}

/// Low throttle trim law for the last meters per second of a burn.
///
/// The throttle tapers hyperbolically with the remaining delta-v, is scaled down for high thrust
/// stages and never drops below a floor that keeps weak stages moving. The engine is cut when the
/// remaining delta-v is inside `tolerance` or the projected time to reach it drops below
/// `min_time_to_target`, whichever comes first.
#[derive(Debug, Clone, Copy)]
pub struct FineTrim {
    initial_dv: f64,
    tolerance: f64,
    min_time_to_target: f64,
}

impl FineTrim {
    const MAX_BASE_THROTTLE: f64 = 0.1;
    const TAPER_FRACTION: f64 = 0.01;
    const FLOOR_MIN: f64 = 0.0005;
    const FLOOR_SCALE: f64 = 0.005;

    pub fn new(initial_dv: f64, tolerance: f64, min_time_to_target: f64) -> Self {
        Self { initial_dv: initial_dv.abs(), tolerance, min_time_to_target }
    }

    /// Computes the command for one tick.
    ///
    /// # Arguments
    /// - `remaining_dv`: Remaining delta-v of the node.
    /// - `available_thrust`: Thrust of the active engines at full throttle.
    /// - `throttle`: Throttle currently applied.
    /// - `mass`: Current vehicle mass.
    /// - `gravity`: Local gravitational acceleration.
    pub fn command(
        &self,
        remaining_dv: f64,
        available_thrust: f64,
        throttle: f64,
        mass: f64,
        gravity: f64,
    ) -> TrimCommand {
        let acceleration = if mass > 0.0 { available_thrust * throttle / mass } else { 0.0 };
        let time_to_target =
            if acceleration > 0.0 { remaining_dv / acceleration } else { f64::INFINITY };
        if remaining_dv < self.tolerance || time_to_target < self.min_time_to_target {
            return TrimCommand::Cutoff;
        }
        TrimCommand::Throttle(self.throttle(remaining_dv, available_thrust, mass, gravity))
    }

    /// Throttle for the given state, always inside `[0, 1]`.
    pub fn throttle(&self, remaining_dv: f64, available_thrust: f64, mass: f64, gravity: f64) -> f64 {
        let weight = mass * gravity;
        let twr = if weight > 0.0 && available_thrust > 0.0 { available_thrust / weight } else { 1.0 };
        let base = Self::MAX_BASE_THROTTLE
            .min(remaining_dv / (remaining_dv + Self::TAPER_FRACTION * self.initial_dv));
        let twr_factor = (1.0 / twr).min(1.0);
        let floor = Self::FLOOR_MIN.max(Self::FLOOR_SCALE / (twr * mass.max(1.0) / 1000.0));
        floor.max(base * twr_factor).clamp(0.0, 1.0)
    }
}
