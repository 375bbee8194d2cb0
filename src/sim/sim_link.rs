use super::vessel_model::VesselModel;
use crate::flight_control::{
    telemetry::{ManeuverNode, Propellant, TelemetrySample},
    vessel_link::{Actuator, LinkError, TelemetrySource, TimeWarp},
};
use crate::{event, log};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-process vessel implementing all three collaborator traits.
///
/// The simulation runs in lockstep with the controller: every [`TelemetrySource::sample`] call
/// advances the physics by [`VesselModel::STEP`], commands take effect on the next sample.
#[derive(Debug)]
pub struct SimVessel {
    model: Mutex<VesselModel>,
    /// Amplitude of the uniform noise added to altitude and dynamic pressure readings.
    noise: f64,
    clock_frozen: AtomicBool,
}

impl SimVessel {
    const MAX_WARP_STEPS: u32 = 2_000_000;

    pub fn new(model: VesselModel) -> Self {
        Self { model: Mutex::new(model), noise: 0.0, clock_frozen: AtomicBool::new(false) }
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.abs();
        self
    }

    /// Stops the simulation clock, samples keep returning the same state.
    pub fn freeze_clock(&self, frozen: bool) { self.clock_frozen.store(frozen, Ordering::SeqCst); }

    /// Runs `f` on the current vessel state.
    pub async fn inspect<R>(&self, f: impl FnOnce(&VesselModel) -> R) -> R { f(&*self.model.lock().await) }

    fn perturb(&self, value: f64) -> f64 {
        if self.noise > 0.0 {
            value + rand::rng().random_range(-self.noise..=self.noise)
        } else {
            value
        }
    }
}

#[async_trait::async_trait]
impl TelemetrySource for SimVessel {
    async fn sample(&self) -> Result<TelemetrySample, LinkError> {
        let mut model = self.model.lock().await;
        if !self.clock_frozen.load(Ordering::SeqCst) {
            model.step(VesselModel::STEP);
        }
        let mut sample = model.telemetry();
        sample.altitude = self.perturb(sample.altitude);
        sample.dynamic_pressure = self.perturb(sample.dynamic_pressure).max(0.0);
        Ok(sample)
    }

    async fn stage_propellant(&self, stage: u32, resource: Propellant) -> Result<f64, LinkError> {
        Ok(self.model.lock().await.stage_propellant(stage, resource))
    }

    async fn next_node(&self) -> Result<Option<ManeuverNode>, LinkError> {
        Ok(self.model.lock().await.nodes.first().map(|n| n.node))
    }
}

#[async_trait::async_trait]
impl Actuator for SimVessel {
    async fn set_throttle(&self, throttle: f64) -> Result<(), LinkError> {
        if !(0.0..=1.0).contains(&throttle) {
            return Err(LinkError::Rejected(format!("throttle {throttle} outside [0, 1]")));
        }
        self.model.lock().await.throttle = throttle;
        Ok(())
    }

    async fn set_pitch_and_heading(&self, pitch: f64, heading: f64) -> Result<(), LinkError> {
        let mut model = self.model.lock().await;
        model.tracking_node = false;
        model.pitch_target = pitch;
        model.heading = heading;
        Ok(())
    }

    async fn set_roll(&self, roll: f64) -> Result<(), LinkError> {
        self.model.lock().await.roll = roll;
        Ok(())
    }

    /// Holds the pitch and heading set through [`Actuator::set_pitch_and_heading`].
    async fn engage_autopilot(&self) -> Result<(), LinkError> {
        let mut model = self.model.lock().await;
        model.autopilot_engaged = true;
        model.tracking_node = false;
        Ok(())
    }

    async fn disengage_autopilot(&self) -> Result<(), LinkError> {
        self.model.lock().await.autopilot_engaged = false;
        Ok(())
    }

    async fn point_at_node(&self, node: &ManeuverNode) -> Result<(), LinkError> {
        let mut model = self.model.lock().await;
        if !model.nodes.iter().any(|n| n.node.id == node.id) {
            return Err(LinkError::Rejected(format!("unknown node {}", node.id)));
        }
        model.tracking_node = true;
        model.autopilot_engaged = true;
        Ok(())
    }

    async fn activate_next_stage(&self) -> Result<u32, LinkError> {
        let mut model = self.model.lock().await;
        let left = model
            .activate_next_stage()
            .ok_or_else(|| LinkError::Rejected("no stage left".to_string()))?;
        event!("Sim: stage {left} activated at UT {:.2}", model.ut);
        Ok(left)
    }

    async fn add_node(&self, ut: f64, prograde: f64) -> Result<ManeuverNode, LinkError> {
        Ok(self.model.lock().await.add_node(ut, prograde))
    }

    async fn remove_node(&self, node: &ManeuverNode) -> Result<(), LinkError> {
        if self.model.lock().await.remove_node(node.id) {
            Ok(())
        } else {
            Err(LinkError::Rejected(format!("unknown node {}", node.id)))
        }
    }
}

#[async_trait::async_trait]
impl TimeWarp for SimVessel {
    async fn warp_to(&self, ut: f64) -> Result<(), LinkError> {
        let mut model = self.model.lock().await;
        let start = model.ut;
        let mut steps = 0;
        while model.ut < ut && steps < Self::MAX_WARP_STEPS {
            model.step(VesselModel::STEP);
            steps += 1;
        }
        log!("Sim: warped {:.1} s to UT {:.1}", model.ut - start, model.ut);
        Ok(())
    }
}
