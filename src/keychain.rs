use crate::flight_control::vessel_link::{Actuator, TelemetrySource, TimeWarp};
use crate::http_handler::BridgeLink;
use crate::sim::SimVessel;
use std::sync::Arc;

/// Struct bundling the vessel collaborators the guidance code talks to: the telemetry source,
/// the command actuator and the time warp service.
#[derive(Clone)]
pub struct Keychain {
    /// Read side of the vessel link.
    telemetry: Arc<dyn TelemetrySource>,
    /// Command side of the vessel link.
    actuator: Arc<dyn Actuator>,
    /// Time acceleration used to skip coast phases.
    warp: Arc<dyn TimeWarp>,
}

impl Keychain {
    pub fn new(
        telemetry: Arc<dyn TelemetrySource>,
        actuator: Arc<dyn Actuator>,
        warp: Arc<dyn TimeWarp>,
    ) -> Self {
        Self { telemetry, actuator, warp }
    }

    /// Creates a `Keychain` talking to a vehicle bridge over REST.
    ///
    /// # Arguments
    /// - `url`: The base URL of the bridge.
    pub fn bridge(url: &str) -> Self {
        let link = Arc::new(BridgeLink::new(url));
        let telemetry: Arc<dyn TelemetrySource> = link.clone();
        let actuator: Arc<dyn Actuator> = link.clone();
        Self::new(telemetry, actuator, link)
    }

    /// Creates a `Keychain` flying the in-process simulator.
    pub fn sim(vessel: Arc<SimVessel>) -> Self {
        let telemetry: Arc<dyn TelemetrySource> = vessel.clone();
        let actuator: Arc<dyn Actuator> = vessel.clone();
        Self::new(telemetry, actuator, vessel)
    }

    /// Provides a cloned reference to the telemetry source.
    pub fn telemetry(&self) -> Arc<dyn TelemetrySource> { Arc::clone(&self.telemetry) }

    /// Provides a cloned reference to the actuator.
    pub fn actuator(&self) -> Arc<dyn Actuator> { Arc::clone(&self.actuator) }

    /// Provides a cloned reference to the time warp service.
    pub fn warp(&self) -> Arc<dyn TimeWarp> { Arc::clone(&self.warp) }
}
