use crate::flight_control::{flight_recorder::FlightRecorder, telemetry::ControllerSnapshot};
use crate::keychain::Keychain;
use crate::mission_profile::MissionProfile;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

/// Everything a flight mode needs: the vessel collaborators, the mission profile, the operator
/// abort token and the outlets for controller snapshots.
pub struct ModeContext {
    k: Arc<Keychain>,
    profile: MissionProfile,
    c_tok: CancellationToken,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
    recorder: Mutex<FlightRecorder>,
}

impl ModeContext {
    pub fn new(
        key: Keychain,
        profile: MissionProfile,
        c_tok: CancellationToken,
        snapshot_tx: watch::Sender<ControllerSnapshot>,
    ) -> Self {
        Self {
            k: Arc::new(key),
            profile,
            c_tok,
            snapshot_tx,
            recorder: Mutex::new(FlightRecorder::new()),
        }
    }

    pub fn k(&self) -> &Arc<Keychain> { &self.k }
    pub fn profile(&self) -> &MissionProfile { &self.profile }
    pub fn c_tok(&self) -> &CancellationToken { &self.c_tok }
    pub fn recorder(&self) -> &Mutex<FlightRecorder> { &self.recorder }

    /// Hands `snapshot` to the display and appends it to the flight log.
    pub async fn publish(&self, snapshot: ControllerSnapshot) {
        self.snapshot_tx.send_replace(snapshot);
        self.recorder.lock().await.record(&snapshot);
    }
}
