#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod console_communication;
mod flight_control;
mod http_handler;
mod keychain;
mod logger;
mod mission_profile;
mod mode_control;
mod sim;

use crate::console_communication::TelemetryDisplay;
use crate::flight_control::{GuidanceError, burn::BurnReport, telemetry::ControllerSnapshot};
use crate::keychain::Keychain;
use crate::mission_profile::MissionProfile;
use crate::mode_control::{AscentController, ModeContext, execute_next_node};
use crate::sim::{SimVessel, VesselModel};
use std::{env, sync::Arc, time::Duration};
use strum_macros::Display;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const DEFAULT_BRIDGE_URL: &str = "http://localhost:50080";
const DISPLAY_INTERVAL: Duration = Duration::from_millis(500);
/// Altitude of the parking orbit the simulator starts in for node execution.
const SIM_PARKING_ALTITUDE: f64 = 80_000.0;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Ascent,
    ExecuteNode,
}

impl RunMode {
    fn from_env() -> Self {
        match env::var("ASCENT_MODE").as_deref() {
            Err(_) | Ok("ascent") => RunMode::Ascent,
            Ok("execute-node") => RunMode::ExecuteNode,
            Ok(other) => fatal!("Unknown ASCENT_MODE '{other}', expected 'ascent' or 'execute-node'"),
        }
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let mode = RunMode::from_env();
    let profile = load_profile();
    let key = init_keychain(mode);

    let c_tok = CancellationToken::new();
    listen_for_abort(c_tok.clone());

    let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot::default());
    let display_tok = c_tok.child_token();
    let display = TelemetryDisplay::new(snapshot_rx, display_tok.clone(), DISPLAY_INTERVAL).start();
    let context = Arc::new(ModeContext::new(key, profile, c_tok, snapshot_tx));

    info!("Starting in {mode} mode");
    let res = match mode {
        RunMode::Ascent => AscentController::new(Arc::clone(&context)).run().await,
        RunMode::ExecuteNode => execute_next_node(&context).await,
    };
    display_tok.cancel();
    if let Err(e) = display.await {
        error!("Telemetry display failed: {e}");
    }
    write_flight_log(&context).await;
    exit_with(res);
}

fn load_profile() -> MissionProfile {
    let Ok(path) = env::var("ASCENT_PROFILE") else {
        log!("No ASCENT_PROFILE set, flying the default profile");
        return MissionProfile::default();
    };
    match MissionProfile::from_file(&path) {
        Ok(profile) => {
            info!("Loaded mission profile from {path}");
            profile
        }
        Err(e) => fatal!("Could not load mission profile {path}: {e:?}"),
    }
}

fn init_keychain(mode: RunMode) -> Keychain {
    if env::var("ASCENT_SIM").is_ok() {
        let model = match mode {
            RunMode::Ascent => VesselModel::three_stage(),
            RunMode::ExecuteNode => VesselModel::in_orbit(SIM_PARKING_ALTITUDE),
        };
        info!("Flying the in-process simulator");
        return Keychain::sim(Arc::new(SimVessel::new(model)));
    }
    let url_var = env::var("ASCENT_BRIDGE_URL");
    let url = url_var.as_ref().map_or(DEFAULT_BRIDGE_URL, |v| v.as_str());
    info!("Connecting to vehicle bridge at {url}");
    Keychain::bridge(url)
}

/// Cancels the flight on Ctrl-C. The active mode releases the controls and unwinds.
fn listen_for_abort(c_tok: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            () = c_tok.cancelled() => {}
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => {
                    warn!("Operator abort requested");
                    c_tok.cancel();
                }
                Err(e) => error!("Could not listen for Ctrl-C: {e}"),
            },
        }
    });
}

async fn write_flight_log(context: &ModeContext) {
    let Ok(path) = env::var("ASCENT_RECORD") else { return };
    let recorder = context.recorder().lock().await;
    match recorder.write_json(&path) {
        Ok(()) => log!("Wrote {} flight log entries to {path}", recorder.entries().len()),
        Err(e) => error!("Could not write flight log {path}: {e:?}"),
    }
}

fn exit_with(res: Result<BurnReport, GuidanceError>) {
    match res {
        Ok(report) => {
            info!(
                "Burn of {:.1} m/s done, {:.3} m/s residual, {} stages activated",
                report.initial_dv, report.residual_dv, report.stages_activated
            );
        }
        Err(e) => {
            error!("Flight ended with {e:?}");
            std::process::exit(if matches!(e, GuidanceError::OperatorAbort) { 130 } else { 1 });
        }
    }
}
