use super::TelemetryDisplay;
use crate::flight_control::{AscentPhase, telemetry::ControllerSnapshot};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

fn snapshot(phase: AscentPhase) -> ControllerSnapshot {
    ControllerSnapshot {
        phase,
        universal_time: 61.25,
        altitude: 12_346.0,
        apoapsis_altitude: 30_000.0,
        dynamic_pressure: 19_876.4,
        pitch: 62.34,
        twr: 1.734,
        throttle: 0.655,
    }
}

#[test]
fn test_render_formats_units() {
    let table = TelemetryDisplay::render(&snapshot(AscentPhase::PitchProgram));
    for expected in ["PitchProgram", "12.35 km", "30.00 km", "19876 Pa", "62.3 deg", "1.73", "66 %"] {
        assert!(table.contains(expected), "missing {expected} in\n{table}");
    }
    assert_eq!(table.lines().count(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_display_stops_after_terminal_phase() {
    let (tx, rx) = watch::channel(ControllerSnapshot::default());
    let handle =
        TelemetryDisplay::new(rx, CancellationToken::new(), Duration::from_millis(100)).start();
    tx.send_replace(snapshot(AscentPhase::Roll));
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!handle.is_finished());
    tx.send_replace(snapshot(AscentPhase::Done));
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_display_stops_on_cancel_and_on_closed_channel() {
    let (_tx, rx) = watch::channel(ControllerSnapshot::default());
    let c_tok = CancellationToken::new();
    let handle = TelemetryDisplay::new(rx, c_tok.clone(), Duration::from_millis(100)).start();
    c_tok.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

    let (tx, rx) = watch::channel(ControllerSnapshot::default());
    let handle =
        TelemetryDisplay::new(rx, CancellationToken::new(), Duration::from_millis(100)).start();
    drop(tx);
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}
