use crate::flight_control::telemetry::ControllerSnapshot;
use std::{fmt::Write, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Prints the latest [`ControllerSnapshot`] as a small table at a fixed interval.
///
/// The display only reads the watch channel. It never blocks the controller and skips
/// intervals in which no new snapshot arrived.
pub(crate) struct TelemetryDisplay {
    rx: watch::Receiver<ControllerSnapshot>,
    c_tok: CancellationToken,
    interval: Duration,
}

impl TelemetryDisplay {
    const WIDTH: usize = 32;

    pub(crate) fn new(
        rx: watch::Receiver<ControllerSnapshot>,
        c_tok: CancellationToken,
        interval: Duration,
    ) -> Self {
        Self { rx, c_tok, interval }
    }

    pub(crate) fn start(self) -> JoinHandle<()> { tokio::spawn(self.run()) }

    /// Runs until cancelled, until the controller is gone or after a terminal phase was shown.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                () = self.c_tok.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
            match self.rx.has_changed() {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let snapshot = *self.rx.borrow_and_update();
            print!("{}", Self::render(&snapshot));
            if snapshot.phase.is_terminal() {
                break;
            }
        }
    }

    pub(crate) fn render(s: &ControllerSnapshot) -> String {
        let rows = [
            ("Phase", s.phase.to_string()),
            ("UT", format!("{:.1} s", s.universal_time)),
            ("Altitude", format!("{:.2} km", s.altitude / 1000.0)),
            ("Apoapsis", format!("{:.2} km", s.apoapsis_altitude / 1000.0)),
            ("Dyn. pressure", format!("{:.0} Pa", s.dynamic_pressure)),
            ("Pitch", format!("{:.1} deg", s.pitch)),
            ("TWR", format!("{:.2}", s.twr)),
            ("Throttle", format!("{:.0} %", s.throttle * 100.0)),
        ];
        let bar = "═".repeat(Self::WIDTH + 2);
        let mut out = format!("\x1b[36m╔{bar}╗\x1b[0m\n");
        for (label, value) in rows {
            let pad = Self::WIDTH.saturating_sub(label.len());
            let _ = writeln!(out, "\x1b[36m║\x1b[0m {label}{value:>pad$} \x1b[36m║\x1b[0m");
        }
        let _ = writeln!(out, "\x1b[36m╚{bar}╝\x1b[0m");
        out
    }
}
