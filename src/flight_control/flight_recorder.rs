use super::telemetry::ControllerSnapshot;
use serde::Serialize;
use std::{fs::File, io::BufWriter, path::Path};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightLogEntry {
    pub ut: f64,
    pub altitude: f64,
    pub dynamic_pressure: f64,
    pub throttle: f64,
    pub pitch: f64,
    pub phase: &'static str,
}

impl From<&ControllerSnapshot> for FlightLogEntry {
    fn from(value: &ControllerSnapshot) -> Self {
        Self {
            ut: value.universal_time,
            altitude: value.altitude,
            dynamic_pressure: value.dynamic_pressure,
            throttle: value.throttle,
            pitch: value.pitch,
            phase: value.phase.into(),
        }
    }
}

#[derive(Debug, Display)]
pub enum RecorderError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl std::error::Error for RecorderError {}

/// Append-only log of the control ticks of one flight.
#[derive(Debug, Default)]
pub struct FlightRecorder {
    entries: Vec<FlightLogEntry>,
}

impl FlightRecorder {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, snapshot: &ControllerSnapshot) { self.entries.push(snapshot.into()); }

    pub fn entries(&self) -> &[FlightLogEntry] { &self.entries }

    /// Writes all entries as a pretty printed JSON array to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecorderError> {
        let file = File::create(path).map_err(RecorderError::Io)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.entries)
            .map_err(RecorderError::Encode)
    }
}
