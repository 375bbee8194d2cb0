//! Read-only telemetry display fed by the controller snapshots.

mod telemetry_display;
#[cfg(test)]
mod tests;

pub(crate) use telemetry_display::TelemetryDisplay;
