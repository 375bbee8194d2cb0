use crate::flight_control::{
    guidance_error::GuidanceError, telemetry::TelemetrySample, vessel_link::TelemetrySource,
};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a bounded telemetry poll ended.
#[derive(Debug, Clone, Copy)]
pub enum PollExit {
    /// The condition held for the contained sample.
    Reached(TelemetrySample),
    /// The deadline passed first; the contained sample is the last one read.
    TimedOut(TelemetrySample),
}

impl PollExit {
    pub fn sample(&self) -> &TelemetrySample {
        match self {
            PollExit::Reached(s) | PollExit::TimedOut(s) => s,
        }
    }

    pub fn reached(&self) -> bool { matches!(self, PollExit::Reached(_)) }
}

/// Polls `source` every `interval` until `done` holds for a sample, the optional `timeout`
/// elapses or `c_tok` is cancelled.
///
/// # Errors
/// [`GuidanceError::OperatorAbort`] on cancellation, or the link error of a failed read.
pub async fn poll_until<F>(
    source: &dyn TelemetrySource,
    c_tok: &CancellationToken,
    interval: Duration,
    timeout: Option<Duration>,
    mut done: F,
) -> Result<PollExit, GuidanceError>
where
    F: FnMut(&TelemetrySample) -> bool + Send,
{
    let deadline = timeout.map(|t| Instant::now() + t);
    loop {
        if c_tok.is_cancelled() {
            return Err(GuidanceError::OperatorAbort);
        }
        let sample = source.sample().await?;
        if done(&sample) {
            return Ok(PollExit::Reached(sample));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(PollExit::TimedOut(sample));
        }
        pause(c_tok, interval).await?;
    }
}

/// Sleeps for `dt` unless `c_tok` is cancelled first.
pub async fn pause(c_tok: &CancellationToken, dt: Duration) -> Result<(), GuidanceError> {
    tokio::select! {
        biased;
        () = c_tok.cancelled() => Err(GuidanceError::OperatorAbort),
        () = tokio::time::sleep(dt) => Ok(()),
    }
}
