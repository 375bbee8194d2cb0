use super::fine_trim::{FineTrim, TrimCommand};
use crate::flight_control::{
    common::poll::{PollExit, pause, poll_until},
    guidance::orbital_math,
    guidance_error::GuidanceError,
    telemetry::{ManeuverNode, TelemetrySample},
    vessel_link::{Actuator, TelemetrySource, TimeWarp},
};
use crate::keychain::Keychain;
use crate::mission_profile::BurnProfile;
use crate::{error, event, info, log, stage, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Summary of an executed maneuver burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurnReport {
    pub initial_dv: f64,
    pub residual_dv: f64,
    /// Burn duration predicted by the rocket equation when the burn was planned.
    pub estimated_burn_time: f64,
    pub coarse_ticks: u32,
    pub fine_ticks: u32,
    pub stages_activated: u32,
}

/// Executes a single maneuver node with exclusive command authority over the vessel.
///
/// The burn is split in a coarse full throttle phase and a fine trim phase driven by
/// [`FineTrim`]. Whatever the outcome, the throttle is zeroed, the attitude hold released and
/// the node removed before [`BurnExecutor::execute`] returns.
pub struct BurnExecutor {
    telemetry: Arc<dyn TelemetrySource>,
    actuator: Arc<dyn Actuator>,
    warp: Arc<dyn TimeWarp>,
    profile: BurnProfile,
    c_tok: CancellationToken,
    stages_activated: u32,
    /// Universal time of the last stage activation.
    last_staging_ut: Option<f64>,
}

impl BurnExecutor {
    /// Available thrust at or below which the active stage counts as burnt out.
    pub const FLAMEOUT_THRUST: f64 = 0.1;

    pub fn new(k: &Keychain, profile: BurnProfile, c_tok: CancellationToken) -> Self {
        Self {
            telemetry: k.telemetry(),
            actuator: k.actuator(),
            warp: k.warp(),
            profile,
            c_tok,
            stages_activated: 0,
            last_staging_ut: None,
        }
    }

    /// Flies `node` and deletes it from the flight plan afterwards.
    ///
    /// # Errors
    /// - [`GuidanceError::ActuationExhausted`] if thrust is lost with no stage left.
    /// - [`GuidanceError::ToleranceNotMet`] if the burn does not converge within its budget.
    /// - [`GuidanceError::OperatorAbort`] on cancellation.
    /// - [`GuidanceError::SensorFault`] or [`GuidanceError::Link`] for telemetry problems.
    pub async fn execute(&mut self, node: ManeuverNode) -> Result<BurnReport, GuidanceError> {
        info!(
            "Executing node {} with {:.2} m/s at UT {:.1}",
            node.id, node.prograde_delta_v, node.time_of_execution
        );
        let res = self.fly(&node).await;
        self.release(&node).await;
        match &res {
            Ok(report) => info!(
                "Burn finished, {:.3} m/s left after {} coarse and {} fine ticks",
                report.residual_dv, report.coarse_ticks, report.fine_ticks
            ),
            Err(e) => error!("Burn aborted: {e:?}"),
        }
        res
    }

    async fn fly(&mut self, node: &ManeuverNode) -> Result<BurnReport, GuidanceError> {
        let ignition = self.ensure_ignition().await?;
        let initial_dv = ignition.node_remaining_dv.unwrap_or(node.prograde_delta_v.abs());
        let burn_time = orbital_math::burn_time(
            initial_dv,
            ignition.specific_impulse,
            ignition.mass,
            ignition.available_thrust,
        )?;
        log!("Estimated burn time {burn_time:.2} s at a TWR of {:.2}", ignition.max_twr());

        // Engages the attitude hold on the burn vector. A later engage_autopilot would
        // retarget it to the ascent attitude.
        self.actuator.point_at_node(node).await?;
        self.wait_for_orientation().await?;

        let burn_start = node.time_of_execution - burn_time / 2.0;
        self.warp_until(burn_start, ignition.universal_time).await?;
        poll_until(
            self.telemetry.as_ref(),
            &self.c_tok,
            self.profile.poll_interval(),
            None,
            |s| s.universal_time >= burn_start,
        )
        .await?;

        let coarse_ticks = self.coarse_phase(node, initial_dv, burn_time).await?;
        let (fine_ticks, residual_dv) = self.fine_phase(initial_dv).await?;
        Ok(BurnReport {
            initial_dv,
            residual_dv,
            estimated_burn_time: burn_time,
            coarse_ticks,
            fine_ticks,
            stages_activated: self.stages_activated,
        })
    }

    /// Activates the next stage if no engine is running yet.
    async fn ensure_ignition(&mut self) -> Result<TelemetrySample, GuidanceError> {
        let mut sample = self.telemetry.sample().await?;
        if sample.specific_impulse <= 0.0 || sample.available_thrust <= Self::FLAMEOUT_THRUST {
            if sample.current_stage == 0 {
                return Err(GuidanceError::ActuationExhausted);
            }
            log!("No active engine, activating the next stage");
            self.activate_stage(sample.universal_time).await?;
            sample = self.telemetry.sample().await?;
        }
        if sample.available_thrust <= Self::FLAMEOUT_THRUST {
            return Err(GuidanceError::ActuationExhausted);
        }
        Ok(sample)
    }

    async fn wait_for_orientation(&self) -> Result<(), GuidanceError> {
        let tolerance = self.profile.orientation_tolerance;
        let exit = poll_until(
            self.telemetry.as_ref(),
            &self.c_tok,
            self.profile.poll_interval(),
            Some(self.profile.orientation_timeout()),
            |s| s.attitude_error <= tolerance,
        )
        .await?;
        if let PollExit::TimedOut(s) = exit {
            warn!("Orientation not settled, proceeding with {:.1} deg error", s.attitude_error);
        }
        Ok(())
    }

    async fn warp_until(&self, burn_start: f64, now: f64) -> Result<(), GuidanceError> {
        if !self.profile.use_time_warp {
            return Ok(());
        }
        let warp_target = burn_start - self.profile.warp_lead_secs;
        if warp_target > now {
            log!("Warping {:.0} s to T-{:.0}", warp_target - now, self.profile.warp_lead_secs);
            tokio::select! {
                biased;
                () = self.c_tok.cancelled() => return Err(GuidanceError::OperatorAbort),
                res = self.warp.warp_to(warp_target) => res?,
            }
        }
        Ok(())
    }

    async fn coarse_phase(
        &mut self,
        node: &ManeuverNode,
        initial_dv: f64,
        burn_time: f64,
    ) -> Result<u32, GuidanceError> {
        let threshold = (self.profile.coarse_fraction * initial_dv).max(self.profile.coarse_floor);
        let deadline = node.time_of_execution + 2.0 * burn_time + self.profile.orientation_timeout_secs;
        info!("Starting coarse burn down to {threshold:.1} m/s");
        self.actuator.set_throttle(1.0).await?;
        let mut ticks = 0;
        loop {
            let s = self.telemetry.sample().await?;
            let remaining = Self::remaining_dv(&s)?;
            if remaining <= threshold {
                return Ok(ticks);
            }
            if s.universal_time > deadline {
                return Err(GuidanceError::ToleranceNotMet { residual_dv: remaining });
            }
            if s.attitude_error > self.profile.reorientation_threshold {
                warn!("Attitude error {:.1} deg, reorienting", s.attitude_error);
                self.actuator.point_at_node(node).await?;
            }
            if s.available_thrust <= Self::FLAMEOUT_THRUST {
                self.restage(&s).await?;
            }
            ticks += 1;
            pause(&self.c_tok, self.profile.coarse_tick()).await?;
        }
    }

    /// Runs the trim law until cutoff. The loop yields instead of sleeping so the throttle is cut
    /// on the first sample that crosses the stop condition.
    async fn fine_phase(&mut self, initial_dv: f64) -> Result<(u32, f64), GuidanceError> {
        info!("Switching to fine burn");
        let trim = FineTrim::new(
            initial_dv,
            self.profile.fine_tolerance,
            self.profile.fine_min_time_to_target,
        );
        let mut last_stage = None;
        let mut remaining = f64::INFINITY;
        for tick in 0..self.profile.fine_tick_budget {
            if self.c_tok.is_cancelled() {
                return Err(GuidanceError::OperatorAbort);
            }
            let s = self.telemetry.sample().await?;
            remaining = Self::remaining_dv(&s)?;
            if s.available_thrust <= Self::FLAMEOUT_THRUST {
                self.restage(&s).await?;
                continue;
            }
            if last_stage.is_some_and(|st| st != s.current_stage) {
                log!("Stage change detected, now {} stages left", s.current_stage);
            }
            last_stage = Some(s.current_stage);

            match trim.command(
                remaining,
                s.available_thrust,
                s.throttle,
                s.mass,
                s.local_gravity(),
            ) {
                TrimCommand::Cutoff => {
                    self.actuator.set_throttle(0.0).await?;
                    log!("Final approach, engine cut at {remaining:.3} m/s");
                    return Ok((tick + 1, remaining));
                }
                TrimCommand::Throttle(throttle) => {
                    event!("Fine trim: {remaining:.3} m/s left, throttle {throttle:.4}");
                    self.actuator.set_throttle(throttle).await?;
                }
            }
            tokio::task::yield_now().await;
        }
        Err(GuidanceError::ToleranceNotMet { residual_dv: remaining })
    }

    /// Activates the next stage unless one was activated less than the staging cooldown ago.
    /// The cooldown runs on vessel time since the fine phase never sleeps.
    async fn restage(&mut self, s: &TelemetrySample) -> Result<(), GuidanceError> {
        let cooldown = self.profile.staging_cooldown_secs;
        if self.last_staging_ut.is_some_and(|ut| s.universal_time - ut < cooldown) {
            event!("Waiting for the new stage to light, {:.1} kN available", s.available_thrust / 1e3);
            return Ok(());
        }
        if s.current_stage == 0 {
            return Err(GuidanceError::ActuationExhausted);
        }
        self.activate_stage(s.universal_time).await
    }

    async fn activate_stage(&mut self, ut: f64) -> Result<(), GuidanceError> {
        let left = self.actuator.activate_next_stage().await?;
        self.stages_activated += 1;
        self.last_staging_ut = Some(ut);
        stage!("Stage activated during burn, {left} stages left");
        Ok(())
    }

    fn remaining_dv(s: &TelemetrySample) -> Result<f64, GuidanceError> {
        match s.node_remaining_dv {
            Some(dv) if dv.is_finite() => Ok(dv),
            Some(dv) => Err(GuidanceError::SensorFault(format!("remaining delta-v is {dv}"))),
            None => Err(GuidanceError::SensorFault("no active maneuver node".to_string())),
        }
    }

    /// Zeroes the throttle, releases the attitude hold and deletes the node. Failures are only
    /// logged so every step is attempted.
    async fn release(&self, node: &ManeuverNode) {
        if let Err(e) = self.actuator.set_throttle(0.0).await {
            error!("Failed to zero throttle: {e}");
        }
        if let Err(e) = self.actuator.disengage_autopilot().await {
            error!("Failed to release attitude hold: {e}");
        }
        if let Err(e) = self.actuator.remove_node(node).await {
            error!("Failed to remove node {}: {e}", node.id);
        }
        log!("Burn controls released");
    }
}
