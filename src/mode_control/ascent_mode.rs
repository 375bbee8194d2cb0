use super::{mode_context::ModeContext, signal::PhaseSignal};
use crate::flight_control::{
    AscentPhase, GuidanceError,
    burn::{BurnExecutor, BurnReport},
    common::poll::{pause, poll_until},
    guidance::{PidRegulator, PitchHysteresis, PitchProgram, orbital_math},
    telemetry::{ControllerSnapshot, Propellant, TelemetrySample},
};
use crate::mission_profile::{BoosterKind, MissionProfile, ThrottleRegulation};
use crate::{error, event, fatal, info, log, stage, warn};
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

/// Mutable guidance state owned by the ascent controller for the duration of one flight.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub phase: AscentPhase,
    pub target_apoapsis: f64,
    pub target_heading: f64,
    pub pitch_program: PitchProgram,
    pub regulation: ThrottleRegulation,
    pub pid: PidRegulator,
    /// Stages left after the most recent activation.
    pub last_stage_index: u32,
    pub boosters_separated: bool,
}

impl ControllerState {
    fn new(profile: &MissionProfile) -> Self {
        Self {
            phase: AscentPhase::Launch,
            target_apoapsis: profile.target_apoapsis,
            target_heading: profile.target_heading,
            pitch_program: profile.pitch_program,
            regulation: profile.throttle_regulation,
            pid: PidRegulator::new(
                profile.pid,
                profile.throttle_regulation.setpoint(),
                profile.min_throttle,
                profile.max_throttle,
            ),
            last_stage_index: 0,
            boosters_separated: false,
        }
    }

    /// Altitude band of the gravity turn, if the active pitch program is altitude based.
    pub fn turn_band(&self) -> Option<(f64, f64)> {
        match self.pitch_program {
            PitchProgram::LinearFraction { turn_start, turn_end } => Some((turn_start, turn_end)),
            _ => None,
        }
    }
}

/// The ascent state machine.
///
/// Flies `Launch -> Roll -> PitchProgram -> Circularization -> Done`, one phase step per control
/// tick. Any fault ends the flight in `Aborted` after the throttle has been zeroed and the
/// attitude hold released. While the circularization burn runs, the [`BurnExecutor`] holds
/// command authority and the state machine does not tick.
pub struct AscentController {
    context: Arc<ModeContext>,
    state: ControllerState,
    history: Vec<AscentPhase>,
    hysteresis: PitchHysteresis,
    ignited: bool,
    coasting: bool,
    /// Available thrust right after ignition, reference for liquid booster separation.
    max_thrust: f64,
    last_sample: Option<TelemetrySample>,
    dt: Option<f64>,
    frozen_ticks: u32,
    last_staging: Option<Instant>,
    throttle: f64,
    pitch: f64,
    separations: u32,
    burn: Option<BurnReport>,
}

impl AscentController {
    /// Available thrust at or below which the active stage counts as burnt out.
    const FLAMEOUT_THRUST: f64 = BurnExecutor::FLAMEOUT_THRUST;
    /// Solid propellant left in the booster stage at which the boosters count as empty.
    const SOLID_EMPTY: f64 = 0.1;
    /// Share of the ignition thrust below which liquid boosters count as burnt out.
    const LIQUID_THRUST_MARGIN: f64 = 0.995;
    const THROTTLE_DEADBAND: f64 = 1e-4;
    const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

    pub fn new(context: Arc<ModeContext>) -> Self {
        let state = ControllerState::new(context.profile());
        let hysteresis = PitchHysteresis::new(context.profile().pitch_hysteresis);
        Self {
            context,
            state,
            history: vec![AscentPhase::Launch],
            hysteresis,
            ignited: false,
            coasting: false,
            max_thrust: 0.0,
            last_sample: None,
            dt: None,
            frozen_ticks: 0,
            last_staging: None,
            throttle: 0.0,
            pitch: 90.0,
            separations: 0,
            burn: None,
        }
    }

    pub fn phase(&self) -> AscentPhase { self.state.phase }
    pub fn phase_history(&self) -> &[AscentPhase] { &self.history }
    pub fn state(&self) -> &ControllerState { &self.state }
    pub fn booster_separations(&self) -> u32 { self.separations }

    /// Flies the whole ascent.
    ///
    /// # Returns
    /// The report of the circularization burn.
    ///
    /// # Errors
    /// The fault that aborted the flight. The controller is in [`AscentPhase::Aborted`] and the
    /// vessel has been released when this returns an error.
    pub async fn run(&mut self) -> Result<BurnReport, GuidanceError> {
        info!(
            "Starting ascent to {:.0} m apoapsis on heading {:.0}",
            self.state.target_apoapsis, self.state.target_heading
        );
        match self.fly().await {
            Ok(report) => {
                info!("Orbit insertion complete");
                Ok(report)
            }
            Err(e) => {
                error!("Ascent aborted in {}: {e:?}", self.state.phase);
                self.release_controls().await;
                self.transition(AscentPhase::Aborted);
                self.publish().await;
                Err(e)
            }
        }
    }

    async fn fly(&mut self) -> Result<BurnReport, GuidanceError> {
        let tick = self.context.profile().tick();
        while !self.state.phase.is_terminal() {
            pause(self.context.c_tok(), tick).await?;
            let s = self.checked_sample().await?;
            if self.ignited {
                self.staging_guard(&s).await?;
            }
            let signal = match self.state.phase {
                AscentPhase::Launch => self.launch(&s).await?,
                AscentPhase::Roll => self.roll().await?,
                AscentPhase::PitchProgram => self.pitch_program(&s).await?,
                AscentPhase::Circularization => self.circularize().await?,
                AscentPhase::Done | AscentPhase::Aborted => PhaseSignal::Continue,
            };
            // The circularization tick spans the whole burn; its entry sample is stale.
            let s = if self.state.phase == AscentPhase::Circularization {
                self.context.k().telemetry().sample().await?
            } else {
                s
            };
            self.last_sample = Some(s);
            if let PhaseSignal::Transition(next) = signal {
                self.transition(next);
            }
            self.publish().await;
        }
        self.burn.ok_or_else(|| GuidanceError::SensorFault("no circularization burn".to_string()))
    }

    /// Reads a sample and rejects non finite values and a frozen clock.
    async fn checked_sample(&mut self) -> Result<TelemetrySample, GuidanceError> {
        let s = self.context.k().telemetry().sample().await?;
        if let Some(field) = s.first_non_finite() {
            return Err(GuidanceError::SensorFault(format!("{field} is not finite")));
        }
        let prev = self.last_sample.map(|p| p.universal_time);
        if prev.is_some_and(|p| s.universal_time <= p) {
            self.frozen_ticks += 1;
            if self.frozen_ticks >= self.context.profile().stall_ticks {
                return Err(GuidanceError::SensorFault(format!(
                    "telemetry stalled at UT {:.2} for {} ticks",
                    s.universal_time, self.frozen_ticks
                )));
            }
        } else {
            self.frozen_ticks = 0;
        }
        self.dt = prev.map(|p| s.universal_time - p);
        Ok(s)
    }

    fn transition(&mut self, next: AscentPhase) {
        let from = self.state.phase;
        if !from.can_transition_to(next) {
            fatal!("Illegal phase transition {from} -> {next}");
        }
        info!("Phase {from} -> {next}");
        self.state.phase = next;
        self.history.push(next);
    }

    async fn launch(&mut self, s: &TelemetrySample) -> Result<PhaseSignal, GuidanceError> {
        if !self.ignited {
            self.ignite().await?;
            return Ok(PhaseSignal::Continue);
        }
        if s.altitude > self.context.profile().roll_altitude {
            log!("Clear of the tower at {:.0} m", s.altitude);
            return Ok(PhaseSignal::Transition(AscentPhase::Roll));
        }
        Ok(PhaseSignal::Continue)
    }

    async fn ignite(&mut self) -> Result<(), GuidanceError> {
        let ctx = Arc::clone(&self.context);
        let actuator = ctx.k().actuator();
        actuator.engage_autopilot().await?;
        self.command_pitch(90.0).await?;
        self.command_throttle(1.0).await?;
        for remaining in (1..=ctx.profile().countdown_secs).rev() {
            info!("T-{remaining}");
            pause(ctx.c_tok(), Self::COUNTDOWN_STEP).await?;
        }
        let left = actuator.activate_next_stage().await?;
        stage!("Ignition, {left} stages left");
        self.state.last_stage_index = left;
        self.last_staging = Some(Instant::now());
        self.max_thrust = ctx.k().telemetry().sample().await?.available_thrust;
        log!("Ignition thrust {:.1} kN", self.max_thrust / 1000.0);
        self.ignited = true;
        Ok(())
    }

    async fn roll(&mut self) -> Result<PhaseSignal, GuidanceError> {
        let actuator = self.context.k().actuator();
        actuator.set_pitch_and_heading(self.pitch, self.state.target_heading).await?;
        actuator.set_roll(0.0).await?;
        Ok(PhaseSignal::Transition(AscentPhase::PitchProgram))
    }

    async fn pitch_program(&mut self, s: &TelemetrySample) -> Result<PhaseSignal, GuidanceError> {
        let ctx = Arc::clone(&self.context);
        let profile = ctx.profile();
        let target = self.state.pitch_program.target_pitch(s.altitude, s.apoapsis_altitude);
        self.command_pitch(target).await?;
        self.check_boosters(s).await?;

        if s.apoapsis_altitude >= self.state.target_apoapsis {
            self.command_throttle(0.0).await?;
            info!("Target apoapsis reached, {:.0} m at {:.0} m altitude", s.apoapsis_altitude, s.altitude);
            return Ok(PhaseSignal::Transition(AscentPhase::Circularization));
        }
        let throttle = if s.apoapsis_altitude >= profile.coast_fraction * self.state.target_apoapsis {
            if !self.coasting {
                log!("Apoapsis at {:.0} m, throttling down for the approach", s.apoapsis_altitude);
                self.coasting = true;
            }
            profile.coast_throttle
        } else {
            self.regulated_throttle(s)
        };
        self.command_throttle(throttle).await?;
        Ok(PhaseSignal::Continue)
    }

    /// Feeds the regulated quantity to the PID and returns the clamped throttle. Ticks without a
    /// usable interval keep the current throttle.
    fn regulated_throttle(&mut self, s: &TelemetrySample) -> f64 {
        let Some(dt) = self.dt else { return self.throttle };
        let value = match self.state.regulation {
            ThrottleRegulation::DynamicPressure { .. } => s.dynamic_pressure,
            ThrottleRegulation::Twr { .. } => s.twr(),
        };
        match self.state.pid.update(value, dt) {
            Ok(output) => {
                let throttle = self.state.pid.clamp(output);
                event!("Regulator: value {value:.2}, output {output:.3}, throttle {throttle:.3}");
                throttle
            }
            Err(e) => {
                warn!("Regulator skipped tick: {e:?}");
                self.throttle
            }
        }
    }

    /// Switches the regulated quantity. The accumulated regulator state is dropped.
    pub fn set_regulation(&mut self, regulation: ThrottleRegulation) {
        if regulation == self.state.regulation {
            return;
        }
        info!("Throttle regulation switched to {regulation:?}");
        self.state.regulation = regulation;
        self.state.pid.retarget(regulation.setpoint());
    }

    async fn check_boosters(&mut self, s: &TelemetrySample) -> Result<(), GuidanceError> {
        let Some(boosters) = self.context.profile().boosters else { return Ok(()) };
        if self.state.boosters_separated {
            return Ok(());
        }
        if s.current_stage.min(self.state.last_stage_index) <= boosters.decouple_stage {
            log!("Booster stage already activated");
            self.state.boosters_separated = true;
            return Ok(());
        }
        let burnt_out = match boosters.kind {
            BoosterKind::Solid => {
                let left = self
                    .context
                    .k()
                    .telemetry()
                    .stage_propellant(boosters.decouple_stage, Propellant::SolidFuel)
                    .await?;
                left < Self::SOLID_EMPTY
            }
            BoosterKind::Liquid => s.available_thrust < self.max_thrust * Self::LIQUID_THRUST_MARGIN,
        };
        if !burnt_out {
            return Ok(());
        }
        let left = self.context.k().actuator().activate_next_stage().await?;
        stage!("{} booster separation at {:.0} m, {left} stages left", boosters.kind, s.altitude);
        self.state.last_stage_index = left;
        self.state.boosters_separated = true;
        self.separations += 1;
        self.last_staging = Some(Instant::now());
        if let Some(regulation) = self.context.profile().post_separation_regulation {
            self.set_regulation(regulation);
        }
        Ok(())
    }

    /// Activates the next stage whenever the active one has no thrust left, in every phase.
    async fn staging_guard(&mut self, s: &TelemetrySample) -> Result<(), GuidanceError> {
        if s.available_thrust > Self::FLAMEOUT_THRUST {
            return Ok(());
        }
        let cooldown = self.context.profile().staging_cooldown();
        if self.last_staging.is_some_and(|t| t.elapsed() < cooldown) {
            return Ok(());
        }
        if s.current_stage == 0 {
            return Err(GuidanceError::ActuationExhausted);
        }
        let left = self.context.k().actuator().activate_next_stage().await?;
        stage!("Flameout at {:.0} m, next stage activated, {left} stages left", s.altitude);
        self.state.last_stage_index = left;
        self.last_staging = Some(Instant::now());
        Ok(())
    }

    async fn circularize(&mut self) -> Result<PhaseSignal, GuidanceError> {
        let ctx = Arc::clone(&self.context);
        let profile = ctx.profile();
        self.command_throttle(0.0).await?;

        log!("Coasting out of the atmosphere");
        let exit = poll_until(
            ctx.k().telemetry().as_ref(),
            ctx.c_tok(),
            profile.poll_interval(),
            Some(profile.atmosphere_exit_timeout()),
            |s| s.altitude > s.atmosphere_depth,
        )
        .await?;
        let s = *exit.sample();
        if !exit.reached() {
            warn!("Still inside the atmosphere at {:.0} m, planning the burn anyway", s.altitude);
        }

        let dv = orbital_math::circularization_dv(
            s.gravitational_parameter,
            s.apoapsis_radius,
            s.semi_major_axis,
            s.apoapsis_radius,
        )?;
        let node_ut = s.universal_time + s.time_to_apoapsis;
        if !node_ut.is_finite() {
            return Err(GuidanceError::SensorFault("time to apoapsis is not finite".to_string()));
        }
        info!("Circularization burn of {dv:.1} m/s planned at UT {node_ut:.1}");
        let node = ctx.k().actuator().add_node(node_ut, dv).await?;
        let mut executor = BurnExecutor::new(ctx.k(), profile.burn.clone(), ctx.c_tok().clone());
        self.burn = Some(executor.execute(node).await?);
        Ok(PhaseSignal::Transition(AscentPhase::Done))
    }

    async fn command_pitch(&mut self, target: f64) -> Result<(), GuidanceError> {
        if let Some(pitch) = self.hysteresis.filter(target) {
            event!("Pitch target {pitch:.1} deg");
            self.context
                .k()
                .actuator()
                .set_pitch_and_heading(pitch, self.state.target_heading)
                .await?;
            self.pitch = pitch;
        }
        Ok(())
    }

    async fn command_throttle(&mut self, throttle: f64) -> Result<(), GuidanceError> {
        let throttle = throttle.clamp(0.0, 1.0);
        if (throttle - self.throttle).abs() > Self::THROTTLE_DEADBAND || throttle == 0.0 {
            self.context.k().actuator().set_throttle(throttle).await?;
        }
        self.throttle = throttle;
        Ok(())
    }

    /// Zeroes the throttle and releases the attitude hold, logging failures.
    async fn release_controls(&mut self) {
        let actuator = self.context.k().actuator();
        if let Err(e) = actuator.set_throttle(0.0).await {
            error!("Failed to zero throttle: {e}");
        }
        if let Err(e) = actuator.disengage_autopilot().await {
            error!("Failed to release attitude hold: {e}");
        }
        self.throttle = 0.0;
        log!("Controls released");
    }

    async fn publish(&self) {
        let Some(s) = self.last_sample else { return };
        self.context
            .publish(ControllerSnapshot {
                phase: self.state.phase,
                universal_time: s.universal_time,
                altitude: s.altitude,
                apoapsis_altitude: s.apoapsis_altitude,
                dynamic_pressure: s.dynamic_pressure,
                pitch: self.pitch,
                twr: s.twr(),
                throttle: self.throttle,
            })
            .await;
    }
}
