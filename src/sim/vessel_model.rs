use crate::flight_control::{
    guidance::orbital_math::G0,
    telemetry::{ManeuverNode, Propellant, ReferenceFrame, TelemetrySample},
};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Minimal planar vector for the point mass integration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
    pub fn abs(self) -> f64 { self.x.hypot(self.y) }
    pub fn dot(self, other: Vec2) -> f64 { self.x * other.x + self.y * other.y }
    pub fn cross(self, other: Vec2) -> f64 { self.x * other.y - self.y * other.x }
    pub fn normalize(self) -> Vec2 {
        let len = self.abs();
        if len > 0.0 { self * (1.0 / len) } else { self }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

/// Spherical, non rotating reference body with an exponential atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub mu: f64,
    pub radius: f64,
    pub atmosphere_depth: f64,
    pub scale_height: f64,
    pub sea_level_density: f64,
}

impl Body {
    /// A Kerbin sized body.
    pub const KERBIN: Body = Body {
        mu: 3.5316e12,
        radius: 600_000.0,
        atmosphere_depth: 70_000.0,
        scale_height: 5_600.0,
        sea_level_density: 1.225,
    };

    pub fn density(&self, altitude: f64) -> f64 {
        if altitude >= self.atmosphere_depth {
            0.0
        } else {
            self.sea_level_density * (-altitude.max(0.0) / self.scale_height).exp()
        }
    }
}

/// Engines and tanks that ignite and separate together.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineGroup {
    pub name: &'static str,
    pub dry_mass: f64,
    pub propellant: f64,
    pub propellant_kind: Propellant,
    /// Vacuum thrust at full throttle.
    pub thrust: f64,
    pub isp: f64,
    /// Stage number whose activation ignites the group.
    pub ignite_stage: u32,
    /// Stage number whose activation drops the group, `None` for the payload stage.
    pub decouple_stage: Option<u32>,
    pub attached: bool,
    pub ignited: bool,
}

impl EngineGroup {
    fn running(&self) -> bool { self.attached && self.ignited && self.propellant > 0.0 }

    /// Solid motors ignore the throttle.
    fn throttle_factor(&self, throttle: f64) -> f64 {
        match self.propellant_kind {
            Propellant::SolidFuel => 1.0,
            Propellant::LiquidFuel => throttle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimNode {
    pub node: ManeuverNode,
    /// Delta-v applied along the burn direction since the node was created.
    pub applied_dv: f64,
}

/// Orbit shape derived from a state vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub apoapsis_radius: f64,
    pub periapsis_radius: f64,
    pub time_to_apoapsis: f64,
}

impl OrbitElements {
    pub fn from_state(mu: f64, pos: Vec2, vel: Vec2) -> Self {
        let r = pos.abs();
        let v2 = vel.dot(vel);
        let energy = v2 / 2.0 - mu / r;
        let h = pos.cross(vel);
        let e = (1.0 + 2.0 * energy * h * h / (mu * mu)).max(0.0).sqrt();
        if energy >= 0.0 {
            let a = if energy > 0.0 { -mu / (2.0 * energy) } else { f64::INFINITY };
            return Self {
                semi_major_axis: a,
                eccentricity: e,
                apoapsis_radius: f64::INFINITY,
                periapsis_radius: h * h / (mu * (1.0 + e)),
                time_to_apoapsis: f64::INFINITY,
            };
        }
        let a = -mu / (2.0 * energy);
        let time_to_apoapsis = if e < 1e-9 {
            0.0
        } else {
            let cos_ecc = ((1.0 - r / a) / e).clamp(-1.0, 1.0);
            let ecc_anomaly = cos_ecc.acos();
            let mean_anomaly = ecc_anomaly - e * ecc_anomaly.sin();
            let mean_motion = (mu / a.powi(3)).sqrt();
            let climbing = pos.dot(vel) >= 0.0;
            let to_go = if climbing { PI - mean_anomaly } else { 2.0 * PI - (PI - mean_anomaly) };
            to_go / mean_motion
        };
        Self {
            semi_major_axis: a,
            eccentricity: e,
            apoapsis_radius: a * (1.0 + e),
            periapsis_radius: a * (1.0 - e),
            time_to_apoapsis,
        }
    }
}

/// Planar point mass vehicle flying around a [`Body`].
///
/// Stages count down like on the launch pad: `current_stage` is the number of stages left to
/// activate and each activation ignites and drops the groups tagged with the new number.
#[derive(Debug, Clone)]
pub struct VesselModel {
    pub body: Body,
    pub pos: Vec2,
    pub vel: Vec2,
    pub ut: f64,
    pub groups: Vec<EngineGroup>,
    pub current_stage: u32,
    pub drag_area: f64,
    pub throttle: f64,
    pub autopilot_engaged: bool,
    pub pitch_target: f64,
    pub heading: f64,
    pub roll: f64,
    /// Current pitch of the vehicle axis above the local horizon.
    pub pitch: f64,
    /// Slew rate of the attitude control in degrees per second.
    pub slew_rate: f64,
    pub tracking_node: bool,
    pub nodes: Vec<SimNode>,
    pub next_node_id: u64,
    pub staging_log: Vec<(f64, u32)>,
}

impl VesselModel {
    pub const STEP: f64 = 0.05;

    /// Core stage with two solid boosters and a vacuum upper stage, sitting on the pad.
    pub fn three_stage() -> Self {
        Self::on_pad(vec![
            EngineGroup {
                name: "boosters",
                dry_mass: 600.0,
                propellant: 3_000.0,
                propellant_kind: Propellant::SolidFuel,
                thrust: 150_000.0,
                isp: 230.0,
                ignite_stage: 2,
                decouple_stage: Some(1),
                attached: true,
                ignited: false,
            },
            EngineGroup {
                name: "core",
                dry_mass: 2_000.0,
                propellant: 8_000.0,
                propellant_kind: Propellant::LiquidFuel,
                thrust: 200_000.0,
                isp: 300.0,
                ignite_stage: 2,
                decouple_stage: Some(0),
                attached: true,
                ignited: false,
            },
            Self::upper_stage(0),
        ])
    }

    /// Same vehicle with liquid fuelled boosters that follow the core's throttle.
    pub fn liquid_boosters() -> Self {
        let mut model = Self::three_stage();
        if let Some(boosters) = model.groups.iter_mut().find(|g| g.name == "boosters") {
            boosters.propellant_kind = Propellant::LiquidFuel;
            boosters.isp = 280.0;
            boosters.propellant = 2_500.0;
        }
        model
    }

    /// An upper stage in a circular orbit at `altitude`, engine already active.
    pub fn in_orbit(altitude: f64) -> Self {
        let body = Body::KERBIN;
        let r = body.radius + altitude;
        let mut upper = Self::upper_stage(0);
        upper.ignited = true;
        let mut model = Self::with_groups(body, vec![upper], 0);
        model.pos = Vec2::new(0.0, r);
        model.vel = Vec2::new((body.mu / r).sqrt(), 0.0);
        model.pitch = 0.0;
        model.pitch_target = 0.0;
        model
    }

    fn upper_stage(ignite_stage: u32) -> EngineGroup {
        EngineGroup {
            name: "upper",
            dry_mass: 1_000.0,
            propellant: 3_000.0,
            propellant_kind: Propellant::LiquidFuel,
            thrust: 60_000.0,
            isp: 345.0,
            ignite_stage,
            decouple_stage: None,
            attached: true,
            ignited: false,
        }
    }

    fn on_pad(groups: Vec<EngineGroup>) -> Self {
        let stages = groups.iter().map(|g| g.ignite_stage + 1).max().unwrap_or(0);
        let body = Body::KERBIN;
        let mut model = Self::with_groups(body, groups, stages);
        model.pos = Vec2::new(0.0, body.radius);
        model
    }

    fn with_groups(body: Body, groups: Vec<EngineGroup>, current_stage: u32) -> Self {
        Self {
            body,
            pos: Vec2::default(),
            vel: Vec2::default(),
            ut: 0.0,
            groups,
            current_stage,
            drag_area: 1.0,
            throttle: 0.0,
            autopilot_engaged: false,
            pitch_target: 90.0,
            heading: 90.0,
            roll: 0.0,
            pitch: 90.0,
            slew_rate: 20.0,
            tracking_node: false,
            nodes: Vec::new(),
            next_node_id: 1,
            staging_log: Vec::new(),
        }
    }

    pub fn altitude(&self) -> f64 { self.pos.abs() - self.body.radius }

    pub fn mass(&self) -> f64 {
        self.groups.iter().filter(|g| g.attached).map(|g| g.dry_mass + g.propellant).sum()
    }

    pub fn available_thrust(&self) -> f64 {
        self.groups.iter().filter(|g| g.running()).map(|g| g.thrust).sum()
    }

    pub fn current_thrust(&self) -> f64 {
        self.groups.iter().filter(|g| g.running()).map(|g| g.thrust * g.throttle_factor(self.throttle)).sum()
    }

    /// Thrust weighted specific impulse of the running engines.
    pub fn specific_impulse(&self) -> f64 {
        let (thrust, flow) = self
            .groups
            .iter()
            .filter(|g| g.running())
            .fold((0.0, 0.0), |(t, f), g| (t + g.thrust, f + g.thrust / g.isp));
        if flow > 0.0 { thrust / flow } else { 0.0 }
    }

    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.body.density(self.altitude()) * self.vel.dot(self.vel)
    }

    pub fn stage_propellant(&self, stage: u32, resource: Propellant) -> f64 {
        self.groups
            .iter()
            .filter(|g| g.attached && g.decouple_stage == Some(stage) && g.propellant_kind == resource)
            .map(|g| g.propellant)
            .sum()
    }

    fn up(&self) -> Vec2 { self.pos.normalize() }

    /// Horizontal unit vector in the direction of flight.
    fn downrange(&self) -> Vec2 {
        let up = self.up();
        Vec2::new(up.y, -up.x)
    }

    /// Pitch of the velocity vector above the local horizon.
    pub fn prograde_pitch(&self) -> f64 {
        if self.vel.abs() < 1e-6 {
            return 90.0;
        }
        self.vel.dot(self.up()).atan2(self.vel.dot(self.downrange())).to_degrees()
    }

    fn node_pitch(&self) -> f64 {
        let prograde = self.prograde_pitch();
        match self.nodes.first() {
            Some(n) if n.node.prograde_delta_v < 0.0 => prograde + 180.0,
            _ => prograde,
        }
    }

    fn attitude_target(&self) -> f64 {
        if self.tracking_node { self.node_pitch() } else { self.pitch_target }
    }

    pub fn attitude_error(&self) -> f64 {
        if self.autopilot_engaged { wrap_degrees(self.attitude_target() - self.pitch).abs() } else { 0.0 }
    }

    pub fn activate_next_stage(&mut self) -> Option<u32> {
        if self.current_stage == 0 {
            return None;
        }
        self.current_stage -= 1;
        let stage = self.current_stage;
        for g in &mut self.groups {
            if g.decouple_stage == Some(stage) {
                g.attached = false;
            }
            if g.ignite_stage == stage {
                g.ignited = true;
            }
        }
        self.staging_log.push((self.ut, stage));
        Some(stage)
    }

    pub fn add_node(&mut self, ut: f64, prograde: f64) -> ManeuverNode {
        let node = ManeuverNode {
            id: self.next_node_id,
            time_of_execution: ut,
            prograde_delta_v: prograde,
            reference_frame: ReferenceFrame::Node,
        };
        self.next_node_id += 1;
        self.nodes.push(SimNode { node, applied_dv: 0.0 });
        node
    }

    pub fn remove_node(&mut self, id: u64) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.node.id != id);
        if self.nodes.is_empty() {
            self.tracking_node = false;
        }
        self.nodes.len() != before
    }

    pub fn node_remaining_dv(&self) -> Option<f64> {
        self.nodes.first().map(|n| (n.node.prograde_delta_v.abs() - n.applied_dv).abs())
    }

    pub fn orbit(&self) -> OrbitElements { OrbitElements::from_state(self.body.mu, self.pos, self.vel) }

    /// Advances the vehicle by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if self.autopilot_engaged {
            let err = wrap_degrees(self.attitude_target() - self.pitch);
            let max_turn = self.slew_rate * dt;
            self.pitch += err.clamp(-max_turn, max_turn);
        }

        let mass = self.mass();
        let thrust = self.current_thrust();
        let pitch = self.pitch.to_radians();
        let up = self.up();
        let thrust_dir = self.downrange() * pitch.cos() + up * pitch.sin();
        let r = self.pos.abs();
        let gravity = up * (-self.body.mu / (r * r));
        let speed = self.vel.abs();
        let drag = if speed > 0.0 {
            self.vel * (-0.5 * self.body.density(self.altitude()) * speed * self.drag_area / mass)
        } else {
            Vec2::default()
        };
        let accel = thrust_dir * (thrust / mass) + gravity + drag;
        self.vel = self.vel + accel * dt;
        self.pos = self.pos + self.vel * dt;

        if thrust > 0.0 {
            let burn_error = wrap_degrees(self.node_pitch() - self.pitch).to_radians();
            if let Some(node) = self.nodes.first_mut() {
                node.applied_dv += thrust / mass * dt * burn_error.cos();
            }
        }

        let throttle = self.throttle;
        for g in self.groups.iter_mut().filter(|g| g.running()) {
            let flow = g.thrust * g.throttle_factor(throttle) / (g.isp * G0);
            g.propellant = (g.propellant - flow * dt).max(0.0);
        }

        if self.altitude() < 0.0 {
            self.pos = self.up() * self.body.radius;
            if self.vel.dot(self.up()) < 0.0 {
                self.vel = Vec2::default();
            }
        }
        self.ut += dt;
    }

    pub fn telemetry(&self) -> TelemetrySample {
        let orbit = self.orbit();
        let radius = self.body.radius;
        TelemetrySample {
            altitude: self.altitude(),
            dynamic_pressure: self.dynamic_pressure(),
            apoapsis_altitude: orbit.apoapsis_radius - radius,
            apoapsis_radius: orbit.apoapsis_radius,
            periapsis_altitude: orbit.periapsis_radius - radius,
            time_to_apoapsis: orbit.time_to_apoapsis,
            mass: self.mass(),
            available_thrust: self.available_thrust(),
            current_thrust: self.current_thrust(),
            specific_impulse: self.specific_impulse(),
            orbit_radius: self.pos.abs(),
            semi_major_axis: orbit.semi_major_axis,
            gravitational_parameter: self.body.mu,
            atmosphere_depth: self.body.atmosphere_depth,
            universal_time: self.ut,
            current_stage: self.current_stage,
            attitude_error: self.attitude_error(),
            throttle: self.throttle,
            node_remaining_dv: self.node_remaining_dv(),
        }
    }
}

/// Wraps an angle difference into `(-180, 180]`.
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}
