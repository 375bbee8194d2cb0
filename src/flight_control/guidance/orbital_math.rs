use crate::flight_control::guidance_error::GuidanceError;

/// Standard gravity used to convert specific impulse into exhaust velocity.
pub const G0: f64 = 9.81;

/// Delta-v needed at radius `r` to change the semi major axis from `a1` to `a2`.
///
/// Positive results are prograde burns. With `a2 == r` this is the circularization burn at
/// apoapsis.
///
/// # Errors
/// [`GuidanceError::SensorFault`] if an input is not finite or positive, or if either orbit
/// cannot pass through `r`.
pub fn circularization_dv(mu: f64, r: f64, a1: f64, a2: f64) -> Result<f64, GuidanceError> {
    for (name, value) in [("gravitational_parameter", mu), ("radius", r), ("a1", a1), ("a2", a2)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GuidanceError::SensorFault(format!("{name} is {value}")));
        }
    }
    let v1 = vis_viva(mu, r, a1)?;
    let v2 = vis_viva(mu, r, a2)?;
    Ok(v2 - v1)
}

/// Orbital speed at radius `r` on an orbit with semi major axis `a`.
pub fn vis_viva(mu: f64, r: f64, a: f64) -> Result<f64, GuidanceError> {
    let energy_term = mu * (2.0 / r - 1.0 / a);
    if energy_term < 0.0 {
        return Err(GuidanceError::SensorFault(format!(
            "radius {r:.0} m is unreachable on an orbit with a = {a:.0} m"
        )));
    }
    Ok(energy_term.sqrt())
}

/// Time needed to burn `dv` at full `thrust` starting from `mass`, using the rocket equation.
///
/// # Errors
/// [`GuidanceError::SensorFault`] if thrust, specific impulse or mass are not positive.
pub fn burn_time(dv: f64, isp: f64, mass: f64, thrust: f64) -> Result<f64, GuidanceError> {
    if !thrust.is_finite() || thrust <= 0.0 {
        return Err(GuidanceError::SensorFault(format!("available thrust is {thrust}")));
    }
    if !isp.is_finite() || isp <= 0.0 {
        return Err(GuidanceError::SensorFault(format!("specific impulse is {isp}")));
    }
    if !mass.is_finite() || mass <= 0.0 {
        return Err(GuidanceError::SensorFault(format!("mass is {mass}")));
    }
    let exhaust_velocity = isp * G0;
    let final_mass = mass / (dv.abs() / exhaust_velocity).exp();
    let flow_rate = thrust / exhaust_velocity;
    Ok((mass - final_mass) / flow_rate)
}

/// Gravitational acceleration at distance `r` from the body center.
pub fn local_gravity(mu: f64, r: f64) -> f64 { mu / (r * r) }

/// Thrust to weight ratio, or `None` if the weight is zero.
pub fn twr(thrust: f64, mass: f64, gravity: f64) -> Option<f64> {
    let weight = mass * gravity;
    if weight > 0.0 { Some(thrust / weight) } else { None }
}
