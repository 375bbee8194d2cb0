//! Pure guidance math: the feedback regulator, the gravity turn profiles and the orbital
//! mechanics used to plan the circularization burn.

pub mod orbital_math;
mod pid;
mod pitch_program;
#[cfg(test)]
mod tests;

pub use pid::{PidGains, PidRegulator};
pub use pitch_program::{PitchHysteresis, PitchProgram};
