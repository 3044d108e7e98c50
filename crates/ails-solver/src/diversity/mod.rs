//! Adaptive diversity control.
//!
//! The [`DiversityController`] anneals an ideal pairwise distance from
//! `d_max` to `d_min` and tunes the intensity (omega) of every adjustable
//! perturbation so that the observed distance between each improved candidate
//! and the reference solution tracks that ideal.

mod controller;
mod omega;
mod schedule;

pub use controller::DiversityController;
pub use omega::{OmegaAdjustment, OmegaKey, OmegaState};
pub use schedule::IdealDistanceSchedule;
