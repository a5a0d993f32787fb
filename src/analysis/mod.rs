//! Derived skeletal data
//!
//! This module provides:
//! - Bilateral completion of right-side placements (bilateral.rs)
//! - Bone length and joint angle computation (measurement.rs)

pub mod bilateral;
pub mod measurement;

pub use bilateral::complete_joints;
pub use measurement::{AngleMeasurement, BoneMeasurement, Measurements, compute};
