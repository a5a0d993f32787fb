//! Planform landmark annotation core
//!
//! Maps between screen and image space, tracks the stage workflow for
//! placing a gliding mammal's skeletal landmarks, and derives bone lengths
//! and joint angles in real-world units. Hosts drive a [`Session`] with
//! [`Msg`] values and draw from its public state.

pub mod analysis;
pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;

pub use analysis::{Measurements, complete_joints, compute};
pub use capture::SourceImage;
pub use config::AnalyzerConfig;
pub use domain::{Point, RoiRect, ScaleBar, Stage, ViewTransform, planform};
pub use session::{Command, Msg, Session};

/// Install the `env_logger` backend, defaulting to `warn`
///
/// Honors `RUST_LOG`. Calling it twice is harmless.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}
