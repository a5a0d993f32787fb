//! Pure domain types with minimal dependencies
//!
//! This module contains the coordinate, topology and annotation types used
//! throughout the crate. Nothing here knows about rendering or input devices.

pub mod annotation;
pub mod geometry;
pub mod selection;
pub mod topology;
pub mod transform;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
pub use topology::*;
pub use transform::*;
