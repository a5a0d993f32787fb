//! Annotation rendering module
//!
//! This module contains:
//! - Stroke sizes and crop math shared by overlay renderers
//! - Image rendering using tiny-skia (for export)

pub mod geometry;
pub mod image;

pub use self::image::annotated_roi;
