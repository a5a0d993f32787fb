//! Image input
//!
//! Decoding is a convenience for hosts; the session only needs the RGBA buffer.

pub mod image;

pub use self::image::{ImageDimensions, SourceImage};
