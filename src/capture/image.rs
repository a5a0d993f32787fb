//! Source photograph for an analysis session

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Intrinsic pixel size of the loaded photograph
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded photograph; cloning shares the pixel buffer
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub rgba: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!("SourceImage loaded: {}x{} pixels", rgba.width(), rgba.height());
        Self {
            rgba: Arc::new(rgba),
        }
    }

    /// Decode any format supported by the `image` crate
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.width(),
            height: self.height(),
        }
    }
}
