//! Configuration persistence for planform settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::ScaleBar;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl AnnotationColor {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a 0.0-1.0 alpha
    pub const fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

/// Colors used when drawing the annotation overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub midline: AnnotationColor,
    pub midline_active: AnnotationColor,
    pub midline_handle: AnnotationColor,
    pub midline_handle_active: AnnotationColor,
    pub scale: AnnotationColor,
    pub scale_text: AnnotationColor,
    pub bone_midline: AnnotationColor,
    pub bone_side: AnnotationColor,
    pub bone_mirrored: AnnotationColor,
    pub joint_midline: AnnotationColor,
    pub joint_side: AnnotationColor,
    pub joint_current: AnnotationColor,
    pub joint_fill: AnnotationColor,
    pub joint_fill_drag: AnnotationColor,
    pub label_text: AnnotationColor,
    pub label_shadow: AnnotationColor,
    pub roi: AnnotationColor,
}

impl Palette {
    /// Dark strokes for light photographs
    pub fn dark() -> Self {
        Self {
            midline: AnnotationColor::from_rgb8(180, 40, 40, 0.9),
            midline_active: AnnotationColor::from_rgb8(220, 60, 60, 1.0),
            midline_handle: AnnotationColor::from_rgb8(0xaa, 0x33, 0x33, 1.0),
            midline_handle_active: AnnotationColor::from_rgb8(0xdd, 0x44, 0x44, 1.0),
            scale: AnnotationColor::from_rgb8(0x99, 0x66, 0x00, 1.0),
            scale_text: AnnotationColor::from_rgb8(0x66, 0x44, 0x00, 1.0),
            bone_midline: AnnotationColor::from_rgb8(180, 120, 0, 0.9),
            bone_side: AnnotationColor::from_rgb8(0, 140, 80, 0.9),
            bone_mirrored: AnnotationColor::from_rgb8(0, 140, 80, 0.4),
            joint_midline: AnnotationColor::from_rgb8(0xaa, 0x77, 0x00, 1.0),
            joint_side: AnnotationColor::from_rgb8(0x00, 0x88, 0x50, 1.0),
            joint_current: AnnotationColor::from_rgb8(0xcc, 0x00, 0x00, 1.0),
            joint_fill: AnnotationColor::rgba(1.0, 1.0, 1.0, 0.1),
            joint_fill_drag: AnnotationColor::rgba(1.0, 1.0, 1.0, 0.3),
            label_text: AnnotationColor::from_rgb8(0x22, 0x22, 0x22, 1.0),
            label_shadow: AnnotationColor::rgba(1.0, 1.0, 1.0, 0.8),
            roi: AnnotationColor::from_rgb8(0x00, 0x66, 0x44, 1.0),
        }
    }

    /// Light strokes for dark photographs
    pub fn light() -> Self {
        Self {
            midline: AnnotationColor::from_rgb8(255, 120, 120, 0.9),
            midline_active: AnnotationColor::from_rgb8(255, 150, 150, 1.0),
            midline_handle: AnnotationColor::from_rgb8(0xff, 0x88, 0x88, 1.0),
            midline_handle_active: AnnotationColor::from_rgb8(0xff, 0xaa, 0xaa, 1.0),
            scale: AnnotationColor::from_rgb8(0xff, 0xcc, 0x44, 1.0),
            scale_text: AnnotationColor::from_rgb8(0xff, 0xdd, 0x66, 1.0),
            bone_midline: AnnotationColor::from_rgb8(255, 200, 100, 0.9),
            bone_side: AnnotationColor::from_rgb8(100, 255, 180, 0.9),
            bone_mirrored: AnnotationColor::from_rgb8(100, 255, 180, 0.4),
            joint_midline: AnnotationColor::from_rgb8(0xff, 0xcc, 0x66, 1.0),
            joint_side: AnnotationColor::from_rgb8(0x66, 0xff, 0xaa, 1.0),
            joint_current: AnnotationColor::from_rgb8(0xff, 0x66, 0x66, 1.0),
            joint_fill: AnnotationColor::rgba(0.0, 0.0, 0.0, 0.1),
            joint_fill_drag: AnnotationColor::rgba(0.0, 0.0, 0.0, 0.3),
            label_text: AnnotationColor::from_rgb8(0xff, 0xff, 0xff, 1.0),
            label_shadow: AnnotationColor::rgba(0.0, 0.0, 0.0, 0.8),
            roi: AnnotationColor::from_rgb8(0x44, 0xff, 0xaa, 1.0),
        }
    }
}

/// Annotation stroke style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnnotationStyle {
    /// Dark annotations, for light backgrounds
    #[default]
    Dark,
    /// Light annotations, for dark backgrounds
    Light,
}

impl AnnotationStyle {
    pub fn palette(self) -> Palette {
        match self {
            AnnotationStyle::Dark => Palette::dark(),
            AnnotationStyle::Light => Palette::light(),
        }
    }
}

/// Screen-space hit radii (before annotation scaling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitRadii {
    /// Half-size of the square around the midline handle
    pub midline_handle: f64,
    /// Half-size of the squares around the scale bar caps
    pub scale_cap: f64,
    /// Circle around each placed joint
    pub joint: f64,
}

impl Default for HitRadii {
    fn default() -> Self {
        Self {
            midline_handle: 20.0,
            scale_cap: 15.0,
            joint: 12.0,
        }
    }
}

/// Analyzer configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub hit_radii: HitRadii,
    /// Distance of the midline handle from the viewport bottom
    pub midline_handle_inset: f64,
    /// Smallest ROI side, in image pixels, that can be committed
    pub min_roi_size: f64,
    /// Shortest scale bar, in image pixels
    pub min_scale_length: f64,
    /// Scale bar anchor relative to the ROI bottom-left: `(right, up)`
    pub scale_bar_inset: (f64, f64),
    /// Fraction of the ROI added on each side when zooming to it
    pub fit_padding: f64,
    /// Zoom ceiling when fitting the ROI
    pub fit_max_scale: f64,
    /// Delay between committing a ROI and zooming to it, in milliseconds
    pub fit_delay_ms: u64,
    /// Margin kept around a freshly loaded image
    pub image_fit_margin: f64,
    /// Multipliers for the zoom in/out buttons
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Multipliers for one wheel notch up/down
    pub wheel_in_factor: f64,
    pub wheel_out_factor: f64,
    /// Size multiplier for handles, strokes and hit targets (0.5-2.0)
    pub annotation_scale: f64,
    pub annotation_style: AnnotationStyle,
    /// Whether mirrored left-side ghosts are drawn
    pub show_mirrored: bool,
    /// Whether exports include the annotated ROI image
    pub export_with_image: bool,
    /// Default scale reference for new images
    pub scale_bar: ScaleBar,
}

pub const MIN_ANNOTATION_SCALE: f64 = 0.5;
pub const MAX_ANNOTATION_SCALE: f64 = 2.0;

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            hit_radii: HitRadii::default(),
            midline_handle_inset: 25.0,
            min_roi_size: 20.0,
            min_scale_length: 20.0,
            scale_bar_inset: (20.0, 30.0),
            fit_padding: 0.1,
            fit_max_scale: 3.0,
            fit_delay_ms: 50,
            image_fit_margin: 40.0,
            zoom_in_factor: 1.25,
            zoom_out_factor: 0.8,
            wheel_in_factor: 1.1,
            wheel_out_factor: 0.9,
            annotation_scale: 1.0,
            annotation_style: AnnotationStyle::Dark,
            show_mirrored: true,
            export_with_image: true,
            scale_bar: ScaleBar::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "planform";

    /// Default location: `<config_dir>/planform/config.json`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {err:#}");
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Clamp values that would break the interaction invariants
    pub fn sanitized(mut self) -> Self {
        self.annotation_scale = self
            .annotation_scale
            .clamp(MIN_ANNOTATION_SCALE, MAX_ANNOTATION_SCALE);
        if self.scale_bar.length < self.min_scale_length {
            log::warn!(
                "Configured scale bar length {} below minimum, clamping",
                self.scale_bar.length
            );
            self.scale_bar.length = self.min_scale_length;
        }
        if !(self.scale_bar.real_value > 0.0) {
            self.scale_bar.real_value = 1.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(
            AnnotationColor::from_rgb8(0, 140, 80, 0.4).to_rgba_u8(),
            [0, 140, 80, 102]
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "annotation_scale": 7.0, "show_mirrored": false }"#).unwrap();
        let config = AnalyzerConfig::load_from(&path).unwrap();
        assert_eq!(config.annotation_scale, MAX_ANNOTATION_SCALE);
        assert!(!config.show_mirrored);
        assert_eq!(config.min_roi_size, 20.0);
        assert_eq!(config.hit_radii, HitRadii::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AnalyzerConfig {
            annotation_style: AnnotationStyle::Light,
            fit_delay_ms: 10,
            ..AnalyzerConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AnalyzerConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = AnalyzerConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
