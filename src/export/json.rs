//! JSON measurement document

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, SecondsFormat, Utc};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::analysis::{AngleMeasurement, BoneMeasurement};
use crate::capture::ImageDimensions;
use crate::domain::RoiRect;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub metadata: Metadata,
    pub joints: Vec<JointRecord>,
    pub bones: Vec<BoneMeasurement>,
    pub angles: Vec<AngleMeasurement>,
    /// PNG data URL of the annotated ROI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// RFC 3339 UTC timestamp
    pub export_date: String,
    pub roi: Option<RoiRect>,
    pub midline_x: Option<f64>,
    pub scale: ScaleInfo,
    pub image_dimensions: Option<ImageDimensions>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleInfo {
    pub pixels_per_unit: Option<f64>,
    pub unit: String,
}

/// One joint of the completed set, in pixels and real units
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointRecord {
    pub id: String,
    pub name: String,
    pub x_px: f64,
    pub y_px: f64,
    pub x_units: Option<f64>,
    pub y_units: Option<f64>,
}

/// Build the export document with `now` as the export date
///
/// Joints are listed in annotation order followed by the mirrored side.
pub fn build_document_at(
    session: &Session,
    annotated: Option<&RgbaImage>,
    now: DateTime<Utc>,
) -> anyhow::Result<ExportDocument> {
    let topology = session.topology();
    let full = session.full_joints();
    let measurements = session.measurements();
    let pixels_per_unit = session.scale_bar.pixels_per_unit();

    let joints = topology
        .all_joints()
        .filter_map(|joint| {
            let p = full.get(&joint.id)?;
            Some(JointRecord {
                id: joint.id.clone(),
                name: joint.name.clone(),
                x_px: p.x,
                y_px: p.y,
                x_units: pixels_per_unit.map(|ppu| p.x / ppu),
                y_units: pixels_per_unit.map(|ppu| p.y / ppu),
            })
        })
        .collect();

    let annotated_image = match annotated {
        Some(img) => Some(png_data_url(&super::encode_png(img)?)),
        None => None,
    };

    Ok(ExportDocument {
        metadata: Metadata {
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            roi: session.roi,
            midline_x: session.midline_x,
            scale: ScaleInfo {
                pixels_per_unit,
                unit: session.scale_bar.unit.clone(),
            },
            image_dimensions: session.image_dimensions,
        },
        joints,
        bones: measurements.bones,
        angles: measurements.angles,
        annotated_image,
    })
}

pub fn build_document(session: &Session, annotated: Option<&RgbaImage>) -> anyhow::Result<ExportDocument> {
    build_document_at(session, annotated, Utc::now())
}

pub fn to_json_string(document: &ExportDocument) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}
