//! Measurement export
//!
//! This module provides:
//! - The JSON document with metadata, joints, bones and angles (json.rs)
//! - The flat CSV table (csv.rs)
//! - PNG encoding and writing every export file into a directory

pub mod csv;
pub mod json;

use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

use crate::render;
use crate::session::Session;

pub use self::csv::build_csv;
pub use self::json::{ExportDocument, build_document, build_document_at};

pub const JSON_FILE_NAME: &str = "planform_measurements.json";
pub const CSV_FILE_NAME: &str = "planform_measurements.csv";
pub const IMAGE_FILE_NAME: &str = "planform_annotated.png";

/// Paths written by [`save_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    /// Present when the session exports images and a ROI exists
    pub image: Option<PathBuf>,
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()
}

/// Encode `image` into a new file at `path`
pub fn save_png(path: &Path, image: &RgbaImage) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_png(&mut w, image).with_context(|| format!("encoding {}", path.display()))?;
    w.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, image)?;
    Ok(buffer)
}

/// Write the JSON, CSV and (optionally) annotated PNG into `dir`
pub fn save_all(session: &Session, dir: &Path) -> anyhow::Result<ExportPaths> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let annotated = if session.config.export_with_image {
        render::annotated_roi(session)
    } else {
        None
    };

    let document = json::build_document(session, annotated.as_ref())?;
    let json_path = dir.join(JSON_FILE_NAME);
    std::fs::write(&json_path, json::to_json_string(&document)?)
        .with_context(|| format!("writing {}", json_path.display()))?;

    let csv_path = dir.join(CSV_FILE_NAME);
    let table = build_csv(&session.measurements(), &session.scale_bar.unit, session.topology());
    std::fs::write(&csv_path, table).with_context(|| format!("writing {}", csv_path.display()))?;

    let image_path = match &annotated {
        Some(img) => {
            let path = dir.join(IMAGE_FILE_NAME);
            save_png(&path, img)?;
            Some(path)
        }
        None => None,
    };

    log::info!("Exported measurements to {}", dir.display());
    Ok(ExportPaths {
        json: json_path,
        csv: csv_path,
        image: image_path,
    })
}

/// Documents folder, falling back to `~/Documents`
pub fn default_export_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
}
