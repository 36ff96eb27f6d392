//! CSV and JSON export of a computed buoyancy curve.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::model::{BuoyancyCurve, BuoyancyParameters, Intermediates};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One CSV row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurveRecord {
    pub velocity_m_s: f64,
    pub descent_depth_m: f64,
    pub ascent_depth_m: f64,
}

#[derive(Debug, Serialize)]
pub struct CurveExport<'a> {
    pub parameters: &'a BuoyancyParameters,
    pub intermediates: Intermediates,
    #[serde(flatten)]
    pub curve: &'a BuoyancyCurve,
}

impl<'a> CurveExport<'a> {
    pub fn new(parameters: &'a BuoyancyParameters, curve: &'a BuoyancyCurve) -> Self {
        Self {
            parameters,
            intermediates: Intermediates::from_parameters(parameters),
            curve,
        }
    }
}

pub fn write_csv<W: Write>(curve: &BuoyancyCurve, writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for (velocity_m_s, descent_depth_m, ascent_depth_m) in curve.samples() {
        writer.serialize(CurveRecord {
            velocity_m_s,
            descent_depth_m,
            ascent_depth_m,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(
    parameters: &BuoyancyParameters,
    curve: &BuoyancyCurve,
    writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &CurveExport::new(parameters, curve))?;
    Ok(())
}

pub fn export_csv<P: AsRef<Path>>(curve: &BuoyancyCurve, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_csv(curve, create(path)?)?;
    log::info!("CSV export written: {}", path.display());
    Ok(())
}

pub fn export_json<P: AsRef<Path>>(
    parameters: &BuoyancyParameters,
    curve: &BuoyancyCurve,
    path: P,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_json(parameters, curve, create(path)?)?;
    log::info!("JSON export written: {}", path.display());
    Ok(())
}

pub fn export_svg<P: AsRef<Path>>(svg: &str, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    create(path)?.write_all(svg.as_bytes())?;
    log::info!("SVG chart written: {}", path.display());
    Ok(())
}

fn create(path: &Path) -> Result<File, ExportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compute_with_samples;

    fn params() -> BuoyancyParameters {
        BuoyancyParameters::new(80.0, 3.0, 1.8, 10.0)
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let curve = compute_with_samples(&params(), 5);
        let mut buffer = Vec::new();
        write_csv(&curve, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "velocity_m_s,descent_depth_m,ascent_depth_m");
        assert_eq!(lines[1], "0.0,10.0,10.0");
        assert!(lines[5].starts_with("1.4,"));
    }

    #[test]
    fn json_contains_parameters_intermediates_and_sequences() {
        let params = params();
        let curve = compute_with_samples(&params, 3);
        let mut buffer = Vec::new();
        write_json(&params, &curve, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["parameters"]["weight"], 80.0);
        assert_eq!(value["intermediates"]["pressure"], 199_325.0);
        assert_eq!(value["velocities"].as_array().unwrap().len(), 3);
        assert_eq!(value["descent_depths"][0], 10.0);
        assert_eq!(value["ascent_depths"][0], 10.0);
    }

    #[test]
    fn json_writes_nan_as_null() {
        let params = BuoyancyParameters::new(80.0, 3.0, 0.0, 10.0);
        let curve = compute_with_samples(&params, 2);
        let mut buffer = Vec::new();
        write_json(&params, &curve, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value["descent_depths"][0].is_null());
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = std::env::temp_dir().join("nbcalibrator-export-test").join("nested");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("curve.csv");
        export_csv(&compute_with_samples(&params(), 4), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn svg_export_writes_rendered_chart() {
        let dir = std::env::temp_dir().join("nbcalibrator-export-svg-test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("chart.svg");
        let svg = crate::chart::Chart::from_curve(&compute_with_samples(&params(), 20))
            .to_svg(400, 300)
            .unwrap();
        export_svg(&svg, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<svg"));
        assert_eq!(text, svg);
    }
}
