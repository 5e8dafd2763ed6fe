// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result export.
//!
//! Projected coordinates are written as computed. `lat`/`lng` hold the
//! sample point and `building_lat`/`building_lng` the facade target, both
//! in the output CRS (x = `lng`, y = `lat`).

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use streetview_core::{CrsId, SampleResult};
use streetview_processing::{EngineConfig, SamplingReport, SamplingStats, SkippedBuilding};

use crate::config::OutputFormat;
use crate::reproject::Reprojector;

pub const CSV_HEADER: &str = "building_id,sample_x,sample_y,target_x,target_y,lat,lng,building_lat,building_lng,edge_index,distance,heading,confidence,building_area";

/// Output CRS and run settings shared by every export.
pub struct ExportContext<'a> {
    pub output_crs: &'a CrsId,
    pub config: &'a EngineConfig,
    pub reprojector: &'a Reprojector,
}

#[derive(Debug, Serialize)]
struct LocatedResult<'a> {
    #[serde(flatten)]
    result: &'a SampleResult,
    lat: f64,
    lng: f64,
    building_lat: f64,
    building_lng: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    output_crs: &'a CrsId,
    config: &'a EngineConfig,
    results: Vec<LocatedResult<'a>>,
    stats: &'a SamplingStats,
    skipped: &'a [SkippedBuilding],
}

fn locate<'a>(
    results: &'a [SampleResult],
    reprojector: &Reprojector,
) -> Result<Vec<LocatedResult<'a>>> {
    results
        .iter()
        .map(|result| {
            let sample = reprojector.project(result.sample_point)?;
            let target = reprojector.project(result.target_point)?;
            Ok(LocatedResult {
                result,
                lat: sample.y,
                lng: sample.x,
                building_lat: target.y,
                building_lng: target.x,
            })
        })
        .collect()
}

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &SamplingReport,
    context: &ExportContext<'_>,
    format: OutputFormat,
) -> Result<()> {
    let located = locate(&report.results, context.reprojector)?;
    match format {
        OutputFormat::Csv => write_csv(writer, &located),
        OutputFormat::Json => write_json(
            writer,
            &JsonReport {
                output_crs: context.output_crs,
                config: context.config,
                results: located,
                stats: &report.stats,
                skipped: &report.skipped,
            },
        ),
    }
}

fn write_csv<W: Write>(writer: &mut W, results: &[LocatedResult<'_>]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for located in results {
        let r = located.result;
        writeln!(
            writer,
            "{},{},{},{},{},{:.7},{:.7},{:.7},{:.7},{},{:.2},{:.2},{:.2},{:.2}",
            r.building_id,
            r.sample_point.x,
            r.sample_point.y,
            r.target_point.x,
            r.target_point.y,
            located.lat,
            located.lng,
            located.building_lat,
            located.building_lng,
            r.edge_index,
            r.distance,
            r.heading,
            r.confidence,
            r.building_area,
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, report: &JsonReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use streetview_core::{BuildingId, Coord};

    fn report() -> SamplingReport {
        SamplingReport {
            results: vec![SampleResult {
                building_id: BuildingId(17),
                sample_point: Coord { x: 551000.5, y: 4182000.25 },
                target_point: Coord { x: 551000.5, y: 4182012.0 },
                edge_index: 3,
                distance: 11.75,
                heading: 0.0,
                confidence: 88.25,
                building_area: 143.126,
            }],
            stats: SamplingStats {
                total: 2,
                matched: 1,
                too_far: 1,
                ..SamplingStats::default()
            },
            skipped: vec![],
        }
    }

    fn export(report: &SamplingReport, output_crs: &str, format: OutputFormat) -> Vec<u8> {
        let input = CrsId::new("EPSG:32610");
        let output = CrsId::new(output_crs);
        let reprojector = Reprojector::new(&input, &output).unwrap();
        let config = EngineConfig::new(50.0, 100.0).unwrap();
        let context = ExportContext {
            output_crs: &output,
            config: &config,
            reprojector: &reprojector,
        };
        let mut out = Vec::new();
        write_report(&mut out, report, &context, format).unwrap();
        out
    }

    #[test]
    fn test_csv_layout_in_input_crs() {
        let text = String::from_utf8(export(&report(), "EPSG:32610", OutputFormat::Csv)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "17,551000.5,4182000.25,551000.5,4182012,4182000.2500000,551000.5000000,4182012.0000000,551000.5000000,3,11.75,0.00,88.25,143.13"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_lat_lng_columns() {
        let text = String::from_utf8(export(&report(), "EPSG:4326", OutputFormat::Csv)).unwrap();
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row.len(), CSV_HEADER.split(',').count());
        assert_eq!(&row[..5], &["17", "551000.5", "4182000.25", "551000.5", "4182012"]);

        let column = |i: usize| row[i].parse::<f64>().unwrap();
        assert_abs_diff_eq!(column(5), 37.783932, epsilon = 1e-5);
        assert_abs_diff_eq!(column(6), -122.420809, epsilon = 1e-5);
        // Target is 11.75 m north of the sample point
        assert!(column(7) > column(5));
        assert_abs_diff_eq!(column(7) - column(5), 11.75 / 111_000.0, epsilon = 2e-6);
        assert_abs_diff_eq!(column(8), column(6), epsilon = 2e-7);
        assert_eq!(&row[9..], &["3", "11.75", "0.00", "88.25", "143.13"]);
    }

    #[test]
    fn test_csv_empty_has_header() {
        let empty = SamplingReport {
            results: vec![],
            stats: SamplingStats::default(),
            skipped: vec![],
        };
        let text = String::from_utf8(export(&empty, "EPSG:4326", OutputFormat::Csv)).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER);
    }

    #[test]
    fn test_json_report() {
        let out = export(&report(), "EPSG:4326", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["output_crs"], "EPSG:4326");
        assert_eq!(value["config"]["buffer_distance"], 50.0);
        assert_eq!(value["config"]["max_distance"], 100.0);

        let first = &value["results"][0];
        assert_eq!(first["building_id"], 17);
        assert_eq!(first["confidence"], 88.25);
        assert_eq!(first["sample_point"]["x"], 551000.5);
        assert_abs_diff_eq!(first["lat"].as_f64().unwrap(), 37.783932, epsilon = 1e-5);
        assert_abs_diff_eq!(first["lng"].as_f64().unwrap(), -122.420809, epsilon = 1e-5);
        assert!(first["building_lat"].as_f64().unwrap() > first["lat"].as_f64().unwrap());

        assert_eq!(value["stats"]["too_far"], 1);
        assert!(value["skipped"].as_array().unwrap().is_empty());
    }
}
