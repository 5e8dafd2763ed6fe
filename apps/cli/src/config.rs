// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line configuration, with environment variable fallbacks.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use streetview_core::ConfigError;
use streetview_processing::EngineConfig;

/// Output encoding for the sampling results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per matched building
    Csv,
    /// Full report including statistics and skipped buildings
    Json,
}

/// Generate street-view sampling points facing building facades.
#[derive(Parser, Debug, Clone)]
#[command(name = "streetview-sampler", version)]
pub struct Args {
    /// Building footprints (GeoJSON FeatureCollection of Polygon/MultiPolygon)
    #[arg(long, env = "STREETVIEW_BUILDINGS")]
    pub buildings: PathBuf,

    /// Road network (GeoJSON FeatureCollection of LineString/MultiLineString)
    #[arg(long, env = "STREETVIEW_ROADS")]
    pub roads: PathBuf,

    /// Output file. Results go to stdout when omitted.
    #[arg(long, short, env = "STREETVIEW_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Projected CRS of the inputs, used when a file carries no `crs` member
    #[arg(long, env = "STREETVIEW_CRS")]
    pub crs: Option<String>,

    /// CRS of the `lat`/`lng` output columns (EPSG code or proj string)
    #[arg(long, env = "STREETVIEW_OUTPUT_CRS", default_value = "EPSG:4326")]
    pub output_crs: String,

    /// Search radius around each footprint (CRS units)
    #[arg(long, env = "STREETVIEW_BUFFER_DISTANCE", allow_negative_numbers = true)]
    pub buffer_distance: f64,

    /// Largest accepted distance between facade and sample point (CRS units)
    #[arg(long, env = "STREETVIEW_MAX_DISTANCE", allow_negative_numbers = true)]
    pub max_distance: f64,

    /// Drop buildings smaller than this area before matching
    #[arg(long, env = "STREETVIEW_MIN_AREA", default_value_t = 20.0)]
    pub min_area: f64,

    /// Randomly keep at most this many buildings
    #[arg(long, env = "STREETVIEW_SAMPLE_SIZE")]
    pub sample_size: Option<usize>,

    /// Seed for --sample-size
    #[arg(long, env = "STREETVIEW_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Feature property holding the building id
    #[arg(long, default_value = "building_id")]
    pub id_property: String,

    /// Rayon worker threads (defaults to the number of CPUs)
    #[arg(long, env = "STREETVIEW_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Args {
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::new(self.buffer_distance, self.max_distance)
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    pub fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self
            .output
            .as_ref()
            .and_then(|path| path.extension())
            .and_then(|ext| ext.to_str())
        {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}
