// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Streetview Sampler - street-view sampling points facing building facades.
//!
//! Reads building footprints and a road network (GeoJSON, projected CRS),
//! picks for every building the road point closest to one of its facade
//! midpoints, and writes the viewpoint, camera heading and a distance-based
//! confidence as CSV or JSON. Each point is also written in `--output-crs`
//! (WGS84 lon/lat by default).
//!
//! ```text
//! streetview-sampler --buildings buildings.geojson --roads roads.geojson \
//!     --buffer-distance 50 --max-distance 100 --output samples.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};

mod config;
mod export;
mod loader;
mod reproject;

use config::Args;
use export::ExportContext;
use loader::BuildingFilter;
use reproject::Reprojector;
use streetview_core::CrsId;
use streetview_processing::ViewpointEngine;

fn main() -> Result<()> {
    // Logs go to stderr so results can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,streetview_processing=debug".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let engine_config = args
        .engine_config()
        .context("invalid matching distances")?;

    tracing::info!(
        buildings = %args.buildings.display(),
        roads = %args.roads.display(),
        buffer_distance = engine_config.buffer_distance,
        max_distance = engine_config.max_distance,
        min_area = args.min_area,
        worker_threads = args.worker_threads(),
        "Starting Streetview Sampler"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.worker_threads())
        .build_global()
        .context("failed to initialize rayon thread pool")?;

    let building_file = loader::read_collection(&args.buildings)?;
    let road_file = loader::read_collection(&args.roads)?;

    let building_crs = loader::resolve_crs(building_file.crs(), args.crs.as_deref(), "buildings")?;
    let road_crs = loader::resolve_crs(road_file.crs(), args.crs.as_deref(), "roads")?;

    let filter = BuildingFilter {
        id_property: &args.id_property,
        min_area: args.min_area,
        sample_size: args.sample_size,
        seed: args.seed,
    };
    let output_crs = CrsId::new(args.output_crs.as_str());
    let reprojector = Reprojector::new(&building_crs, &output_crs)
        .with_context(|| format!("cannot reproject from {} to {}", building_crs, output_crs))?;

    let buildings = loader::load_buildings(building_file, building_crs, &filter)?;
    let roads = loader::load_roads(road_file, road_crs)?;

    let engine = ViewpointEngine::new(engine_config, &buildings, &roads)
        .context("rejected input before matching")?;
    let report = engine.run();

    let format = args.output_format();
    let context = ExportContext {
        output_crs: &output_crs,
        config: &engine_config,
        reprojector: &reprojector,
    };
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            export::write_report(&mut BufWriter::new(file), &report, &context, format)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), ?format, output_crs = %output_crs, "Wrote results");
        }
        None => {
            let stdout = io::stdout();
            export::write_report(&mut BufWriter::new(stdout.lock()), &report, &context, format)
                .context("writing results to stdout")?;
        }
    }

    let stats = &report.stats;
    tracing::info!(
        matched = stats.matched,
        no_roads = stats.no_roads,
        too_far = stats.too_far,
        skipped = stats.skipped,
        unmatched = stats.unmatched(),
        match_rate = %format!("{:.1}%", stats.match_rate()),
        elapsed_ms = stats.elapsed_ms,
        "Sampling summary"
    );

    Ok(())
}
