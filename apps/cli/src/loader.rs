// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON input loading and building pre-filtering.
//!
//! Only the parts of GeoJSON the sampler needs are modelled: a
//! `FeatureCollection` of features with `Polygon`/`MultiPolygon` or
//! `LineString`/`MultiLineString` geometries, plus the legacy named `crs`
//! member. Positions may carry a third ordinate, which is ignored.

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use streetview_core::{
    Building, BuildingId, BuildingSet, CrsId, Footprint, RoadGeometry, RoadNetwork, RoadSegment,
};

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    crs: Option<NamedCrs>,
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct NamedCrs {
    properties: NamedCrsProperties,
}

#[derive(Debug, Deserialize)]
struct NamedCrsProperties {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<GeometryObject>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeometryObject {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    #[serde(other)]
    Unsupported,
}

impl FeatureCollection {
    /// CRS named by the file's `crs` member, if any.
    pub fn crs(&self) -> Option<CrsId> {
        self.crs
            .as_ref()
            .map(|crs| CrsId::new(crs.properties.name.as_str()))
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// Options applied to buildings before they reach the engine.
#[derive(Debug, Clone)]
pub struct BuildingFilter<'a> {
    pub id_property: &'a str,
    pub min_area: f64,
    pub sample_size: Option<usize>,
    pub seed: u64,
}

pub fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let collection: FeatureCollection = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing GeoJSON FeatureCollection {}", path.display()))?;
    tracing::debug!(path = %path.display(), features = collection.feature_count(), "Read GeoJSON");
    Ok(collection)
}

/// File `crs` member, else the command-line fallback.
pub fn resolve_crs(declared: Option<CrsId>, fallback: Option<&str>, what: &str) -> Result<CrsId> {
    match (declared, fallback) {
        (Some(declared), Some(fallback)) => {
            let fallback = CrsId::new(fallback);
            if declared != fallback {
                tracing::warn!(
                    %declared,
                    %fallback,
                    "{} declare their own CRS; ignoring --crs",
                    what
                );
            }
            Ok(declared)
        }
        (Some(declared), None) => Ok(declared),
        (None, Some(fallback)) => Ok(CrsId::new(fallback)),
        (None, None) => bail!("{} carry no `crs` member; pass --crs", what),
    }
}

/// Convert building features, drop small footprints and optionally subsample.
///
/// Ids come from `filter.id_property` when every kept feature carries a
/// non-negative integer there; otherwise buildings are numbered from 1 in
/// input order after filtering.
pub fn load_buildings(
    collection: FeatureCollection,
    crs: CrsId,
    filter: &BuildingFilter<'_>,
) -> Result<BuildingSet> {
    let total = collection.features.len();
    let mut unsupported = 0usize;
    let mut candidates: Vec<(Option<u64>, Footprint)> = Vec::with_capacity(total);

    for (position, feature) in collection.features.into_iter().enumerate() {
        let footprint = match feature.geometry {
            Some(GeometryObject::Polygon { coordinates }) => {
                Footprint::from(to_polygon(&coordinates).with_context(|| feature_context(position))?)
            }
            Some(GeometryObject::MultiPolygon { coordinates }) => {
                let parts = coordinates
                    .iter()
                    .map(|rings| to_polygon(rings))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| feature_context(position))?;
                Footprint::from(MultiPolygon(parts))
            }
            _ => {
                unsupported += 1;
                continue;
            }
        };
        let id = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(filter.id_property))
            .and_then(id_from_value);
        candidates.push((id, footprint));
    }
    if unsupported > 0 {
        tracing::warn!(unsupported, "Skipped building features without polygon geometry");
    }

    let before_area = candidates.len();
    let mut kept: Vec<(Option<u64>, Footprint, f64)> = candidates
        .into_iter()
        .filter_map(|(id, footprint)| {
            let area = footprint.area();
            (area >= filter.min_area).then_some((id, footprint, area))
        })
        .collect();
    tracing::info!(
        removed = before_area - kept.len(),
        min_area = filter.min_area,
        "Filtered small buildings"
    );

    if let Some(sample_size) = filter.sample_size {
        if sample_size < kept.len() {
            let mut rng = StdRng::seed_from_u64(filter.seed);
            let mut chosen = rand::seq::index::sample(&mut rng, kept.len(), sample_size).into_vec();
            chosen.sort_unstable();
            let mut slots: Vec<Option<_>> = kept.into_iter().map(Some).collect();
            kept = chosen
                .into_iter()
                .filter_map(|index| slots[index].take())
                .collect();
            tracing::info!(sample_size, seed = filter.seed, "Sampled buildings");
        }
    }

    let use_property = !kept.is_empty() && kept.iter().all(|(id, _, _)| id.is_some());
    if !use_property && !kept.is_empty() {
        tracing::info!(
            property = filter.id_property,
            "Id property missing on some buildings; numbering from 1"
        );
    }

    let buildings = kept
        .into_iter()
        .enumerate()
        .map(|(n, (id, footprint, area))| {
            let id = match id {
                Some(id) if use_property => id,
                _ => n as u64 + 1,
            };
            Building::with_area(BuildingId(id), footprint, area)
        })
        .collect::<Vec<_>>();

    tracing::info!(
        features = total,
        buildings = buildings.len(),
        vertices = buildings
            .iter()
            .map(|b| b.footprint.exterior_vertex_count())
            .sum::<usize>(),
        crs = %crs,
        "Loaded buildings"
    );
    Ok(BuildingSet::new(crs, buildings))
}

pub fn load_roads(collection: FeatureCollection, crs: CrsId) -> Result<RoadNetwork> {
    let total = collection.features.len();
    let mut roads = Vec::with_capacity(total);

    for (position, feature) in collection.features.into_iter().enumerate() {
        let geometry = match feature.geometry {
            Some(GeometryObject::LineString { coordinates }) => RoadGeometry::from(
                to_line_string(&coordinates).with_context(|| feature_context(position))?,
            ),
            Some(GeometryObject::MultiLineString { coordinates }) => {
                let lines = coordinates
                    .iter()
                    .map(|line| to_line_string(line))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| feature_context(position))?;
                RoadGeometry::from(MultiLineString(lines))
            }
            _ => continue,
        };
        roads.push(RoadSegment::new(geometry));
    }

    if roads.len() < total {
        tracing::warn!(
            unsupported = total - roads.len(),
            "Skipped road features without line geometry"
        );
    }
    tracing::info!(roads = roads.len(), crs = %crs, "Loaded roads");
    Ok(RoadNetwork::new(crs, roads))
}

fn feature_context(position: usize) -> String {
    format!("feature #{}", position)
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(anyhow!("position has {} ordinates, expected at least 2", position.len())),
    }
}

fn to_line_string(positions: &[Position]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| to_coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn to_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => to_line_string(ring)?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.map(|ring| to_line_string(ring)).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Non-negative integer id from a number or a numeric string.
fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
