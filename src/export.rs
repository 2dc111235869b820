use crate::catalog::SAMPLE_RATE;
use crate::sampling::sample_size;
use crate::statistics::aggregate;
use crate::types::{Borough, Category, SampleCollection, SampledPoint};
use anyhow::{anyhow, Context, Result};
use geo::Point;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

pub fn to_feature_collection(collection: &SampleCollection) -> FeatureCollection {
    let features = collection.iter().map(to_feature).collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn to_feature(point: &SampledPoint) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("category".into(), JsonValue::from(point.category.as_str()));
    properties.insert("borough".into(), JsonValue::from(point.borough.as_str()));
    properties.insert("name".into(), JsonValue::from(point.name.clone()));
    properties.insert("sampleId".into(), JsonValue::from(point.sample_id.clone()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.longitude(), point.latitude()]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

// Slack for coordinates that went through a JSON text round trip.
const COORD_TOLERANCE: f64 = 1e-9;

/// Rebuilds a collection from exported features, keeping their order.
///
/// The result must still look like one generation run: unique sample ids,
/// every point inside its borough's square and every stratum at its
/// expected size.
pub fn from_feature_collection(fc: FeatureCollection) -> Result<SampleCollection> {
    let points = fc
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            from_feature(feature).with_context(|| format!("Invalid sample feature at index {}", i))
        })
        .collect::<Result<Vec<_>>>()?;
    let collection = SampleCollection::new(points);
    validate_sample(&collection).context("GeoJSON is not a complete stratified sample")?;
    Ok(collection)
}

fn validate_sample(collection: &SampleCollection) -> Result<()> {
    let mut seen = HashSet::with_capacity(collection.len());
    for (i, point) in collection.iter().enumerate() {
        if !seen.insert(point.sample_id.as_str()) {
            return Err(anyhow!("Duplicate sampleId '{}' at index {}", point.sample_id, i));
        }
        if !within_anchor(point) {
            return Err(anyhow!(
                "Point '{}' at ({}, {}) lies outside the {} sampling square",
                point.sample_id,
                point.longitude(),
                point.latitude(),
                point.borough
            ));
        }
    }

    let table = aggregate(collection);
    for borough in Borough::ALL {
        for category in Category::ALL {
            let expected = sample_size(borough.baseline().count(category), SAMPLE_RATE);
            let found = table.count(borough, category);
            if found != expected {
                return Err(anyhow!(
                    "{} {} has {} points, expected {}",
                    borough,
                    category,
                    found,
                    expected
                ));
            }
        }
    }
    Ok(())
}

fn within_anchor(point: &SampledPoint) -> bool {
    let bounds = point.borough.anchor().bounds();
    let (x, y) = (point.longitude(), point.latitude());
    x >= bounds.min().x - COORD_TOLERANCE
        && x <= bounds.max().x + COORD_TOLERANCE
        && y >= bounds.min().y - COORD_TOLERANCE
        && y <= bounds.max().y + COORD_TOLERANCE
}

fn from_feature(feature: Feature) -> Result<SampledPoint> {
    // 1. Geometry
    let coords = match feature.geometry.map(|g| g.value) {
        Some(Value::Point(coords)) => coords,
        Some(_) => return Err(anyhow!("Sample geometry must be a Point")),
        None => return Err(anyhow!("Sample feature has no geometry")),
    };
    let (lng, lat) = match coords.as_slice() {
        [lng, lat, ..] => (*lng, *lat),
        _ => return Err(anyhow!("Point needs longitude and latitude")),
    };

    // 2. Properties
    let props = feature
        .properties
        .ok_or_else(|| anyhow!("Sample feature has no properties"))?;

    Ok(SampledPoint {
        point: Point::new(lng, lat),
        borough: string_property(&props, "borough")?.parse()?,
        category: string_property(&props, "category")?.parse()?,
        name: string_property(&props, "name")?.to_string(),
        sample_id: string_property(&props, "sampleId")?.to_string(),
    })
}

fn string_property<'a>(props: &'a JsonObject, key: &str) -> Result<&'a str> {
    match props.get(key) {
        Some(JsonValue::String(s)) => Ok(s),
        Some(other) => Err(anyhow!("Property '{}' must be a string, got {}", key, other)),
        None => Err(anyhow!("Property '{}' is missing", key)),
    }
}

pub fn write_geojson(path: &Path, collection: &SampleCollection) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create GeoJSON file: {:?}", path))?;
    let fc = to_feature_collection(collection);
    serde_json::to_writer_pretty(BufWriter::new(file), &fc)
        .with_context(|| format!("Failed to write GeoJSON to {:?}", path))?;

    info!("Wrote {} features to {:?}", collection.len(), path);
    Ok(())
}

pub fn read_geojson(path: &Path) -> Result<SampleCollection> {
    info!("Loading sample from {:?}...", path);
    let file = File::open(path).with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let geojson = GeoJson::from_reader(BufReader::new(file)).context("Failed to parse GeoJSON")?;

    let fc = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let collection = from_feature_collection(fc)?;
    info!("Loaded {} sample points", collection.len());
    Ok(collection)
}
