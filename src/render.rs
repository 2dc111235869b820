use crate::layers::{visible_points, LayerVisibility};
use crate::types::{Category, SampleCollection, SampledPoint};
use anyhow::{anyhow, Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// Constants for Web Mercator
const TILE_SIZE: u32 = 256;
const MARKER_RADIUS: i64 = 2;

/// Renders visible sample points to `tile_dir/{z}/{x}/{y}.png` for every zoom
/// in `min_zoom..=max_zoom`. Returns the number of tiles written.
pub fn generate_tiles(
    tile_dir: &Path,
    min_zoom: u8,
    max_zoom: u8,
    samples: &SampleCollection,
    layers: &LayerVisibility,
) -> Result<usize> {
    if min_zoom > max_zoom {
        return Err(anyhow!("min_zoom {} is above max_zoom {}", min_zoom, max_zoom));
    }
    info!("Generating tiles from min_zoom {} to max_zoom {}...", min_zoom, max_zoom);

    let colors = category_colors()?;
    let points: Vec<&SampledPoint> = visible_points(samples, layers).collect();
    debug!("{} of {} points visible", points.len(), samples.len());

    let written = (min_zoom..=max_zoom)
        .into_par_iter()
        .map(|z| render_zoom_level(tile_dir, z, &points, &colors))
        .collect::<Result<Vec<usize>>>()?
        .into_iter()
        .sum();

    info!("Wrote {} tiles to {:?}", written, tile_dir);
    Ok(written)
}

fn category_colors() -> Result<HashMap<Category, Rgba<u8>>> {
    Category::ALL
        .iter()
        .map(|c| Ok((*c, hex_to_rgba(c.descriptor().color)?)))
        .collect()
}

fn render_zoom_level(
    tile_dir: &Path,
    zoom: u8,
    points: &[&SampledPoint],
    colors: &HashMap<Category, Rgba<u8>>,
) -> Result<usize> {
    let mut local_tiles: HashMap<(u32, u32), RgbaImage> = HashMap::new();

    for point in points {
        let (tx, ty, px, py) = lat_lon_to_tile_pixel(point.latitude(), point.longitude(), zoom);

        let tile_img = local_tiles
            .entry((tx, ty))
            .or_insert_with(|| ImageBuffer::new(TILE_SIZE, TILE_SIZE));

        if let Some(color) = colors.get(&point.category) {
            draw_marker(tile_img, px, py, *color);
        }
    }

    // Save tiles: {tile_dir}/{z}/{x}/{y}.png
    let z_dir = tile_dir.join(zoom.to_string());
    fs::create_dir_all(&z_dir).context("Failed to create zoom directory")?;

    local_tiles.par_iter().try_for_each(|((x, y), img)| -> Result<()> {
        let x_dir = z_dir.join(x.to_string());
        fs::create_dir_all(&x_dir)
            .with_context(|| format!("Failed to create tile directory {:?}", x_dir))?;
        let path = x_dir.join(format!("{}.png", y));
        img.save(&path)
            .with_context(|| format!("Failed to save tile {:?}", path))
    })?;

    debug!("Rendered {} tiles at z{}", local_tiles.len(), zoom);
    Ok(local_tiles.len())
}

// Square marker clipped to the tile.
fn draw_marker(img: &mut RgbaImage, px: u32, py: u32, color: Rgba<u8>) {
    let max = i64::from(TILE_SIZE) - 1;
    let (cx, cy) = (i64::from(px), i64::from(py));
    for x in (cx - MARKER_RADIUS).max(0)..=(cx + MARKER_RADIUS).min(max) {
        for y in (cy - MARKER_RADIUS).max(0)..=(cy + MARKER_RADIUS).min(max) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

pub fn hex_to_rgba(hex: &str) -> Result<Rgba<u8>> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(anyhow!("Invalid hex colour: {:?}", hex));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).with_context(|| format!("Invalid hex colour: {:?}", hex))
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

// Coordinate conversions
fn lat_lon_to_tile_pixel(lat: f64, lon: f64, zoom: u8) -> (u32, u32, u32, u32) {
    let n = 2.0_f64.powi(i32::from(zoom));
    let x_t = (lon + 180.0) / 360.0 * n;
    let lat_rad = lat.to_radians();
    let y_t = (1.0 - (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() / PI) / 2.0 * n;

    let tx = x_t as u32;
    let ty = y_t as u32;

    let px = (((x_t - f64::from(tx)) * f64::from(TILE_SIZE)) as u32).min(TILE_SIZE - 1);
    let py = (((y_t - f64::from(ty)) * f64::from(TILE_SIZE)) as u32).min(TILE_SIZE - 1);

    (tx, ty, px, py)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{generate_with, SequenceSource};

    #[test]
    fn parses_descriptor_colours() {
        assert_eq!(hex_to_rgba("#3B82F6").unwrap(), Rgba([59, 130, 246, 255]));
        assert_eq!(hex_to_rgba("22C55E").unwrap(), Rgba([34, 197, 94, 255]));
        assert!(hex_to_rgba("#12345").is_err());
        assert!(hex_to_rgba("#GG0000").is_err());
    }

    #[test]
    fn projects_origin_to_tile_corner() {
        assert_eq!(lat_lon_to_tile_pixel(0.0, 0.0, 1), (1, 1, 0, 0));
        assert_eq!(lat_lon_to_tile_pixel(0.0, -180.0, 0), (0, 0, 0, 128));
    }

    #[test]
    fn marker_is_clipped_at_tile_edge() {
        let mut img: RgbaImage = ImageBuffer::new(TILE_SIZE, TILE_SIZE);
        let red = Rgba([255, 0, 0, 255]);
        draw_marker(&mut img, 0, 255, red);
        assert_eq!(*img.get_pixel(0, 255), red);
        assert_eq!(*img.get_pixel(2, 253), red);
        assert_eq!(*img.get_pixel(3, 253), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn writes_tiles_for_visible_layers_only() {
        let dir = tempfile::tempdir().unwrap();
        // All draws at the midpoint put each borough's points on its anchor.
        let samples = generate_with(&mut SequenceSource::new(vec![0.5]).unwrap());
        let layers = LayerVisibility::default();

        let written = generate_tiles(dir.path(), 10, 10, &samples, &layers).unwrap();
        assert!(written >= 1);
        assert!(dir.path().join("10").is_dir());

        let (tx, ty, px, py) = lat_lon_to_tile_pixel(40.7831, -73.9665, 10);
        let tile = dir.path().join("10").join(tx.to_string()).join(format!("{}.png", ty));
        let img = image::open(&tile).unwrap().to_rgba8();
        // Manhattan parks are drawn last, so their colour wins on the anchor.
        assert_eq!(*img.get_pixel(px, py), hex_to_rgba("#22C55E").unwrap());
    }

    #[test]
    fn hidden_layers_leave_no_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let samples = generate_with(&mut SequenceSource::new(vec![0.5]).unwrap());
        let layers = LayerVisibility::from_hidden(&Category::ALL);

        let written = generate_tiles(dir.path(), 9, 10, &samples, &layers).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let dir = tempfile::tempdir().unwrap();
        let samples = SampleCollection::default();
        assert!(generate_tiles(dir.path(), 12, 10, &samples, &LayerVisibility::default()).is_err());
    }
}
