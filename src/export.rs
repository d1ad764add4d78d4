use image::{ImageBuffer, Rgb, RgbImage};

use crate::noise::NoiseMap;
use crate::tile::TileCoord;
use crate::world::World;

/// Colour for tiles that have never been shown.
const FOG_COLOR: [u8; 3] = [24, 24, 28];

/// Export a noise map using spectral colormap, normalized to its own range.
pub fn export_noise_map(map: &NoiseMap, path: &str) -> Result<(), image::ImageError> {
    let (lo, hi) = map.min_max();
    let mut img: RgbImage = ImageBuffer::new(map.width() as u32, map.height() as u32);

    for y in 0..map.height() {
        for x in 0..map.width() {
            let color = spectral_colormap(normalize(map.get_value(x, y), lo, hi));
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    img.save(path)
}

/// Render every finalized tile at `pixels_per_tile` pixels per side.
///
/// Heights are normalized over all finalized tiles together so colours are
/// comparable across seams. Tiles never shown are drawn as fog.
pub fn render_world_heightmap(world: &World, pixels_per_tile: usize) -> RgbImage {
    let ppt = pixels_per_tile.max(1);
    let mut img: RgbImage = ImageBuffer::new((world.width() * ppt) as u32, (world.height() * ppt) as u32);

    let (lo, hi) = world
        .tiles()
        .filter_map(|t| t.finalized_heightmap())
        .map(|hm| hm.min_max())
        .fold((f64::MAX, f64::MIN), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));

    // Pixel centres at the tile edges land exactly on the boundary vertices
    let span = if ppt > 1 { (ppt - 1) as f64 } else { 1.0 };

    for ty in 0..world.height() {
        for tx in 0..world.width() {
            let heightmap = world.heightmap(TileCoord::new(tx, ty));
            for py in 0..ppt {
                for px in 0..ppt {
                    let color = match heightmap {
                        Some(hm) => {
                            let h = hm.sample(px as f64 / span, py as f64 / span);
                            spectral_colormap(normalize(h, lo, hi))
                        }
                        None => FOG_COLOR,
                    };
                    img.put_pixel((tx * ppt + px) as u32, (ty * ppt + py) as u32, Rgb(color));
                }
            }
        }
    }

    img
}

/// Export all finalized tiles of a world as one PNG.
pub fn export_world_heightmap(world: &World, pixels_per_tile: usize, path: &str) -> Result<(), image::ImageError> {
    render_world_heightmap(world, pixels_per_tile).save(path)
}

fn normalize(v: f64, lo: f64, hi: f64) -> f32 {
    if hi > lo {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0) as f32
    } else {
        0.5
    }
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}
