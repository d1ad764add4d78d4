//! Raw heightmap generation per terrain type.
//!
//! Every profile samples its noise over the unit square at `(faces + 1)^2`
//! points and then reshapes the samples. Stitching against neighbours happens
//! afterwards, so nothing here reads another tile's heights; the ocean profile
//! only looks at neighbour terrain tags.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::heightmap::Heightmap;
use crate::noise::{NoiseError, NoiseMap, NoiseQuality, Perlin, PlaneMapBuilder, RidgedMulti};
use crate::tilemap::{Direction, Neighbors};

use super::TerrainType;

/// Mountains keep full amplitude in every octave, which roughens peaks.
const MOUNTAIN_PERSISTENCE: f64 = 1.0;
/// Plains and snow are low enough that unsmoothed lattice noise is fine.
const BASE_QUALITY: NoiseQuality = NoiseQuality::Fast;

const MOUNTAIN_PEAK_SCALE: f64 = 0.3;
const MOUNTAIN_VALLEY_SCALE: f64 = -0.1;
const BASE_SCALE: f64 = 0.1;
const OCEAN_DEPTH_SCALE: f64 = -0.4;
const OCEAN_NOISE_SCALE: f64 = 0.2;
const OCEAN_RISE_DAMPING: f64 = 0.05;

/// Fractal used for mountain tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountainNoise {
    #[default]
    Perlin,
    Ridged,
}

/// Tunables for the terrain profiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub mountain_noise: MountainNoise,
}

/// Generate the raw (unstitched) heightmap of a tile.
///
/// `neighbors` holds the terrain tag in each direction, `None` past the world
/// edge. Only the ocean profile consults it.
pub fn generate_heightmap(
    terrain: TerrainType,
    faces: usize,
    seed: i32,
    neighbors: &Neighbors<Option<TerrainType>>,
    settings: &ProfileSettings,
) -> Result<Heightmap, NoiseError> {
    let faces = faces.max(1);
    match terrain {
        TerrainType::Mountains => mountain(faces, seed, settings.mountain_noise),
        TerrainType::Ocean => ocean(faces, seed, neighbors),
        TerrainType::Plains | TerrainType::Snow => base(faces, seed),
    }
}

fn sample_unit_square(source: &(dyn NoiseFn<f64, 3> + Sync), faces: usize) -> Result<NoiseMap, NoiseError> {
    let side = faces + 1;
    PlaneMapBuilder::new()
        .set_source(source)
        .set_size(side, side)
        .set_bounds(0.0, 0.0, 1.0, 1.0)
        .build()
}

fn into_heightmap(map: NoiseMap) -> Result<Heightmap, NoiseError> {
    let (width, height) = (map.width(), map.height());
    Heightmap::from_noise_map(map).ok_or(NoiseError::InvalidDimensions { width, height })
}

fn mountain(faces: usize, seed: i32, flavour: MountainNoise) -> Result<Heightmap, NoiseError> {
    let mut map = match flavour {
        MountainNoise::Perlin => {
            let perlin = Perlin::new(seed).with_lacunarity(2.0).with_persistence(MOUNTAIN_PERSISTENCE);
            sample_unit_square(&perlin, faces)?
        }
        MountainNoise::Ridged => {
            let ridged = RidgedMulti::new(seed).with_lacunarity(2.0);
            sample_unit_square(&ridged, faces)?
        }
    };
    for v in map.values_mut() {
        *v = if *v > 0.0 {
            *v * MOUNTAIN_PEAK_SCALE
        } else {
            *v * MOUNTAIN_VALLEY_SCALE
        };
    }
    into_heightmap(map)
}

fn base(faces: usize, seed: i32) -> Result<Heightmap, NoiseError> {
    let perlin = Perlin::new(seed).with_quality(BASE_QUALITY);
    let mut map = sample_unit_square(&perlin, faces)?;
    for v in map.values_mut() {
        *v = if *v > 0.0 { *v * BASE_SCALE } else { 0.0 };
    }
    into_heightmap(map)
}

fn is_ocean(tag: Option<TerrainType>) -> bool {
    tag == Some(TerrainType::Ocean)
}

/// Whether a boundary vertex must stay at sea level because it touches land
/// or the world edge. Corners look at the diagonal neighbour first.
fn pinned_to_shore(x: usize, y: usize, faces: usize, neighbors: &Neighbors<Option<TerrainType>>) -> bool {
    let dry = |dir: Direction| !is_ocean(neighbors[dir]);
    let (left, right, top, bottom) = (x == 0, x == faces, y == 0, y == faces);

    (top && left && dry(Direction::TopLeft))
        || (top && right && dry(Direction::TopRight))
        || (bottom && right && dry(Direction::BottomRight))
        || (bottom && left && dry(Direction::BottomLeft))
        || (top && dry(Direction::Top))
        || (right && dry(Direction::Right))
        || (bottom && dry(Direction::Bottom))
        || (left && dry(Direction::Left))
}

/// How far a vertex sits from the shore, in tile units (0 at land, 0.5 deep).
fn shore_distance(x: usize, y: usize, faces: usize, neighbors: &Neighbors<Option<TerrainType>>) -> f64 {
    let wet = |dir: Direction| is_ocean(neighbors[dir]);
    let half = faces as f64 / 2.0;
    let (xf, yf) = (x as f64, y as f64);
    let u = xf / faces as f64;
    let v = yf / faces as f64;

    let across_x = || {
        if (xf <= half && wet(Direction::Left)) || (xf >= half && wet(Direction::Right)) {
            0.5
        } else {
            0.5 - (u - 0.5).abs()
        }
    };
    let across_y = || {
        if (yf <= half && wet(Direction::Top)) || (yf >= half && wet(Direction::Bottom)) {
            0.5
        } else {
            0.5 - (v - 0.5).abs()
        }
    };

    if yf <= half && wet(Direction::Top) {
        across_x()
    } else if yf >= half && wet(Direction::Bottom) {
        across_x()
    } else if xf <= half && wet(Direction::Left) {
        across_y()
    } else if xf >= half && wet(Direction::Right) {
        across_y()
    } else {
        0.5 - ((0.5 - u).powi(2) + (0.5 - v).powi(2)).sqrt()
    }
}

fn ocean(faces: usize, seed: i32, neighbors: &Neighbors<Option<TerrainType>>) -> Result<Heightmap, NoiseError> {
    let perlin = Perlin::new(seed);
    let noise = sample_unit_square(&perlin, faces)?;
    let mut heightmap = Heightmap::new(faces);

    for y in 0..=faces {
        for x in 0..=faces {
            if pinned_to_shore(x, y, faces, neighbors) {
                continue;
            }
            let distance = shore_distance(x, y, faces, neighbors);
            let on_border = x == 0 || y == 0 || x == faces || y == faces;
            let mut h = distance * OCEAN_DEPTH_SCALE;
            if !on_border {
                h += noise.get_value(x, y) * OCEAN_NOISE_SCALE;
            }
            if h > 0.0 {
                h *= OCEAN_RISE_DAMPING;
            }
            heightmap.set(x, y, h);
        }
    }

    Ok(heightmap)
}
