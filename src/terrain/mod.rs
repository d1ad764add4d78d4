//! Terrain types and mesh resolution.
//!
//! Each tile carries a terrain tag that decides both how its raw heightmap is
//! generated (see [`profiles`]) and how many faces its mesh has per axis.

pub mod profiles;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use profiles::{generate_heightmap, MountainNoise, ProfileSettings};

/// Highest quality knob accepted; `2^10` faces per axis is already 1M vertices.
pub const MAX_QUALITY: u32 = 10;

/// Terrain tag of a world tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Plains,
    Mountains,
    Snow,
    Ocean,
}

impl TerrainType {
    pub const ALL: [TerrainType; 4] = [
        TerrainType::Plains,
        TerrainType::Mountains,
        TerrainType::Snow,
        TerrainType::Ocean,
    ];

    /// Uniformly random terrain tag.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::Plains => "plains",
            TerrainType::Mountains => "mountains",
            TerrainType::Snow => "snow",
            TerrainType::Ocean => "ocean",
        }
    }

    /// Numeric tag handed to shaders.
    pub fn id(&self) -> u8 {
        match self {
            TerrainType::Plains => 0,
            TerrainType::Mountains => 1,
            TerrainType::Snow => 2,
            TerrainType::Ocean => 3,
        }
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Global resolution knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Drives land resolution
    pub map_quality: u32,
    /// Drives ocean resolution
    pub water_quality: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            map_quality: 1,
            water_quality: 1,
        }
    }
}

impl QualityConfig {
    pub fn new(map_quality: u32, water_quality: u32) -> Self {
        Self { map_quality, water_quality }
    }

    /// Faces per axis for a tile of the given terrain.
    ///
    /// Mountains get `2^map_quality`, ocean `2^water_quality`, plains and snow
    /// `max(1, map_quality - 3)`. Always at least 1.
    pub fn face_count(&self, terrain: TerrainType) -> usize {
        match terrain {
            TerrainType::Plains | TerrainType::Snow => {
                (self.map_quality.saturating_sub(3)).max(1) as usize
            }
            TerrainType::Mountains => 1usize << self.map_quality.min(MAX_QUALITY),
            TerrainType::Ocean => 1usize << self.water_quality.min(MAX_QUALITY),
        }
    }

    /// Vertices per axis (`faces + 1`).
    pub fn side_len(&self, terrain: TerrainType) -> usize {
        self.face_count(terrain) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_face_counts() {
        let q = QualityConfig::new(5, 2);
        assert_eq!(q.face_count(TerrainType::Mountains), 32);
        assert_eq!(q.face_count(TerrainType::Plains), 2);
        assert_eq!(q.face_count(TerrainType::Snow), 2);
        assert_eq!(q.face_count(TerrainType::Ocean), 4);
        assert_eq!(q.side_len(TerrainType::Mountains), 33);
    }

    #[test]
    fn test_low_quality_floors_at_one_face() {
        let q = QualityConfig::new(1, 1);
        assert_eq!(q.face_count(TerrainType::Plains), 1);
        assert_eq!(q.face_count(TerrainType::Mountains), 2);
        assert_eq!(q.face_count(TerrainType::Ocean), 2);
        let q = QualityConfig::new(0, 0);
        for t in TerrainType::ALL {
            assert!(q.face_count(t) >= 1);
        }
    }

    #[test]
    fn test_random_covers_all_types() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(TerrainType::random(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_ids_and_names() {
        assert_eq!(TerrainType::Ocean.id(), 3);
        assert_eq!(TerrainType::Snow.to_string(), "snow");
    }
}
