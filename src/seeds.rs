//! Seed management for world generation
//!
//! Provides separate seeds for the terrain layout, per-tile noise and reveal
//! ordering, so one aspect can be varied while the others stay fixed.
//!
//! Derivation uses fixed mixing functions (FNV-1a over system names,
//! SplitMix64 over integers), so a seed produces the same world on every
//! build and platform.

/// Per-tile noise seeds lie in `0..TILE_SEED_RANGE`.
pub const TILE_SEED_RANGE: u64 = 100_000;

/// Seeds for the world generation systems.
///
/// Each system gets its own seed, derived from a master seed by default.
/// Individual seeds can be overridden for experimentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Terrain tag layout
    pub terrain: u64,
    /// Base for per-tile noise seeds
    pub tiles: u64,
    /// Shuffled reveal order
    pub reveal: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            terrain: derive_seed(master, "terrain"),
            tiles: derive_seed(master, "tiles"),
            reveal: derive_seed(master, "reveal"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }

    /// Noise seed of the tile at `(x, y)`, in `0..100_000`.
    pub fn tile_seed(&self, x: usize, y: usize) -> u32 {
        let mut h = splitmix64(self.tiles);
        h = splitmix64(h ^ x as u64);
        h = splitmix64(h ^ y as u64);
        (h % TILE_SEED_RANGE) as u32
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(42)
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn terrain(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.seeds.terrain = seed;
        }
        self
    }

    pub fn tiles(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.seeds.tiles = seed;
        }
        self
    }

    pub fn reveal(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.seeds.reveal = seed;
        }
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// SplitMix64 finalizer.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// FNV-1a over the bytes of a system name.
fn fnv1a(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    splitmix64(master ^ fnv1a(system))
}

/// Display format for seeds (useful for sharing world configurations)
impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, terrain: {}, tiles: {}, reveal: {} }}",
            self.master, self.terrain, self.tiles, self.reveal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = WorldSeeds::from_master(12345);
        let seeds2 = WorldSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
        assert_eq!(seeds1.tile_seed(3, 4), seeds2.tile_seed(3, 4));
    }

    #[test]
    fn test_splitmix_reference_output() {
        assert_eq!(splitmix64(0), 0xe220_a839_7b1d_cdaf);
    }

    #[test]
    fn test_seeds_are_stable_across_builds() {
        let seeds = WorldSeeds::from_master(12345);
        assert_eq!(seeds.terrain, 507_229_837_441_270_447);
        assert_eq!(seeds.tiles, 11_779_788_495_200_518_983);
        assert_eq!(seeds.reveal, 2_306_014_100_591_038_971);
        assert_eq!(seeds.tile_seed(3, 4), 80_507);
        assert_eq!(seeds.tile_seed(0, 0), 20_247);
    }

    #[test]
    fn test_different_systems_get_different_seeds() {
        let seeds = WorldSeeds::from_master(12345);
        assert_ne!(seeds.terrain, seeds.tiles);
        assert_ne!(seeds.tiles, seeds.reveal);
    }

    #[test]
    fn test_builder_override() {
        let seeds = WorldSeeds::builder(12345).tiles(Some(7)).terrain(None).build();
        assert_eq!(seeds.tiles, 7);
        assert_eq!(seeds.tile_seed(1, 0), 84_972);
        assert_eq!(seeds.tile_seed(0, 1), 17_888);

        // Others should be derived from master
        let default_seeds = WorldSeeds::from_master(12345);
        assert_eq!(seeds.terrain, default_seeds.terrain);
        assert_eq!(seeds.reveal, default_seeds.reveal);
    }

    #[test]
    fn test_tile_seeds_in_range_and_varied() {
        let seeds = WorldSeeds::from_master(7);
        let mut distinct = std::collections::HashSet::new();
        for y in 0..10 {
            for x in 0..10 {
                let s = seeds.tile_seed(x, y);
                assert!((s as u64) < TILE_SEED_RANGE);
                distinct.insert(s);
            }
        }
        assert!(distinct.len() > 90);
    }

    #[test]
    fn test_display_includes_master() {
        let seeds = WorldSeeds::from_master(555);
        assert!(seeds.to_string().starts_with("WorldSeeds { master: 555,"));
    }
}
