//! The tile world.
//!
//! Owns the tile grid and drives the per-tile lifecycle: raw generation,
//! stitching against finalized neighbours and visibility changes. Tiles refer
//! to each other only through grid coordinates.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::WorldConfig;
use crate::heightmap::Heightmap;
use crate::noise::NoiseError;
use crate::seeds::WorldSeeds;
use crate::stitch::{stitch, NeighborState, NeighborView, StitchReport};
use crate::terrain::{generate_heightmap, ProfileSettings, QualityConfig, TerrainType};
use crate::tile::{Tile, TileCoord, TileState};
use crate::tilemap::{Neighbors, Tilemap};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world size must be positive, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("tile {coord} is outside the {width}x{height} world")]
    OutOfBounds {
        coord: TileCoord,
        width: usize,
        height: usize,
    },
    #[error("noise generation failed: {0}")]
    Noise(#[from] NoiseError),
}

/// Order in which [`World::reveal_all`] visits tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealOrder {
    #[default]
    RowMajor,
    /// Shuffled with the world's reveal seed
    Shuffled,
}

/// Everything a renderer needs to mesh one finalized tile.
#[derive(Clone, Debug)]
pub struct TileMeshData<'a> {
    pub coord: TileCoord,
    pub terrain: TerrainType,
    pub faces: usize,
    pub seed: u32,
    pub hidden: bool,
    pub heightmap: &'a Heightmap,
    /// Terrain in each neighbour direction, `None` past the world edge
    pub neighbor_terrain: Neighbors<Option<TerrainType>>,
}

pub struct World {
    tiles: Tilemap<Tile>,
    seeds: WorldSeeds,
    quality: QualityConfig,
    profile: ProfileSettings,
}

impl World {
    /// Lay out a world with random terrain drawn from the config's seed.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        check_size(config.width, config.height)?;
        let seeds = config.world_seeds(config.seed.unwrap_or_else(rand::random));
        let mut rng = ChaCha8Rng::seed_from_u64(seeds.terrain);
        let terrain = Tilemap::from_fn(config.width, config.height, |_, _| TerrainType::random(&mut rng));
        Self::from_terrain(&terrain, seeds, config.quality, config.profile)
    }

    /// Build a world over a fixed terrain layout.
    pub fn from_terrain(
        terrain: &Tilemap<TerrainType>,
        seeds: WorldSeeds,
        quality: QualityConfig,
        profile: ProfileSettings,
    ) -> Result<Self, WorldError> {
        check_size(terrain.width, terrain.height)?;
        let tiles = Tilemap::from_fn(terrain.width, terrain.height, |x, y| {
            let kind = terrain.get(x, y).copied().unwrap_or(TerrainType::Plains);
            Tile::new(TileCoord::new(x, y), kind, seeds.tile_seed(x, y))
        });
        Ok(Self {
            tiles,
            seeds,
            quality,
            profile,
        })
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    pub fn quality(&self) -> &QualityConfig {
        &self.quality
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().map(|(_, _, tile)| tile)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(coord.x, coord.y)
    }

    /// Stitched heightmap of a finalized tile.
    pub fn heightmap(&self, coord: TileCoord) -> Option<&Heightmap> {
        self.tile(coord).and_then(Tile::finalized_heightmap)
    }

    fn tile_checked(&self, coord: TileCoord) -> Result<&Tile, WorldError> {
        self.tiles.get(coord.x, coord.y).ok_or(WorldError::OutOfBounds {
            coord,
            width: self.width(),
            height: self.height(),
        })
    }

    fn tile_checked_mut(&mut self, coord: TileCoord) -> Result<&mut Tile, WorldError> {
        let (width, height) = (self.width(), self.height());
        self.tiles
            .get_mut(coord.x, coord.y)
            .ok_or(WorldError::OutOfBounds { coord, width, height })
    }

    /// Terrain tag in each direction around `coord`.
    pub fn neighbor_types(&self, coord: TileCoord) -> Neighbors<Option<TerrainType>> {
        self.tiles
            .neighbors_8(coord.x, coord.y)
            .map(|slot| slot.and_then(|(x, y)| self.tiles.get(x, y)).map(|t| t.terrain))
    }

    fn neighbor_views(&self, coord: TileCoord) -> Neighbors<NeighborView<'_>> {
        self.tiles.neighbors_8(coord.x, coord.y).map(|slot| {
            match slot.and_then(|(x, y)| self.tiles.get(x, y)) {
                None => NeighborView::OffWorld,
                Some(tile) => NeighborView::Tile {
                    terrain: tile.terrain,
                    state: match tile.finalized_heightmap() {
                        Some(hm) => NeighborState::Finalized(hm),
                        None => NeighborState::Unknown,
                    },
                },
            }
        })
    }

    /// Generate the raw heightmap of `coord` if it has none yet.
    pub fn ensure_generated(&mut self, coord: TileCoord) -> Result<(), WorldError> {
        if self.tile_checked(coord)?.heightmap.is_some() {
            return Ok(());
        }
        let neighbors = self.neighbor_types(coord);
        let (quality, profile) = (self.quality, self.profile);
        let tile = self.tile_checked_mut(coord)?;
        tile.heightmap = Some(raw_heightmap(tile, &neighbors, &quality, &profile)?);
        Ok(())
    }

    /// Re-run stitching for `coord` against its current neighbours.
    ///
    /// The tile must already have a heightmap; otherwise nothing happens.
    pub fn restitch(&mut self, coord: TileCoord) -> Result<StitchReport, WorldError> {
        let Some(mut heightmap) = self.tile_checked_mut(coord)?.heightmap.take() else {
            return Ok(StitchReport::default());
        };
        let report = stitch(&mut heightmap, &self.neighbor_views(coord), &self.quality);
        self.tile_checked_mut(coord)?.heightmap = Some(heightmap);
        Ok(report)
    }

    /// Show a tile, generating and stitching it on first reveal and
    /// re-stitching it when it comes back from hiding.
    pub fn reveal(&mut self, coord: TileCoord) -> Result<StitchReport, WorldError> {
        let state = self.tile_checked(coord)?.state;
        let report = match state {
            TileState::Visible => return Ok(StitchReport::default()),
            TileState::Absent => {
                self.ensure_generated(coord)?;
                self.restitch(coord)?
            }
            TileState::Hidden => self.restitch(coord)?,
        };
        self.tile_checked_mut(coord)?.state = TileState::Visible;
        debug!("revealed tile {}: {:?}", coord, report);
        Ok(report)
    }

    /// Hide a visible tile. Its heightmap stays final.
    pub fn hide(&mut self, coord: TileCoord) -> Result<(), WorldError> {
        let tile = self.tile_checked_mut(coord)?;
        if tile.state == TileState::Visible {
            tile.state = TileState::Hidden;
        }
        Ok(())
    }

    /// Hide every visible tile, returning how many were hidden.
    pub fn hide_all(&mut self) -> usize {
        let mut hidden = 0;
        for (_, _, tile) in self.tiles.iter_mut() {
            if tile.state == TileState::Visible {
                tile.state = TileState::Hidden;
                hidden += 1;
            }
        }
        hidden
    }

    /// Reveal every tile in the given order.
    pub fn reveal_all(&mut self, order: RevealOrder) -> Result<StitchReport, WorldError> {
        let mut coords: Vec<TileCoord> = self.tiles.iter().map(|(x, y, _)| TileCoord::new(x, y)).collect();
        if order == RevealOrder::Shuffled {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seeds.reveal);
            coords.shuffle(&mut rng);
        }

        let mut total = StitchReport::default();
        for coord in coords {
            total += self.reveal(coord)?;
        }
        info!(
            "revealed {}x{} world: {} corners copied, {} edges merged, {} edges pre-smoothed",
            self.width(),
            self.height(),
            total.corners_copied,
            total.edges_merged,
            total.edges_presmoothed
        );
        Ok(total)
    }

    /// Reveal every tile whose centre lies within `radius` tiles of `center`.
    /// Returns the number of tiles that changed state.
    pub fn reveal_around(&mut self, center: TileCoord, radius: f64) -> Result<usize, WorldError> {
        self.tile_checked(center)?;
        // NaN and negative radii reveal only the centre
        let radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
        let reach = radius.floor() as usize;
        let x_range = center.x.saturating_sub(reach)..=center.x.saturating_add(reach).min(self.width() - 1);
        let y_range = center.y.saturating_sub(reach)..=center.y.saturating_add(reach).min(self.height() - 1);

        let mut changed = 0;
        for y in y_range {
            for x in x_range.clone() {
                let dx = x as f64 - center.x as f64;
                let dy = y as f64 - center.y as f64;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let coord = TileCoord::new(x, y);
                if self.tile_checked(coord)?.state != TileState::Visible {
                    self.reveal(coord)?;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    /// Generate raw heightmaps for all tiles in parallel.
    ///
    /// Tile states are left alone, so stitching afterwards gives the same
    /// result as generating lazily on reveal. Returns how many were generated.
    pub fn pregenerate(&mut self) -> Result<usize, WorldError> {
        let neighbor_types = Tilemap::from_fn(self.width(), self.height(), |x, y| {
            self.neighbor_types(TileCoord::new(x, y))
        });
        let (quality, profile) = (self.quality, self.profile);

        let generated = self
            .tiles
            .par_iter_mut()
            .filter(|(_, _, tile)| tile.heightmap.is_none())
            .map(|(x, y, tile)| -> Result<usize, WorldError> {
                let Some(neighbors) = neighbor_types.get(x, y) else {
                    return Ok(0);
                };
                tile.heightmap = Some(raw_heightmap(tile, neighbors, &quality, &profile)?);
                Ok(1)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        info!("pre-generated {} raw heightmaps", generated);
        Ok(generated)
    }

    /// Mesh record of a finalized tile.
    pub fn mesh_data(&self, coord: TileCoord) -> Option<TileMeshData<'_>> {
        let tile = self.tile(coord)?;
        let heightmap = tile.finalized_heightmap()?;
        Some(TileMeshData {
            coord,
            terrain: tile.terrain,
            faces: heightmap.faces(),
            seed: tile.seed,
            hidden: tile.state == TileState::Hidden,
            heightmap,
            neighbor_terrain: self.neighbor_types(coord),
        })
    }
}

fn check_size(width: usize, height: usize) -> Result<(), WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::InvalidSize { width, height });
    }
    Ok(())
}

fn raw_heightmap(
    tile: &Tile,
    neighbors: &Neighbors<Option<TerrainType>>,
    quality: &QualityConfig,
    profile: &ProfileSettings,
) -> Result<Heightmap, WorldError> {
    let faces = quality.face_count(tile.terrain);
    Ok(generate_heightmap(tile.terrain, faces, tile.seed as i32, neighbors, profile)?)
}
