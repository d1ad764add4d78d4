//! World tiles and their visibility state.

use serde::{Deserialize, Serialize};

use crate::heightmap::Heightmap;
use crate::terrain::TerrainType;

/// Visibility of a tile.
///
/// A tile leaves `Absent` exactly once; after that its heightmap is final
/// and neighbours may copy from it, whether it is currently shown or not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    /// Never shown
    #[default]
    Absent,
    /// On screen
    Visible,
    /// Explored, currently hidden
    Hidden,
}

impl TileState {
    pub fn is_finalized(&self) -> bool {
        !matches!(self, TileState::Absent)
    }
}

/// Grid position of a tile; `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: usize,
    pub y: usize,
}

impl TileCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for TileCoord {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// One cell of the world grid.
#[derive(Clone, Debug)]
pub struct Tile {
    pub coord: TileCoord,
    pub terrain: TerrainType,
    pub state: TileState,
    /// Noise seed, fixed at world construction
    pub seed: u32,
    /// Raw until the tile is first shown, stitched afterwards
    pub heightmap: Option<Heightmap>,
}

impl Tile {
    pub fn new(coord: TileCoord, terrain: TerrainType, seed: u32) -> Self {
        Self {
            coord,
            terrain,
            state: TileState::Absent,
            seed,
            heightmap: None,
        }
    }

    /// Heightmap neighbours may copy from, if this tile has been finalized.
    pub fn finalized_heightmap(&self) -> Option<&Heightmap> {
        if self.state.is_finalized() {
            self.heightmap.as_ref()
        } else {
            None
        }
    }
}
