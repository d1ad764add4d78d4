//! Edge and corner stitching between neighbouring tile heightmaps.
//!
//! Tiles are generated independently, so their boundary vertices disagree
//! until they are reconciled. A tile being finalized copies corner heights
//! from finalized neighbours, resamples its edges onto theirs, and smooths
//! edges that face a coarser tile which has not been generated yet, so that
//! tile will line up when its turn comes.

use tracing::{debug, warn};

use crate::heightmap::{Corner, Heightmap, Side};
use crate::terrain::{QualityConfig, TerrainType};
use crate::tilemap::{Direction, Neighbors};

/// What the stitcher knows about an in-world neighbour.
#[derive(Clone, Copy, Debug)]
pub enum NeighborState<'a> {
    /// Not generated and not shown yet
    Unknown,
    /// Generated but not finalized; neither copied from nor smoothed toward
    Pending,
    /// Shown at least once; its heightmap is authoritative
    Finalized(&'a Heightmap),
}

/// A neighbour slot as seen from the tile being stitched.
#[derive(Clone, Copy, Debug)]
pub enum NeighborView<'a> {
    OffWorld,
    Tile {
        terrain: TerrainType,
        state: NeighborState<'a>,
    },
}

impl<'a> NeighborView<'a> {
    fn finalized(&self) -> Option<&'a Heightmap> {
        match self {
            NeighborView::Tile {
                state: NeighborState::Finalized(hm),
                ..
            } => Some(hm),
            _ => None,
        }
    }
}

/// Counts of the corrections applied by one stitching pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchReport {
    pub corners_copied: usize,
    pub edges_merged: usize,
    pub edges_presmoothed: usize,
}

impl StitchReport {
    pub fn is_empty(&self) -> bool {
        self.corners_copied == 0 && self.edges_merged == 0 && self.edges_presmoothed == 0
    }
}

impl std::ops::AddAssign for StitchReport {
    fn add_assign(&mut self, other: Self) {
        self.corners_copied += other.corners_copied;
        self.edges_merged += other.edges_merged;
        self.edges_presmoothed += other.edges_presmoothed;
    }
}

/// Resample `to` onto `edge` in place, keeping `edge`'s length.
///
/// Target `i` reads `to` at fractional position `i * (len(to) - 1) / (len(edge) - 1)`
/// and blends linearly toward the next sample. The first and last targets
/// take `to`'s endpoints exactly.
pub fn merge_edge(edge: &mut [f64], to: &[f64]) {
    let (Some(&first), Some(&last)) = (to.first(), to.last()) else {
        return;
    };
    let n = edge.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        edge[0] = first;
        return;
    }

    let step = (to.len() - 1) as f64 / (n - 1) as f64;
    for (i, target) in edge.iter_mut().enumerate().take(n - 1) {
        let pos = step * i as f64;
        let idx = (pos.floor() as usize).min(to.len() - 1);
        let offset = pos - idx as f64;
        *target = if offset == 0.0 || idx + 1 >= to.len() {
            to[idx]
        } else {
            to[idx] - (to[idx] - to[idx + 1]) * offset
        };
    }
    edge[n - 1] = last;
}

/// Corner of a neighbour on `side` that coincides with our `corner`.
fn mirrored(corner: Corner, side: Side) -> Corner {
    match (side, corner) {
        (Side::Top | Side::Bottom, Corner::TopLeft) => Corner::BottomLeft,
        (Side::Top | Side::Bottom, Corner::TopRight) => Corner::BottomRight,
        (Side::Top | Side::Bottom, Corner::BottomRight) => Corner::TopRight,
        (Side::Top | Side::Bottom, Corner::BottomLeft) => Corner::TopLeft,
        (Side::Left | Side::Right, Corner::TopLeft) => Corner::TopRight,
        (Side::Left | Side::Right, Corner::TopRight) => Corner::TopLeft,
        (Side::Left | Side::Right, Corner::BottomRight) => Corner::BottomLeft,
        (Side::Left | Side::Right, Corner::BottomLeft) => Corner::BottomRight,
    }
}

/// Reconcile `heightmap`'s boundary with its neighbours.
///
/// Corners first (cardinal neighbours, then diagonals, which win at the
/// shared vertex), then edges in the order top, right, bottom, left. Later
/// edges see the corners written by earlier ones.
pub fn stitch(
    heightmap: &mut Heightmap,
    neighbors: &Neighbors<NeighborView<'_>>,
    quality: &QualityConfig,
) -> StitchReport {
    let mut report = StitchReport::default();
    let my_faces = heightmap.faces();

    for side in Side::ALL {
        let view = &neighbors[Direction::from_side(side)];
        if let (Some(other), NeighborView::Tile { terrain, .. }) = (view.finalized(), view) {
            let expected = quality.face_count(*terrain);
            if other.faces() != expected {
                warn!(
                    "{:?} neighbour ({}) has {} faces, expected {}",
                    side,
                    terrain,
                    other.faces(),
                    expected
                );
            }
            for corner in side.corners() {
                heightmap.set_corner(corner, other.corner(mirrored(corner, side)));
                report.corners_copied += 1;
            }
        }
    }

    for corner in Corner::ALL {
        if let Some(other) = neighbors[Direction::from_corner(corner)].finalized() {
            heightmap.set_corner(corner, other.corner(corner.opposite()));
            report.corners_copied += 1;
        }
    }

    for side in Side::ALL {
        let NeighborView::Tile { terrain, state } = neighbors[Direction::from_side(side)] else {
            continue;
        };
        match state {
            NeighborState::Finalized(other) => {
                let mut edge = heightmap.edge(side);
                merge_edge(&mut edge, &other.edge(side.opposite()));
                heightmap.set_edge(side, &edge);
                report.edges_merged += 1;
            }
            NeighborState::Unknown => {
                let neighbor_faces = quality.face_count(terrain);
                if my_faces > neighbor_faces {
                    let mut edge = heightmap.edge(side);
                    let mut coarse = vec![0.0; neighbor_faces + 1];
                    merge_edge(&mut coarse, &edge);
                    merge_edge(&mut edge, &coarse);
                    heightmap.set_edge(side, &edge);
                    report.edges_presmoothed += 1;
                }
            }
            NeighborState::Pending => {}
        }
    }

    debug!(
        "stitched {}-face tile: {} corners copied, {} edges merged, {} edges pre-smoothed",
        my_faces, report.corners_copied, report.edges_merged, report.edges_presmoothed
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(faces: usize, offset: f64) -> Heightmap {
        let side = faces + 1;
        Heightmap::from_values((0..side * side).map(|i| i as f64 + offset).collect()).unwrap()
    }

    fn alone() -> Neighbors<NeighborView<'static>> {
        Neighbors([NeighborView::OffWorld; 8])
    }

    #[test]
    fn test_merge_edge_identity_for_equal_lengths() {
        let to = [0.3, -1.0, 2.5, 7.0, 0.0];
        let mut edge = [9.0; 5];
        merge_edge(&mut edge, &to);
        assert_eq!(edge, to);
    }

    #[test]
    fn test_merge_edge_endpoints_exact() {
        let to: Vec<f64> = (0..33).map(|i| (i as f64 * 0.37).sin()).collect();
        for len in [2, 3, 5, 7, 10, 64] {
            let mut edge = vec![0.0; len];
            merge_edge(&mut edge, &to);
            assert_eq!(edge[0], to[0]);
            assert_eq!(edge[len - 1], to[32]);
        }
    }

    #[test]
    fn test_merge_edge_upsamples_linearly() {
        let mut edge = [0.0; 5];
        merge_edge(&mut edge, &[0.0, 4.0, 0.0]);
        assert_eq!(edge, [0.0, 2.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn test_merge_edge_downsamples_by_picking() {
        let mut edge = [0.0; 3];
        merge_edge(&mut edge, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(edge, [1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_merge_edge_degenerate_inputs() {
        let mut edge = [1.0, 2.0];
        merge_edge(&mut edge, &[]);
        assert_eq!(edge, [1.0, 2.0]);
        let mut single = [0.0];
        merge_edge(&mut single, &[5.0, 6.0]);
        assert_eq!(single, [5.0]);
    }

    #[test]
    fn test_no_neighbors_is_noop() {
        let mut hm = ramp(4, 0.0);
        let before = hm.clone();
        let report = stitch(&mut hm, &alone(), &QualityConfig::default());
        assert!(report.is_empty());
        assert_eq!(hm, before);
    }

    #[test]
    fn test_equal_resolution_seam_matches() {
        let q = QualityConfig::new(5, 1);
        let top = ramp(2, 100.0);
        let left = ramp(2, 200.0);
        let mut hm = ramp(2, 0.0);

        let mut n = alone();
        n[Direction::Top] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&top),
        };
        n[Direction::Left] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&left),
        };
        let report = stitch(&mut hm, &n, &q);

        // The left edge is merged last and owns the shared top-left vertex
        assert_eq!(hm.edge(Side::Top)[1..], top.edge(Side::Bottom)[1..]);
        assert_eq!(hm.edge(Side::Left), left.edge(Side::Right));
        assert_eq!(report.corners_copied, 4);
        assert_eq!(report.edges_merged, 2);
        // Interior untouched
        assert_eq!(hm.get(1, 1), 4.0);
    }

    #[test]
    fn test_edge_merge_overrides_corner_copies() {
        let q = QualityConfig::default();
        let top = ramp(1, 10.0);
        let diag = ramp(1, 50.0);
        let mut hm = ramp(1, 0.0);

        let mut n = alone();
        n[Direction::Top] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&top),
        };
        n[Direction::TopLeft] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&diag),
        };
        let report = stitch(&mut hm, &n, &q);

        assert_eq!(report.corners_copied, 3);
        // Top edge is then resampled from the top neighbour and overrides it
        assert_eq!(hm.corner(Corner::TopLeft), top.corner(Corner::BottomLeft));
        assert_eq!(hm.corner(Corner::TopRight), top.corner(Corner::BottomRight));
    }

    #[test]
    fn test_diagonal_only_sets_corner() {
        let q = QualityConfig::default();
        let diag = ramp(1, 50.0);
        let mut hm = ramp(1, 0.0);
        let mut n = alone();
        n[Direction::BottomRight] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&diag),
        };
        stitch(&mut hm, &n, &q);
        assert_eq!(hm.corner(Corner::BottomRight), diag.corner(Corner::TopLeft));
        assert_eq!(hm.corner(Corner::TopLeft), 0.0);
    }

    #[test]
    fn test_stitch_is_idempotent() {
        let q = QualityConfig::new(5, 2);
        let neighbours: Vec<Heightmap> = (0..8).map(|i| ramp(2, i as f64 * 10.0)).collect();
        let n = Neighbors::from_fn(|d| NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&neighbours[d.index()]),
        });
        let mut hm = ramp(32, 0.5);
        stitch(&mut hm, &n, &q);
        let once = hm.clone();
        stitch(&mut hm, &n, &q);
        assert_eq!(hm, once);
    }

    #[test]
    fn test_fine_tile_matches_coarse_finalized_neighbor() {
        let q = QualityConfig::new(5, 1);
        let plains = ramp(2, 0.0);
        let mut mountain = Heightmap::from_values(
            (0..33 * 33).map(|i| ((i * 7919) % 101) as f64 * 0.01).collect(),
        )
        .unwrap();
        let mut n = alone();
        n[Direction::Left] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&plains),
        };
        stitch(&mut mountain, &n, &q);

        let coarse = plains.edge(Side::Right);
        let fine = mountain.edge(Side::Left);
        for (k, &v) in coarse.iter().enumerate() {
            assert_eq!(fine[k * 16], v);
        }
    }

    #[test]
    fn test_indivisible_resolutions_agree_only_approximately() {
        // 64 faces against 3: interior coarse points fall between fine vertices
        let q = QualityConfig::new(6, 1);
        let mut plains = Heightmap::new(3);
        plains.set_edge(Side::Right, &[0.0, 1.0, 0.0, 0.0]);
        let mut mountain = Heightmap::new(64);
        let mut n = alone();
        n[Direction::Left] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Finalized(&plains),
        };
        stitch(&mut mountain, &n, &q);

        let coarse = plains.edge(Side::Right);
        let mut resampled = vec![0.0; coarse.len()];
        merge_edge(&mut resampled, &mountain.edge(Side::Left));
        assert_eq!(resampled[0], coarse[0]);
        assert_eq!(resampled[3], coarse[3]);
        // Off by the coarse edge's curvature, (c0 - 2 c1 + c2) / 96
        assert!((resampled[1] - (1.0 - 1.0 / 48.0)).abs() < 1e-12, "{:?}", resampled);
        assert!((resampled[2] - 1.0 / 96.0).abs() < 1e-12, "{:?}", resampled);
    }

    #[test]
    fn test_presmoothing_lets_coarse_neighbor_match_later() {
        let q = QualityConfig::new(5, 1);
        let mut mountain = Heightmap::from_values(
            (0..33 * 33).map(|i| ((i * 31) % 17) as f64 * 0.1).collect(),
        )
        .unwrap();
        let mut n = alone();
        n[Direction::Right] = NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Unknown,
        };
        let report = stitch(&mut mountain, &n, &q);
        assert_eq!(report.edges_presmoothed, 1);

        // The pre-smoothed edge is piecewise linear between the coarse points
        let edge = mountain.edge(Side::Right);
        for i in 0..=16 {
            let t = i as f64 / 16.0;
            let expected = edge[0] - (edge[0] - edge[16]) * t;
            assert!((edge[i] - expected).abs() < 1e-12);
        }

        // Now the plains tile arrives and stitches against the mountain
        let mut plains = ramp(2, 3.0);
        let mut pn = alone();
        pn[Direction::Left] = NeighborView::Tile {
            terrain: TerrainType::Mountains,
            state: NeighborState::Finalized(&mountain),
        };
        stitch(&mut plains, &pn, &q);
        let coarse = plains.edge(Side::Left);
        for (k, &v) in coarse.iter().enumerate() {
            assert_eq!(edge[k * 16], v);
        }
    }

    #[test]
    fn test_unknown_finer_neighbor_is_left_alone() {
        let q = QualityConfig::new(5, 1);
        let mut plains = ramp(2, 0.0);
        let before = plains.clone();
        let mut n = alone();
        n[Direction::Bottom] = NeighborView::Tile {
            terrain: TerrainType::Mountains,
            state: NeighborState::Unknown,
        };
        let report = stitch(&mut plains, &n, &q);
        assert!(report.is_empty());
        assert_eq!(plains, before);
    }

    #[test]
    fn test_pending_neighbor_is_ignored() {
        let q = QualityConfig::new(5, 1);
        let mut hm = ramp(32, 0.0);
        let before = hm.clone();
        let n = Neighbors::from_fn(|_| NeighborView::Tile {
            terrain: TerrainType::Plains,
            state: NeighborState::Pending,
        });
        let report = stitch(&mut hm, &n, &q);
        assert!(report.is_empty());
        assert_eq!(hm, before);
    }
}
