//! Seam verification for stitched worlds.
//!
//! Walks every pair of adjacent finalized tiles and checks that their shared
//! boundary agrees. Edges are compared at the coarser tile's sample points,
//! since that is all the stitcher can make exact; corners are compared across
//! both diagonals.

use std::fmt;

use crate::heightmap::{Corner, Side};
use crate::stitch::merge_edge;
use crate::tile::TileCoord;
use crate::world::World;

/// Largest height difference still counted as a match.
pub const SEAM_TOLERANCE: f64 = 1e-9;

/// Kind of boundary being compared
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeamKind {
    /// Shared row or column between side-by-side tiles
    Edge,
    /// Single vertex shared by diagonal tiles
    Corner,
}

impl fmt::Display for SeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeamKind::Edge => write!(f, "Edge"),
            SeamKind::Corner => write!(f, "Corner"),
        }
    }
}

/// Result of comparing one shared boundary
#[derive(Clone, Debug)]
pub struct SeamCheck {
    pub kind: SeamKind,
    /// Tile whose boundary was read first
    pub from: TileCoord,
    /// Adjacent tile it was compared against
    pub to: TileCoord,
    /// Largest absolute height difference found
    pub deviation: f64,
}

impl SeamCheck {
    pub fn passed(&self) -> bool {
        self.deviation <= SEAM_TOLERANCE
    }
}

/// Overall verification status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeamStatus {
    Passed,
    Failed,
}

/// Complete seam report for a world
#[derive(Clone, Debug)]
pub struct SeamReport {
    /// Master seed of the verified world
    pub seed: u64,
    pub world_size: (usize, usize),
    /// Finalized tiles taking part in at least one check
    pub tiles_checked: usize,
    pub edge_checks: usize,
    pub corner_checks: usize,
    pub max_deviation: f64,
    pub status: SeamStatus,
    /// Failed checks only
    pub issues: Vec<SeamCheck>,
}

impl SeamReport {
    fn new(seed: u64, world_size: (usize, usize)) -> Self {
        Self {
            seed,
            world_size,
            tiles_checked: 0,
            edge_checks: 0,
            corner_checks: 0,
            max_deviation: 0.0,
            status: SeamStatus::Passed,
            issues: Vec::new(),
        }
    }

    fn add(&mut self, check: SeamCheck) {
        match check.kind {
            SeamKind::Edge => self.edge_checks += 1,
            SeamKind::Corner => self.corner_checks += 1,
        }
        self.max_deviation = self.max_deviation.max(check.deviation);
        if !check.passed() {
            self.status = SeamStatus::Failed;
            self.issues.push(check);
        }
    }

    pub fn checks(&self) -> usize {
        self.edge_checks + self.corner_checks
    }

    /// Format report as a string for display
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("═══════════════════════════════════════════\n");
        output.push_str("           TILE SEAM REPORT\n");
        output.push_str("═══════════════════════════════════════════\n\n");

        output.push_str(&format!("Seed: {}\n", self.seed));
        output.push_str(&format!("World Size: {}x{}\n", self.world_size.0, self.world_size.1));
        output.push_str(&format!("Tiles Checked: {}\n", self.tiles_checked));
        output.push_str(&format!("Edge Checks: {}\n", self.edge_checks));
        output.push_str(&format!("Corner Checks: {}\n", self.corner_checks));
        output.push_str(&format!("Max Deviation: {:.3e}\n\n", self.max_deviation));

        if !self.issues.is_empty() {
            output.push_str(&format!("ISSUES ({}):\n", self.issues.len()));
            for issue in &self.issues {
                output.push_str(&format!(
                    "  [{}] {} -> {} off by {:.6}\n",
                    issue.kind, issue.from, issue.to, issue.deviation
                ));
            }
            output.push('\n');
        }

        let status_str = match self.status {
            SeamStatus::Passed => "PASSED",
            SeamStatus::Failed => "FAILED",
        };
        output.push_str(&format!("STATUS: {}\n", status_str));
        output.push_str("═══════════════════════════════════════════\n");

        output
    }
}

/// Largest difference between two edges at the coarser one's sample points.
fn edge_deviation(a: &[f64], b: &[f64]) -> f64 {
    let (coarse, fine) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut resampled = vec![0.0; coarse.len()];
    merge_edge(&mut resampled, fine);
    coarse
        .iter()
        .zip(&resampled)
        .fold(0.0, |acc: f64, (x, y)| acc.max((x - y).abs()))
}

/// Compare every shared boundary between finalized tiles.
pub fn verify_seams(world: &World) -> SeamReport {
    let mut report = SeamReport::new(world.seeds().master, (world.width(), world.height()));

    for y in 0..world.height() {
        for x in 0..world.width() {
            let here = TileCoord::new(x, y);
            let Some(hm) = world.heightmap(here) else {
                continue;
            };
            report.tiles_checked += 1;

            for side in [Side::Right, Side::Bottom] {
                let there = match side {
                    Side::Right => TileCoord::new(x + 1, y),
                    _ => TileCoord::new(x, y + 1),
                };
                if let Some(other) = world.heightmap(there) {
                    report.add(SeamCheck {
                        kind: SeamKind::Edge,
                        from: here,
                        to: there,
                        deviation: edge_deviation(&hm.edge(side), &other.edge(side.opposite())),
                    });
                }
            }

            // Down-right diagonal
            let there = TileCoord::new(x + 1, y + 1);
            if let Some(other) = world.heightmap(there) {
                report.add(SeamCheck {
                    kind: SeamKind::Corner,
                    from: here,
                    to: there,
                    deviation: (hm.corner(Corner::BottomRight) - other.corner(Corner::TopLeft)).abs(),
                });
            }
            // Down-left diagonal
            if x > 0 {
                let there = TileCoord::new(x - 1, y + 1);
                if let Some(other) = world.heightmap(there) {
                    report.add(SeamCheck {
                        kind: SeamKind::Corner,
                        from: here,
                        to: there,
                        deviation: (hm.corner(Corner::BottomLeft) - other.corner(Corner::TopRight)).abs(),
                    });
                }
            }
        }
    }

    report
}
