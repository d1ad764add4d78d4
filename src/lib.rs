//! Seamless tile terrain library
//!
//! Coherent noise, per-tile heightmap generation and edge stitching.
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod export;
pub mod heightmap;
pub mod noise;
pub mod seeds;
pub mod stitch;
pub mod terrain;
pub mod tile;
pub mod tilemap;
pub mod verify;
pub mod world;
