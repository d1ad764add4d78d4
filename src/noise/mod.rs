//! Coherent noise engine.
//!
//! Deterministic lattice noise (value and gradient), the Perlin and
//! ridged-multifractal generators layered on top of it, and a plane map
//! builder that samples any 3D noise function into a [`NoiseMap`].
//!
//! Every generator here is bit-reproducible: the lattice hash is fixed-width
//! integer arithmetic and no global state is involved.

pub mod builder;
pub mod gradients;
pub mod interp;
pub mod lattice;
pub mod map;
pub mod perlin;
pub mod ridged;

use thiserror::Error;

pub use builder::{Bounds, PlaneMapBuilder};
pub use lattice::{
    coherent_noise_3d, gradient_coherent_noise_3d, gradient_noise_3d, int_value_noise_3d,
    value_coherent_noise_3d, value_noise_3d, NoiseQuality,
};
pub use map::NoiseMap;
pub use perlin::Perlin;
pub use ridged::RidgedMulti;

/// Highest octave count the fractal generators accept.
pub const MAX_OCTAVES: usize = 30;

const INT32_FOLD: f64 = 1_073_741_824.0;

/// Errors raised while configuring noise generators or building maps.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NoiseError {
    #[error("invalid bounds: upper ({upper_x}, {upper_y}) is below lower ({lower_x}, {lower_y})")]
    InvalidBounds {
        lower_x: f64,
        lower_y: f64,
        upper_x: f64,
        upper_y: f64,
    },
    #[error("no source module set on the map builder")]
    MissingSource,
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("octave count {octaves} outside 1..={max}")]
    OctaveCount { octaves: usize, max: usize },
}

/// Fold `n` into the range a signed 32-bit lattice index can address.
///
/// Values with `|n| < 2^30` pass through untouched; larger magnitudes are
/// wrapped so they can later be truncated to `i32` without overflow.
pub fn make_int32_range(n: f64) -> f64 {
    if n >= INT32_FOLD {
        (2.0 * (n % INT32_FOLD)) - INT32_FOLD
    } else if n <= -INT32_FOLD {
        (2.0 * (n % INT32_FOLD)) + INT32_FOLD
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_int32_range_identity_below_limit() {
        for n in [0.0, 1.5, -1.5, 123_456.789, -1_073_741_823.9, 1_073_741_823.0] {
            assert_eq!(make_int32_range(n), n);
        }
    }

    #[test]
    fn test_make_int32_range_at_limit() {
        let folded = make_int32_range(INT32_FOLD);
        assert!((-INT32_FOLD..=INT32_FOLD).contains(&folded));
        let folded = make_int32_range(-INT32_FOLD);
        assert!((-INT32_FOLD..=INT32_FOLD).contains(&folded));
    }

    #[test]
    fn test_make_int32_range_large_values() {
        for n in [3.0e9, -7.5e12, 1.0e18, -4.2e15] {
            let folded = make_int32_range(n);
            assert!(folded.abs() <= INT32_FOLD, "{} folded to {}", n, folded);
            assert!((folded as i64) > i32::MIN as i64 && (folded as i64) < i32::MAX as i64);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = NoiseError::InvalidDimensions { width: 0, height: 4 };
        assert_eq!(err.to_string(), "map dimensions must be positive, got 0x4");
        assert!(NoiseError::MissingSource.to_string().contains("source"));
    }
}
