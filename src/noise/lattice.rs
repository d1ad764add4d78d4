//! Hash-based lattice noise.
//!
//! Integer hashing over a 3D lattice produces value noise and gradient noise;
//! [`coherent_noise_3d`] blends the eight corners of the unit cube around a
//! point to make the field continuous. All hashing uses wrapping 32-bit
//! integer arithmetic so results are identical on every platform.

use serde::{Deserialize, Serialize};

use super::gradients::GRADIENT_TABLE;
use super::interp::{cubic_s_curve, linear, quintic_s_curve};

// These multipliers are primes and must stay prime.
const X_NOISE_GEN: i32 = 1619;
const Y_NOISE_GEN: i32 = 31337;
const Z_NOISE_GEN: i32 = 6971;
const SEED_NOISE_GEN: i32 = 1013;
const SHIFT_NOISE_GEN: u32 = 8;

/// Gradient noise output is scaled by this to land roughly in `[-1, 1]`.
const GRADIENT_SCALE: f64 = 2.12;

/// Easing applied to the fractional lattice offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseQuality {
    /// No easing. Visible creases where the first derivative jumps at
    /// lattice boundaries.
    Fast,
    /// Cubic S-curve. Second derivative is still discontinuous.
    #[default]
    Standard,
    /// Quintic S-curve. First and second derivatives are continuous.
    Best,
}

impl NoiseQuality {
    /// Map a fractional offset in `[0, 1]` through this quality's curve.
    #[inline]
    pub fn ease(self, t: f64) -> f64 {
        match self {
            NoiseQuality::Fast => t,
            NoiseQuality::Standard => cubic_s_curve(t),
            NoiseQuality::Best => quintic_s_curve(t),
        }
    }
}

/// Seed zero means "use the default seed", which is 1.
#[inline]
pub fn effective_seed(seed: i32) -> i32 {
    if seed == 0 {
        1
    } else {
        seed
    }
}

#[inline]
fn lattice_sum(x: i32, y: i32, z: i32, seed: i32) -> i32 {
    X_NOISE_GEN
        .wrapping_mul(x)
        .wrapping_add(Y_NOISE_GEN.wrapping_mul(y))
        .wrapping_add(Z_NOISE_GEN.wrapping_mul(z))
        .wrapping_add(SEED_NOISE_GEN.wrapping_mul(seed))
}

/// Integer hash of a lattice point, in `[0, 2^31)`.
pub fn int_value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> i32 {
    let mut n = lattice_sum(x, y, z, seed) & 0x7fff_ffff;
    n = (n >> 13) ^ n;
    n.wrapping_mul(
        n.wrapping_mul(n)
            .wrapping_mul(60493)
            .wrapping_add(19_990_303),
    )
    .wrapping_add(1_376_312_589)
        & 0x7fff_ffff
}

/// Value noise at a lattice point, in `[-1, 1]`.
pub fn value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> f64 {
    1.0 - (int_value_noise_3d(x, y, z, seed) as f64 / 1_073_741_824.0)
}

/// Gradient noise contribution of lattice point `(ix, iy, iz)` at `(fx, fy, fz)`.
///
/// The lattice hash picks one of the 256 unit gradients; the result is its
/// dot product with the offset from the lattice point.
pub fn gradient_noise_3d(fx: f64, fy: f64, fz: f64, ix: i32, iy: i32, iz: i32, seed: i32) -> f64 {
    let seed = effective_seed(seed);

    let mut vector_index = lattice_sum(ix, iy, iz, seed);
    vector_index ^= vector_index >> SHIFT_NOISE_GEN;
    vector_index &= 0xff;

    let base = (vector_index as usize) << 2;
    let xv_gradient = GRADIENT_TABLE[base];
    let yv_gradient = GRADIENT_TABLE[base + 1];
    let zv_gradient = GRADIENT_TABLE[base + 2];

    let xv_point = fx - ix as f64;
    let yv_point = fy - iy as f64;
    let zv_point = fz - iz as f64;

    (xv_gradient * xv_point + yv_gradient * yv_point + zv_gradient * zv_point) * GRADIENT_SCALE
}

/// Lower lattice coordinate for `v`.
///
/// Positive values truncate; zero and negative values truncate and then step
/// down by one, so `-1.0` maps to `-2` and `0.0` maps to `-1`.
#[inline]
pub fn lattice_floor(v: f64) -> i32 {
    if v > 0.0 {
        v as i32
    } else {
        v as i32 - 1
    }
}

/// Trilinear coherent noise at `(x, y, z)`.
///
/// Locates the unit lattice cube around the point, eases the fractional
/// offsets with `quality`, and blends `corner(ix, iy, iz)` for the eight
/// cube corners along x, then y, then z.
pub fn coherent_noise_3d<F>(x: f64, y: f64, z: f64, quality: NoiseQuality, corner: F) -> f64
where
    F: Fn(i32, i32, i32) -> f64,
{
    let x0 = lattice_floor(x);
    let y0 = lattice_floor(y);
    let z0 = lattice_floor(z);
    let x1 = x0.wrapping_add(1);
    let y1 = y0.wrapping_add(1);
    let z1 = z0.wrapping_add(1);

    let xs = quality.ease(x - x0 as f64);
    let ys = quality.ease(y - y0 as f64);
    let zs = quality.ease(z - z0 as f64);

    let ix0 = linear(corner(x0, y0, z0), corner(x1, y0, z0), xs);
    let ix1 = linear(corner(x0, y1, z0), corner(x1, y1, z0), xs);
    let iy0 = linear(ix0, ix1, ys);

    let ix0 = linear(corner(x0, y0, z1), corner(x1, y0, z1), xs);
    let ix1 = linear(corner(x0, y1, z1), corner(x1, y1, z1), xs);
    let iy1 = linear(ix0, ix1, ys);

    linear(iy0, iy1, zs)
}

/// Coherent value noise, in `[-1, 1]`.
pub fn value_coherent_noise_3d(x: f64, y: f64, z: f64, seed: i32, quality: NoiseQuality) -> f64 {
    let seed = effective_seed(seed);
    coherent_noise_3d(x, y, z, quality, |ix, iy, iz| value_noise_3d(ix, iy, iz, seed))
}

/// Coherent gradient (Perlin) noise, roughly in `[-1, 1]`.
pub fn gradient_coherent_noise_3d(x: f64, y: f64, z: f64, seed: i32, quality: NoiseQuality) -> f64 {
    let seed = effective_seed(seed);
    coherent_noise_3d(x, y, z, quality, |ix, iy, iz| {
        gradient_noise_3d(x, y, z, ix, iy, iz, seed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_hash_is_31_bit_and_stable() {
        for seed in [0, 1, 42, -7, i32::MAX] {
            for p in [(0, 0, 0), (1, 2, 3), (-5, 17, -1024), (i32::MAX, i32::MIN, 1)] {
                let a = int_value_noise_3d(p.0, p.1, p.2, seed);
                let b = int_value_noise_3d(p.0, p.1, p.2, seed);
                assert_eq!(a, b);
                assert!(a >= 0, "hash must be non-negative, got {}", a);
            }
        }
    }

    #[test]
    fn test_int_hash_reference_values() {
        assert_eq!(int_value_noise_3d(1, 2, 3, 1), 1_440_851_193);
        assert_eq!(int_value_noise_3d(-5, 17, -1024, 42), 654_244_697);
    }

    #[test]
    fn test_gradient_noise_reference_value() {
        // Lattice (1, 2, 3) with seed 7 hashes to gradient 225
        let g = &GRADIENT_TABLE[225 << 2..(225 << 2) + 3];
        let expected = (g[0] * 0.25 + g[1] * 0.5 + g[2] * 0.75) * GRADIENT_SCALE;
        let v = gradient_noise_3d(1.25, 2.5, 3.75, 1, 2, 3, 7);
        assert_eq!(v.to_bits(), expected.to_bits());
        assert_eq!(v.to_bits(), 0xbff5_a17c_ba3a_cedf);
    }

    #[test]
    fn test_value_noise_range() {
        for x in -20..20 {
            for y in -3..3 {
                let v = value_noise_3d(x, y, x * y, 99);
                assert!((-1.0..=1.0).contains(&v), "value noise out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_gradient_noise_zero_at_lattice_point() {
        // Offset from the lattice point is zero, so the dot product vanishes
        assert_eq!(gradient_noise_3d(3.0, -2.0, 5.0, 3, -2, 5, 11), 0.0);
    }

    #[test]
    fn test_gradient_noise_seed_zero_matches_seed_one() {
        let a = gradient_noise_3d(0.3, 0.4, 0.5, 0, 1, 0, 0);
        let b = gradient_noise_3d(0.3, 0.4, 0.5, 0, 1, 0, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_lattice_floor_rule() {
        assert_eq!(lattice_floor(2.7), 2);
        assert_eq!(lattice_floor(1.0), 1);
        assert_eq!(lattice_floor(0.0), -1);
        assert_eq!(lattice_floor(-0.5), -1);
        assert_eq!(lattice_floor(-1.0), -2);
        assert_eq!(lattice_floor(-1.5), -2);
    }

    #[test]
    fn test_quality_easing() {
        assert_eq!(NoiseQuality::Fast.ease(0.25), 0.25);
        assert_eq!(NoiseQuality::Standard.ease(0.25), cubic_s_curve(0.25));
        assert_eq!(NoiseQuality::Best.ease(0.25), quintic_s_curve(0.25));
        assert_eq!(NoiseQuality::default(), NoiseQuality::Standard);
    }

    #[test]
    fn test_coherent_noise_blends_constant_field() {
        let v = coherent_noise_3d(0.37, -4.2, 9.9, NoiseQuality::Best, |_, _, _| 0.75);
        assert!((v - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_coherent_noise_hits_corner_value() {
        // Positive integer coordinates are their own lower corner, eased offset 0
        let v = coherent_noise_3d(2.0, 3.0, 4.0, NoiseQuality::Standard, |ix, iy, iz| {
            (ix * 100 + iy * 10 + iz) as f64
        });
        assert_eq!(v, 234.0);
    }

    #[test]
    fn test_value_coherent_noise_deterministic() {
        let a = value_coherent_noise_3d(1.25, -0.5, 3.75, 7, NoiseQuality::Standard);
        let b = value_coherent_noise_3d(1.25, -0.5, 3.75, 7, NoiseQuality::Standard);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!((-1.0..=1.0).contains(&a));
    }

    #[test]
    fn test_gradient_coherent_noise_continuous() {
        let step = 1e-6;
        for i in 0..200 {
            let x = -5.0 + i as f64 * 0.05;
            let a = gradient_coherent_noise_3d(x, 0.3, 0.7, 3, NoiseQuality::Standard);
            let b = gradient_coherent_noise_3d(x + step, 0.3, 0.7, 3, NoiseQuality::Standard);
            assert!((a - b).abs() < 1e-3, "jump between {} and {}: {} vs {}", x, x + step, a, b);
        }
    }

    #[test]
    fn test_seed_changes_output() {
        let a = gradient_coherent_noise_3d(0.5, 0.5, 0.5, 1, NoiseQuality::Standard);
        let b = gradient_coherent_noise_3d(0.5, 0.5, 0.5, 2, NoiseQuality::Standard);
        assert_ne!(a, b);
    }
}
