//! Multi-octave Perlin (fBm) noise built on gradient coherent noise.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use super::lattice::{gradient_coherent_noise_3d, NoiseQuality};
use super::{make_int32_range, NoiseError, MAX_OCTAVES};

pub const DEFAULT_PERLIN_FREQUENCY: f64 = 1.0;
pub const DEFAULT_PERLIN_LACUNARITY: f64 = 2.0;
pub const DEFAULT_PERLIN_OCTAVE_COUNT: usize = 6;
pub const DEFAULT_PERLIN_PERSISTENCE: f64 = 0.5;
pub const DEFAULT_PERLIN_SEED: i32 = 0;

/// Sum of gradient-noise octaves, each at `lacunarity` times the previous
/// frequency and `persistence` times the previous amplitude.
///
/// The output is unbounded in principle; with the defaults it stays close to
/// `[-1, 1]` scaled by the persistence series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PerlinParams", into = "PerlinParams")]
pub struct Perlin {
    /// Frequency of the first octave
    pub frequency: f64,
    /// Frequency multiplier between successive octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves
    pub persistence: f64,
    /// Lattice seed; zero selects the default seed
    pub seed: i32,
    /// Easing applied inside each octave
    pub quality: NoiseQuality,
    octaves: usize,
}

/// Serialized form; the octave count is validated on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PerlinParams {
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    octaves: usize,
    seed: i32,
    quality: NoiseQuality,
}

impl TryFrom<PerlinParams> for Perlin {
    type Error = NoiseError;

    fn try_from(p: PerlinParams) -> Result<Self, Self::Error> {
        Perlin {
            frequency: p.frequency,
            lacunarity: p.lacunarity,
            persistence: p.persistence,
            seed: p.seed,
            quality: p.quality,
            octaves: DEFAULT_PERLIN_OCTAVE_COUNT,
        }
        .with_octaves(p.octaves)
    }
}

impl From<Perlin> for PerlinParams {
    fn from(p: Perlin) -> Self {
        PerlinParams {
            frequency: p.frequency,
            lacunarity: p.lacunarity,
            persistence: p.persistence,
            octaves: p.octaves,
            seed: p.seed,
            quality: p.quality,
        }
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_PERLIN_FREQUENCY,
            lacunarity: DEFAULT_PERLIN_LACUNARITY,
            persistence: DEFAULT_PERLIN_PERSISTENCE,
            seed: DEFAULT_PERLIN_SEED,
            quality: NoiseQuality::Standard,
            octaves: DEFAULT_PERLIN_OCTAVE_COUNT,
        }
    }
}

impl Perlin {
    /// Default generator with the given seed.
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_lacunarity(mut self, lacunarity: f64) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    pub fn with_persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_quality(mut self, quality: NoiseQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the octave count; must be in `1..=MAX_OCTAVES`.
    pub fn with_octaves(mut self, octaves: usize) -> Result<Self, NoiseError> {
        self.set_octaves(octaves)?;
        Ok(self)
    }

    pub fn set_octaves(&mut self, octaves: usize) -> Result<(), NoiseError> {
        if octaves == 0 || octaves > MAX_OCTAVES {
            return Err(NoiseError::OctaveCount { octaves, max: MAX_OCTAVES });
        }
        self.octaves = octaves;
        Ok(())
    }

    pub fn octaves(&self) -> usize {
        self.octaves
    }

    /// Sample the fractal at `(x, y, z)`.
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut value = 0.0;
        let mut persist = 1.0;

        let mut x = x * self.frequency;
        let mut y = y * self.frequency;
        let mut z = z * self.frequency;

        for octave in 0..self.octaves {
            // Keep coordinates representable once they are truncated to lattice indices
            let nx = make_int32_range(x);
            let ny = make_int32_range(y);
            let nz = make_int32_range(z);

            let seed = self.seed.wrapping_add(octave as i32) & 0xfff;
            let signal = gradient_coherent_noise_3d(nx, ny, nz, seed, self.quality);
            value += signal * persist;

            x *= self.lacunarity;
            y *= self.lacunarity;
            z *= self.lacunarity;
            persist *= self.persistence;
        }

        value
    }
}

impl NoiseFn<f64, 3> for Perlin {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.get_value(point[0], point[1], point[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let perlin = Perlin::default();
        assert_eq!(perlin.frequency, 1.0);
        assert_eq!(perlin.lacunarity, 2.0);
        assert_eq!(perlin.persistence, 0.5);
        assert_eq!(perlin.octaves(), 6);
        assert_eq!(perlin.quality, NoiseQuality::Standard);
    }

    #[test]
    fn test_deterministic() {
        let perlin = Perlin::new(1234).with_quality(NoiseQuality::Best);
        let again = Perlin::new(1234).with_quality(NoiseQuality::Best);
        for i in 0..50 {
            let p = (i as f64 * 0.173, -(i as f64) * 0.091, 0.5);
            let a = perlin.get_value(p.0, p.1, p.2);
            let b = again.get_value(p.0, p.1, p.2);
            assert_eq!(a.to_bits(), b.to_bits(), "mismatch at {:?}", p);
        }
    }

    #[test]
    fn test_reference_value() {
        let v = Perlin::new(1234).get_value(1.25, -3.5, 0.75);
        assert_eq!(v.to_bits(), 0x3fe9_d311_32f9_269c, "got {}", v);
    }

    #[test]
    fn test_octave_bounds() {
        assert!(Perlin::new(1).with_octaves(0).is_err());
        assert!(Perlin::new(1).with_octaves(MAX_OCTAVES + 1).is_err());
        let p = Perlin::new(1).with_octaves(MAX_OCTAVES).unwrap();
        assert_eq!(p.octaves(), MAX_OCTAVES);
    }

    #[test]
    fn test_range_bounded_by_persistence_series() {
        let perlin = Perlin::new(77);
        // Each octave contributes at most ~1.1 * persist
        let bound: f64 = (0..6).map(|o| 0.5f64.powi(o)).sum::<f64>() * 1.2;
        for i in 0..400 {
            let v = perlin.get_value(i as f64 * 0.037, i as f64 * 0.011, 0.0);
            assert!(v.abs() <= bound, "value {} exceeds {}", v, bound);
        }
    }

    #[test]
    fn test_single_octave_matches_coherent_noise() {
        let perlin = Perlin::new(9).with_octaves(1).unwrap().with_frequency(2.0);
        let expected = gradient_coherent_noise_3d(0.6, 0.8, 0.0, 9, NoiseQuality::Standard);
        assert_eq!(perlin.get_value(0.3, 0.4, 0.0), expected);
    }

    #[test]
    fn test_serde_validates_octaves() {
        let perlin = Perlin::new(6).with_persistence(0.25).with_octaves(4).unwrap();
        let json = serde_json::to_string(&perlin).unwrap();
        let back: Perlin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, perlin);

        for octaves in [0, MAX_OCTAVES + 1] {
            let bad = json.replace("\"octaves\":4", &format!("\"octaves\":{}", octaves));
            assert_ne!(bad, json);
            assert!(serde_json::from_str::<Perlin>(&bad).is_err(), "accepted {} octaves", octaves);
        }
    }

    #[test]
    fn test_noise_fn_matches_get_value() {
        let perlin = Perlin::new(5);
        assert_eq!(perlin.get([0.1, 0.2, 0.3]), perlin.get_value(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_huge_coordinates_stay_finite() {
        let perlin = Perlin::new(3).with_octaves(30).unwrap();
        let v = perlin.get_value(1.0e9, -2.0e9, 5.0e8);
        assert!(v.is_finite());
    }
}
