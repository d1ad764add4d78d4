//! Ridged-multifractal noise.
//!
//! Each octave folds gradient noise around `offset`, squares it to sharpen
//! the crest, and scales it by a weight derived from the previous octave.
//! High octaves therefore only show up along existing ridgelines, which is
//! what gives mountain ranges their connected spines.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use super::lattice::{gradient_coherent_noise_3d, NoiseQuality};
use super::{make_int32_range, NoiseError, MAX_OCTAVES};

pub const DEFAULT_RIDGED_FREQUENCY: f64 = 1.0;
pub const DEFAULT_RIDGED_LACUNARITY: f64 = 2.0;
pub const DEFAULT_RIDGED_OCTAVE_COUNT: usize = 6;
pub const DEFAULT_RIDGED_SEED: i32 = 0;
pub const DEFAULT_RIDGED_OFFSET: f64 = 1.0;
pub const DEFAULT_RIDGED_GAIN: f64 = 2.0;

/// Spectral exponent for the per-octave weights.
const SPECTRAL_EXPONENT: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RidgedMultiParams", into = "RidgedMultiParams")]
pub struct RidgedMulti {
    /// Frequency of the first octave
    pub frequency: f64,
    /// Lattice seed; zero selects the default seed
    pub seed: i32,
    /// Easing applied inside each octave
    pub quality: NoiseQuality,
    /// Value the absolute signal is subtracted from
    pub offset: f64,
    /// Multiplier turning an octave's signal into the next octave's weight
    pub gain: f64,
    lacunarity: f64,
    octaves: usize,
    weights: [f64; MAX_OCTAVES],
}

/// Serialized form; the weight table is rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RidgedMultiParams {
    frequency: f64,
    lacunarity: f64,
    octaves: usize,
    seed: i32,
    quality: NoiseQuality,
    offset: f64,
    gain: f64,
}

impl TryFrom<RidgedMultiParams> for RidgedMulti {
    type Error = NoiseError;

    fn try_from(p: RidgedMultiParams) -> Result<Self, Self::Error> {
        let mut ridged = RidgedMulti {
            frequency: p.frequency,
            seed: p.seed,
            quality: p.quality,
            offset: p.offset,
            gain: p.gain,
            lacunarity: p.lacunarity,
            octaves: DEFAULT_RIDGED_OCTAVE_COUNT,
            weights: [0.0; MAX_OCTAVES],
        };
        ridged.set_octaves(p.octaves)?;
        ridged.set_lacunarity(p.lacunarity);
        Ok(ridged)
    }
}

impl From<RidgedMulti> for RidgedMultiParams {
    fn from(r: RidgedMulti) -> Self {
        RidgedMultiParams {
            frequency: r.frequency,
            lacunarity: r.lacunarity,
            octaves: r.octaves,
            seed: r.seed,
            quality: r.quality,
            offset: r.offset,
            gain: r.gain,
        }
    }
}

impl Default for RidgedMulti {
    fn default() -> Self {
        let mut ridged = RidgedMulti {
            frequency: DEFAULT_RIDGED_FREQUENCY,
            seed: DEFAULT_RIDGED_SEED,
            quality: NoiseQuality::Standard,
            offset: DEFAULT_RIDGED_OFFSET,
            gain: DEFAULT_RIDGED_GAIN,
            lacunarity: DEFAULT_RIDGED_LACUNARITY,
            octaves: DEFAULT_RIDGED_OCTAVE_COUNT,
            weights: [0.0; MAX_OCTAVES],
        };
        ridged.set_lacunarity(DEFAULT_RIDGED_LACUNARITY);
        ridged
    }
}

impl RidgedMulti {
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
        self.set_lacunarity(lacunarity);
        self
    }

    pub fn with_quality(mut self, quality: NoiseQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

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

    pub fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    /// Set the lacunarity and rebuild the per-octave weight table.
    pub fn set_lacunarity(&mut self, lacunarity: f64) {
        self.lacunarity = lacunarity;

        let mut frequency = 1.0f64;
        for weight in self.weights.iter_mut() {
            *weight = frequency.powf(-SPECTRAL_EXPONENT);
            frequency *= lacunarity;
        }
    }

    /// Weight applied to octave `octave`'s signal.
    pub fn octave_weight(&self, octave: usize) -> f64 {
        self.weights[octave]
    }

    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut x = x * self.frequency;
        let mut y = y * self.frequency;
        let mut z = z * self.frequency;

        let mut value = 0.0;
        let mut weight = 1.0;

        for octave in 0..self.octaves {
            let nx = make_int32_range(x);
            let ny = make_int32_range(y);
            let nz = make_int32_range(z);

            let seed = self.seed.wrapping_add(octave as i32) & 0x7fff_ffff;
            let mut signal = gradient_coherent_noise_3d(nx, ny, nz, seed, self.quality);

            // Fold and invert to make the ridge, then square to sharpen it
            signal = self.offset - signal.abs();
            signal *= signal;

            // Previous octave's weighting; high values stay sharp along the ridge
            signal *= weight;

            weight = (signal * self.gain).clamp(0.0, 1.0);

            value += signal * self.weights[octave];

            x *= self.lacunarity;
            y *= self.lacunarity;
            z *= self.lacunarity;
        }

        (value * 1.25) - 1.0
    }
}

impl NoiseFn<f64, 3> for RidgedMulti {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.get_value(point[0], point[1], point[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_table_follows_lacunarity() {
        let ridged = RidgedMulti::new(1);
        assert_eq!(ridged.octave_weight(0), 1.0);
        assert_eq!(ridged.octave_weight(1), 0.5);
        assert_eq!(ridged.octave_weight(3), 0.125);

        let ridged = ridged.with_lacunarity(4.0);
        assert_eq!(ridged.lacunarity(), 4.0);
        assert_eq!(ridged.octave_weight(0), 1.0);
        assert_eq!(ridged.octave_weight(1), 0.25);
        assert_eq!(ridged.octave_weight(2), 0.0625);
    }

    #[test]
    fn test_deterministic() {
        let a = RidgedMulti::new(321);
        let b = RidgedMulti::new(321);
        for i in 0..50 {
            let (x, y) = (i as f64 * 0.21, i as f64 * -0.13);
            assert_eq!(a.get_value(x, y, 0.0).to_bits(), b.get_value(x, y, 0.0).to_bits());
        }
    }

    #[test]
    fn test_reference_value() {
        let v = RidgedMulti::new(7).get_value(1.25, -3.5, 0.75);
        assert_eq!(v.to_bits(), 0x3fe9_4ba9_871d_9aa6, "got {}", v);
    }

    #[test]
    fn test_output_floor() {
        // Every octave adds a non-negative signal, so the sum never drops below -1
        let ridged = RidgedMulti::new(8);
        for i in 0..300 {
            let v = ridged.get_value(i as f64 * 0.05, 1.3, -0.7);
            assert!(v >= -1.0, "ridged value {} below floor", v);
        }
    }

    #[test]
    fn test_single_octave_formula() {
        let ridged = RidgedMulti::new(4).with_octaves(1).unwrap();
        let raw = gradient_coherent_noise_3d(0.4, 0.9, 0.0, 4, NoiseQuality::Standard);
        let folded = (1.0 - raw.abs()).powi(2);
        let expected = folded * 1.25 - 1.0;
        assert!((ridged.get_value(0.4, 0.9, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_serde_rebuilds_weights() {
        let ridged = RidgedMulti::new(2).with_lacunarity(3.0);
        let json = serde_json::to_string(&ridged).unwrap();
        let back: RidgedMulti = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ridged);
        assert!((back.octave_weight(2) - 1.0 / 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_serde_rejects_bad_octaves() {
        let json = serde_json::to_string(&RidgedMulti::new(2)).unwrap();
        for octaves in [0, MAX_OCTAVES + 1] {
            let bad = json.replace("\"octaves\":6", &format!("\"octaves\":{}", octaves));
            assert_ne!(bad, json);
            assert!(serde_json::from_str::<RidgedMulti>(&bad).is_err(), "accepted {} octaves", octaves);
        }
    }

    #[test]
    fn test_octave_limit() {
        assert!(RidgedMulti::new(1).with_octaves(31).is_err());
        assert!(RidgedMulti::new(1).with_octaves(30).is_ok());
    }
}
