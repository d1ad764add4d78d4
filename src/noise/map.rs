//! Dense 2D grid of noise samples.

use super::NoiseError;

/// Row-major `width x height` grid of `f64` samples.
///
/// Every cell is initialised to zero, so reads at valid indices are always
/// defined.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseMap {
    /// Create a zero-filled map. Both dimensions must be positive.
    pub fn new(width: usize, height: usize) -> Result<Self, NoiseError> {
        if width == 0 || height == 0 {
            return Err(NoiseError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            values: vec![0.0; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize the map, discarding its contents.
    pub fn set_size(&mut self, width: usize, height: usize) -> Result<(), NoiseError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) outside {}x{}", x, y, self.width, self.height);
        y * self.width + x
    }

    pub fn get_value(&self, x: usize, y: usize) -> f64 {
        self.values[self.index(x, y)]
    }

    pub fn set_value(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    pub fn add_value(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.values[idx] += value;
    }

    pub fn subtract_value(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.values[idx] -= value;
    }

    /// Row-major view of all samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}
