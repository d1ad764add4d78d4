//! Plane map builder.
//!
//! Samples a 3D noise function on the `z = 0` plane over a rectangle and
//! writes the samples row-major into a [`NoiseMap`]. Rows are filled in
//! parallel with rayon.

use noise::NoiseFn;
use rayon::prelude::*;

use super::interp::linear;
use super::map::NoiseMap;
use super::NoiseError;

const DEFAULT_MAP_SIZE: usize = 256;

/// Rectangle in sample space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub lower_x: f64,
    pub lower_y: f64,
    pub upper_x: f64,
    pub upper_y: f64,
}

impl Bounds {
    pub fn new(lower_x: f64, lower_y: f64, upper_x: f64, upper_y: f64) -> Self {
        Self { lower_x, lower_y, upper_x, upper_y }
    }

    pub fn x_extent(&self) -> f64 {
        self.upper_x - self.lower_x
    }

    pub fn y_extent(&self) -> f64 {
        self.upper_y - self.lower_y
    }

    fn validate(&self) -> Result<(), NoiseError> {
        // Written so NaN bounds are rejected too
        if !(self.x_extent() >= 0.0 && self.y_extent() >= 0.0) {
            return Err(NoiseError::InvalidBounds {
                lower_x: self.lower_x,
                lower_y: self.lower_y,
                upper_x: self.upper_x,
                upper_y: self.upper_y,
            });
        }
        Ok(())
    }
}

impl Default for Bounds {
    /// The unit square.
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Builds a [`NoiseMap`] from any `NoiseFn<f64, 3>` source.
///
/// ```
/// use tile_terrain::noise::{Perlin, PlaneMapBuilder};
///
/// let perlin = Perlin::new(7);
/// let map = PlaneMapBuilder::new()
///     .set_source(&perlin)
///     .set_size(16, 16)
///     .build()
///     .unwrap();
/// assert_eq!(map.values().len(), 256);
/// ```
#[derive(Clone, Copy)]
pub struct PlaneMapBuilder<'a> {
    source: Option<&'a (dyn NoiseFn<f64, 3> + Sync)>,
    width: usize,
    height: usize,
    seamless: bool,
    bounds: Bounds,
}

impl Default for PlaneMapBuilder<'_> {
    fn default() -> Self {
        Self {
            source: None,
            width: DEFAULT_MAP_SIZE,
            height: DEFAULT_MAP_SIZE,
            seamless: false,
            bounds: Bounds::default(),
        }
    }
}

impl<'a> PlaneMapBuilder<'a> {
    /// 256x256 builder over the unit square with no source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(mut self, source: &'a (dyn NoiseFn<f64, 3> + Sync)) -> Self {
        self.source = Some(source);
        self
    }

    pub fn set_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Blend the far edges so the map tiles against itself.
    pub fn set_seamless(mut self, seamless: bool) -> Self {
        self.seamless = seamless;
        self
    }

    pub fn set_bounds(mut self, lower_x: f64, lower_y: f64, upper_x: f64, upper_y: f64) -> Self {
        self.bounds = Bounds::new(lower_x, lower_y, upper_x, upper_y);
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_seamless(&self) -> bool {
        self.seamless
    }

    /// Sample the source into a fresh map.
    pub fn build(&self) -> Result<NoiseMap, NoiseError> {
        self.bounds.validate()?;
        let source = self.source.ok_or(NoiseError::MissingSource)?;
        let mut map = NoiseMap::new(self.width, self.height)?;

        let bounds = self.bounds;
        let x_extent = bounds.x_extent();
        let y_extent = bounds.y_extent();
        let x_delta = x_extent / self.width as f64;
        let y_delta = y_extent / self.height as f64;
        let seamless = self.seamless;

        let sample = |x: f64, y: f64| source.get([x, y, 0.0]);

        map.values_mut()
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(row, cells)| {
                let cur_y = bounds.lower_y + row as f64 * y_delta;
                for (col, cell) in cells.iter_mut().enumerate() {
                    let cur_x = bounds.lower_x + col as f64 * x_delta;
                    *cell = if !seamless {
                        sample(cur_x, cur_y)
                    } else {
                        let x_blend = blend_weight(cur_x - bounds.lower_x, x_extent);
                        let y_blend = blend_weight(cur_y - bounds.lower_y, y_extent);
                        linear(
                            linear(
                                sample(cur_x, cur_y),
                                sample(cur_x + x_extent, cur_y),
                                x_blend,
                            ),
                            linear(
                                sample(cur_x, cur_y + y_extent),
                                sample(cur_x + x_extent, cur_y + y_extent),
                                x_blend,
                            ),
                            y_blend,
                        )
                    };
                }
            });

        Ok(map)
    }
}

/// Weight of the far-side sample for a cell `offset` into an `extent`.
fn blend_weight(offset: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        1.0 - offset / extent
    } else {
        1.0
    }
}
