//! Per-tile vertex heightmaps.
//!
//! A tile with `faces` quads per axis has a `(faces + 1) x (faces + 1)` vertex
//! grid stored row-major, row 0 at the top. Edges are always read in the same
//! direction (left to right for rows, top to bottom for columns), so the
//! bottom row of one tile lines up index-for-index with the top row of the
//! tile below it.

use crate::noise::NoiseMap;

/// One of the four sides of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side of the neighbouring tile that touches this one.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// The two corners at the ends of this side, in edge order.
    pub fn corners(&self) -> [Corner; 2] {
        match self {
            Side::Top => [Corner::TopLeft, Corner::TopRight],
            Side::Right => [Corner::TopRight, Corner::BottomRight],
            Side::Bottom => [Corner::BottomLeft, Corner::BottomRight],
            Side::Left => [Corner::TopLeft, Corner::BottomLeft],
        }
    }
}

/// One of the four corners of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }
}

/// Square vertex heightmap for one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    faces: usize,
    values: Vec<f64>,
}

impl Heightmap {
    /// Flat heightmap with `faces` quads per axis (at least one).
    pub fn new(faces: usize) -> Self {
        let faces = faces.max(1);
        let side = faces + 1;
        Self {
            faces,
            values: vec![0.0; side * side],
        }
    }

    /// Wrap a row-major vertex array. Returns `None` unless the length is a
    /// perfect square of at least 4.
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        let side = (values.len() as f64).sqrt().round() as usize;
        if side < 2 || side * side != values.len() {
            return None;
        }
        Some(Self {
            faces: side - 1,
            values,
        })
    }

    /// Take the samples of a square noise map.
    pub fn from_noise_map(map: NoiseMap) -> Option<Self> {
        if map.width() != map.height() {
            return None;
        }
        Self::from_values(map.into_values())
    }

    pub fn faces(&self) -> usize {
        self.faces
    }

    /// Vertices per axis.
    pub fn side(&self) -> usize {
        self.faces + 1
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.side() + x
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Flat index of the vertex at position `i` along `side`.
    fn edge_index(&self, side: Side, i: usize) -> usize {
        let f = self.faces;
        match side {
            Side::Top => self.index(i, 0),
            Side::Right => self.index(f, i),
            Side::Bottom => self.index(i, f),
            Side::Left => self.index(0, i),
        }
    }

    /// Copy of the boundary row or column on `side`.
    pub fn edge(&self, side: Side) -> Vec<f64> {
        (0..self.side()).map(|i| self.values[self.edge_index(side, i)]).collect()
    }

    /// Overwrite the boundary row or column on `side`.
    ///
    /// `edge` must have exactly [`side`](Self::side) entries.
    pub fn set_edge(&mut self, side: Side, edge: &[f64]) {
        debug_assert_eq!(edge.len(), self.side());
        for (i, &value) in edge.iter().enumerate() {
            let idx = self.edge_index(side, i);
            self.values[idx] = value;
        }
    }

    fn corner_index(&self, corner: Corner) -> usize {
        let f = self.faces;
        match corner {
            Corner::TopLeft => self.index(0, 0),
            Corner::TopRight => self.index(f, 0),
            Corner::BottomRight => self.index(f, f),
            Corner::BottomLeft => self.index(0, f),
        }
    }

    pub fn corner(&self, corner: Corner) -> f64 {
        self.values[self.corner_index(corner)]
    }

    pub fn set_corner(&mut self, corner: Corner, value: f64) {
        let idx = self.corner_index(corner);
        self.values[idx] = value;
    }

    /// Smallest and largest vertex height.
    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Bilinear sample at fractional tile position `(u, v)` in `[0, 1]`.
    pub fn sample(&self, u: f64, v: f64) -> f64 {
        let f = self.faces as f64;
        let fx = (u.clamp(0.0, 1.0) * f).min(f);
        let fy = (v.clamp(0.0, 1.0) * f).min(f);
        let x0 = (fx.floor() as usize).min(self.faces - 1);
        let y0 = (fy.floor() as usize).min(self.faces - 1);
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let top = self.get(x0, y0) * (1.0 - tx) + self.get(x0 + 1, y0) * tx;
        let bottom = self.get(x0, y0 + 1) * (1.0 - tx) + self.get(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}
