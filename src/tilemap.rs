//! Bounded 2D grid plus the fixed 8-neighbour ordering used across the crate.
//!
//! Unlike a wrapping map, cells past the grid edge simply do not exist:
//! neighbour lookups return `None` there, which is the "no tile" sentinel.

use std::ops::{Index, IndexMut};

use rayon::prelude::*;

use crate::heightmap::{Corner, Side};

/// Neighbour directions in their fixed order: the four sides, then the four
/// diagonals clockwise from top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
        Direction::TopLeft,
        Direction::TopRight,
        Direction::BottomRight,
        Direction::BottomLeft,
    ];

    /// Grid offset; y grows downward.
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, -1),
            Direction::TopRight => (1, -1),
            Direction::BottomRight => (1, 1),
            Direction::BottomLeft => (-1, 1),
        }
    }

    /// Position in [`Direction::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_side(side: Side) -> Self {
        match side {
            Side::Top => Direction::Top,
            Side::Right => Direction::Right,
            Side::Bottom => Direction::Bottom,
            Side::Left => Direction::Left,
        }
    }

    pub fn from_corner(corner: Corner) -> Self {
        match corner {
            Corner::TopLeft => Direction::TopLeft,
            Corner::TopRight => Direction::TopRight,
            Corner::BottomRight => Direction::BottomRight,
            Corner::BottomLeft => Direction::BottomLeft,
        }
    }
}

/// One value per neighbour direction, indexable by [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbors<T>(pub [T; 8]);

impl<T> Neighbors<T> {
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Neighbors(Direction::ALL.map(|d| f(d)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Neighbors<U> {
        Neighbors::from_fn(|d| f(&self[d]))
    }
}

impl<T> Index<Direction> for Neighbors<T> {
    type Output = T;

    fn index(&self, dir: Direction) -> &T {
        &self.0[dir.index()]
    }
}

impl<T> IndexMut<Direction> for Neighbors<T> {
    fn index_mut(&mut self, dir: Direction) -> &mut T {
        &mut self.0[dir.index()]
    }
}

/// A bounded 2D grid, row-major.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build each cell from its coordinates.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(&self.data[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = value;
        }
    }

    /// Coordinates one step from `(x, y)` in `dir`, if still on the grid.
    pub fn step(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    /// All eight neighbour coordinates in fixed order; `None` past the edge.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Neighbors<Option<(usize, usize)>> {
        Neighbors::from_fn(|dir| self.step(x, y, dir))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Send> Tilemap<T> {
    /// Parallel mutable iteration with coordinates.
    pub fn par_iter_mut(&mut self) -> impl ParallelIterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.par_iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_fixed_order() {
        let map: Tilemap<u8> = Tilemap::new(3, 3);
        let n = map.neighbors_8(1, 1);
        assert_eq!(n[Direction::Top], Some((1, 0)));
        assert_eq!(n[Direction::Right], Some((2, 1)));
        assert_eq!(n[Direction::Bottom], Some((1, 2)));
        assert_eq!(n[Direction::Left], Some((0, 1)));
        assert_eq!(n[Direction::TopLeft], Some((0, 0)));
        assert_eq!(n[Direction::TopRight], Some((2, 0)));
        assert_eq!(n[Direction::BottomRight], Some((2, 2)));
        assert_eq!(n[Direction::BottomLeft], Some((0, 2)));
        assert_eq!(n.0[0], Some((1, 0)));
        assert_eq!(n.0[7], Some((0, 2)));
    }

    #[test]
    fn test_corner_cell_has_three_neighbors() {
        let map: Tilemap<u8> = Tilemap::new(5, 5);
        let n = map.neighbors_8(0, 0);
        let present: Vec<Direction> = n.iter().filter(|(_, c)| c.is_some()).map(|(d, _)| d).collect();
        assert_eq!(present, vec![Direction::Right, Direction::Bottom, Direction::BottomRight]);
    }

    #[test]
    fn test_no_wrapping() {
        let map: Tilemap<u8> = Tilemap::new(4, 2);
        assert_eq!(map.step(3, 0, Direction::Right), None);
        assert_eq!(map.step(0, 1, Direction::Left), None);
        assert!(map.get(4, 0).is_none());
    }

    #[test]
    fn test_from_fn_row_major() {
        let map = Tilemap::from_fn(3, 2, |x, y| x + 10 * y);
        assert_eq!(map.get(2, 1), Some(&12));
        let cells: Vec<usize> = map.iter().map(|(_, _, v)| *v).collect();
        assert_eq!(cells, vec![0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_par_iter_mut_sees_coordinates() {
        let mut map: Tilemap<usize> = Tilemap::new(8, 8);
        map.par_iter_mut().for_each(|(x, y, v)| *v = x * y);
        assert_eq!(map.get(7, 5), Some(&35));
    }

    #[test]
    fn test_direction_conversions() {
        assert_eq!(Direction::from_side(Side::Left), Direction::Left);
        assert_eq!(Direction::from_corner(Corner::BottomRight), Direction::BottomRight);
        for (i, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }
}
