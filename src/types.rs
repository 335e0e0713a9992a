//! Core types used throughout the layout engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Number of lattice dimensions.
pub const DIMS: usize = 4;

/// Number of interleaved sub-lattices per node.
pub const SUBLATTICES: usize = 32;

/// Node identifier, `0..node_count`.
pub type NodeId = usize;

/// Storage offset of a site within its node, `0..sites_on_node`.
pub type LocalIndex = usize;

/// One of the four lattice directions, in storage order (x fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// First direction, varies fastest in node numbering.
    X,
    /// Second direction.
    Y,
    /// Third direction.
    Z,
    /// Fourth direction, varies slowest.
    T,
}

impl Direction {
    /// All directions in fixed x, y, z, t order.
    pub const ALL: [Direction; DIMS] = [Direction::X, Direction::Y, Direction::Z, Direction::T];

    /// Array position of this direction.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::X => write!(f, "x"),
            Direction::Y => write!(f, "y"),
            Direction::Z => write!(f, "z"),
            Direction::T => write!(f, "t"),
        }
    }
}

/// Global lattice extents `(nx, ny, nz, nt)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatticeShape([usize; DIMS]);

impl LatticeShape {
    /// Create a shape from the four extents.
    pub const fn new(nx: usize, ny: usize, nz: usize, nt: usize) -> Self {
        Self([nx, ny, nz, nt])
    }

    /// Create a shape from an extent array.
    pub const fn from_array(extents: [usize; DIMS]) -> Self {
        Self(extents)
    }

    /// Extents as an array.
    pub const fn as_array(&self) -> [usize; DIMS] {
        self.0
    }

    /// Extent along one direction.
    pub const fn extent(&self, dir: Direction) -> usize {
        self.0[dir.index()]
    }

    /// Total number of sites.
    pub fn volume(&self) -> usize {
        self.0.iter().product()
    }

    /// Check whether every component of `coord` lies inside the lattice.
    pub fn contains(&self, coord: GlobalCoordinate) -> bool {
        coord.0.iter().zip(self.0.iter()).all(|(&c, &n)| c < n)
    }

    /// Iterate every coordinate of the lattice, x fastest.
    pub fn coordinates(&self) -> impl Iterator<Item = GlobalCoordinate> {
        let [nx, ny, nz, nt] = self.0;
        (0..nt).flat_map(move |t| {
            (0..nz).flat_map(move |z| {
                (0..ny).flat_map(move |y| (0..nx).map(move |x| GlobalCoordinate::new(x, y, z, t)))
            })
        })
    }
}

impl Index<Direction> for LatticeShape {
    type Output = usize;

    fn index(&self, dir: Direction) -> &usize {
        &self.0[dir.index()]
    }
}

impl fmt::Display for LatticeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [nx, ny, nz, nt] = self.0;
        write!(f, "{nx}x{ny}x{nz}x{nt}")
    }
}

/// A lattice site `(x, y, z, t)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalCoordinate([usize; DIMS]);

impl GlobalCoordinate {
    /// The site at the lattice origin.
    pub const ORIGIN: GlobalCoordinate = GlobalCoordinate([0; DIMS]);

    /// Create a coordinate from its components.
    pub const fn new(x: usize, y: usize, z: usize, t: usize) -> Self {
        Self([x, y, z, t])
    }

    /// Create a coordinate from a component array.
    pub const fn from_array(components: [usize; DIMS]) -> Self {
        Self(components)
    }

    /// Components as an array.
    pub const fn as_array(&self) -> [usize; DIMS] {
        self.0
    }

    /// Component along one direction.
    pub const fn get(&self, dir: Direction) -> usize {
        self.0[dir.index()]
    }

    /// Sum of all components.
    pub fn component_sum(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Index<Direction> for GlobalCoordinate {
    type Output = usize;

    fn index(&self, dir: Direction) -> &usize {
        &self.0[dir.index()]
    }
}

impl From<[usize; DIMS]> for GlobalCoordinate {
    fn from(components: [usize; DIMS]) -> Self {
        Self(components)
    }
}

impl fmt::Display for GlobalCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, t] = self.0;
        write!(f, "({x}, {y}, {z}, {t})")
    }
}

/// Checkerboard class of a site.
///
/// Even sites occupy the first half of every node's storage, odd sites the
/// second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    /// Sites stored in `0..even_sites_on_node`.
    Even,
    /// Sites stored in `even_sites_on_node..sites_on_node`.
    Odd,
}

impl Parity {
    /// Both parities, even first.
    pub const ALL: [Parity; 2] = [Parity::Even, Parity::Odd];

    /// Parity of an integer.
    pub const fn of(value: usize) -> Self {
        if value % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// The other parity.
    pub const fn opposite(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}
