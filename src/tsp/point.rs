//! Points, the Euclidean distance matrix and weighted edges.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A location in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An undirected weighted edge `(u, v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub weight: f64,
    pub u: usize,
    pub v: usize,
}

/// Symmetric matrix of Euclidean distances, stored row-major.
///
/// # Examples
///
/// ```
/// use u_tsp::tsp::{DistanceMatrix, Point};
///
/// let points = [Point::new(0, 0.0, 0.0), Point::new(1, 3.0, 4.0)];
/// let dm = DistanceMatrix::from_points(&points);
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.cycle_cost(&[0, 1]), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                let d = a.distance_to(b);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Length of the closed loop visiting `cycle` in order, including the
    /// edge from the last point back to the first.
    pub fn cycle_cost(&self, cycle: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (cycle.first(), cycle.last()) else {
            return 0.0;
        };
        cycle.windows(2).map(|w| self.get(w[0], w[1])).sum::<f64>() + self.get(last, first)
    }

    /// Every edge `(i, j)` with `i < j`, in row-major order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.n * self.n.saturating_sub(1) / 2);
        for u in 0..self.n {
            for v in u + 1..self.n {
                edges.push(Edge {
                    weight: self.get(u, v),
                    u,
                    v,
                });
            }
        }
        edges
    }
}
