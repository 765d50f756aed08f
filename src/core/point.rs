//! # Point
//!
//! A fixed-dimension vector of `f64` coordinates. Coordinates are addressed
//! 1-indexed (`1..=d`) through the public accessors. Dimensionality never
//! changes after construction, and every binary operation requires both
//! operands to agree on it.

use crate::distances::euclidean;
use crate::error::{ClusteringError, Result};
use ndarray::{Array1, ArrayView1, Zip};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, DivAssign, Mul, MulAssign, Sub};
use std::str::FromStr;

/// A point in `d`-dimensional space
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    coords: Array1<f64>,
}

impl Point {
    /// Create a zero-filled point of the given dimensionality.
    ///
    /// A zero-dimensional point is a valid value but no [`Cluster`] will take
    /// ownership of it.
    ///
    /// [`Cluster`]: crate::clustering::Cluster
    pub fn new(dims: usize) -> Self {
        Self {
            coords: Array1::zeros(dims),
        }
    }

    /// Create a point from its coordinates
    pub fn from_vec(coords: Vec<f64>) -> Self {
        Self {
            coords: Array1::from_vec(coords),
        }
    }

    /// The sentinel point with every coordinate at `f64::MAX`.
    ///
    /// Empty clusters use it as their centroid so they sort after every
    /// real point and sit at maximal distance from all of them.
    pub fn max_value(dims: usize) -> Self {
        Self {
            coords: Array1::from_elem(dims, f64::MAX),
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.coords.len()
    }

    /// Coordinate `index` in `1..=d`
    pub fn get(&self, index: usize) -> Result<f64> {
        self.offset(index).map(|i| self.coords[i])
    }

    /// Overwrite coordinate `index` in `1..=d`
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let i = self.offset(index)?;
        self.coords[i] = value;
        Ok(())
    }

    fn offset(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.dimensionality() {
            return Err(ClusteringError::IndexOutOfRange {
                index,
                len: self.dimensionality(),
            });
        }
        Ok(index - 1)
    }

    pub fn as_slice(&self) -> &[f64] {
        // An owned 1-d array built by this type is always contiguous.
        self.coords.as_slice().unwrap_or(&[])
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.coords.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.coords.to_vec()
    }

    /// Euclidean distance to `other`
    pub fn distance_to(&self, other: &Point) -> Result<f64> {
        euclidean(&self.view(), &other.view())
    }

    /// Lexicographic comparison that reports mismatched dimensionality.
    ///
    /// NaN coordinates compare as equal to each other so that the result is
    /// always defined for matching dimensionality.
    pub fn compare(&self, other: &Point) -> Result<Ordering> {
        self.check_dims(other)?;
        for (a, b) in self.coords.iter().zip(other.coords.iter()) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) | None => continue,
                Some(ordering) => return Ok(ordering),
            }
        }
        Ok(Ordering::Equal)
    }

    /// `self += other`, returning `self` for chaining
    pub fn add_assign_point(&mut self, other: &Point) -> Result<&mut Self> {
        self.check_dims(other)?;
        self.coords += &other.coords;
        Ok(self)
    }

    /// `self -= other`, returning `self` for chaining
    pub fn sub_assign_point(&mut self, other: &Point) -> Result<&mut Self> {
        self.check_dims(other)?;
        self.coords -= &other.coords;
        Ok(self)
    }

    /// Parse the textual form and require exactly `dims` coordinates
    pub fn parse_with_dims(s: &str, dims: usize) -> Result<Self> {
        let point: Point = s.parse()?;
        if point.dimensionality() != dims {
            return Err(ClusteringError::DimensionMismatch {
                expected: dims,
                actual: point.dimensionality(),
            });
        }
        Ok(point)
    }

    pub(crate) fn check_dims(&self, other: &Point) -> Result<()> {
        if self.dimensionality() != other.dimensionality() {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.dimensionality(),
                actual: other.dimensionality(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Point, op: impl Fn(f64, f64) -> f64) -> Result<Point> {
        self.check_dims(other)?;
        let coords = Zip::from(&self.coords)
            .and(&other.coords)
            .map_collect(|&a, &b| op(a, b));
        Ok(Point { coords })
    }
}

impl PartialOrd for Point {
    /// Lexicographic over the coordinates; `None` when dimensionality differs
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.dimensionality() != other.dimensionality() {
            return None;
        }
        for (a, b) in self.coords.iter().zip(other.coords.iter()) {
            match a.partial_cmp(b)? {
                Ordering::Equal => continue,
                ordering => return Some(ordering),
            }
        }
        Some(Ordering::Equal)
    }
}

impl Add<&Point> for &Point {
    type Output = Result<Point>;

    fn add(self, rhs: &Point) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub<&Point> for &Point {
    type Output = Result<Point>;

    fn sub(self, rhs: &Point) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for &Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point {
            coords: &self.coords * rhs,
        }
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(mut self, rhs: f64) -> Point {
        self *= rhs;
        self
    }
}

impl Div<f64> for &Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point {
            coords: &self.coords / rhs,
        }
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(mut self, rhs: f64) -> Point {
        self /= rhs;
        self
    }
}

impl MulAssign<f64> for Point {
    fn mul_assign(&mut self, rhs: f64) {
        self.coords.mapv_inplace(|x| x * rhs);
    }
}

impl DivAssign<f64> for Point {
    fn div_assign(&mut self, rhs: f64) {
        self.coords.mapv_inplace(|x| x / rhs);
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::from_vec(coords)
    }
}

impl From<Array1<f64>> for Point {
    fn from(coords: Array1<f64>) -> Self {
        Self { coords }
    }
}

impl fmt::Display for Point {
    /// Writes `x1, x2, ..., xd`. Without an explicit precision every
    /// coordinate uses the shortest representation that parses back exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match f.precision() {
                Some(precision) => write!(f, "{:.*}", precision, value)?,
                None => write!(f, "{}", value)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Point {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self> {
        let coords = s
            .split(',')
            .map(|field| field.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Point::from_vec(coords))
    }
}
