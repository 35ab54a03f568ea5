//! Discretizes a rectangle on the complex plane into a square grid of
//! sample points.  The grid is the Cartesian (outer) sum of a
//! linearly-spaced imaginary vector and a linearly-spaced real vector:
//! every row shares one imaginary part, every column shares one real
//! part.  Sampling is pure and deterministic; the same region and
//! density always produce a bit-identical grid.

use errors::Error;
use itertools::iproduct;
use num::Complex;

/// A rectangle on the complex plane, described by its two extreme
/// corners.  `start` must be strictly below and to the left of `end`
/// on both axes; a zero or inverted extent is rejected at
/// construction so the sampler can never emit duplicate points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    start: Complex<f64>,
    end: Complex<f64>,
}

impl Region {
    /// Validates and builds a region from its corners.
    pub fn new(start: Complex<f64>, end: Complex<f64>) -> Result<Region, Error> {
        if !start.re.is_finite() || !start.im.is_finite() || !end.re.is_finite()
            || !end.im.is_finite()
        {
            return Err(Error::InvalidRegion(
                "the corners must be finite complex numbers".to_string(),
            ));
        }
        if start.re >= end.re {
            return Err(Error::InvalidRegion(format!(
                "no width: the start corner's real part ({}) is not below the end corner's ({})",
                start.re, end.re
            )));
        }
        if start.im >= end.im {
            return Err(Error::InvalidRegion(format!(
                "no height: the start corner's imaginary part ({}) is not below the end corner's ({})",
                start.im, end.im
            )));
        }
        Ok(Region { start, end })
    }

    /// Builds the square region a driver describes as a center point
    /// and a zoom scale: the view spans `1/scale` on either side of
    /// the center along both axes.
    pub fn from_view(center: Complex<f64>, scale: f64) -> Result<Region, Error> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidRegion(format!(
                "the view scale must be positive and finite, got {}",
                scale
            )));
        }
        let half = Complex::new(1.0 / scale, 1.0 / scale);
        Region::new(center - half, center + half)
    }

    /// The lower-left corner.
    pub fn start(&self) -> Complex<f64> {
        self.start
    }

    /// The upper-right corner.
    pub fn end(&self) -> Complex<f64> {
        self.end
    }
}

/// `count` evenly spaced values spanning `[start, end]`, both ends
/// included.  A single-sample spacing has no defined step, so it
/// degenerates to the midpoint of the span.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start + (end - start) / 2.0];
    }
    let step = (end - start) / ((count - 1) as f64);
    (0..count).map(|i| start + (i as f64) * step).collect()
}

/// A `density x density` matrix of complex sample points, stored
/// row-major.  Row `r` holds the `r`-th imaginary value across every
/// column; column `c` holds the `c`-th real value across every row.
/// Immutable once sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    density: usize,
    points: Vec<Complex<f64>>,
}

impl Grid {
    /// The number of samples along each axis.
    pub fn density(&self) -> usize {
        self.density
    }

    /// The total number of sample points, `density * density`.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A sampled grid always holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The sample at a row and column.
    pub fn point(&self, row: usize, col: usize) -> Complex<f64> {
        self.points[row * self.density + col]
    }

    /// The full row-major sample buffer.
    pub fn points(&self) -> &[Complex<f64>] {
        &self.points
    }
}

/// Samples a region into a `density x density` grid.  `density` must
/// be at least one.
pub fn sample(region: &Region, density: usize) -> Result<Grid, Error> {
    if density == 0 {
        return Err(Error::InvalidParameters(
            "the sampling density must be at least one".to_string(),
        ));
    }
    let re_vec = linspace(region.start.re, region.end.re, density);
    let im_vec = linspace(region.start.im, region.end.im, density);
    let points = iproduct!(im_vec, re_vec)
        .map(|(im, re)| Complex::new(re, im))
        .collect();
    Ok(Grid { density, points })
}
