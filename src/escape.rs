// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! For every sample point in a grid, iterate the selected recurrence
//! until the orbit's magnitude crosses a divergence threshold or the
//! iteration budget runs out, and record how long the point stayed
//! inside.  The recorded count is the *last* iteration index at which
//! the orbit was still observed inside the radius: a point that
//! survives the whole budget ends at `iterations - 1`, and a point
//! already outside at the first observation keeps `0`.  Renderers key
//! their color bands off this exact convention, so it is preserved
//! as-is rather than shifted to a "first escaped" marker.
//!
//! Cells are completely independent of one another, which is what
//! makes the whole field trivially data-parallel: `evaluate_threaded`
//! hands contiguous bands of rows to scoped worker threads and
//! produces bit-identical output to the single-threaded path.

extern crate crossbeam;

use std::f64::MAX;

use errors::Error;
use num::Complex;
use planes::Grid;

/// The recurrence families the evaluator can iterate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// `z' = z^2 + point`, orbit seeded at a fixed `z0`.
    Mandelbrot,
    /// `z' = z^2 + c` for a fixed `c`, orbit seeded at the grid point.
    Julia,
    /// `z' = (|Re z| + i|Im z|)^2 + point`, orbit seeded at `z0`.
    BurningShip,
    /// `z' = (|Re z| + i|Im z|)^2 + c`, orbit seeded at the grid point.
    BurningShipJulia,
}

impl Variant {
    /// Where a cell's orbit starts.  Mandelbrot-style families share
    /// one seed across the whole grid and vary the additive term;
    /// Julia-style families are the other way around.
    fn seed(self, point: Complex<f64>, params: &Params) -> Complex<f64> {
        match self {
            Variant::Mandelbrot | Variant::BurningShip => params.z0,
            Variant::Julia | Variant::BurningShipJulia => point,
        }
    }

    /// Advances an alive orbit by one step.
    fn step(self, z: Complex<f64>, point: Complex<f64>, params: &Params) -> Complex<f64> {
        match self {
            Variant::Mandelbrot => z * z + point,
            Variant::Julia => z * z + params.c,
            Variant::BurningShip => {
                let f = fold(z);
                f * f + point
            }
            Variant::BurningShipJulia => {
                let f = fold(z);
                f * f + params.c
            }
        }
    }

    /// The threshold the iteration actually runs with.  The Julia
    /// family caps it at the smallest radius that still classifies
    /// every escaping point correctly; anything larger only burns
    /// iteration budget on orbits that are already gone.
    fn effective_threshold(self, threshold: f64, params: &Params) -> f64 {
        match self {
            Variant::Julia => threshold.min(julia_escape_radius(params.c)),
            _ => threshold,
        }
    }
}

/// Reflects an orbit point into the first quadrant, the "burning
/// ship" fold.
#[inline]
fn fold(z: Complex<f64>) -> Complex<f64> {
    Complex::new(z.re.abs(), z.im.abs())
}

/// The largest dynamically meaningful escape radius for a Julia orbit
/// with constant `c`.  Any `|z|` past this bound satisfies
/// `|z|^2 - |z| > |c|`, so the next step grows the magnitude no
/// matter what and the point is already classified; the small epsilon
/// keeps the boundary itself on the escaping side.
pub fn julia_escape_radius(c: Complex<f64>) -> f64 {
    (1.0 + (1.0 + 4.0 * c.norm()).sqrt()) / 2.0 + 0.01
}

/// The per-family orbit parameters.  Each family reads the field it
/// needs and ignores the other.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params {
    /// Shared orbit seed for the Mandelbrot-style families.
    pub z0: Complex<f64>,
    /// Fixed additive constant for the Julia-style families.
    pub c: Complex<f64>,
}

impl Params {
    /// Parameters for a Mandelbrot-style render seeded at `z0`.
    pub fn mandelbrot(z0: Complex<f64>) -> Params {
        Params {
            z0,
            c: Complex::new(0.0, 0.0),
        }
    }

    /// Parameters for a Julia-style render with constant `c`.
    pub fn julia(c: Complex<f64>) -> Params {
        Params {
            z0: Complex::new(0.0, 0.0),
            c,
        }
    }
}

impl Default for Params {
    fn default() -> Params {
        Params::mandelbrot(Complex::new(0.0, 0.0))
    }
}

/// The result of evaluating a grid: a `density x density` matrix of
/// escape iteration counts, plus the iteration budget it was computed
/// with.  The budget is the normalization ceiling a renderer should
/// map its color scale against.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeField {
    density: usize,
    limit: usize,
    counts: Vec<u32>,
}

impl EscapeField {
    /// The number of cells along each axis.
    pub fn density(&self) -> usize {
        self.density
    }

    /// The iteration budget the field was evaluated with.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The count at a row and column.
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.counts[row * self.density + col]
    }

    /// The full row-major count buffer.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }
}

fn check_threshold(threshold: f64) -> Result<(), Error> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::InvalidParameters(format!(
            "the divergence threshold must be positive and finite, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Runs a single cell's orbit to completion and returns the last
/// iteration index at which it was still inside the radius.  An orbit
/// that overflows the representable range is clamped to a huge real
/// value so it can never compare back inside the radius.
fn orbit_count(
    point: Complex<f64>,
    variant: Variant,
    params: &Params,
    iterations: usize,
    radius_sqr: f64,
) -> u32 {
    let mut z = variant.seed(point, params);
    let mut last_alive = 0;
    for i in 0..iterations {
        if !(z.norm_sqr() < radius_sqr) {
            break;
        }
        last_alive = i as u32;
        z = variant.step(z, point, params);
        if !z.re.is_finite() || !z.im.is_finite() {
            z = Complex::new(MAX, 0.0);
        }
    }
    last_alive
}

/// Evaluates every cell of a grid under the given recurrence family,
/// iteration budget, and divergence threshold.  Deterministic: the
/// same inputs always produce a bit-identical field.
pub fn evaluate(
    grid: &Grid,
    variant: Variant,
    params: &Params,
    iterations: usize,
    threshold: f64,
) -> Result<EscapeField, Error> {
    check_threshold(threshold)?;
    let radius = variant.effective_threshold(threshold, params);
    let radius_sqr = radius * radius;
    let counts = grid
        .points()
        .iter()
        .map(|&point| orbit_count(point, variant, params, iterations, radius_sqr))
        .collect();
    Ok(EscapeField {
        density: grid.density(),
        limit: iterations,
        counts,
    })
}

/// The data-parallel twin of [`evaluate`]: partitions the grid's rows
/// into contiguous bands, one scoped worker thread per band.  Output
/// is bit-identical to the single-threaded path.
pub fn evaluate_threaded(
    grid: &Grid,
    variant: Variant,
    params: &Params,
    iterations: usize,
    threshold: f64,
    threads: usize,
) -> Result<EscapeField, Error> {
    if threads == 0 {
        return Err(Error::InvalidParameters(
            "at least one worker thread is required".to_string(),
        ));
    }
    check_threshold(threshold)?;
    let radius = variant.effective_threshold(threshold, params);
    let radius_sqr = radius * radius;
    let density = grid.density();
    let mut counts = vec![0 as u32; grid.len()];
    {
        let rows_per_band = density / threads + 1;
        let bands: Vec<&mut [u32]> = counts.chunks_mut(rows_per_band * density).collect();
        crossbeam::scope(|spawner| {
            for (band_index, band) in bands.into_iter().enumerate() {
                let top = band_index * rows_per_band;
                spawner.spawn(move |_| {
                    for (offset, cell) in band.iter_mut().enumerate() {
                        let row = top + offset / density;
                        let col = offset % density;
                        *cell = orbit_count(
                            grid.point(row, col),
                            variant,
                            params,
                            iterations,
                            radius_sqr,
                        );
                    }
                });
            }
        })
        .unwrap();
    }
    Ok(EscapeField {
        density,
        limit: iterations,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use planes::{sample, Grid, Region};

    /// A one-cell grid whose single sample is exactly `center`.
    fn single_point(center: Complex<f64>) -> Grid {
        let half = Complex::new(1.0, 1.0);
        let region = Region::new(center - half, center + half).unwrap();
        sample(&region, 1).unwrap()
    }

    fn mandelbrot_window(density: usize) -> Grid {
        let region = Region::new(Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5)).unwrap();
        sample(&region, density).unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        // A tight window around the origin sampled at density one:
        // the single cell is exactly c = 0, which never leaves.
        let region = Region::new(Complex::new(-0.1, -0.1), Complex::new(0.1, 0.1)).unwrap();
        let grid = sample(&region, 1).unwrap();
        let field =
            evaluate(&grid, Variant::Mandelbrot, &Params::default(), 50, 2.0).unwrap();
        assert_eq!(field.count(0, 0), 49);
    }

    #[test]
    fn far_point_freezes_at_zero() {
        let grid = single_point(Complex::new(3.0, 0.0));
        let field =
            evaluate(&grid, Variant::Mandelbrot, &Params::default(), 50, 2.0).unwrap();
        assert_eq!(field.count(0, 0), 0);
    }

    #[test]
    fn zero_budget_yields_all_zeroes() {
        let grid = mandelbrot_window(8);
        let field =
            evaluate(&grid, Variant::Mandelbrot, &Params::default(), 0, 2.0).unwrap();
        assert!(field.counts().iter().all(|&n| n == 0));
        assert_eq!(field.limit(), 0);
    }

    #[test]
    fn counts_stay_below_the_budget() {
        let grid = mandelbrot_window(16);
        let field =
            evaluate(&grid, Variant::Mandelbrot, &Params::default(), 30, 2.0).unwrap();
        assert_eq!(field.density(), 16);
        assert_eq!(field.counts().len(), 256);
        assert!(field.counts().iter().all(|&n| n <= 29));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let grid = mandelbrot_window(24);
        let params = Params::default();
        let first = evaluate(&grid, Variant::Mandelbrot, &params, 40, 2.0).unwrap();
        let second = evaluate(&grid, Variant::Mandelbrot, &params, 40, 2.0).unwrap();
        assert_eq!(first, second);
    }

    /// A truncated budget must agree with the corresponding prefix of
    /// a longer run: cells frozen inside the short budget never move
    /// again, and no cell's count can shrink as the budget grows.
    #[test]
    fn truncated_budget_matches_the_full_run_prefix() {
        let grid = mandelbrot_window(24);
        let params = Params::default();
        let short = evaluate(&grid, Variant::Mandelbrot, &params, 20, 2.0).unwrap();
        let full = evaluate(&grid, Variant::Mandelbrot, &params, 60, 2.0).unwrap();
        for (s, f) in short.counts().iter().zip(full.counts()) {
            assert!(f >= s);
            if *s < 19 {
                assert_eq!(f, s);
            }
        }
    }

    #[test]
    fn mandelbrot_and_burning_ship_disagree_off_the_real_axis() {
        // Hand-checked orbits for the cell at -1 + 0.5i, threshold 2:
        // the square loses the sign of the cross term once folded, so
        // the ship orbit leaves two observations earlier.
        let grid = single_point(Complex::new(-1.0, 0.5));
        let params = Params::default();
        let plain = evaluate(&grid, Variant::Mandelbrot, &params, 50, 2.0).unwrap();
        let ship = evaluate(&grid, Variant::BurningShip, &params, 50, 2.0).unwrap();
        assert_eq!(plain.count(0, 0), 4);
        assert_eq!(ship.count(0, 0), 2);
    }

    #[test]
    fn julia_families_seed_from_the_grid_point() {
        let params = Params::julia(Complex::new(-1.0, 0.5));
        let grid = single_point(Complex::new(-1.0, 0.5));
        let julia = evaluate(&grid, Variant::Julia, &params, 50, 2.0).unwrap();
        let ship = evaluate(&grid, Variant::BurningShipJulia, &params, 50, 2.0).unwrap();
        // One observation behind the Mandelbrot orbit above: the seed
        // starts where that orbit's first step landed.
        assert_eq!(julia.count(0, 0), 3);
        assert_eq!(ship.count(0, 0), 1);
    }

    #[test]
    fn attracting_julia_orbit_survives_the_budget() {
        // c = 0.2 has an attracting real fixed point, so the orbit
        // from the origin converges and never leaves the radius.
        let params = Params::julia(Complex::new(0.2, 0.0));
        let grid = single_point(Complex::new(0.0, 0.0));
        let field = evaluate(&grid, Variant::Julia, &params, 75, 2.0).unwrap();
        assert_eq!(field.count(0, 0), 74);
    }

    #[test]
    fn julia_radius_clamp_caps_wasteful_thresholds() {
        let c = Complex::new(2.0, 2.0);
        let radius = julia_escape_radius(c);
        assert!(radius < 2.27, "radius {} out of range", radius);
        assert!(radius > 2.25, "radius {} out of range", radius);

        // A huge caller threshold and the clamp itself must classify
        // the field identically.
        let params = Params::julia(c);
        let grid = mandelbrot_window(16);
        let wasteful = evaluate(&grid, Variant::Julia, &params, 40, 100.0).unwrap();
        let clamped = evaluate(&grid, Variant::Julia, &params, 40, radius).unwrap();
        assert_eq!(wasteful, clamped);
    }

    #[test]
    fn clamp_leaves_the_other_families_alone() {
        let params = Params::julia(Complex::new(2.0, 2.0));
        assert_eq!(
            Variant::BurningShipJulia.effective_threshold(100.0, &params),
            100.0
        );
        assert_eq!(Variant::Mandelbrot.effective_threshold(100.0, &params), 100.0);
    }

    /// The Mandelbrot set is symmetric about the real axis, so a
    /// region symmetric about `Im = 0` sampled at an odd density must
    /// mirror across its horizontal centerline.  The corner values
    /// are chosen to be exactly representable so the mirrored rows
    /// are bit-identical, not merely close.
    #[test]
    fn mandelbrot_mirrors_across_the_real_axis() {
        let region = Region::new(Complex::new(-2.0, -1.0), Complex::new(1.0, 1.0)).unwrap();
        let grid = sample(&region, 9).unwrap();
        let field =
            evaluate(&grid, Variant::Mandelbrot, &Params::default(), 40, 2.0).unwrap();
        for row in 0..9 {
            for col in 0..9 {
                assert_eq!(field.count(row, col), field.count(8 - row, col));
            }
        }
    }

    #[test]
    fn threaded_output_is_bit_identical() {
        let grid = mandelbrot_window(23);
        let params = Params::default();
        let single = evaluate(&grid, Variant::Mandelbrot, &params, 35, 2.0).unwrap();
        for threads in &[1, 3, 4, 31] {
            let banded = evaluate_threaded(
                &grid,
                Variant::Mandelbrot,
                &params,
                35,
                2.0,
                *threads,
            )
            .unwrap();
            assert_eq!(single, banded);
        }
    }

    #[test]
    fn rejects_useless_thresholds() {
        let grid = mandelbrot_window(4);
        let params = Params::default();
        assert!(evaluate(&grid, Variant::Mandelbrot, &params, 10, 0.0).is_err());
        assert!(evaluate(&grid, Variant::Mandelbrot, &params, 10, -2.0).is_err());
        assert!(
            evaluate(&grid, Variant::Mandelbrot, &params, 10, ::std::f64::NAN).is_err()
        );
    }

    #[test]
    fn threaded_rejects_zero_workers() {
        let grid = mandelbrot_window(4);
        assert!(
            evaluate_threaded(&grid, Variant::Mandelbrot, &Params::default(), 10, 2.0, 0)
                .is_err()
        );
    }

    /// An orbit observed alive once, then stepped straight past the
    /// representable range: the overflow clamps, the cell freezes at
    /// its first observation, and no NaN leaks back into the alive
    /// set no matter how large the remaining budget is.
    #[test]
    fn overflowing_orbits_saturate_and_stay_dead() {
        // The single grid point sits near the top of the f64 range,
        // so the first step drives the orbit past it.
        let region =
            Region::new(Complex::new(1.0e308, -1.0), Complex::new(1.7e308, 1.0)).unwrap();
        let grid = sample(&region, 1).unwrap();
        let params = Params::mandelbrot(Complex::new(1.0e154, 0.0));
        let short = evaluate(&grid, Variant::Mandelbrot, &params, 2, 1.0e300).unwrap();
        let long = evaluate(&grid, Variant::Mandelbrot, &params, 500, 1.0e300).unwrap();
        assert_eq!(short.count(0, 0), 0);
        assert_eq!(long.count(0, 0), 0);
    }
}
