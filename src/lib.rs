#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal fields
//!
//! An escape-time fractal assigns every point of the complex plane a
//! "velocity": seed an orbit, iterate a simple recurrence, and count
//! how long the orbit stays inside a divergence radius.  Points whose
//! orbits never leave form the familiar black interior; everything
//! else is colored by how quickly it ran away.
//!
//! This crate computes those fields.  The [`planes`] module
//! discretizes a rectangle of the plane into a square grid of sample
//! points, and the [`escape`] module iterates one of four recurrence
//! families over the grid (Mandelbrot, Julia, and the "burning ship"
//! renditions of both), producing a matrix of escape iteration
//! counts.  That matrix is the whole product; everything downstream
//! of it is presentation.  The [`render`] module maps counts through
//! a color gradient and writes PNGs, and the [`sequence`] module
//! fans independent frames out across worker threads and assembles
//! animated GIF zooms.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod errors;
pub mod escape;
pub mod planes;
pub mod render;
pub mod sequence;

pub use errors::Error;
pub use escape::{evaluate, evaluate_threaded, julia_escape_radius, EscapeField, Params, Variant};
pub use planes::{sample, Grid, Region};
pub use render::{shade, write_png, Colormap, COLORMAP_NAMES};
pub use sequence::{render_frames, sweep, write_gif, FrameSpec};
