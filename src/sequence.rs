// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders animated sequences.  Every frame is an independent
//! (region, budget) evaluation with no shared state, so the pool
//! hands frames to scoped worker threads through a locked queue and
//! reassembles the results by input index: completion order is
//! whatever it is, output order always matches the caller's frame
//! list.

extern crate crossbeam;
extern crate image;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crossbeam::thread::ScopedJoinHandle;
use errors::Error;
use escape::{evaluate, EscapeField, Params, Variant};
use image::gif::{Encoder, Frame};
use num::Complex;
use planes::{sample, Region};
use render::{shade, Colormap};

/// One frame's view of the plane: a center, a zoom scale, and the
/// iteration budget to spend on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameSpec {
    /// Center of the square view.
    pub center: Complex<f64>,
    /// Zoom scale; the view spans `1/scale` on either side.
    pub scale: f64,
    /// Iteration budget for this frame.
    pub iterations: usize,
}

/// Linearly interpolates a frame list between two endpoint specs,
/// endpoints included.  Center, scale, and budget all sweep together;
/// hold any of them constant by giving both endpoints the same value.
pub fn sweep(from: &FrameSpec, to: &FrameSpec, frames: usize) -> Vec<FrameSpec> {
    if frames == 0 {
        return vec![];
    }
    if frames == 1 {
        return vec![*from];
    }
    (0..frames)
        .map(|i| {
            let t = (i as f64) / ((frames - 1) as f64);
            FrameSpec {
                center: from.center + (to.center - from.center) * t,
                scale: from.scale + (to.scale - from.scale) * t,
                iterations: (from.iterations as f64
                    + (to.iterations as f64 - from.iterations as f64) * t)
                    .round() as usize,
            }
        })
        .collect()
}

fn render_one(
    variant: Variant,
    params: &Params,
    threshold: f64,
    density: usize,
    spec: &FrameSpec,
) -> Result<EscapeField, Error> {
    let region = Region::from_view(spec.center, spec.scale)?;
    let grid = sample(&region, density)?;
    evaluate(&grid, variant, params, spec.iterations, threshold)
}

/// Evaluates every frame of a sequence across a pool of worker
/// threads.  The returned fields line up one-to-one with `specs`; a
/// single invalid spec fails the whole sequence.
pub fn render_frames(
    variant: Variant,
    params: &Params,
    threshold: f64,
    density: usize,
    specs: &[FrameSpec],
    threads: usize,
) -> Result<Vec<EscapeField>, Error> {
    if threads == 0 {
        return Err(Error::InvalidParameters(
            "at least one worker thread is required".to_string(),
        ));
    }
    let queue = Arc::new(Mutex::new(specs.iter().enumerate()));
    let mut indexed: Vec<(usize, Result<EscapeField, Error>)> = vec![];
    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Vec<(usize, Result<EscapeField, Error>)>>> = (0
            ..threads)
            .map(|_| {
                let queue = queue.clone();
                spawner.spawn(move |_| {
                    let mut done = vec![];
                    loop {
                        let job = { queue.lock().unwrap().next() };
                        match job {
                            Some((index, spec)) => {
                                done.push((
                                    index,
                                    render_one(variant, params, threshold, density, spec),
                                ));
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    done
                })
            })
            .collect();

        indexed = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .flatten()
            .collect();
    })
    .unwrap();
    indexed.sort_by_key(|&(index, _)| index);
    indexed.into_iter().map(|(_, result)| result).collect()
}

/// Shades a rendered sequence and encodes it as an animated GIF.
/// `fps` is clamped to at least one frame per second.
pub fn write_gif(
    path: &Path,
    fields: &[EscapeField],
    map: Colormap,
    fps: u16,
) -> Result<(), io::Error> {
    let output = File::create(path)?;
    let mut encoder = Encoder::new(output);
    let delay = 100 / fps.max(1);
    for field in fields {
        let rgb = shade(field, map);
        let density = field.density() as u16;
        let mut frame = Frame::from_rgb(density, density, &rgb);
        frame.delay = delay;
        encoder
            .encode(&frame)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom_endpoints() -> (FrameSpec, FrameSpec) {
        (
            FrameSpec {
                center: Complex::new(-1.4, 0.0),
                scale: 0.5,
                iterations: 20,
            },
            FrameSpec {
                center: Complex::new(-1.45, 0.0),
                scale: 4.5,
                iterations: 40,
            },
        )
    }

    #[test]
    fn sweep_includes_both_endpoints() {
        let (from, to) = zoom_endpoints();
        let frames = sweep(&from, &to, 5);
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0], from);
        assert_eq!(frames[4], to);
    }

    #[test]
    fn sweep_interpolates_midpoints() {
        let (from, to) = zoom_endpoints();
        let frames = sweep(&from, &to, 5);
        assert_eq!(frames[2].scale, 2.5);
        assert_eq!(frames[2].iterations, 30);
        assert!((frames[2].center.re - -1.425).abs() < 1.0e-12);
        assert_eq!(frames[2].center.im, 0.0);
    }

    #[test]
    fn degenerate_sweeps() {
        let (from, to) = zoom_endpoints();
        assert!(sweep(&from, &to, 0).is_empty());
        assert_eq!(sweep(&from, &to, 1), vec![from]);
    }

    #[test]
    fn frames_come_back_in_input_order() {
        let (from, to) = zoom_endpoints();
        let specs = sweep(&from, &to, 7);
        let params = Params::default();
        let pooled =
            render_frames(Variant::Mandelbrot, &params, 2.0, 12, &specs, 4).unwrap();
        assert_eq!(pooled.len(), 7);
        for (spec, field) in specs.iter().zip(&pooled) {
            let serial =
                render_one(Variant::Mandelbrot, &params, 2.0, 12, spec).unwrap();
            assert_eq!(&serial, field);
        }
    }

    #[test]
    fn one_bad_frame_fails_the_sequence() {
        let (from, _) = zoom_endpoints();
        let specs = vec![
            from,
            FrameSpec {
                center: Complex::new(0.0, 0.0),
                scale: 0.0,
                iterations: 10,
            },
        ];
        assert!(
            render_frames(Variant::Mandelbrot, &Params::default(), 2.0, 8, &specs, 2)
                .is_err()
        );
    }

    #[test]
    fn pool_rejects_zero_workers() {
        let (from, to) = zoom_endpoints();
        let specs = sweep(&from, &to, 3);
        assert!(
            render_frames(Variant::Mandelbrot, &Params::default(), 2.0, 8, &specs, 0)
                .is_err()
        );
    }
}
