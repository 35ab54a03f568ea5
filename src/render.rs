//! Turns an escape field into pixels.  Counts are normalized against
//! the field's iteration budget and pushed through a fixed-anchor
//! color gradient; the result is an 8-bit RGB buffer ready for the
//! PNG encoder.  The gradients are small piecewise-linear sketches of
//! the palettes the gallery scenes were designed around.

extern crate image;

use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use errors::Error;
use escape::EscapeField;
use image::png::PNGEncoder;
use image::ColorType;

/// The selectable color gradients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Colormap {
    /// Black to white.
    Gray,
    /// Near-black through purple and orange to pale yellow.
    Inferno,
    /// Dark violet through teal to bright yellow.
    Viridis,
    /// Black through red and yellow to white.
    Hot,
    /// Deep blue through white to deep red.
    Seismic,
}

/// Every selectable colormap name, for CLI help text and validators.
pub const COLORMAP_NAMES: &[&str] = &["gray", "inferno", "viridis", "hot", "seismic"];

const GRAY: &[[f64; 3]] = &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

const INFERNO: &[[f64; 3]] = &[
    [0.001, 0.000, 0.014],
    [0.258, 0.039, 0.406],
    [0.578, 0.148, 0.404],
    [0.865, 0.317, 0.226],
    [0.988, 0.645, 0.040],
    [0.988, 0.998, 0.645],
];

const VIRIDIS: &[[f64; 3]] = &[
    [0.267, 0.005, 0.329],
    [0.254, 0.265, 0.530],
    [0.164, 0.471, 0.558],
    [0.128, 0.567, 0.551],
    [0.267, 0.749, 0.441],
    [0.741, 0.873, 0.150],
    [0.993, 0.906, 0.144],
];

const HOT: &[[f64; 3]] = &[
    [0.0, 0.0, 0.0],
    [0.9, 0.0, 0.0],
    [1.0, 0.9, 0.0],
    [1.0, 1.0, 1.0],
];

const SEISMIC: &[[f64; 3]] = &[
    [0.0, 0.0, 0.3],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.5, 0.0, 0.0],
];

impl Colormap {
    fn anchors(self) -> &'static [[f64; 3]] {
        match self {
            Colormap::Gray => GRAY,
            Colormap::Inferno => INFERNO,
            Colormap::Viridis => VIRIDIS,
            Colormap::Hot => HOT,
            Colormap::Seismic => SEISMIC,
        }
    }

    /// Maps a normalized intensity in `[0, 1]` to an RGB color by
    /// linear interpolation between the gradient's anchors.  Input
    /// outside the unit interval is clamped.
    pub fn color(self, t: f64) -> [u8; 3] {
        let anchors = self.anchors();
        let t = if t.is_nan() {
            0.0
        } else if t < 0.0 {
            0.0
        } else if t > 1.0 {
            1.0
        } else {
            t
        };
        let spans = (anchors.len() - 1) as f64;
        let slot = (t * spans).floor().min(spans - 1.0);
        let frac = t * spans - slot;
        let lo = anchors[slot as usize];
        let hi = anchors[slot as usize + 1];
        let mut rgb = [0; 3];
        for k in 0..3 {
            let v = lo[k] + (hi[k] - lo[k]) * frac;
            rgb[k] = (v * 255.0).round() as u8;
        }
        rgb
    }
}

impl FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Colormap, Error> {
        match s {
            "gray" => Ok(Colormap::Gray),
            "inferno" => Ok(Colormap::Inferno),
            "viridis" => Ok(Colormap::Viridis),
            "hot" => Ok(Colormap::Hot),
            "seismic" => Ok(Colormap::Seismic),
            _ => Err(Error::InvalidParameters(format!(
                "unknown colormap {:?}, expected one of: {}",
                s,
                COLORMAP_NAMES.join(", ")
            ))),
        }
    }
}

/// Flattens an escape field into a row-major RGB buffer, three bytes
/// per cell.  Counts are normalized by the field's iteration budget,
/// the ceiling of the color scale; a zero-budget field shades to the
/// gradient's first color everywhere.
pub fn shade(field: &EscapeField, map: Colormap) -> Vec<u8> {
    let limit = field.limit();
    let mut rgb = Vec::with_capacity(field.counts().len() * 3);
    for &count in field.counts() {
        let t = if limit == 0 {
            0.0
        } else {
            count as f64 / limit as f64
        };
        rgb.extend_from_slice(&map.color(t));
    }
    rgb
}

/// Writes a shaded buffer as an 8-bit RGB PNG.
pub fn write_png(path: &Path, rgb: &[u8], density: usize) -> Result<(), io::Error> {
    let output = File::create(path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(rgb, density as u32, density as u32, ColorType::RGB(8))?;
    Ok(())
}
