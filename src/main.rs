extern crate clap;
extern crate escapetime;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::{evaluate_threaded, sample, shade, write_png, Colormap, Params, Region, Variant};
use num::Complex;
use std::path::Path;
use std::str::FromStr;

/// Given a string and a separator, returns the two values separated
/// by the separator.
fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_variant(s: &str) -> Option<Variant> {
    match s {
        "mandelbrot" => Some(Variant::Mandelbrot),
        "julia" => Some(Variant::Julia),
        "ship" | "burning-ship" => Some(Variant::BurningShip),
        "ship-julia" | "burning-ship-julia" => Some(Variant::BurningShipJulia),
        _ => None,
    }
}

fn validate_complex(s: &str, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) => {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(err.to_string())
            }
        }
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const FRACTAL: &str = "fractal";
const CENTER: &str = "center";
const SCALE: &str = "scale";
const DENSITY: &str = "density";
const ITERATIONS: &str = "iterations";
const THRESHOLD: &str = "threshold";
const CONSTANT: &str = "constant";
const SEED: &str = "seed";
const COLORS: &str = "colors";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escapetime")
        .version("0.1.0")
        .about("Escape-time fractal field renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(FRACTAL)
                .required(false)
                .long(FRACTAL)
                .short("f")
                .takes_value(true)
                .default_value("mandelbrot")
                .validator(|s| match parse_variant(&s) {
                    Some(_) => Ok(()),
                    None => Err(
                        "Unknown fractal family; expected mandelbrot, julia, ship, or ship-julia"
                            .to_string(),
                    ),
                })
                .help("Fractal family: mandelbrot, julia, ship, or ship-julia"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("0,0")
                .validator(|s| validate_complex(&s, "Could not parse the view center"))
                .help("Center of the view as re,im"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .short("s")
                .takes_value(true)
                .default_value("0.5")
                .validator(|s| {
                    validate_positive_float(&s, "The view scale must be a positive number")
                })
                .help("Zoom scale; the view spans 1/scale on either side of the center"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .required(false)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .default_value("800")
                .validator(|s| {
                    validate_range(
                        &s,
                        1 as usize,
                        20_000,
                        "Could not parse the sampling density",
                        "The sampling density must be between 1 and 20000",
                    )
                })
                .help("Samples along each axis; the image is density x density"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        0 as usize,
                        1_000_000,
                        "Could not parse the iteration budget",
                        "The iteration budget must be between 0 and 1000000",
                    )
                })
                .help("Iteration budget per sample point"),
        )
        .arg(
            Arg::with_name(THRESHOLD)
                .required(false)
                .long(THRESHOLD)
                .short("r")
                .takes_value(true)
                .default_value("2.0")
                .validator(|s| {
                    validate_positive_float(&s, "The divergence threshold must be a positive number")
                })
                .help("Divergence radius; an orbit at or past it has escaped"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .required(false)
                .long(CONSTANT)
                .short("k")
                .takes_value(true)
                .default_value("-0.5251993,0.5251993")
                .validator(|s| validate_complex(&s, "Could not parse the Julia constant"))
                .help("Fixed constant for the julia and ship-julia families, as re,im"),
        )
        .arg(
            Arg::with_name(SEED)
                .required(false)
                .long(SEED)
                .short("z")
                .takes_value(true)
                .default_value("0,0")
                .validator(|s| validate_complex(&s, "Could not parse the orbit seed"))
                .help("Orbit seed for the mandelbrot and ship families, as re,im"),
        )
        .arg(
            Arg::with_name(COLORS)
                .required(false)
                .long(COLORS)
                .takes_value(true)
                .default_value("inferno")
                .validator(|s| match Colormap::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(e) => Err(format!("{}", e)),
                })
                .help("Colormap: gray, inferno, viridis, hot, or seismic"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse the thread count",
                        &format!("The thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads (default: all cores)"),
        )
        .get_matches()
}

fn main() {
    let matches = args();

    let variant =
        parse_variant(matches.value_of(FRACTAL).unwrap()).expect("Error parsing fractal family");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing view center");
    let scale = f64::from_str(matches.value_of(SCALE).unwrap()).expect("Error parsing view scale");
    let density =
        usize::from_str(matches.value_of(DENSITY).unwrap()).expect("Error parsing density");
    let iterations =
        usize::from_str(matches.value_of(ITERATIONS).unwrap()).expect("Error parsing iterations");
    let threshold =
        f64::from_str(matches.value_of(THRESHOLD).unwrap()).expect("Error parsing threshold");
    let constant =
        parse_complex(matches.value_of(CONSTANT).unwrap()).expect("Error parsing constant");
    let seed = parse_complex(matches.value_of(SEED).unwrap()).expect("Error parsing seed");
    let colors =
        Colormap::from_str(matches.value_of(COLORS).unwrap()).expect("Error parsing colormap");
    let threads = match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).expect("Error parsing thread count"),
        None => num_cpus::get(),
    };

    let params = Params {
        z0: seed,
        c: constant,
    };

    let region = match Region::from_view(center, scale) {
        Ok(region) => region,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let grid = match sample(&region, density) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let field = match evaluate_threaded(&grid, variant, &params, iterations, threshold, threads) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };

    let rgb = shade(&field, colors);
    if let Err(e) = write_png(Path::new(matches.value_of(OUTPUT).unwrap()), &rgb, density) {
        eprintln!("Could not write {}: {}", matches.value_of(OUTPUT).unwrap(), e);
        std::process::exit(1);
    }
}
