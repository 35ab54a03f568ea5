//! The curated gallery: the stills and zoom animations the project
//! was built to produce, each reachable by name.

extern crate clap;
extern crate escapetime;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::{evaluate_threaded, render_frames, sample, shade, sweep, write_gif, write_png,
                 Colormap, FrameSpec, Params, Region, Variant};
use num::Complex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

struct Still {
    name: &'static str,
    variant: Variant,
    center: (f64, f64),
    scale: f64,
    iterations: usize,
    constant: (f64, f64),
    density: usize,
    colors: Colormap,
}

struct Zoom {
    name: &'static str,
    variant: Variant,
    constant: (f64, f64),
    center_from: (f64, f64),
    center_to: (f64, f64),
    scale_from: f64,
    scale_to: f64,
    iters_from: usize,
    iters_to: usize,
    frames: usize,
    fps: u16,
    density: usize,
    colors: Colormap,
}

const THRESHOLD: f64 = 2.0;

const STILLS: &[Still] = &[
    Still {
        name: "mandelbrot-main",
        variant: Variant::Mandelbrot,
        center: (0.0, 0.0),
        scale: 1.0 / 1.98,
        iterations: 100,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Inferno,
    },
    Still {
        name: "mandelbrot-seahorse",
        variant: Variant::Mandelbrot,
        center: (-0.7451968299999999, 0.10186988500000009),
        scale: 1.0 / 0.005904900000000002,
        iterations: 500,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Inferno,
    },
    Still {
        name: "mandelbrot-wormhole",
        variant: Variant::Mandelbrot,
        center: (-1.7397156556930304, -9.157504622931403e-8),
        scale: 1.0 / 5.205901380161776e-11,
        iterations: 1500,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Inferno,
    },
    Still {
        name: "mandelbrot-carousel",
        variant: Variant::Mandelbrot,
        center: (0.35787121400640803, -0.10813970113434704),
        scale: 1.0 / 9.68059489050412e-9,
        iterations: 1500,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Inferno,
    },
    Still {
        name: "julia-classic",
        variant: Variant::Julia,
        center: (0.0, 0.0),
        scale: 0.5,
        iterations: 100,
        constant: (-0.5251993, 0.5251993),
        density: 2000,
        colors: Colormap::Viridis,
    },
    Still {
        name: "julia-spirals",
        variant: Variant::Julia,
        center: (0.0, 0.0),
        scale: 0.75,
        iterations: 500,
        constant: (0.355, 0.355),
        density: 2000,
        colors: Colormap::Viridis,
    },
    Still {
        name: "julia-spirals-zoomed",
        variant: Variant::Julia,
        center: (-0.021, 0.496),
        scale: 100.0,
        iterations: 350,
        constant: (0.355, 0.355),
        density: 2000,
        colors: Colormap::Viridis,
    },
    Still {
        name: "julia-squid",
        variant: Variant::Julia,
        center: (0.0, 0.0),
        scale: 0.8,
        iterations: 150,
        constant: (0.34, -0.05),
        density: 2000,
        colors: Colormap::Viridis,
    },
    Still {
        name: "ship-large",
        variant: Variant::BurningShip,
        center: (0.0, 0.0),
        scale: 0.5,
        iterations: 100,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Hot,
    },
    Still {
        name: "ship-ship",
        variant: Variant::BurningShip,
        center: (-1.762, -0.028),
        scale: 20.0,
        iterations: 100,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Hot,
    },
    Still {
        name: "ship-zoomed",
        variant: Variant::BurningShip,
        center: (-1.764, -0.028),
        scale: 250_000.0,
        iterations: 250,
        constant: (0.0, 0.0),
        density: 2000,
        colors: Colormap::Hot,
    },
    Still {
        name: "ship-julia-large",
        variant: Variant::BurningShipJulia,
        center: (0.0, 0.0),
        scale: 0.5,
        iterations: 100,
        constant: (-1.762, -0.028),
        density: 2000,
        colors: Colormap::Seismic,
    },
    Still {
        name: "ship-julia-x4",
        variant: Variant::BurningShipJulia,
        center: (0.0, 0.0),
        scale: 4.0,
        iterations: 100,
        constant: (-1.762, -0.028),
        density: 2000,
        colors: Colormap::Seismic,
    },
    Still {
        name: "ship-julia-x100000",
        variant: Variant::BurningShipJulia,
        center: (-0.1, 0.05),
        scale: 100_000.0,
        iterations: 250,
        constant: (-1.762, -0.028),
        density: 2000,
        colors: Colormap::Seismic,
    },
];

const ZOOMS: &[Zoom] = &[
    Zoom {
        name: "mandelbrot-zoom",
        variant: Variant::Mandelbrot,
        constant: (0.0, 0.0),
        center_from: (-1.4, 0.0),
        center_to: (-1.45, 0.0),
        scale_from: 0.5,
        scale_to: 400.0,
        iters_from: 100,
        iters_to: 100,
        frames: 240,
        fps: 24,
        density: 400,
        colors: Colormap::Inferno,
    },
    Zoom {
        name: "mandelbrot-budget",
        variant: Variant::Mandelbrot,
        constant: (0.0, 0.0),
        center_from: (0.0, 0.0),
        center_to: (0.0, 0.0),
        scale_from: 1.0 / 1.98,
        scale_to: 1.0 / 1.98,
        iters_from: 0,
        iters_to: 100,
        frames: 240,
        fps: 24,
        density: 400,
        colors: Colormap::Inferno,
    },
    Zoom {
        name: "julia-zoom",
        variant: Variant::Julia,
        constant: (-0.5251993, 0.5251993),
        center_from: (0.0, 0.0),
        center_to: (0.275, 0.26),
        scale_from: 1.0,
        scale_to: 50.0,
        iters_from: 100,
        iters_to: 100,
        frames: 240,
        fps: 24,
        density: 400,
        colors: Colormap::Viridis,
    },
    Zoom {
        name: "ship-zoom",
        variant: Variant::BurningShip,
        constant: (0.0, 0.0),
        center_from: (-1.762, -0.028),
        center_to: (-1.762, -0.028),
        scale_from: 300.0,
        scale_to: 15.0,
        iters_from: 100,
        iters_to: 100,
        frames: 240,
        fps: 24,
        density: 400,
        colors: Colormap::Hot,
    },
    Zoom {
        name: "ship-julia-zoom",
        variant: Variant::BurningShipJulia,
        constant: (-1.762, -0.028),
        center_from: (0.0, 0.0),
        center_to: (0.0, 0.0),
        scale_from: 0.5,
        scale_to: 40.0,
        iters_from: 250,
        iters_to: 250,
        frames: 240,
        fps: 24,
        density: 400,
        colors: Colormap::Seismic,
    },
];

const SCENE: &str = "scene";
const LIST: &str = "list";
const ALL: &str = "all";
const OUTDIR: &str = "outdir";
const DENSITY: &str = "density";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("scenes")
        .version("0.1.0")
        .about("Renders the curated escape-time gallery")
        .arg(
            Arg::with_name(SCENE)
                .required(false)
                .long(SCENE)
                .short("s")
                .takes_value(true)
                .help("Render a single scene by name"),
        )
        .arg(
            Arg::with_name(LIST)
                .required(false)
                .long(LIST)
                .short("l")
                .help("List the available scenes and exit"),
        )
        .arg(
            Arg::with_name(ALL)
                .required(false)
                .long(ALL)
                .short("a")
                .help("Render every scene in the gallery"),
        )
        .arg(
            Arg::with_name(OUTDIR)
                .required(false)
                .long(OUTDIR)
                .short("o")
                .takes_value(true)
                .default_value("output")
                .help("Directory the rendered files are written into"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .required(false)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .validator(|s| match usize::from_str(&s) {
                    Ok(d) => {
                        if d >= 1 && d <= 20_000 {
                            Ok(())
                        } else {
                            Err("The sampling density must be between 1 and 20000".to_string())
                        }
                    }
                    Err(_) => Err("Could not parse the sampling density".to_string()),
                })
                .help("Override each scene's own sampling density"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| match usize::from_str(&s) {
                    Ok(t) => {
                        if t >= 1 && t <= max_threads {
                            Ok(())
                        } else {
                            Err(format!(
                                "The thread count must be between 1 and {}",
                                max_threads
                            ))
                        }
                    }
                    Err(_) => Err("Could not parse the thread count".to_string()),
                })
                .help("Number of worker threads (default: all cores)"),
        )
        .get_matches()
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn run_still(still: &Still, outdir: &Path, density: Option<usize>, threads: usize) {
    let density = density.unwrap_or(still.density);
    let path = outdir.join(format!("{}.png", still.name));
    println!("Rendering {}...", still.name);

    let center = Complex::new(still.center.0, still.center.1);
    let params = Params {
        z0: Complex::new(0.0, 0.0),
        c: Complex::new(still.constant.0, still.constant.1),
    };
    let region = match Region::from_view(center, still.scale) {
        Ok(region) => region,
        Err(e) => fail(&format!("Render failure: {}", e)),
    };
    let grid = match sample(&region, density) {
        Ok(grid) => grid,
        Err(e) => fail(&format!("Render failure: {}", e)),
    };
    let field = match evaluate_threaded(
        &grid,
        still.variant,
        &params,
        still.iterations,
        THRESHOLD,
        threads,
    ) {
        Ok(field) => field,
        Err(e) => fail(&format!("Render failure: {}", e)),
    };

    let rgb = shade(&field, still.colors);
    match write_png(&path, &rgb, density) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => fail(&format!("Could not write {}: {}", path.display(), e)),
    }
}

fn run_zoom(zoom: &Zoom, outdir: &Path, density: Option<usize>, threads: usize) {
    let density = density.unwrap_or(zoom.density);
    let path = outdir.join(format!("{}.gif", zoom.name));
    println!("Rendering {} ({} frames)...", zoom.name, zoom.frames);

    let params = Params {
        z0: Complex::new(0.0, 0.0),
        c: Complex::new(zoom.constant.0, zoom.constant.1),
    };
    let from = FrameSpec {
        center: Complex::new(zoom.center_from.0, zoom.center_from.1),
        scale: zoom.scale_from,
        iterations: zoom.iters_from,
    };
    let to = FrameSpec {
        center: Complex::new(zoom.center_to.0, zoom.center_to.1),
        scale: zoom.scale_to,
        iterations: zoom.iters_to,
    };
    let specs = sweep(&from, &to, zoom.frames);

    let fields = match render_frames(zoom.variant, &params, THRESHOLD, density, &specs, threads) {
        Ok(fields) => fields,
        Err(e) => fail(&format!("Render failure: {}", e)),
    };
    match write_gif(&path, &fields, zoom.colors, zoom.fps) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => fail(&format!("Could not write {}: {}", path.display(), e)),
    }
}

fn main() {
    let matches = args();

    if matches.is_present(LIST) {
        for still in STILLS {
            println!("{}", still.name);
        }
        for zoom in ZOOMS {
            println!("{}", zoom.name);
        }
        return;
    }

    let outdir = Path::new(matches.value_of(OUTDIR).unwrap());
    let density = matches
        .value_of(DENSITY)
        .map(|s| usize::from_str(s).expect("Error parsing density"));
    let threads = match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).expect("Error parsing thread count"),
        None => num_cpus::get(),
    };

    if let Err(e) = fs::create_dir_all(outdir) {
        fail(&format!("Could not create {}: {}", outdir.display(), e));
    }

    if matches.is_present(ALL) {
        for still in STILLS {
            run_still(still, outdir, density, threads);
        }
        for zoom in ZOOMS {
            run_zoom(zoom, outdir, density, threads);
        }
        return;
    }

    match matches.value_of(SCENE) {
        Some(name) => {
            if let Some(still) = STILLS.iter().find(|s| s.name == name) {
                run_still(still, outdir, density, threads);
            } else if let Some(zoom) = ZOOMS.iter().find(|z| z.name == name) {
                run_zoom(zoom, outdir, density, threads);
            } else {
                fail(&format!(
                    "Unknown scene {:?}; try --list for the gallery",
                    name
                ));
            }
        }
        None => fail("Nothing to do; pass --scene NAME, --all, or --list"),
    }
}
