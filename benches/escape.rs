#[macro_use]
extern crate criterion;
extern crate escapetime;
extern crate num;

use criterion::Criterion;
use escapetime::{evaluate, sample, Params, Region, Variant};
use num::Complex;

fn mandelbrot_field(c: &mut Criterion) {
    let region = Region::new(Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5)).unwrap();
    let grid = sample(&region, 128).unwrap();
    let params = Params::default();
    c.bench_function("mandelbrot 128x128x100", move |b| {
        b.iter(|| evaluate(&grid, Variant::Mandelbrot, &params, 100, 2.0).unwrap())
    });
}

fn burning_ship_field(c: &mut Criterion) {
    let region = Region::new(Complex::new(-2.0, -2.0), Complex::new(1.5, 1.0)).unwrap();
    let grid = sample(&region, 128).unwrap();
    let params = Params::default();
    c.bench_function("burning ship 128x128x100", move |b| {
        b.iter(|| evaluate(&grid, Variant::BurningShip, &params, 100, 2.0).unwrap())
    });
}

criterion_group!(benches, mandelbrot_field, burning_ship_field);
criterion_main!(benches);
