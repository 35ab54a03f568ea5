extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn rejects_an_unknown_fractal_family() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&["-o", "out.png", "--fractal", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown fractal family").from_utf8());
}

#[test]
fn rejects_a_nonpositive_threshold() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&["-o", "out.png", "--threshold", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("divergence threshold").from_utf8());
}

#[test]
fn rejects_a_zero_density() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&["-o", "out.png", "--density", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("density").from_utf8());
}

#[test]
fn requires_an_output_path() {
    Command::cargo_bin("escapetime").unwrap().assert().failure();
}

#[test]
fn renders_a_small_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tiny.png");
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "--density",
            "16",
            "--iterations",
            "20",
            "--threads",
            "1",
        ])
        .assert()
        .success();
    let written = std::fs::metadata(&out).unwrap();
    assert!(written.len() > 0, "expected a non-empty PNG");
}

#[test]
fn renders_every_family() {
    let dir = tempfile::tempdir().unwrap();
    for family in &["mandelbrot", "julia", "ship", "ship-julia"] {
        let out = dir.path().join(format!("{}.png", family));
        Command::cargo_bin("escapetime")
            .unwrap()
            .args(&[
                "-o",
                out.to_str().unwrap(),
                "--fractal",
                family,
                "--density",
                "8",
                "--iterations",
                "10",
                "--threads",
                "1",
            ])
            .assert()
            .success();
        assert!(out.exists(), "{} did not render", family);
    }
}

#[test]
fn scenes_lists_the_gallery() {
    Command::cargo_bin("scenes")
        .unwrap()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("mandelbrot-main").from_utf8())
        .stdout(predicate::str::contains("ship-julia-zoom").from_utf8());
}

#[test]
fn scenes_rejects_an_unknown_name() {
    Command::cargo_bin("scenes")
        .unwrap()
        .args(&["--scene", "not-a-scene"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scene").from_utf8());
}
