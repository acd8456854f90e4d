// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::prelude::*;
use image::GenericImageView;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn mandelbrot() -> Command {
    Command::cargo_bin("mandelbrot").unwrap()
}

fn small_render(output: &Path, threads: &str) -> Command {
    let mut cmd = mandelbrot();
    cmd.arg("--output")
        .arg(output)
        .args(&["--size", "24x16"])
        .args(&["--leftlower", "-2.5,-1.25"])
        .args(&["--rightupper", "1.0,1.25"])
        .args(&["--iterations", "100"])
        .args(&["--threads", threads]);
    cmd
}

#[test]
fn writes_a_pixmap() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("m.ppm");
    small_render(&out, "2").assert().success();

    let bytes = fs::read(&out).unwrap();
    let header = b"P6\n# escape-time Mandelbrot set\n24\n16\n255\n";
    assert!(bytes.starts_with(header));
    assert_eq!(bytes.len(), header.len() + 24 * 16 * 3);
}

#[test]
fn thread_count_does_not_change_the_file() {
    let dir = tempdir().unwrap();
    let one = dir.path().join("one.ppm");
    let many = dir.path().join("many.ppm");
    small_render(&one, "1").assert().success();
    small_render(&many, "5").assert().success();
    assert_eq!(fs::read(&one).unwrap(), fs::read(&many).unwrap());
}

#[test]
fn custom_comment_lands_in_the_header() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("c.ppm");
    small_render(&out, "1")
        .args(&["--comment", "hello there"])
        .assert()
        .success();
    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"P6\n# hello there\n24\n16\n"));
}

#[test]
fn writes_a_png_through_the_image_crate() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("m.png");
    small_render(&out, "3").assert().success();
    let img = image::open(&out).unwrap();
    assert_eq!(img.dimensions(), (24, 16));
}

#[test]
fn zero_size_is_rejected_before_anything_is_written() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");
    mandelbrot()
        .arg("--output")
        .arg(&out)
        .args(&["--size", "0x16"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(!out.exists());
}

#[test]
fn degenerate_viewport_is_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");
    mandelbrot()
        .arg("--output")
        .arg(&out)
        .args(&["--leftlower", "1.0,-1.0", "--rightupper", "1.0,1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(!out.exists());
}

#[test]
fn a_single_iteration_is_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");
    mandelbrot()
        .arg("--output")
        .arg(&out)
        .args(&["--iterations", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max iterations"));
    assert!(!out.exists());
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.xyz");
    mandelbrot().arg("--output").arg(&out).assert().failure();
    assert!(!out.exists());
}

#[test]
fn unwritable_output_is_an_io_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("no-such-dir").join("m.ppm");
    small_render(&out, "1")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn garbage_arguments_are_rejected() {
    mandelbrot().args(&["--size", "big"]).assert().failure();
    mandelbrot().args(&["--threads", "0"]).assert().failure();
    mandelbrot().args(&["--leftlower", "nope"]).assert().failure();
}
