// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use log::debug;
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

use mandelbrot::{render_to_path, Config};

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

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
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

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const ESCAPE_RADIUS: &str = "escape-radius";
const COMMENT: &str = "comment";

const MAX_THREADS: usize = 1024;

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelbrot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Row-parallel escape-time Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("Mandelbrot.ppm")
                .help("Output file; .ppm streams a pixmap, .png and friends go through the image crate"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane, as re,im"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.5,2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane, as re,im"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        MAX_THREADS,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", MAX_THREADS),
                    )
                })
                .help("Number of worker threads [default: number of CPUs]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(ESCAPE_RADIUS)
                .long(ESCAPE_RADIUS)
                .short("e")
                .takes_value(true)
                .default_value("400")
                .validator(|s| validate_number::<f64>(&s, "Could not parse escape radius"))
                .help("Bail-out radius"),
        )
        .arg(
            Arg::with_name(COMMENT)
                .long(COMMENT)
                .short("c")
                .takes_value(true)
                .help("Comment line for the pixmap header"),
        )
        .get_matches()
}

// Every value below either has a default or passed its validator, so
// the parses cannot fail; the fallbacks only keep us panic-free.
fn config_from(matches: &ArgMatches) -> Config {
    let defaults = Config::default();
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .unwrap_or((defaults.width, defaults.height));
    let leftlower = matches
        .value_of(LEFTLOWER)
        .and_then(parse_complex)
        .unwrap_or(defaults.leftlower);
    let rightupper = matches
        .value_of(RIGHTUPPER)
        .and_then(parse_complex)
        .unwrap_or(defaults.rightupper);
    let workers = matches
        .value_of(THREADS)
        .and_then(|s| usize::from_str(s).ok())
        .unwrap_or(defaults.workers);
    let max_iterations = matches
        .value_of(ITERATIONS)
        .and_then(|s| u32::from_str(s).ok())
        .unwrap_or(defaults.max_iterations);
    let escape_radius = matches
        .value_of(ESCAPE_RADIUS)
        .and_then(|s| f64::from_str(s).ok())
        .unwrap_or(defaults.escape_radius);
    let output = matches
        .value_of(OUTPUT)
        .map(PathBuf::from)
        .unwrap_or(defaults.output);
    let comment = matches
        .value_of(COMMENT)
        .map(String::from)
        .unwrap_or(defaults.comment);

    Config {
        width,
        height,
        leftlower,
        rightupper,
        max_iterations,
        escape_radius,
        workers,
        output,
        comment,
    }
}

fn main() {
    env_logger::init();
    let matches = args();
    let config = config_from(&matches);
    debug!("{:?}", config);

    if let Err(e) = render_to_path(&config) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
