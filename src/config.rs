// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every knob of a render in one place.  Nothing is read from the
//! environment; the command line fills one of these in and the library
//! validates it before anything touches the disk.

use num::Complex;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::escape::IterationParams;
use crate::plane::Viewport;
use crate::render::EscapeTimeRenderer;

/// How the finished image is written out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// A binary P6 pixmap, streamed row by row as rows are released.
    Pixmap,
    /// Anything else the `image` crate can encode; the image is built
    /// in memory first.
    Encoded,
}

impl OutputFormat {
    /// Picks the format from the file extension.  No extension means
    /// a pixmap.
    pub fn for_path(path: &Path) -> Result<Self, Error> {
        let extension = match path.extension() {
            None => return Ok(OutputFormat::Pixmap),
            Some(ext) => ext.to_string_lossy().to_lowercase(),
        };
        match extension.as_str() {
            "ppm" | "pnm" => Ok(OutputFormat::Pixmap),
            "png" | "jpg" | "jpeg" | "bmp" | "ico" => Ok(OutputFormat::Encoded),
            other => Err(Error::config(format!(
                "don't know how to write a .{} file",
                other
            ))),
        }
    }
}

/// The whole description of one render job.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// (CxMin, CyMin).
    pub leftlower: Complex<f64>,
    /// (CxMax, CyMax).
    pub rightupper: Complex<f64>,
    /// Iteration bound; must exceed 1.
    pub max_iterations: u32,
    /// Bail-out radius.
    pub escape_radius: f64,
    /// Worker threads.
    pub workers: usize,
    /// Where the image goes.  The extension picks the format.
    pub output: PathBuf,
    /// Written into the pixmap header.
    pub comment: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 800,
            height: 800,
            leftlower: Complex::new(-2.5, -2.0),
            rightupper: Complex::new(1.5, 2.0),
            max_iterations: 1000,
            escape_radius: 400.0,
            workers: num_cpus::get(),
            output: PathBuf::from("Mandelbrot.ppm"),
            comment: String::from("escape-time Mandelbrot set"),
        }
    }
}

impl Config {
    /// The validated viewport.
    pub fn viewport(&self) -> Result<Viewport, Error> {
        Viewport::new(self.width, self.height, self.leftlower, self.rightupper)
    }

    /// The validated iteration bounds.
    pub fn params(&self) -> Result<IterationParams, Error> {
        IterationParams::new(self.max_iterations, self.escape_radius)
    }

    /// Builds the renderer this configuration describes.
    pub fn renderer(&self) -> Result<EscapeTimeRenderer, Error> {
        Ok(EscapeTimeRenderer::new(self.viewport()?, self.params()?))
    }

    /// Checks everything at once.  Called before the output file is
    /// created, so a bad configuration leaves nothing behind.
    pub fn validate(&self) -> Result<(), Error> {
        self.viewport()?;
        self.params()?;
        if self.workers == 0 {
            return Err(Error::config("at least one worker is required"));
        }
        if self.comment.contains('\n') || self.comment.contains('\r') {
            return Err(Error::config("the image comment must be a single line"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::config("an output path is required"));
        }
        OutputFormat::for_path(&self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.workers >= 1);
    }

    #[test]
    fn each_bad_field_is_caught() {
        let bad = vec![
            Config {
                width: 0,
                ..Config::default()
            },
            Config {
                height: 0,
                ..Config::default()
            },
            Config {
                rightupper: Complex::new(-2.5, 2.0),
                ..Config::default()
            },
            Config {
                leftlower: Complex::new(-2.5, 2.0),
                ..Config::default()
            },
            Config {
                max_iterations: 1,
                ..Config::default()
            },
            Config {
                escape_radius: 0.0,
                ..Config::default()
            },
            Config {
                workers: 0,
                ..Config::default()
            },
            Config {
                comment: String::from("two\nlines"),
                ..Config::default()
            },
            Config {
                output: PathBuf::new(),
                ..Config::default()
            },
            Config {
                output: PathBuf::from("mandel.xyz"),
                ..Config::default()
            },
        ];
        for config in bad {
            match config.validate() {
                Err(Error::Config { .. }) => (),
                other => panic!("{:?} gave {:?}", config, other),
            }
        }
    }

    #[test]
    fn format_follows_the_extension() {
        let format = |p: &str| OutputFormat::for_path(Path::new(p)).ok();
        assert_eq!(format("out.ppm"), Some(OutputFormat::Pixmap));
        assert_eq!(format("OUT.PPM"), Some(OutputFormat::Pixmap));
        assert_eq!(format("out"), Some(OutputFormat::Pixmap));
        assert_eq!(format("dir/out.png"), Some(OutputFormat::Encoded));
        assert_eq!(format("out.gif"), None);
    }
}
