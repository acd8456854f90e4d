#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  For every pixel we run that
//! recurrence until `z` leaves a circle of a given radius or we give up
//! at an iteration bound, and colour the pixel by how long it lasted.
//!
//! Every row is independent of every other row, so the work is spread
//! across a fixed pool of worker threads by a strided rule: worker `k`
//! of `P` takes rows `k, k+P, k+2P, ...`.  Workers send finished rows
//! to a single coordinator, which puts them back in raster order and is
//! the only thing that writes the output.  The bytes written depend
//! only on the configuration, never on the number of workers or the
//! order in which they finish.

pub mod assembler;
pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod partition;
pub mod plane;
pub mod ppm;
pub mod raster;
pub mod render;

pub use crate::assembler::{Assembler, RowSink};
pub use crate::color::{colorize, Color};
pub use crate::config::{Config, OutputFormat};
pub use crate::error::Error;
pub use crate::escape::{evaluate, EscapeResult, IterationParams};
pub use crate::partition::Partition;
pub use crate::plane::{Pixel, Viewport};
pub use crate::ppm::PpmWriter;
pub use crate::raster::{Image, Row};
pub use crate::render::{render_image, render_rows, render_single, EscapeTimeRenderer, RowRenderer};

use log::{info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Renders the image a configuration describes and writes it to the
/// configured path.  The configuration is checked before the file is
/// created, and a render that fails part way removes the file again:
/// a partial image is never left behind as if it were output.
pub fn render_to_path(config: &Config) -> Result<(), Error> {
    config.validate()?;
    let renderer = config.renderer()?;
    match OutputFormat::for_path(&config.output)? {
        OutputFormat::Pixmap => write_pixmap(config, &renderer)?,
        OutputFormat::Encoded => write_encoded(config, &renderer)?,
    }
    info!("wrote {}", config.output.display());
    Ok(())
}

fn write_pixmap(config: &Config, renderer: &EscapeTimeRenderer) -> Result<(), Error> {
    let file = BufWriter::new(File::create(&config.output)?);
    let streamed = PpmWriter::new(file, config.width, config.height, &config.comment)
        .and_then(|ppm| render_rows(renderer, config.workers, ppm))
        .and_then(|ppm| ppm.finish());
    match streamed {
        Ok(_) => Ok(()),
        Err(err) => {
            discard(&config.output);
            Err(err)
        }
    }
}

fn write_encoded(config: &Config, renderer: &EscapeTimeRenderer) -> Result<(), Error> {
    let image = render_rows(renderer, config.workers, Image::new(config.width, config.height))?;
    let rgb = image.to_rgb_image().ok_or_else(|| Error::Encode {
        reason: String::from("image buffer does not match its dimensions"),
    })?;
    rgb.save(&config.output).map_err(|err| {
        discard(&config.output);
        Error::Encode {
            reason: err.to_string(),
        }
    })
}

fn discard(path: &Path) {
    if path.exists() {
        if let Err(err) = fs::remove_file(path) {
            warn!("could not remove partial output {}: {}", path.display(), err);
        }
    }
}
