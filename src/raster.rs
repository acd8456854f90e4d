// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rows and images.  A row is built entirely by one worker and handed
//! over whole; an image is a stack of rows in index order.

use image::RgbImage;

use crate::assembler::RowSink;
use crate::color::Color;
use crate::error::Error;

/// One completed scanline.  `index` is its y coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// The y coordinate.
    pub index: usize,
    /// Exactly `width` colours, left to right.
    pub pixels: Vec<Color>,
}

impl Row {
    /// Wraps a finished pixel buffer.
    pub fn new(index: usize, pixels: Vec<Color>) -> Self {
        Row { index, pixels }
    }

    /// Pixel count.
    pub fn width(&self) -> usize {
        self.pixels.len()
    }

    /// The row as packed RGB bytes, three per pixel.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.0);
        }
        bytes
    }
}

/// An image in row-major raster order.  Created empty, it accepts rows
/// strictly in index order; the assembler guarantees that.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    rows: Vec<Row>,
}

impl Image {
    /// An empty image waiting for `height` rows of `width` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            width,
            height,
            rows: Vec::with_capacity(height),
        }
    }

    /// Pixel columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pixel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True once every row is present.
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.height
    }

    /// The rows received so far, top first.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The colour at `(x, y)`, if that row has arrived.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.rows.get(y).and_then(|row| row.pixels.get(x)).cloned()
    }

    /// Packed RGB bytes, top row first; exactly the body of a P6 pixmap.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width * self.height * 3);
        for row in &self.rows {
            for pixel in &row.pixels {
                bytes.extend_from_slice(&pixel.0);
            }
        }
        bytes
    }

    /// Hands the pixels to the `image` crate, which knows how to save
    /// them in formats other than PPM.  `None` until the image is complete.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        if !self.is_complete() {
            return None;
        }
        RgbImage::from_raw(self.width as u32, self.height as u32, self.to_bytes())
    }
}

impl RowSink for Image {
    fn accept(&mut self, row: Row) -> Result<(), Error> {
        if row.width() != self.width {
            return Err(Error::RowWidth {
                index: row.index,
                expected: self.width,
                actual: row.width(),
            });
        }
        if row.index != self.rows.len() {
            return Err(Error::RowOutOfRange {
                index: row.index,
                height: self.height,
            });
        }
        self.rows.push(row);
        Ok(())
    }
}
