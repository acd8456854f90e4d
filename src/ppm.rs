// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A streaming binary pixmap (P6) writer.  The header goes out when
//! the writer is built; each row goes out the moment the assembler
//! releases it, so the whole image never has to sit in memory.

use std::io::Write;

use crate::assembler::RowSink;
use crate::error::{Error, RowList};
use crate::raster::Row;

const MAGIC: &str = "P6";
const MAX_CHANNEL_VALUE: u8 = 255;

/// Writes rows to any byte stream as the body of a P6 pixmap.
pub struct PpmWriter<W: Write> {
    out: W,
    width: usize,
    height: usize,
    rows_written: usize,
    // One row's worth of bytes, reused between rows.
    scratch: Vec<u8>,
}

impl<W: Write> PpmWriter<W> {
    /// Writes the header and returns a writer ready for `height` rows.
    /// The comment must fit on one line.
    pub fn new(mut out: W, width: usize, height: usize, comment: &str) -> Result<Self, Error> {
        if comment.contains('\n') || comment.contains('\r') {
            return Err(Error::config("the image comment must be a single line"));
        }
        write!(
            out,
            "{}\n# {}\n{}\n{}\n{}\n",
            MAGIC, comment, width, height, MAX_CHANNEL_VALUE
        )?;
        Ok(PpmWriter {
            out,
            width,
            height,
            rows_written: 0,
            scratch: Vec::with_capacity(width * 3),
        })
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and gives back the underlying stream.  Fails if fewer
    /// than `height` rows were written; the stream would not be a
    /// valid pixmap.
    pub fn finish(mut self) -> Result<W, Error> {
        if self.rows_written != self.height {
            let missing = (self.rows_written..self.height).collect();
            return Err(Error::MissingRows {
                missing: RowList(missing),
            });
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RowSink for PpmWriter<W> {
    fn accept(&mut self, row: Row) -> Result<(), Error> {
        if row.width() != self.width {
            return Err(Error::RowWidth {
                index: row.index,
                expected: self.width,
                actual: row.width(),
            });
        }
        if row.index != self.rows_written || row.index >= self.height {
            return Err(Error::RowOutOfRange {
                index: row.index,
                height: self.height,
            });
        }
        self.scratch.clear();
        for pixel in &row.pixels {
            self.scratch.extend_from_slice(&pixel.0);
        }
        self.out.write_all(&self.scratch)?;
        self.rows_written += 1;
        Ok(())
    }
}
