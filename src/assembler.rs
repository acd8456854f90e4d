// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image assembler.
//!
//! Workers finish rows in whatever order the scheduler lets them.  The
//! assembler takes each completed row as it arrives, hands the sink
//! every row whose turn has come, and parks the rest until the gap in
//! front of them closes.  The sink therefore sees rows 0, 1, 2, ... in
//! that order no matter how the work was interleaved, and the bytes it
//! produces depend only on the inputs.

use log::{debug, trace};
use std::collections::BTreeMap;

use crate::error::{Error, RowList};
use crate::raster::Row;

/// Somewhere rows go once their turn has come.  Only the assembler
/// calls this, and always in ascending index order.
pub trait RowSink {
    /// Takes the next row.
    fn accept(&mut self, row: Row) -> Result<(), Error>;
}

impl<'a, S: RowSink + ?Sized> RowSink for &'a mut S {
    fn accept(&mut self, row: Row) -> Result<(), Error> {
        (**self).accept(row)
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn accept(&mut self, row: Row) -> Result<(), Error> {
        (**self).accept(row)
    }
}

/// Orders rows for a sink.  Each index in `0..height` must be
/// submitted exactly once; anything else is a partition integrity
/// error.
pub struct Assembler<S: RowSink> {
    height: usize,
    width: usize,
    next: usize,
    pending: BTreeMap<usize, Row>,
    sink: S,
}

impl<S: RowSink> Assembler<S> {
    /// An assembler for an image of `height` rows, each `width` pixels.
    pub fn new(width: usize, height: usize, sink: S) -> Self {
        Assembler {
            height,
            width,
            next: 0,
            pending: BTreeMap::new(),
            sink,
        }
    }

    /// Rows delivered to the sink so far.
    pub fn written(&self) -> usize {
        self.next
    }

    /// Rows received but still waiting for an earlier one.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Accepts one completed row, from any worker, in any order.
    pub fn submit(&mut self, row: Row) -> Result<(), Error> {
        let index = row.index;
        if index >= self.height {
            return Err(Error::RowOutOfRange {
                index,
                height: self.height,
            });
        }
        if row.width() != self.width {
            return Err(Error::RowWidth {
                index,
                expected: self.width,
                actual: row.width(),
            });
        }
        if index < self.next || self.pending.contains_key(&index) {
            return Err(Error::DuplicateRow { index });
        }

        if index != self.next {
            trace!("row {} parked, waiting for row {}", index, self.next);
            self.pending.insert(index, row);
            return Ok(());
        }

        self.sink.accept(row)?;
        self.next += 1;
        while let Some(row) = self.pending.remove(&self.next) {
            self.sink.accept(row)?;
            self.next += 1;
        }
        trace!("rows up to {} written", self.next);
        Ok(())
    }

    /// Called once nobody is left to submit anything.  Returns the sink
    /// if every row made it, and names the rows that did not otherwise.
    pub fn finalize(self) -> Result<S, Error> {
        if self.next < self.height {
            let missing: Vec<usize> = (self.next..self.height)
                .filter(|index| !self.pending.contains_key(index))
                .collect();
            debug!(
                "assembler closed with {} of {} rows written, {} missing",
                self.next,
                self.height,
                missing.len()
            );
            return Err(Error::MissingRows {
                missing: RowList(missing),
            });
        }
        debug!("assembler complete: {} rows", self.height);
        Ok(self.sink)
    }
}
