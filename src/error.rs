// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type every fallible operation in this crate returns.

use failure::Fail;
use itertools::Itertools;
use std::fmt;
use std::io;

/// How many missing row indices we bother to spell out in a message.
const MISSING_SHOWN: usize = 8;

/// Everything that can stop a render.  None of these are retried: the
/// computation is deterministic, so a failure means a bad input, a
/// broken environment, or a bug in the partition/assembly logic.
#[derive(Debug, Fail)]
pub enum Error {
    /// The viewport, dimensions, or iteration bounds make no sense.
    /// Reported before any computation starts.
    #[fail(display = "invalid configuration: {}", reason)]
    Config {
        /// What was wrong.
        reason: String,
    },

    /// The output sink could not be created or written.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),

    /// The `image` crate refused to encode the finished image.
    #[fail(display = "could not encode image: {}", reason)]
    Encode {
        /// The encoder's complaint.
        reason: String,
    },

    /// A row index reached the assembler twice.
    #[fail(display = "row {} was submitted more than once", index)]
    DuplicateRow {
        /// The offending row.
        index: usize,
    },

    /// Every worker hung up and some rows never arrived.
    #[fail(display = "rows were never submitted: {}", missing)]
    MissingRows {
        /// The rows that never arrived, ascending.
        missing: RowList,
    },

    /// A row claims an index outside the image.
    #[fail(display = "row {} is outside an image of height {}", index, height)]
    RowOutOfRange {
        /// The offending row.
        index: usize,
        /// The image height.
        height: usize,
    },

    /// A row has the wrong number of pixels.
    #[fail(
        display = "row {} has {} pixels, expected {}",
        index, actual, expected
    )]
    RowWidth {
        /// The offending row.
        index: usize,
        /// The image width.
        expected: usize,
        /// What the row actually carried.
        actual: usize,
    },

    /// A worker thread panicked before finishing its rows.
    #[fail(display = "worker {} failed before finishing its rows", worker)]
    Worker {
        /// Which worker, numbered as the partitioner numbers them.
        worker: usize,
    },

    /// The thread scope itself reported a panic it could not attribute.
    #[fail(display = "the worker pool shut down abnormally")]
    Pool,
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config<S: Into<String>>(reason: S) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// True for the errors that mean rows were lost, duplicated or
    /// misplaced between the workers and the assembler.
    pub fn is_partition_integrity(&self) -> bool {
        match self {
            Error::DuplicateRow { .. }
            | Error::MissingRows { .. }
            | Error::RowOutOfRange { .. }
            | Error::RowWidth { .. } => true,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// A list of row indices that prints only its head.
#[derive(Clone, Debug, PartialEq)]
pub struct RowList(pub Vec<usize>);

impl fmt::Display for RowList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shown = self.0.iter().take(MISSING_SHOWN).join(", ");
        if self.0.len() > MISSING_SHOWN {
            write!(f, "{}, ... ({} total)", shown, self.0.len())
        } else {
            write!(f, "{}", shown)
        }
    }
}
