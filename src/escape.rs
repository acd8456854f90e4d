// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! A point `c` on the complex plane is iterated through `z = z*z + c`
//! starting from the critical point `z = 0`.  If `|z|` reaches the
//! escape radius the point is outside the Mandelbrot set, and the
//! number of iterations it took is a rough measure of how quickly it
//! fled.  If it never escapes within the iteration bound we treat it
//! as a member of the set.

use crate::error::Error;

/// The bounds on the recurrence.  Once set, this object should not be
/// mutable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationParams {
    max_iterations: u32,
    escape_radius: f64,
    // Kept squared so the inner loop never takes a square root.
    escape_radius_sqr: f64,
}

impl IterationParams {
    /// Requires more than one iteration (the colour scale divides by
    /// `ln(max_iterations - 1)`) and a positive, finite escape radius.
    pub fn new(max_iterations: u32, escape_radius: f64) -> Result<Self, Error> {
        if max_iterations <= 1 {
            return Err(Error::config(format!(
                "max iterations must be greater than 1, got {}",
                max_iterations
            )));
        }
        if !(escape_radius.is_finite() && escape_radius > 0.0) {
            return Err(Error::config(format!(
                "escape radius must be a positive number, got {}",
                escape_radius
            )));
        }
        Ok(IterationParams {
            max_iterations,
            escape_radius,
            escape_radius_sqr: escape_radius * escape_radius,
        })
    }

    /// The iteration bound.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The bail-out radius.
    pub fn escape_radius(&self) -> f64 {
        self.escape_radius
    }
}

/// What happened to one point.  `iterations` is in `[0, max_iterations]`;
/// a point that did not escape always reports `max_iterations`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EscapeResult {
    /// Iterations performed before the loop stopped.
    pub iterations: u32,
    /// Whether `|z|` reached the escape radius.
    pub escaped: bool,
}

/// This is our classic iterator function.  The squares of both
/// components are carried between steps, so each iteration costs
/// three multiplications.
#[inline]
pub fn evaluate(cx: f64, cy: f64, params: &IterationParams) -> EscapeResult {
    let (mut zx, mut zy) = (0.0_f64, 0.0_f64);
    let (mut zx2, mut zy2) = (0.0_f64, 0.0_f64);
    let mut iteration = 0;
    while iteration < params.max_iterations && zx2 + zy2 < params.escape_radius_sqr {
        zy = 2.0 * zx * zy + cy;
        zx = zx2 - zy2 + cx;
        zx2 = zx * zx;
        zy2 = zy * zy;
        iteration += 1;
    }
    EscapeResult {
        iterations: iteration,
        escaped: iteration < params.max_iterations,
    }
}
