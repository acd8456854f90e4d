// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps escape results onto a black, blue, cyan, white ramp.

use num::clamp;

use crate::escape::{EscapeResult, IterationParams};

/// A 24-bit RGB colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Points inside the set.
    pub const BLACK: Color = Color([0, 0, 0]);

    /// Red, green, blue, in that order.
    pub fn channels(&self) -> [u8; 3] {
        self.0
    }
}

/// Where on the three-segment ramp an escape count lands, in `[0, 3]`.
///
/// The denominator is `ln(max_iterations - 1)`, not `ln(max_iterations)`.
/// Existing renders were made with it, and keeping it keeps their
/// bytes reproducible.  Counts of 0 and 1 have a zero
/// logarithm and sit at the bottom of the ramp, which also keeps
/// `max_iterations == 2` from dividing zero by zero.
fn ramp_position(iterations: u32, max_iterations: u32) -> f64 {
    if iterations <= 1 {
        return 0.0;
    }
    3.0 * f64::from(iterations).ln() / (f64::from(max_iterations) - 1.0).ln()
}

fn channel(fraction: f64) -> u8 {
    clamp((255.0 * fraction).round(), 0.0, 255.0) as u8
}

/// A pure function of the escape result: points that never escaped
/// are black, the rest climb from dark blue through cyan to white as
/// their escape count grows.
pub fn colorize(result: EscapeResult, params: &IterationParams) -> Color {
    if !result.escaped {
        return Color::BLACK;
    }
    let t = ramp_position(result.iterations, params.max_iterations());
    if t < 1.0 {
        Color([0, 0, channel(t)])
    } else if t < 2.0 {
        Color([0, channel(t - 1.0), 255])
    } else {
        Color([channel(t - 2.0), 255, 255])
    }
}
