// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners.
use num::Complex;

use crate::error::Error;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the x, y of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of the integral plane onto points of the complex
/// plane.  Row 0 sits on the leftlower imaginary bound, so the raster
/// runs from CyMin upward; the set is symmetric about the real axis
/// and nothing downstream cares.
///
/// Immutable once built.  Every worker shares one by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Width and height of one pixel, measured on the complex plane.
    pixel_size: (f64, f64),
}

impl Viewport {
    /// Constructor.  Takes the pixel resolution and two points
    /// describing the complex plane.  Fails if either resolution is
    /// zero or the complex rectangle is degenerate.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Viewport, Error> {
        if width == 0 || height == 0 {
            return Err(Error::config(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(Error::config("viewport corners must be finite"));
        }

        if rightupper.re <= leftlower.re {
            return Err(Error::config(
                "the left lower corner is not to the left of the right upper corner",
            ));
        }

        if rightupper.im <= leftlower.im {
            return Err(Error::config(
                "the left lower corner is not lower than the right upper corner",
            ));
        }

        let pixel_size = (
            (rightupper.re - leftlower.re) / (width as f64),
            (rightupper.im - leftlower.im) / (height as f64),
        );

        Ok(Viewport {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
            pixel_size,
        })
    }

    /// Pixel columns.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Pixel rows.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// A constructed viewport always has pixels, but clippy wants the pair.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(CxMax - CxMin) / W`
    pub fn pixel_width(&self) -> f64 {
        self.pixel_size.0
    }

    /// `(CyMax - CyMin) / H`
    pub fn pixel_height(&self) -> f64 {
        self.pixel_size.1
    }

    /// The real coordinate of a pixel column.
    pub fn column_re(&self, x: usize) -> f64 {
        self.complex_plane.0.re + (x as f64) * self.pixel_size.0
    }

    /// The imaginary coordinate of a pixel row, as the evaluator should
    /// see it.  A row closer to the real axis than half a pixel is
    /// snapped onto it; otherwise the main antenna, which is one pixel
    /// thin, falls between two rows and vanishes from the image.
    pub fn row_im(&self, y: usize) -> f64 {
        let im = self.complex_plane.0.im + (y as f64) * self.pixel_size.1;
        if im.abs() < self.pixel_size.1 / 2.0 {
            0.0
        } else {
            im
        }
    }

    /// Given a pixel on the integral cartesian plane, map it onto the
    /// complex cartesian plane.  No antenna snapping happens here.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.complex_plane.0.re + (pixel.0 as f64) * self.pixel_size.0,
            self.complex_plane.0.im + (pixel.1 as f64) * self.pixel_size.1,
        )
    }
}
