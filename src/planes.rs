// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ImageParams struct, which describes a relationship
//! between the integral plane of a raster, with an origin at 0,0, and
//! a rectangle on the complex plane bounded by `x_min..x_max` and
//! `y_min..y_max`.
use num::Complex;

/// Describes the column, row of a pixel in a raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Everything one render needs to know about its image: where it sits
/// on the complex plane, how many pixels it has, and how hard to try
/// before declaring a point inside the set.  Built once per render and
/// shared by reference with every worker; never mutated afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageParams {
    /// Left edge of the complex region.
    pub x_min: f64,
    /// Right edge of the complex region.
    pub x_max: f64,
    /// Top edge (row 0) of the complex region.
    pub y_min: f64,
    /// Bottom edge of the complex region.
    pub y_max: f64,
    /// Raster width in pixels; must be positive.
    pub width: usize,
    /// Raster height in pixels; must be positive.
    pub height: usize,
    /// Iteration cap for the escape-time evaluator.
    pub max: u32,
}

impl ImageParams {
    /// Centres a square region of half-width `scale` on
    /// `(x_center, y_center)`, so the view spans `center ± scale` on
    /// both axes regardless of the raster's aspect ratio.
    pub fn centered(
        x_center: f64,
        y_center: f64,
        scale: f64,
        width: usize,
        height: usize,
        max: u32,
    ) -> ImageParams {
        ImageParams {
            x_min: x_center - scale,
            x_max: x_center + scale,
            y_min: y_center - scale,
            y_max: y_center + scale,
            width,
            height,
            max,
        }
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// corresponding point on the complex plane.  The pixel's upper-left
    /// corner is the sample point, so column `width` would land exactly
    /// on `x_max`.
    #[inline]
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.x_min + (pixel.0 as f64) * (self.x_max - self.x_min) / (self.width as f64),
            self.y_min + (pixel.1 as f64) * (self.y_max - self.y_min) / (self.height as f64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_spans_scale_on_both_sides() {
        let p = ImageParams::centered(-0.5, 0.25, 2.0, 10, 20, 50);
        assert_eq!(p.x_min, -2.5);
        assert_eq!(p.x_max, 1.5);
        assert_eq!(p.y_min, -1.75);
        assert_eq!(p.y_max, 2.25);
        assert_eq!(p.len(), 200);
        assert!(!p.is_empty());
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let p = ImageParams::centered(2.5, 2.5, 2.5, 5, 5, 10);
        assert_eq!(p.pixel_to_point(Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(p.pixel_to_point(Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(p.pixel_to_point(Pixel(4, 4)), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let p = ImageParams::centered(0.0, 0.0, 2.0, 4, 4, 10);
        assert_eq!(p.pixel_to_point(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(p.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(p.pixel_to_point(Pixel(4, 4)), Complex::new(2.0, 2.0));
    }

    #[test]
    fn columns_and_rows_scale_independently() {
        let p = ImageParams::centered(0.0, 0.0, 1.0, 4, 2, 10);
        assert_eq!(p.pixel_to_point(Pixel(1, 1)), Complex::new(-0.5, 0.0));
        assert_eq!(p.pixel_to_point(Pixel(3, 0)), Complex::new(0.5, -1.0));
    }

    #[test]
    fn empty_planes_are_empty() {
        assert!(ImageParams::centered(0.0, 0.0, 1.0, 0, 3, 10).is_empty());
        assert!(ImageParams::centered(0.0, 0.0, 1.0, 3, 0, 10).is_empty());
    }
}
