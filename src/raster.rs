// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A thin RGBA raster over `image::RgbaImage`.
//!
//! The raster owns its whole pixel buffer.  Parallel renders do not
//! share it cell by cell; instead `rows_mut` hands out the buffer as
//! disjoint row slices, so each worker holds exclusive `&mut` access to
//! the rows it was given and the borrow checker proves no two workers
//! can touch the same cell.

use crate::errors::RenderError;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A width × height grid of RGBA pixels.
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Allocates a raster with every cell transparent black.
    pub fn new(width: usize, height: usize) -> Raster {
        Raster {
            image: RgbaImage::new(width as u32, height as u32),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Bytes in one row of pixels.
    pub fn stride(&self) -> usize {
        self.width() * CHANNELS
    }

    /// Writes one cell.  Panics if `(x, y)` is outside the raster.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba<u8>) {
        self.image.put_pixel(x as u32, y as u32, color);
    }

    /// Reads one cell.  Panics if `(x, y)` is outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba<u8> {
        *self.image.get_pixel(x as u32, y as u32)
    }

    /// Sets every cell to `color`.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// The raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }

    /// Splits the buffer into consecutive row bands.  Each entry of
    /// `heights` is the number of rows in one band; the bands are
    /// returned in order and must together cover the raster exactly.
    pub fn rows_mut<'a>(&'a mut self, heights: impl IntoIterator<Item = usize>) -> Vec<&'a mut [u8]> {
        let stride = self.stride();
        let mut rest: &'a mut [u8] = &mut self.image;
        let mut bands = Vec::new();
        for rows in heights {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows * stride);
            bands.push(band);
            rest = tail;
        }
        debug_assert!(rest.is_empty(), "row bands left {} bytes uncovered", rest.len());
        bands
    }

    /// Encodes the raster to `path`; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.image.save(path).map_err(|source| RenderError::Save {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_then_set_pixel() {
        let mut r = Raster::new(3, 2);
        r.fill(Rgba([0, 0, 255, 255]));
        r.set_pixel(2, 1, Rgba([1, 2, 3, 4]));
        assert_eq!(r.pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(r.pixel(2, 1), Rgba([1, 2, 3, 4]));
        assert_eq!(&r.as_bytes()[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn rows_mut_hands_out_disjoint_bands() {
        let mut r = Raster::new(2, 5);
        {
            let bands = r.rows_mut(vec![2, 0, 3]);
            assert_eq!(bands.len(), 3);
            assert_eq!(bands[0].len(), 2 * 2 * CHANNELS);
            assert!(bands[1].is_empty());
            assert_eq!(bands[2].len(), 3 * 2 * CHANNELS);
            for (i, band) in bands.into_iter().enumerate() {
                for byte in band.iter_mut() {
                    *byte = i as u8 + 1;
                }
            }
        }
        assert_eq!(r.pixel(1, 1), Rgba([1, 1, 1, 1]));
        assert_eq!(r.pixel(0, 2), Rgba([3, 3, 3, 3]));
        assert_eq!(r.pixel(1, 4), Rgba([3, 3, 3, 3]));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut r = Raster::new(4, 4);
        r.fill(Rgba([10, 20, 30, 255]));
        r.save(&path).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 4));
        assert_eq!(*back.get_pixel(3, 3), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn save_into_missing_directory_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("tiny.bmp");
        let err = Raster::new(2, 2).save(&path).unwrap_err();
        assert!(err.to_string().contains("tiny.bmp"), "{}", err);
    }
}
