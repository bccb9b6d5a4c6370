/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! In memory raster handed to the encoder and returned by the decoder

use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::errors::TicEncodeErrors;

/// A decoded image
///
/// Samples are stored row major with channels interleaved, each sample
/// occupying one `u16` regardless of the bit depth.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RasterImage {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    depth:      BitDepth,
    samples:    Vec<u16>
}

impl RasterImage {
    /// Create a raster from interleaved samples
    ///
    /// # Errors
    /// [`TicEncodeErrors::LengthMismatch`] if `samples` does not hold exactly
    /// `width * height * components` values
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth, samples: Vec<u16>
    ) -> Result<RasterImage, TicEncodeErrors> {
        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(colorspace.num_components()))
            .ok_or(TicEncodeErrors::TooLargeDimensions(width.max(height)))?;

        if expected != samples.len() {
            return Err(TicEncodeErrors::LengthMismatch(expected, samples.len()));
        }
        Ok(RasterImage {
            width,
            height,
            colorspace,
            depth,
            samples
        })
    }

    /// Create an eight bit raster from bytes
    pub fn from_u8(
        width: usize, height: usize, colorspace: ColorSpace, data: &[u8]
    ) -> Result<RasterImage, TicEncodeErrors> {
        let samples = data.iter().map(|x| u16::from(*x)).collect();
        RasterImage::new(width, height, colorspace, BitDepth::Eight, samples)
    }

    /// Only used where the geometry is already known to be valid, by the
    /// decoder and the resampler
    pub(crate) fn from_parts(
        width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth, samples: Vec<u16>
    ) -> RasterImage {
        debug_assert_eq!(width * height * colorspace.num_components(), samples.len());
        RasterImage {
            width,
            height,
            colorspace,
            depth,
            samples
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    /// Return samples narrowed to bytes
    ///
    /// Returns `None` unless the image is eight bit
    pub fn to_u8(&self) -> Option<Vec<u8>> {
        if self.depth != BitDepth::Eight {
            return None;
        }
        Some(self.samples.iter().map(|x| *x as u8).collect())
    }

    /// Largest absolute difference between corresponding samples of
    /// two images with the same layout
    ///
    /// Returns `None` when geometry or layout differ
    pub fn max_abs_diff(&self, other: &RasterImage) -> Option<u16> {
        if self.dimensions() != other.dimensions()
            || self.colorspace != other.colorspace
            || self.depth != other.depth
        {
            return None;
        }
        Some(
            self.samples
                .iter()
                .zip(other.samples.iter())
                .map(|(a, b)| a.abs_diff(*b))
                .max()
                .unwrap_or(0)
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn length_is_checked() {
        let err = RasterImage::new(2, 2, ColorSpace::RGB, BitDepth::Eight, vec![0; 11]);
        assert!(matches!(err, Err(TicEncodeErrors::LengthMismatch(12, 11))));
    }

    #[test]
    fn u8_helpers() {
        let image = RasterImage::from_u8(1, 2, ColorSpace::LumaA, &[1, 2, 3, 4]).unwrap();
        assert_eq!(image.samples(), &[1, 2, 3, 4]);
        assert_eq!(image.to_u8().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn diff_needs_same_layout() {
        let a = RasterImage::from_u8(2, 1, ColorSpace::Luma, &[10, 20]).unwrap();
        let b = RasterImage::from_u8(2, 1, ColorSpace::Luma, &[13, 20]).unwrap();
        let c = RasterImage::from_u8(1, 2, ColorSpace::Luma, &[10, 20]).unwrap();
        assert_eq!(a.max_abs_diff(&b), Some(3));
        assert_eq!(a.max_abs_diff(&c), None);
    }
}
