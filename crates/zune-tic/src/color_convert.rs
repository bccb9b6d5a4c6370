/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Color conversion routines
//!
//! This module provides two conversions
//!
//! - `RGB[a]` <-> `YCoCg[a]` using the reversible YCoCg-R lifting steps
//!
//! - `Luma[A]` <-> `Luma[A]`
//!
//! Interleaved `u16` samples become one `i32` plane per channel, alpha is
//! always carried unchanged in the last plane.
use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::errors::{TicEncodeErrors, SUPPORTED_COLORSPACES, SUPPORTED_DEPTHS};
use crate::image::RasterImage;

/// Planar, decorrelated samples of a whole image
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InternalSamples {
    pub width:      usize,
    pub height:     usize,
    pub colorspace: ColorSpace,
    pub depth:      BitDepth,
    pub planes:     Vec<Vec<i32>>
}

impl InternalSamples {
    /// Zeroed planes for an image of the given layout
    pub fn new(width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth) -> Self {
        let planes = (0..colorspace.num_components())
            .map(|_| vec![0; width * height])
            .collect();

        InternalSamples {
            width,
            height,
            colorspace,
            depth,
            planes
        }
    }
}

/// Return true if we can code images of this layout
pub fn is_supported(colorspace: ColorSpace, depth: BitDepth) -> bool {
    SUPPORTED_COLORSPACES.contains(&colorspace) && SUPPORTED_DEPTHS.contains(&depth)
}

/// Range `[lo, hi]` of samples in `plane` after the forward transform
///
/// Luma and alpha keep the depth range, the chroma differences of
/// RGB images need one extra bit of sign.
pub const fn plane_range(colorspace: ColorSpace, depth: BitDepth, plane: usize) -> (i32, i32) {
    let max = depth.max_value() as i32;

    match colorspace {
        ColorSpace::RGB | ColorSpace::RGBA if plane == 1 || plane == 2 => (-max, max),
        _ => (0, max)
    }
}

#[inline(always)]
fn convert_rgb_to_ycocg(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let co = r - b;
    let tmp = b + (co >> 1);
    let cg = g - tmp;
    let y = tmp + (cg >> 1);

    (y, co, cg)
}

#[inline(always)]
fn convert_ycocg_to_rgb(y: i32, co: i32, cg: i32) -> (i32, i32, i32) {
    let tmp = y - (cg >> 1);
    let g = cg + tmp;
    let b = tmp - (co >> 1);
    let r = b + co;

    (r, g, b)
}

/// Split and decorrelate an image into planes
///
/// # Errors
/// - [`TicEncodeErrors::UnsupportedLayout`] for colorspaces or depths we cannot code
/// - [`TicEncodeErrors::SampleOutOfRange`] for samples above the depth maximum
pub fn forward(image: &RasterImage) -> Result<InternalSamples, TicEncodeErrors> {
    let colorspace = image.colorspace();
    let depth = image.depth();

    if !is_supported(colorspace, depth) {
        return Err(TicEncodeErrors::UnsupportedLayout(colorspace, depth));
    }
    let max = depth.max_value();

    if let Some(value) = image.samples().iter().find(|x| **x > max) {
        return Err(TicEncodeErrors::SampleOutOfRange(*value, depth));
    }
    let (width, height) = image.dimensions();
    let mut output = InternalSamples::new(width, height, colorspace, depth);
    let components = colorspace.num_components();

    for (pos, pixel) in image.samples().chunks_exact(components).enumerate() {
        match colorspace {
            ColorSpace::RGB | ColorSpace::RGBA => {
                let (y, co, cg) = convert_rgb_to_ycocg(
                    i32::from(pixel[0]),
                    i32::from(pixel[1]),
                    i32::from(pixel[2])
                );
                output.planes[0][pos] = y;
                output.planes[1][pos] = co;
                output.planes[2][pos] = cg;
            }
            _ => output.planes[0][pos] = i32::from(pixel[0])
        }
        if colorspace.has_alpha() {
            output.planes[components - 1][pos] = i32::from(pixel[components - 1]);
        }
    }
    Ok(output)
}

/// Undo [`forward`], clamping samples to the depth range
pub fn inverse(samples: &InternalSamples) -> RasterImage {
    let colorspace = samples.colorspace;
    let components = colorspace.num_components();
    let max = i32::from(samples.depth.max_value());
    let clamp = |x: i32| x.clamp(0, max) as u16;

    let mut output = vec![0_u16; samples.width * samples.height * components];

    for (pos, pixel) in output.chunks_exact_mut(components).enumerate() {
        match colorspace {
            ColorSpace::RGB | ColorSpace::RGBA => {
                let (r, g, b) = convert_ycocg_to_rgb(
                    samples.planes[0][pos],
                    samples.planes[1][pos],
                    samples.planes[2][pos]
                );
                pixel[0] = clamp(r);
                pixel[1] = clamp(g);
                pixel[2] = clamp(b);
            }
            _ => pixel[0] = clamp(samples.planes[0][pos])
        }
        if colorspace.has_alpha() {
            pixel[components - 1] = clamp(samples.planes[components - 1][pos]);
        }
    }
    RasterImage::from_parts(
        samples.width,
        samples.height,
        colorspace,
        samples.depth,
        output
    )
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};

    use super::*;

    #[test]
    fn ycocg_is_reversible() {
        let max = 65535;
        for (r, g, b) in [(0, 0, 0), (max, max, max), (max, 0, max), (0, max, 0), (12, 200, 7)] {
            let (y, co, cg) = convert_rgb_to_ycocg(r, g, b);
            assert!(y >= 0 && y <= max);
            assert!(co.abs() <= max && cg.abs() <= max);
            assert_eq!(convert_ycocg_to_rgb(y, co, cg), (r, g, b));
        }
    }

    #[test]
    fn round_trip_all_layouts() {
        let mut rand = WyRand::new_seed(5);

        for colorspace in SUPPORTED_COLORSPACES {
            for depth in SUPPORTED_DEPTHS {
                let (width, height) = (7, 3);
                let samples: Vec<u16> = (0..width * height * colorspace.num_components())
                    .map(|_| rand.generate_range(0..=depth.max_value()))
                    .collect();
                let image = RasterImage::new(width, height, colorspace, depth, samples).unwrap();

                let planes = forward(&image).unwrap();
                for (i, plane) in planes.planes.iter().enumerate() {
                    let (lo, hi) = plane_range(colorspace, depth, i);
                    assert!(plane.iter().all(|x| *x >= lo && *x <= hi));
                }
                assert_eq!(inverse(&planes), image);
            }
        }
    }

    #[test]
    fn rejects_bad_input() {
        let image = RasterImage::new(1, 1, ColorSpace::CMYK, BitDepth::Eight, vec![0; 4]).unwrap();
        assert!(matches!(
            forward(&image),
            Err(TicEncodeErrors::UnsupportedLayout(ColorSpace::CMYK, BitDepth::Eight))
        ));

        let image = RasterImage::new(1, 1, ColorSpace::Luma, BitDepth::Ten, vec![1024]).unwrap();
        assert!(matches!(
            forward(&image),
            Err(TicEncodeErrors::SampleOutOfRange(1024, BitDepth::Ten))
        ));
    }
}
