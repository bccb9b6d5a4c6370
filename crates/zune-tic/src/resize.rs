/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Resampling decoded images
//!
//! Output sample `x` maps to source position `x * in / out`, the same
//! top left aligned mapping on both axes. Each output sample is a weighted
//! sum of at most four source samples per axis, weights are normalized so
//! flat areas stay flat.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

use alloc::vec;
use alloc::vec::Vec;

use zune_core::options::ResizeMethod;

use crate::image::RasterImage;

/// Catmull-Rom
const A: f32 = -0.5;

/// Fractional bits of source positions
const POSITION_BITS: u32 = 16;

#[inline]
fn bicubic_kernel(x: f32) -> f32 {
    let x = if x < 0.0 { -x } else { x };
    let x2 = x * x;
    let x3 = x2 * x;

    if x <= 1.0 {
        (A + 2.0) * x3 - (A + 3.0) * x2 + 1.0
    } else if x < 2.0 {
        A * x3 - 5.0 * A * x2 + 8.0 * A * x - 4.0 * A
    } else {
        0.0
    }
}

/// Source samples contributing to one output position
#[derive(Copy, Clone, Debug, Default)]
struct Taps {
    index:  [usize; 4],
    weight: [f32; 4],
    len:    usize
}

impl Taps {
    fn push(&mut self, index: usize, weight: f32) {
        self.index[self.len] = index;
        self.weight[self.len] = weight;
        self.len += 1;
    }

    fn normalize(&mut self) {
        let sum: f32 = self.weight[..self.len].iter().sum();

        if sum != 0.0 {
            for w in &mut self.weight[..self.len] {
                *w /= sum;
            }
        }
    }
}

/// Compute the taps of every output position along one axis
fn axis_taps(in_len: usize, out_len: usize, method: ResizeMethod) -> Vec<Taps> {
    let mut taps = vec![Taps::default(); out_len];

    for (x, tap) in taps.iter_mut().enumerate() {
        let position = ((x as u64 * in_len as u64) << POSITION_BITS) / out_len as u64;
        let x0 = (position >> POSITION_BITS) as usize;
        let frac = (position & ((1 << POSITION_BITS) - 1)) as f32 / (1 << POSITION_BITS) as f32;

        match method {
            ResizeMethod::Nearest => tap.push(x0, 1.0),
            ResizeMethod::Bilinear => {
                let x1 = (x0 + 1).min(in_len - 1);
                tap.push(x0, 1.0 - frac);
                tap.push(x1, frac);
            }
            ResizeMethod::Bicubic => {
                for k in -1_isize..=2 {
                    let xx = x0 as isize + k;

                    if xx >= 0 && (xx as usize) < in_len {
                        tap.push(xx as usize, bicubic_kernel(frac - k as f32));
                    }
                }
                tap.normalize();
            }
        }
    }
    taps
}

/// Resample `image` to `width` x `height`
///
/// Colorspace and depth are kept, results are rounded and clamped to the
/// range of the depth. Resampling to the current size returns a copy.
///
/// # Panics
/// If `width` or `height` is zero, or the image is empty
pub fn resize(image: &RasterImage, width: usize, height: usize, method: ResizeMethod) -> RasterImage {
    assert!(width > 0 && height > 0, "cannot resize to an empty image");

    let (in_width, in_height) = image.dimensions();
    assert!(in_width > 0 && in_height > 0, "cannot resize an empty image");

    if (in_width, in_height) == (width, height) {
        return image.clone();
    }
    let components = image.colorspace().num_components();
    let max = f32::from(image.depth().max_value());
    let input = image.samples();

    let x_taps = axis_taps(in_width, width, method);
    let y_taps = axis_taps(in_height, height, method);

    let mut output = vec![0_u16; width * height * components];
    let mut pixel = vec![0.0_f32; components];

    for (y_tap, out_row) in y_taps
        .iter()
        .zip(output.chunks_exact_mut(width * components))
    {
        for (x_tap, out_pixel) in x_taps.iter().zip(out_row.chunks_exact_mut(components)) {
            pixel.fill(0.0);

            for j in 0..y_tap.len {
                let row = y_tap.index[j] * in_width;

                for i in 0..x_tap.len {
                    let weight = y_tap.weight[j] * x_tap.weight[i];
                    let start = (row + x_tap.index[i]) * components;

                    for (acc, sample) in pixel.iter_mut().zip(&input[start..start + components]) {
                        *acc += weight * f32::from(*sample);
                    }
                }
            }
            for (out, value) in out_pixel.iter_mut().zip(pixel.iter()) {
                *out = (value.max(0.0).min(max) + 0.5) as u16;
            }
        }
    }
    RasterImage::from_parts(width, height, image.colorspace(), image.depth(), output)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};
    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;

    use super::*;

    const METHODS: [ResizeMethod; 3] = [
        ResizeMethod::Nearest,
        ResizeMethod::Bilinear,
        ResizeMethod::Bicubic
    ];

    #[test]
    fn flat_images_stay_flat() {
        let image =
            RasterImage::new(7, 5, ColorSpace::RGB, BitDepth::Ten, vec![700; 7 * 5 * 3]).unwrap();

        for method in METHODS {
            for (w, h) in [(3, 2), (14, 10), (1, 1), (20, 3)] {
                let out = resize(&image, w, h, method);
                assert_eq!(out.dimensions(), (w, h));
                assert!(out.samples().iter().all(|x| *x == 700), "{method:?} {w}x{h}");
            }
        }
    }

    #[test]
    fn nearest_halving_picks_even_samples() {
        let pixels: Vec<u8> = (0..16).collect();
        let image = RasterImage::from_u8(4, 4, ColorSpace::Luma, &pixels).unwrap();

        let out = resize(&image, 2, 2, ResizeMethod::Nearest);
        assert_eq!(out.to_u8().unwrap(), [0, 2, 8, 10]);
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let image = RasterImage::from_u8(2, 1, ColorSpace::Luma, &[0, 100]).unwrap();

        let out = resize(&image, 4, 1, ResizeMethod::Bilinear);
        assert_eq!(out.to_u8().unwrap(), [0, 50, 100, 100]);
    }

    #[test]
    fn results_stay_in_depth_range() {
        let mut rand = WyRand::new_seed(5);
        let samples = (0..9 * 6 * 4)
            .map(|_| {
                // sharp edges make the cubic overshoot
                if rand.generate::<bool>() {
                    4095
                } else {
                    0
                }
            })
            .collect();
        let image = RasterImage::new(9, 6, ColorSpace::RGBA, BitDepth::Twelve, samples).unwrap();

        for method in METHODS {
            let out = resize(&image, 23, 17, method);
            assert!(out.samples().iter().all(|x| *x <= 4095));
            assert_eq!(out.colorspace(), ColorSpace::RGBA);
        }
    }

    #[test]
    fn same_size_is_a_copy() {
        let image = RasterImage::from_u8(3, 2, ColorSpace::LumaA, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
            .unwrap();

        for method in METHODS {
            assert_eq!(resize(&image, 3, 2, method), image);
        }
    }
}
