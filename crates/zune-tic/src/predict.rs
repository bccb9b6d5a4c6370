/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Spatial prediction of tile planes
//!
//! Every plane of a tile is predicted from its own already coded samples,
//! neighbours outside the tile are synthesised from inside it so that tiles
//! can be coded independently.
use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::{CompressionMode, EncoderOptions};

use crate::errors::TileErrors;

/// The closed set of predictors a tile plane can use
///
/// The discriminant is the id stored in the tile stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Predictor {
    /// Always zero
    Zero = 0,
    Left = 1,
    Top = 2,
    /// Floor of the mean of left and top
    Average = 3,
    /// `left + top - top_left` clamped to the plane range
    Gradient = 4,
    /// Gradient when top-left lies between left and top, otherwise
    /// whichever of left or top is closer to the edge
    ClampedGradient = 5,
    /// The PNG paeth predictor
    Paeth = 6
}

impl Predictor {
    pub const ALL: [Predictor; 7] = [
        Predictor::Zero,
        Predictor::Left,
        Predictor::Top,
        Predictor::Average,
        Predictor::Gradient,
        Predictor::ClampedGradient,
        Predictor::Paeth
    ];

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn from_id(id: u8) -> Option<Predictor> {
        match id {
            0 => Some(Predictor::Zero),
            1 => Some(Predictor::Left),
            2 => Some(Predictor::Top),
            3 => Some(Predictor::Average),
            4 => Some(Predictor::Gradient),
            5 => Some(Predictor::ClampedGradient),
            6 => Some(Predictor::Paeth),
            _ => None
        }
    }

    /// Predict a sample from its neighbours
    ///
    /// The result always lies in `[lo, hi]` provided the neighbours do.
    #[inline(always)]
    pub fn predict(self, left: i32, top: i32, top_left: i32, lo: i32, hi: i32) -> i32 {
        match self {
            Predictor::Zero => 0_i32.clamp(lo, hi),
            Predictor::Left => left,
            Predictor::Top => top,
            Predictor::Average => (left + top) >> 1,
            Predictor::Gradient => (left + top - top_left).clamp(lo, hi),
            Predictor::ClampedGradient => {
                let ac = left - top_left;
                let ab = left - top;
                let bc = top - top_left;

                let grad = ac + top;

                let d = ab ^ bc;
                let s = ac ^ bc;

                let clamp = if d < 0 { top } else { left };

                if s < 0 {
                    grad
                } else {
                    clamp
                }
            }
            Predictor::Paeth => {
                let p = left + top - top_left;
                let pa = (p - left).abs();
                let pb = (p - top).abs();
                let pc = (p - top_left).abs();

                if pa <= pb && pa <= pc {
                    left
                } else if pb <= pc {
                    top
                } else {
                    top_left
                }
            }
        }
    }
}

/// Return `(left, top, top_left)` of position `(x, y)` in a plane
///
/// On the first row top and top-left repeat left, on the first column left
/// and top-left repeat top and the origin sees zeroes.
#[inline(always)]
pub fn neighbours(plane: &[i32], width: usize, x: usize, y: usize) -> (i32, i32, i32) {
    let pos = y * width + x;

    match (x, y) {
        (0, 0) => (0, 0, 0),
        (_, 0) => {
            let left = plane[pos - 1];
            (left, left, left)
        }
        (0, _) => {
            let top = plane[pos - width];
            (top, top, top)
        }
        _ => (plane[pos - 1], plane[pos - width], plane[pos - width - 1])
    }
}

/// Largest deviation a reconstructed plane sample may have from the
/// original for `quality`
///
/// `((100 - q) * 16 / 100) << (bits - 8)`, zero at quality 100
pub const fn plane_tolerance(quality: u8, depth: BitDepth) -> i32 {
    let quality = if quality > 100 { 100 } else { quality };
    let base = ((100 - quality as i32) * 16) / 100;

    base << depth.bit_size().saturating_sub(8)
}

/// Largest absolute difference between an original sample and its decoded
/// value for the given options and layout
///
/// Zero in lossless mode. For RGB(A) images the colour transform can
/// amplify plane deviations, giving `3δ + 1`.
pub fn max_error(options: &EncoderOptions, colorspace: ColorSpace, depth: BitDepth) -> u16 {
    let delta = match options.mode() {
        CompressionMode::Lossless => 0,
        CompressionMode::Lossy => plane_tolerance(options.quality(), depth)
    };
    if delta == 0 {
        return 0;
    }
    let bound = match colorspace {
        ColorSpace::RGB | ColorSpace::RGBA => 3 * delta + 1,
        _ => delta
    };
    bound.min(i32::from(depth.max_value())) as u16
}

/// Uniform residual quantizer used by the lossy mode
///
/// With a tolerance of zero it passes residuals through unchanged.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Quantizer {
    delta: i32,
    step:  i32
}

impl Quantizer {
    pub const fn new(delta: i32) -> Quantizer {
        Quantizer {
            delta,
            step: 2 * delta + 1
        }
    }

    /// Quantizer for the mode and quality stored in a header
    pub const fn for_mode(mode: CompressionMode, quality: u8, depth: BitDepth) -> Quantizer {
        match mode {
            CompressionMode::Lossless => Quantizer::new(0),
            CompressionMode::Lossy => Quantizer::new(plane_tolerance(quality, depth))
        }
    }

    pub const fn is_lossless(&self) -> bool {
        self.delta == 0
    }

    #[inline(always)]
    pub fn quantize(&self, residual: i32) -> i32 {
        if self.delta == 0 {
            residual
        } else if residual >= 0 {
            (residual + self.delta) / self.step
        } else {
            -((self.delta - residual) / self.step)
        }
    }

    #[inline(always)]
    pub fn dequantize(&self, value: i32) -> i32 {
        value * self.step
    }
}

/// Pick the predictor with the smallest sum of absolute residuals
///
/// Rows are sampled, higher effort looks at more of them. Effort zero
/// skips the search. Ties go to the lower id.
pub fn choose_predictor(
    plane: &[i32], width: usize, height: usize, effort: u8, lo: i32, hi: i32
) -> Predictor {
    if effort == 0 {
        return Predictor::ClampedGradient;
    }
    let row_step = usize::from(10 - effort.min(9));

    let mut best = Predictor::ClampedGradient;
    let mut best_cost = u64::MAX;

    for predictor in Predictor::ALL {
        let mut cost = 0_u64;

        for y in (0..height).step_by(row_step) {
            for x in 0..width {
                let (left, top, top_left) = neighbours(plane, width, x, y);
                let pred = predictor.predict(left, top, top_left, lo, hi);

                cost += u64::from((plane[y * width + x] - pred).unsigned_abs());
            }
        }
        if cost < best_cost {
            best_cost = cost;
            best = predictor;
        }
    }
    best
}

/// Compute the (possibly quantized) residuals of a plane
///
/// Predictions are formed from reconstructed values, so the decoder,
/// seeing only residuals, arrives at the same samples.
pub fn encode_plane(
    plane: &[i32], width: usize, height: usize, predictor: Predictor, quantizer: Quantizer,
    lo: i32, hi: i32
) -> Vec<i32> {
    let mut residuals = Vec::with_capacity(width * height);

    if quantizer.is_lossless() {
        for y in 0..height {
            for x in 0..width {
                let (left, top, top_left) = neighbours(plane, width, x, y);
                let pred = predictor.predict(left, top, top_left, lo, hi);

                residuals.push(plane[y * width + x] - pred);
            }
        }
        return residuals;
    }
    let mut recon = vec![0; width * height];

    for y in 0..height {
        for x in 0..width {
            let (left, top, top_left) = neighbours(&recon, width, x, y);
            let pred = predictor.predict(left, top, top_left, lo, hi);
            let pos = y * width + x;

            let value = quantizer.quantize(plane[pos] - pred);

            recon[pos] = (pred + quantizer.dequantize(value)).clamp(lo, hi);
            residuals.push(value);
        }
    }
    residuals
}

/// Rebuild a plane from its residuals
///
/// # Errors
/// In lossless mode a sample landing outside `[lo, hi]` can only come from
/// a damaged stream and is reported as [`TileErrors::ModelDesync`].
pub fn decode_plane(
    residuals: &[i32], width: usize, height: usize, predictor: Predictor, quantizer: Quantizer,
    lo: i32, hi: i32
) -> Result<Vec<i32>, TileErrors> {
    let mut plane = vec![0; width * height];

    for y in 0..height {
        for x in 0..width {
            let (left, top, top_left) = neighbours(&plane, width, x, y);
            let pred = predictor.predict(left, top, top_left, lo, hi);
            let pos = y * width + x;

            let value = pred + quantizer.dequantize(residuals[pos]);

            plane[pos] = if quantizer.is_lossless() {
                if value < lo || value > hi {
                    return Err(TileErrors::ModelDesync("sample outside of plane range"));
                }
                value
            } else {
                value.clamp(lo, hi)
            };
        }
    }
    Ok(plane)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};

    use super::*;

    #[test]
    fn ids_are_stable() {
        for predictor in Predictor::ALL {
            assert_eq!(Predictor::from_id(predictor.id()), Some(predictor));
        }
        assert_eq!(Predictor::from_id(7), None);
    }

    #[test]
    fn predictions_stay_in_range() {
        let mut rand = WyRand::new_seed(3);
        let (lo, hi) = (-255, 255);
        // draw unsigned offsets, signed ranges are off by one in nanorand
        let mut draw = || rand.generate_range(0_u32..=(hi - lo) as u32) as i32 + lo;

        for _ in 0..2000 {
            let (l, t, tl) = (draw(), draw(), draw());

            for predictor in Predictor::ALL {
                let p = predictor.predict(l, t, tl, lo, hi);
                assert!(p >= lo && p <= hi, "{predictor:?} gave {p}");
            }
        }
    }

    #[test]
    fn edges_use_tile_samples() {
        let plane = [1, 2, 3, 4, 5, 6];
        assert_eq!(neighbours(&plane, 3, 0, 0), (0, 0, 0));
        assert_eq!(neighbours(&plane, 3, 2, 0), (2, 2, 2));
        assert_eq!(neighbours(&plane, 3, 0, 1), (1, 1, 1));
        assert_eq!(neighbours(&plane, 3, 1, 1), (4, 2, 1));
    }

    #[test]
    fn quantizer_error_is_bounded() {
        for delta in [0, 1, 4, 16, 64] {
            let quantizer = Quantizer::new(delta);
            for residual in -600..=600 {
                let back = quantizer.dequantize(quantizer.quantize(residual));
                assert!((back - residual).abs() <= delta);
            }
        }
    }

    #[test]
    fn tolerance_is_monotonic() {
        let mut previous = i32::MAX;
        for quality in 0..=100 {
            let delta = plane_tolerance(quality, BitDepth::Twelve);
            assert!(delta <= previous);
            previous = delta;
        }
        assert_eq!(plane_tolerance(100, BitDepth::Sixteen), 0);
        assert_eq!(plane_tolerance(0, BitDepth::Eight), 16);
    }

    #[test]
    fn smooth_ramp_prefers_spatial_predictor() {
        let (width, height) = (16, 16);
        let plane: Vec<i32> = (0..width * height).map(|i| (i % width) as i32 * 3).collect();

        let chosen = choose_predictor(&plane, width, height, 9, 0, 255);
        assert_ne!(chosen, Predictor::Zero);
        assert_eq!(
            choose_predictor(&plane, width, height, 0, 0, 255),
            Predictor::ClampedGradient
        );
    }

    #[test]
    fn planes_reconstruct() {
        let mut rand = WyRand::new_seed(11);
        let (width, height) = (9, 5);
        let plane: Vec<i32> = (0..width * height)
            .map(|_| rand.generate_range(0_u32..=2046) as i32 - 1023)
            .collect();

        for predictor in Predictor::ALL {
            let lossless = Quantizer::new(0);
            let residuals = encode_plane(&plane, width, height, predictor, lossless, -1023, 1023);
            let back =
                decode_plane(&residuals, width, height, predictor, lossless, -1023, 1023).unwrap();
            assert_eq!(back, plane);

            let lossy = Quantizer::new(8);
            let residuals = encode_plane(&plane, width, height, predictor, lossy, -1023, 1023);
            let back =
                decode_plane(&residuals, width, height, predictor, lossy, -1023, 1023).unwrap();
            for (a, b) in back.iter().zip(plane.iter()) {
                assert!((a - b).abs() <= 8);
            }
        }
    }
}
