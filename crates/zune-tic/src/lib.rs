/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Zune-tic
//!
//! A tiled predictive image codec with lossless and near-lossless modes.
//!
//! Images are decorrelated with a reversible colour transform, split into
//! square tiles and each tile plane is spatially predicted. Residuals are
//! coded with a context adaptive range coder and the tiles are wrapped in a
//! small self describing container with a trailing checksum.
//!
//! It supports the following features
//!
//! - lossless compression, bit exact
//! - near-lossless compression with a known per sample error bound, see [`max_error`]
//! - 8, 10, 12 and 16 bit images
//! - Luma, LumaA, RGB and RGBA images
//! - multithreaded encoding and decoding, with output independent of the
//!   number of threads
//! - frame sequences with per frame durations and a loop count, decoded
//!   frame by frame, see [`TicAnimationEncoder`] and [`TicAnimationDecoder`]
//! - resampling on decode to a requested output size, see
//!   [`DecoderOptions::set_output_size`](zune_core::options::DecoderOptions::set_output_size)
//!
//! # Example
//! ```
//! use zune_core::colorspace::ColorSpace;
//! use zune_core::options::{CompressionMode, EncoderOptions};
//! use zune_tic::{decode, encode, max_error, RasterImage};
//!
//! let pixels = [0, 0, 0, 255, 255, 255, 128, 128, 128, 64, 64, 64];
//! let image = RasterImage::from_u8(2, 2, ColorSpace::RGB, &pixels).unwrap();
//!
//! let options = EncoderOptions::new(CompressionMode::Lossy, 80);
//! let bytes = encode(&image, options).unwrap();
//! let decoded = decode(&bytes).unwrap();
//!
//! let bound = max_error(&options, image.colorspace(), image.depth());
//! assert!(image.max_abs_diff(&decoded).unwrap() <= bound);
//! ```
//!
//! # Features
//!  - `threads`: Use scoped threads for per tile work (default)
//!  - `std`: Enables `std::error::Error` implementations (default)
//!  - `log`: Forward trace and error messages to the `log` crate
//!  - `serde`: Serialize the layout types of `zune-core`
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use animation::{Frame, TicAnimationDecoder, TicAnimationEncoder};
pub use container::{ImageInfo, SequenceInfo};
pub use decoder::TicDecoder;
pub use encoder::TicEncoder;
pub use errors::{ErrorKind, TicDecodeErrors, TicEncodeErrors, TileErrors};
pub use image::RasterImage;
pub use predict::{max_error, Predictor};
pub use resize::resize;
pub use zune_core;

mod animation;
mod bit_reader;
mod bit_writer;
mod color_convert;
mod container;
mod decoder;
mod encoder;
mod entropy;
mod errors;
mod image;
mod predict;
mod resize;
mod tiles;
mod worker;

use alloc::vec::Vec;

use zune_core::options::EncoderOptions;

/// Encode `image` with `options`
///
/// Shorthand for [`TicEncoder::encode`]
pub fn encode(image: &RasterImage, options: EncoderOptions) -> Result<Vec<u8>, TicEncodeErrors> {
    TicEncoder::new(image, options).encode()
}

/// Decode an image with the default decoder options
///
/// Shorthand for [`TicDecoder::decode`]
pub fn decode(data: &[u8]) -> Result<RasterImage, TicDecodeErrors> {
    TicDecoder::new(data).decode()
}
