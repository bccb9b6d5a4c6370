/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use zune_core::log::{log_enabled, trace, Level};
use zune_core::options::{CompressionMode, EncoderOptions};

use crate::color_convert::{forward, plane_range, InternalSamples};
use crate::container::{assemble, CodedTile, ImageInfo};
use crate::entropy;
use crate::errors::{TicEncodeErrors, MAX_DIMENSIONS};
use crate::image::RasterImage;
use crate::predict::{choose_predictor, encode_plane, Quantizer};
use crate::tiles::{split, Tile, TileRect};
use crate::worker::run_ordered;

/// A tiled image encoder
///
/// The image is split into square tiles which are predicted and entropy
/// coded independently, so the work spreads across threads and the output
/// is identical no matter how many threads ran.
///
/// # Multithreading support
/// Via the `threads` feature, the library can use multiple threads to speed up compression,
/// at runtime the number is configured via [`EncoderOptions::set_num_threads`].
/// Setting it to `1` forces single threaded execution.
///
/// # Example
/// - Encode a grayscale image
///
/// ```
/// use zune_core::colorspace::ColorSpace;
/// use zune_core::options::EncoderOptions;
/// use zune_tic::{RasterImage, TicEncodeErrors, TicEncoder};
///
/// fn main() -> Result<(), TicEncodeErrors> {
///     let pixels: [u8; 100] = core::array::from_fn(|x| x as u8);
///     let image = RasterImage::from_u8(10, 10, ColorSpace::Luma, &pixels)?;
///
///     let encoder = TicEncoder::new(&image, EncoderOptions::default());
///     let output = encoder.encode()?;
///     assert!(output.starts_with(b"zTIC"));
///     Ok(())
/// }
/// ```
pub struct TicEncoder<'a> {
    image:   &'a RasterImage,
    options: EncoderOptions
}

impl<'a> TicEncoder<'a> {
    /// Create a new encoder for `image`
    pub fn new(image: &'a RasterImage, options: EncoderOptions) -> TicEncoder<'a> {
        TicEncoder { image, options }
    }

    fn validate(&self) -> Result<(), TicEncodeErrors> {
        let (width, height) = self.image.dimensions();

        if width == 0 {
            return Err(TicEncodeErrors::InvalidDimensions("width"));
        }
        if height == 0 {
            return Err(TicEncodeErrors::InvalidDimensions("height"));
        }
        if width > MAX_DIMENSIONS {
            return Err(TicEncodeErrors::TooLargeDimensions(width));
        }
        if height > MAX_DIMENSIONS {
            return Err(TicEncodeErrors::TooLargeDimensions(height));
        }
        if !self.options.is_valid_tile_size() {
            return Err(TicEncodeErrors::InvalidTileSize(self.options.tile_size()));
        }
        let expected = width * height * self.image.colorspace().num_components();
        let found = self.image.samples().len();

        if expected != found {
            return Err(TicEncodeErrors::LengthMismatch(expected, found));
        }
        Ok(())
    }

    /// Encode the image into a container
    ///
    /// # Errors
    /// Any [`TicEncodeErrors`] of kind `Input` when the image or options
    /// cannot be coded
    pub fn encode(&self) -> Result<Vec<u8>, TicEncodeErrors> {
        self.validate()?;

        let (width, height) = self.image.dimensions();
        let colorspace = self.image.colorspace();
        let depth = self.image.depth();
        let tile_size = self.options.tile_size();

        if log_enabled!(Level::Trace) {
            trace!("TIC details");
            trace!("Width: {}", width);
            trace!("Height: {}", height);
            trace!("Colorspace: {:?}", colorspace);
            trace!("Depth: {:?}", depth);
            trace!("Mode: {:?}", self.options.mode());
            trace!("Quality: {}", self.options.quality());
            trace!("Effort: {}", self.options.effort());
            trace!("Tile size: {}", tile_size);
            trace!("Configured threads: {:?}", self.options.num_threads());
        }

        let samples = forward(self.image)?;
        let rects = split(width, height, tile_size)?;

        // lossless images record full quality so headers stay canonical
        let quality = match self.options.mode() {
            CompressionMode::Lossless => 100,
            CompressionMode::Lossy => self.options.quality()
        };
        let quantizer = Quantizer::for_mode(self.options.mode(), quality, depth);
        let effort = self.options.effort();

        let tiles = run_ordered(
            rects.len(),
            usize::from(self.options.num_threads()),
            |i| Ok::<_, TicEncodeErrors>(encode_tile(&samples, rects[i], quantizer, effort))
        )?;

        let info = ImageInfo {
            width,
            height,
            colorspace,
            depth,
            mode: self.options.mode(),
            quality,
            tile_size,
            tile_count: rects.len()
        };
        let output = assemble(&info, &tiles)?;

        trace!("Encoded {} tiles into {} bytes", rects.len(), output.len());

        Ok(output)
    }
}

/// Predict and entropy code a single tile
fn encode_tile(
    samples: &InternalSamples, rect: TileRect, quantizer: Quantizer, effort: u8
) -> CodedTile {
    let tile = Tile::extract(samples, rect);

    let mut predictors = Vec::with_capacity(tile.planes.len());
    let mut residuals = Vec::with_capacity(tile.planes.len());

    for (i, plane) in tile.planes.iter().enumerate() {
        let (lo, hi) = plane_range(samples.colorspace, samples.depth, i);
        let predictor = choose_predictor(plane, rect.width, rect.height, effort, lo, hi);

        residuals.push(encode_plane(
            plane,
            rect.width,
            rect.height,
            predictor,
            quantizer,
            lo,
            hi
        ));
        predictors.push(predictor.id());
    }

    CodedTile {
        index: rect.index,
        data:  entropy::encode(&predictors, &residuals, rect.width, samples.depth)
    }
}
