/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use zune_core::log::trace;
use zune_core::options::DecoderOptions;

use crate::color_convert::{inverse, plane_range, InternalSamples};
use crate::container::{parse, parse_header, ImageInfo};
use crate::entropy;
use crate::errors::{TicDecodeErrors, TileErrors};
use crate::image::RasterImage;
use crate::predict::{decode_plane, Predictor, Quantizer};
use crate::resize::resize;
use crate::tiles::{split, Tile, TileRect};
use crate::worker::run_ordered;

/// A tiled image decoder
///
/// The decoder is initialized by calling `new` and either of
/// [`decode_headers`] to read image information or [`decode`] to return
/// the decoded image.
///
/// Decoding either returns a complete image or an error, partially
/// decoded images are never handed out.
///
/// When [`DecoderOptions::set_output_size`] is configured the decoded
/// image is resampled before it is returned.
///
/// [`decode_headers`]:TicDecoder::decode_headers
/// [`decode`]:TicDecoder::decode
pub struct TicDecoder<'a> {
    data:    &'a [u8],
    options: DecoderOptions,
    info:    Option<ImageInfo>
}

impl<'a> TicDecoder<'a> {
    /// Create a new decoder with the default options
    ///
    /// # Example
    ///
    /// ```no_run
    /// let mut decoder = zune_tic::TicDecoder::new(&[]);
    /// // additional code
    /// ```
    pub fn new(data: &'a [u8]) -> TicDecoder<'a> {
        TicDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a decoder that obeys the specified restrictions
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Example
    /// ```
    /// use zune_core::options::DecoderOptions;
    /// use zune_tic::TicDecoder;
    /// // only decode images less than 10 in both width and height
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = TicDecoder::new_with_options(&[], options);
    /// ```
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> TicDecoder<'a> {
        TicDecoder {
            data,
            options,
            info: None
        }
    }

    /// Decode the container header storing image information in the
    /// decoder
    ///
    /// Only the fixed header is read, tile payloads are not checked
    pub fn decode_headers(&mut self) -> Result<(), TicDecodeErrors> {
        if self.info.is_some() {
            return Ok(());
        }
        let info = parse_header(self.data, &self.options)?;

        trace!("Image width: {:?}", info.width);
        trace!("Image height: {:?}", info.height);
        trace!("Image colorspace: {:?}", info.colorspace);
        trace!("Image depth: {:?}", info.depth);
        trace!("Compression: {:?}, quality {}", info.mode, info.quality);
        trace!("Tiles: {} of size {}", info.tile_count, info.tile_size);

        self.info = Some(info);
        Ok(())
    }

    /// Image information, or `None` if headers were not decoded
    pub const fn info(&self) -> Option<ImageInfo> {
        self.info
    }

    /// Return width and height of the image, or `None` if headers
    /// were not decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info.map(|x| (x.width, x.height))
    }

    /// Number of samples the decoded image holds, or `None` if headers
    /// were not decoded
    ///
    /// This accounts for a configured output size
    pub fn output_buffer_size(&self) -> Option<usize> {
        let info = self.info?;
        let (width, height) = self.options.output_size().unwrap_or((info.width, info.height));

        width
            .checked_mul(height)?
            .checked_mul(info.colorspace.num_components())
    }

    /// Decode the whole image
    ///
    /// # Errors
    /// - `Format` errors when the container is malformed, truncated or its
    ///   checksum does not match
    /// - [`TicDecodeErrors::CorruptTile`] when a tile stream is damaged
    pub fn decode(&mut self) -> Result<RasterImage, TicDecodeErrors> {
        self.decode_headers()?;

        let container = parse(self.data, &self.options)?;
        let info = container.info;
        let (out_width, out_height) = output_size(&info, &self.options)?;

        let rects = split(info.width, info.height, info.tile_size)
            .map_err(|_| TicDecodeErrors::InvalidHeader("image has no tiles"))?;
        let quantizer = Quantizer::for_mode(info.mode, info.quality, info.depth);

        let tiles = run_ordered(
            rects.len(),
            usize::from(self.options.num_threads()),
            |i| {
                decode_tile(container.tiles[i], rects[i], &info, quantizer)
                    .map_err(|err| TicDecodeErrors::CorruptTile(i, err))
            }
        )?;

        let mut samples = InternalSamples::new(info.width, info.height, info.colorspace, info.depth);

        for tile in &tiles {
            tile.scatter_into(&mut samples);
        }
        trace!("Decoded {} tiles", tiles.len());

        let image = inverse(&samples);

        if (out_width, out_height) != (info.width, info.height) {
            let method = self.options.resize_method();
            trace!("Resizing to {out_width}x{out_height} with {method:?}");

            return Ok(resize(&image, out_width, out_height, method));
        }
        Ok(image)
    }
}

/// Size of the image handed back to the caller
fn output_size(info: &ImageInfo, options: &DecoderOptions) -> Result<(usize, usize), TicDecodeErrors> {
    let (width, height) = match options.output_size() {
        Some(size) => size,
        None => return Ok((info.width, info.height))
    };
    if width == 0 || height == 0 {
        return Err(TicDecodeErrors::InvalidOutputSize(width, height));
    }
    if width > options.max_width() {
        return Err(TicDecodeErrors::TooLargeDimensions(
            "output width",
            options.max_width(),
            width
        ));
    }
    if height > options.max_height() {
        return Err(TicDecodeErrors::TooLargeDimensions(
            "output height",
            options.max_height(),
            height
        ));
    }
    Ok((width, height))
}

/// Entropy decode and reconstruct the planes of a tile
fn decode_tile(
    data: &[u8], rect: TileRect, info: &ImageInfo, quantizer: Quantizer
) -> Result<Tile, TileErrors> {
    let num_planes = info.colorspace.num_components();

    let (ids, residuals) = entropy::decode(data, rect.width, rect.height, num_planes, info.depth)?;

    let mut planes = Vec::with_capacity(num_planes);

    for (i, (id, residual)) in ids.iter().zip(residuals.iter()).enumerate() {
        let predictor = Predictor::from_id(*id).ok_or(TileErrors::PredictorMismatch(*id))?;
        let (lo, hi) = plane_range(info.colorspace, info.depth, i);

        planes.push(decode_plane(
            residual,
            rect.width,
            rect.height,
            predictor,
            quantizer,
            lo,
            hi
        )?);
    }
    Ok(Tile { rect, planes })
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;
    use zune_core::options::{CompressionMode, EncoderOptions};

    use super::*;
    use crate::container::{CodedTile, FIXED_HEADER_SIZE, TIC_MAGIC};
    use crate::encoder::TicEncoder;

    /// Wrap a hand built tile stream as a lossless 4x4 luma image
    fn single_tile_container(tile: Vec<u8>) -> Vec<u8> {
        let info = ImageInfo {
            width:      4,
            height:     4,
            colorspace: ColorSpace::Luma,
            depth:      BitDepth::Eight,
            mode:       CompressionMode::Lossless,
            quality:    100,
            tile_size:  16,
            tile_count: 1
        };
        crate::container::assemble(&info, &[CodedTile { index: 0, data: tile }]).unwrap()
    }

    #[test]
    fn headers_before_decode() {
        let image = RasterImage::from_u8(2, 3, ColorSpace::Luma, &[1, 2, 3, 4, 5, 6]).unwrap();
        let bytes = TicEncoder::new(&image, EncoderOptions::default()).encode().unwrap();

        let mut decoder = TicDecoder::new(&bytes);
        assert!(decoder.info().is_none());
        assert!(decoder.output_buffer_size().is_none());

        decoder.decode_headers().unwrap();
        assert_eq!(decoder.dimensions(), Some((2, 3)));
        assert_eq!(decoder.output_buffer_size(), Some(6));

        assert_eq!(decoder.decode().unwrap(), image);
    }

    #[test]
    fn headers_need_only_header_bytes() {
        let image = RasterImage::from_u8(2, 1, ColorSpace::Luma, &[1, 2]).unwrap();
        let bytes = TicEncoder::new(&image, EncoderOptions::default()).encode().unwrap();

        let mut decoder = TicDecoder::new(&bytes[..FIXED_HEADER_SIZE]);
        decoder.decode_headers().unwrap();
        assert_eq!(decoder.info().unwrap().tile_count, 1);
        assert!(matches!(
            decoder.decode(),
            Err(TicDecodeErrors::TruncatedContainer(_, _))
        ));
    }

    #[test]
    fn unknown_predictor_is_reported() {
        // predictor ids are the first three bits of the tile stream, all ones
        // decodes as id 7 which no predictor owns
        let mut writer = crate::bit_writer::BitWriter::new();
        writer.put_bits(3, 7);
        for _ in 0..64 {
            writer.put_bits(8, 0);
        }
        writer.flush();
        let bytes = single_tile_container(writer.into_inner());
        assert_eq!(&bytes[..4], &TIC_MAGIC);

        let err = TicDecoder::new(&bytes).decode().unwrap_err();
        assert!(matches!(
            err,
            TicDecodeErrors::CorruptTile(0, TileErrors::PredictorMismatch(7))
        ));
    }

    #[test]
    fn oversized_residual_is_desync() {
        // 511 still has a token in the 8 bit alphabet but no two 8 bit
        // samples are that far apart
        let mut residuals = vec![0_i32; 16];
        residuals[5] = 511;
        let tile = crate::entropy::encode(&[Predictor::Left.id()], &[residuals], 4, BitDepth::Eight);

        let bytes = single_tile_container(tile);
        let err = TicDecoder::new(&bytes).decode().unwrap_err();

        assert!(matches!(
            err,
            TicDecodeErrors::CorruptTile(0, TileErrors::ModelDesync(_))
        ));
        assert_eq!(err.kind(), crate::ErrorKind::Corruption);
    }
}
