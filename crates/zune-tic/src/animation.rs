/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Frame sequences
//!
//! A sequence stores complete still images, each with a display duration,
//! and how often the sequence is played.
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;
use zune_core::options::{DecoderOptions, EncoderOptions};

use crate::container::{assemble_sequence, parse_sequence, Sequence, SequenceInfo};
use crate::decoder::TicDecoder;
use crate::encoder::TicEncoder;
use crate::errors::{TicDecodeErrors, TicEncodeErrors};
use crate::image::RasterImage;

/// A decoded frame of a sequence
///
/// The duration is how long this frame is shown before the next one,
/// in milliseconds
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    image:    RasterImage,
    duration: u32
}

impl Frame {
    /// Create a new frame shown for `duration` milliseconds
    pub fn new(image: RasterImage, duration: u32) -> Frame {
        Frame { image, duration }
    }

    pub const fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_image(self) -> RasterImage {
        self.image
    }

    /// Display time in milliseconds
    pub const fn duration(&self) -> u32 {
        self.duration
    }
}

/// An encoder for frame sequences
///
/// Frames are encoded as they are added, every frame must share the
/// geometry and layout given to [`new`](Self::new).
///
/// # Example
/// ```
/// use zune_core::bit_depth::BitDepth;
/// use zune_core::colorspace::ColorSpace;
/// use zune_core::options::EncoderOptions;
/// use zune_tic::{RasterImage, TicAnimationEncoder, TicEncodeErrors};
///
/// fn main() -> Result<(), TicEncodeErrors> {
///     let mut encoder =
///         TicAnimationEncoder::new(2, 1, ColorSpace::Luma, BitDepth::Eight, EncoderOptions::default())
///             .set_loop_count(2);
///
///     encoder.add_frame(&RasterImage::from_u8(2, 1, ColorSpace::Luma, &[0, 255])?, 100)?;
///     encoder.add_frame(&RasterImage::from_u8(2, 1, ColorSpace::Luma, &[255, 0])?, 100)?;
///
///     let output = encoder.encode()?;
///     assert!(output.starts_with(b"zTIA"));
///     Ok(())
/// }
/// ```
pub struct TicAnimationEncoder {
    info:    SequenceInfo,
    options: EncoderOptions,
    frames:  Vec<(u32, Vec<u8>)>
}

impl TicAnimationEncoder {
    /// Create an encoder for frames of `width` x `height`, played forever
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth, options: EncoderOptions
    ) -> TicAnimationEncoder {
        let info = SequenceInfo {
            width,
            height,
            colorspace,
            depth,
            loop_count: 0,
            frame_count: 0
        };
        TicAnimationEncoder {
            info,
            options,
            frames: Vec::new()
        }
    }

    /// Number of times the sequence is played, zero plays it forever
    pub fn set_loop_count(mut self, loop_count: u16) -> Self {
        self.info.loop_count = loop_count;
        self
    }

    /// Number of frames added so far
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Encode `image` as the next frame, shown for `duration` milliseconds
    ///
    /// # Errors
    /// - [`TicEncodeErrors::FrameMismatch`] if the geometry or layout differs
    ///   from the sequence
    /// - anything [`TicEncoder::encode`] reports for the frame
    pub fn add_frame(&mut self, image: &RasterImage, duration: u32) -> Result<(), TicEncodeErrors> {
        if image.width() != self.info.width {
            return Err(TicEncodeErrors::FrameMismatch("width"));
        }
        if image.height() != self.info.height {
            return Err(TicEncodeErrors::FrameMismatch("height"));
        }
        if image.colorspace() != self.info.colorspace {
            return Err(TicEncodeErrors::FrameMismatch("colorspace"));
        }
        if image.depth() != self.info.depth {
            return Err(TicEncodeErrors::FrameMismatch("depth"));
        }
        let data = TicEncoder::new(image, self.options).encode()?;

        trace!(
            "Frame {} coded to {} bytes, shown for {duration} ms",
            self.frames.len(),
            data.len()
        );
        self.frames.push((duration, data));
        Ok(())
    }

    /// Write the sequence container
    ///
    /// # Errors
    /// [`TicEncodeErrors::NoFrames`] if no frame was added
    pub fn encode(&self) -> Result<Vec<u8>, TicEncodeErrors> {
        if self.frames.is_empty() {
            return Err(TicEncodeErrors::NoFrames);
        }
        let info = SequenceInfo {
            frame_count: self.frames.len(),
            ..self.info
        };
        assemble_sequence(&info, &self.frames)
    }
}

/// A decoder for frame sequences
///
/// Frames are decoded one at a time, either by index with
/// [`decode_frame`](Self::decode_frame) or in order with
/// [`next_frame`](Self::next_frame). The decoder options, including an
/// output size, apply to every frame.
pub struct TicAnimationDecoder<'a> {
    data:       &'a [u8],
    options:    DecoderOptions,
    sequence:   Option<Sequence<'a>>,
    next_frame: usize
}

impl<'a> TicAnimationDecoder<'a> {
    /// Create a new decoder with the default options
    pub fn new(data: &'a [u8]) -> TicAnimationDecoder<'a> {
        TicAnimationDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> TicAnimationDecoder<'a> {
        TicAnimationDecoder {
            data,
            options,
            sequence: None,
            next_frame: 0
        }
    }

    /// Parse the sequence header and frame table
    ///
    /// Unlike still images the whole container is needed since the
    /// checksum covers every frame.
    pub fn decode_headers(&mut self) -> Result<(), TicDecodeErrors> {
        if self.sequence.is_some() {
            return Ok(());
        }
        let sequence = parse_sequence(self.data, &self.options)?;

        trace!("Sequence width: {:?}", sequence.info.width);
        trace!("Sequence height: {:?}", sequence.info.height);
        trace!("Sequence colorspace: {:?}", sequence.info.colorspace);
        trace!("Sequence depth: {:?}", sequence.info.depth);
        trace!(
            "Frames: {}, loop count {}",
            sequence.info.frame_count,
            sequence.info.loop_count
        );
        self.sequence = Some(sequence);
        Ok(())
    }

    /// Sequence information, or `None` if headers were not decoded
    pub fn info(&self) -> Option<SequenceInfo> {
        self.sequence.as_ref().map(|x| x.info)
    }

    pub fn num_frames(&self) -> Option<usize> {
        self.info().map(|x| x.frame_count)
    }

    /// Number of times the sequence is played, zero plays it forever
    pub fn loop_count(&self) -> Option<u16> {
        self.info().map(|x| x.loop_count)
    }

    /// Display time of frame `index` in milliseconds
    pub fn frame_duration(&self, index: usize) -> Option<u32> {
        self.sequence
            .as_ref()?
            .frames
            .get(index)
            .map(|x| x.duration)
    }

    /// Decode frame `index`
    ///
    /// # Errors
    /// - [`TicDecodeErrors::FrameOutOfRange`] if there is no such frame
    /// - [`TicDecodeErrors::FrameMismatch`] if the frame header disagrees
    ///   with the sequence header
    /// - anything [`TicDecoder::decode`] reports for the frame
    pub fn decode_frame(&mut self, index: usize) -> Result<Frame, TicDecodeErrors> {
        self.decode_headers()?;

        let sequence = self
            .sequence
            .as_ref()
            .ok_or(TicDecodeErrors::InvalidHeader("sequence headers missing"))?;
        let entry = sequence
            .frames
            .get(index)
            .ok_or(TicDecodeErrors::FrameOutOfRange(index, sequence.frames.len()))?;

        let mut decoder = TicDecoder::new_with_options(entry.data, self.options);
        decoder.decode_headers()?;

        let matches = decoder.info().map_or(false, |x| {
            (x.width, x.height, x.colorspace, x.depth)
                == (
                    sequence.info.width,
                    sequence.info.height,
                    sequence.info.colorspace,
                    sequence.info.depth
                )
        });
        if !matches {
            return Err(TicDecodeErrors::FrameMismatch(index));
        }
        let image = decoder.decode()?;

        Ok(Frame::new(image, entry.duration))
    }

    /// Decode the frame after the last one returned here, `None` once
    /// every frame was returned
    pub fn next_frame(&mut self) -> Result<Option<Frame>, TicDecodeErrors> {
        self.decode_headers()?;

        if self.next_frame >= self.num_frames().unwrap_or(0) {
            return Ok(None);
        }
        let frame = self.decode_frame(self.next_frame)?;
        self.next_frame += 1;

        Ok(Some(frame))
    }

    /// Decode every frame in order
    pub fn decode_all(&mut self) -> Result<Vec<Frame>, TicDecodeErrors> {
        self.decode_headers()?;

        let count = self.num_frames().unwrap_or(0);
        (0..count).map(|i| self.decode_frame(i)).collect()
    }
}
