/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors raised while encoding or decoding
#![allow(clippy::uninlined_format_args)]

use core::fmt::{Debug, Display, Formatter};

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZByteIoError;
use zune_core::colorspace::ColorSpace;

/// Largest width or height the encoder accepts, matching the default
/// decoder limits
pub(crate) const MAX_DIMENSIONS: usize = zune_core::options::DEFAULT_MAX_DIMENSIONS;

pub const SUPPORTED_COLORSPACES: [ColorSpace; 4] = [
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::RGB,
    ColorSpace::RGBA
];
pub const SUPPORTED_DEPTHS: [BitDepth; 4] = [
    BitDepth::Eight,
    BitDepth::Ten,
    BitDepth::Twelve,
    BitDepth::Sixteen
];

/// Broad category an error belongs to
///
/// - `Input`: the caller handed us something we cannot encode
/// - `Format`: the buffer is not a well formed container
/// - `Corruption`: the container is well formed but a tile stream is damaged
/// - `Internal`: an invariant of the codec itself was violated
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Input,
    Format,
    Corruption,
    Internal
}

/// Errors that may arise during encoding
pub enum TicEncodeErrors {
    /// Width or height is zero, the argument names which one
    InvalidDimensions(&'static str),
    /// The colorspace and depth combination is not one we can code
    UnsupportedLayout(ColorSpace, BitDepth),
    /// Width or height is above what decoders accept by default
    TooLargeDimensions(usize),
    /// Sample buffer length does not match the geometry
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    LengthMismatch(usize, usize),
    /// A sample is above the maximum value of the declared depth
    SampleOutOfRange(u16, BitDepth),
    /// Tile size is not a supported power of two
    InvalidTileSize(usize),
    /// A frame differs from the sequence in the named property
    FrameMismatch(&'static str),
    /// A frame sequence needs at least one frame
    NoFrames,
    /// An internal invariant was broken
    Internal(&'static str)
}

impl TicEncodeErrors {
    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            TicEncodeErrors::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Input
        }
    }
}

impl Debug for TicEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TicEncodeErrors::InvalidDimensions(param) => writeln!(f, "The {param} is zero"),
            TicEncodeErrors::UnsupportedLayout(color, depth) => writeln!(
                f,
                "Cannot encode images in colorspace {color:?} with depth {depth:?}, supported colorspaces are {:?} and supported depths are {:?}",
                SUPPORTED_COLORSPACES, SUPPORTED_DEPTHS
            ),
            TicEncodeErrors::TooLargeDimensions(value) => {
                writeln!(
                    f,
                    "Too large dimensions {value} greater than supported dimensions {MAX_DIMENSIONS}"
                )
            }
            TicEncodeErrors::LengthMismatch(expected, found) => {
                writeln!(f, "Expected array of length {expected} but found {found}")
            }
            TicEncodeErrors::SampleOutOfRange(value, depth) => {
                writeln!(
                    f,
                    "Sample value {value} is larger than {} allowed by depth {depth:?}",
                    depth.max_value()
                )
            }
            TicEncodeErrors::InvalidTileSize(size) => {
                writeln!(
                    f,
                    "Tile size {size} is not a power of two between {} and {}",
                    zune_core::options::MIN_TILE_SIZE,
                    zune_core::options::MAX_TILE_SIZE
                )
            }
            TicEncodeErrors::FrameMismatch(param) => {
                writeln!(f, "Frame {param} does not match the sequence")
            }
            TicEncodeErrors::NoFrames => writeln!(f, "No frames were added to the sequence"),
            TicEncodeErrors::Internal(reason) => writeln!(f, "Internal error: {reason}")
        }
    }
}

impl Display for TicEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TicEncodeErrors {}

/// Damage found inside a single tile stream
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum TileErrors {
    /// The tile stream ended before all symbols were read
    TruncatedStream,
    /// The adaptive model decoded something the encoder could not have produced
    ModelDesync(&'static str),
    /// The tile names a predictor id we do not know
    PredictorMismatch(u8)
}

impl Debug for TileErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TileErrors::TruncatedStream => write!(f, "Tile stream ended unexpectedly"),
            TileErrors::ModelDesync(reason) => write!(f, "Entropy model out of sync: {reason}"),
            TileErrors::PredictorMismatch(id) => write!(f, "Unknown predictor id {id}")
        }
    }
}

/// Possible errors that may occur during decoding
pub enum TicDecodeErrors {
    /// The buffer does not start with the expected magic bytes
    BadMagic([u8; 4]),
    /// The container was written by a version we do not read
    UnsupportedVersion(u8),
    /// The buffer is shorter than what the header promises
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is the number of bytes present
    TruncatedContainer(usize, usize),
    /// The trailing checksum does not match the content
    ///
    /// # Arguments
    /// - 1st argument is the stored checksum
    /// - 2nd argument is the computed one
    ChecksumMismatch(u32, u32),
    /// The recorded tile count does not match the geometry
    ///
    /// # Arguments
    /// - 1st argument is the count derived from the geometry
    /// - 2nd argument is the count stored in the header
    TileCountMismatch(usize, usize),
    /// Layout byte names an unknown colorspace or depth
    UnknownLayout(u8),
    /// Mode byte names an unknown compression mode
    UnknownMode(u8),
    /// Header fields that cannot describe an image
    InvalidHeader(&'static str),
    /// Dimensions exceed the configured decoder limits
    ///
    /// # Arguments
    /// - 1st argument names the dimension
    /// - 2nd argument is the limit
    /// - 3rd argument is the value found
    TooLargeDimensions(&'static str, usize, usize),
    /// A tile stream is damaged, the first argument is the tile index
    CorruptTile(usize, TileErrors),
    /// The frame at the given index disagrees with the sequence header
    FrameMismatch(usize),
    /// A frame index past the end of the sequence was requested
    ///
    /// # Arguments
    /// - 1st argument is the requested index
    /// - 2nd argument is the number of frames
    FrameOutOfRange(usize, usize),
    /// The requested output size has a zero width or height
    InvalidOutputSize(usize, usize),
    /// An internal invariant was broken
    Internal(&'static str),
    IoErrors(ZByteIoError)
}

impl TicDecodeErrors {
    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            TicDecodeErrors::CorruptTile(_, _) => ErrorKind::Corruption,
            TicDecodeErrors::FrameOutOfRange(_, _) | TicDecodeErrors::InvalidOutputSize(_, _) => {
                ErrorKind::Input
            }
            TicDecodeErrors::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Format
        }
    }
}

impl Debug for TicDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TicDecodeErrors::BadMagic(magic) => {
                writeln!(
                    f,
                    "Wrong magic bytes {:?}, expected `zTIC` or `zTIA` as image start",
                    magic
                )
            }
            TicDecodeErrors::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported container version {version}")
            }
            TicDecodeErrors::TruncatedContainer(expected, found) => {
                writeln!(
                    f,
                    "Truncated container, expected {expected} bytes but found {found}"
                )
            }
            TicDecodeErrors::ChecksumMismatch(stored, computed) => {
                writeln!(
                    f,
                    "Checksum mismatch, stored {stored:#010x} but computed {computed:#010x}"
                )
            }
            TicDecodeErrors::TileCountMismatch(expected, found) => {
                writeln!(
                    f,
                    "Geometry requires {expected} tiles but header records {found}"
                )
            }
            TicDecodeErrors::UnknownLayout(layout) => {
                writeln!(f, "Unknown layout byte {layout:#04x}")
            }
            TicDecodeErrors::UnknownMode(mode) => writeln!(f, "Unknown compression mode {mode}"),
            TicDecodeErrors::InvalidHeader(reason) => writeln!(f, "Invalid header: {reason}"),
            TicDecodeErrors::TooLargeDimensions(param, limit, found) => {
                writeln!(
                    f,
                    "Too large image {param}, configured limit is {limit} but found {found}"
                )
            }
            TicDecodeErrors::CorruptTile(index, err) => {
                writeln!(f, "Tile {index} is corrupt: {err:?}")
            }
            TicDecodeErrors::FrameMismatch(index) => {
                writeln!(f, "Frame {index} does not match the sequence header")
            }
            TicDecodeErrors::FrameOutOfRange(index, count) => {
                writeln!(f, "Frame {index} requested but the sequence has {count} frames")
            }
            TicDecodeErrors::InvalidOutputSize(width, height) => {
                writeln!(f, "Cannot resize to {width}x{height}")
            }
            TicDecodeErrors::Internal(reason) => writeln!(f, "Internal error: {reason}"),
            TicDecodeErrors::IoErrors(err) => writeln!(f, "{:?}", err)
        }
    }
}

impl Display for TicDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TicDecodeErrors {}

impl From<ZByteIoError> for TicDecodeErrors {
    fn from(value: ZByteIoError) -> Self {
        match value {
            ZByteIoError::NotEnoughBytes(expected, found) => {
                TicDecodeErrors::TruncatedContainer(expected, found)
            }
            _ => TicDecodeErrors::IoErrors(value)
        }
    }
}
