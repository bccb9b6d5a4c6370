/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Container layout
//!
//! All integers are big endian.
//!
//! | Field         | Size        |
//! |---------------|-------------|
//! | magic `zTIC`  | 4           |
//! | version       | 1           |
//! | width         | 4           |
//! | height        | 4           |
//! | layout        | 1, colorspace code in the top nibble, depth code below |
//! | mode          | 1           |
//! | quality       | 1           |
//! | log2 tile size| 1           |
//! | tile count    | 4           |
//! | tile lengths  | 4 per tile  |
//! | tile payloads | sum of lengths |
//! | adler32       | 4, over every preceding byte |
//!
//! Frame sequences wrap complete still containers
//!
//! | Field         | Size        |
//! |---------------|-------------|
//! | magic `zTIA`  | 4           |
//! | version       | 1           |
//! | width         | 4           |
//! | height        | 4           |
//! | layout        | 1, as above |
//! | loop count    | 2, zero loops forever |
//! | frame count   | 4           |
//! | frame table   | 8 per frame, duration in milliseconds then byte length |
//! | frames        | sum of lengths, each a still container |
//! | adler32       | 4, over every preceding byte |
use alloc::vec::Vec;

use simd_adler32::Adler32;
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteReader, ZByteWriter};
use zune_core::colorspace::ColorSpace;
use zune_core::log::error;
use zune_core::options::{CompressionMode, DecoderOptions, MAX_TILE_SIZE, MIN_TILE_SIZE};

use crate::errors::{TicDecodeErrors, TicEncodeErrors};
use crate::tiles::tile_count;

pub const TIC_MAGIC: [u8; 4] = *b"zTIC";
pub const TIC_VERSION: u8 = 1;
/// Bytes before the tile length table
pub const FIXED_HEADER_SIZE: usize = 21;
pub const CHECKSUM_SIZE: usize = 4;

pub const SEQUENCE_MAGIC: [u8; 4] = *b"zTIA";
/// Bytes before the frame table
pub const SEQUENCE_HEADER_SIZE: usize = 20;
/// Bytes per frame table entry
const FRAME_ENTRY_SIZE: usize = 8;

/// Image information stored in a container header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageInfo {
    pub width:      usize,
    pub height:     usize,
    pub colorspace: ColorSpace,
    pub depth:      BitDepth,
    pub mode:       CompressionMode,
    /// Quality the image was coded with, 100 for lossless images
    pub quality:    u8,
    pub tile_size:  usize,
    pub tile_count: usize
}

/// The coded bytes of one tile
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodedTile {
    pub index: usize,
    pub data:  Vec<u8>
}

/// A parsed container, borrowing tile payloads from the input
pub struct Container<'a> {
    pub info:  ImageInfo,
    pub tiles: Vec<&'a [u8]>
}

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.write(data);
    hasher.finish()
}

fn layout_byte(colorspace: ColorSpace, depth: BitDepth) -> Option<u8> {
    Some((colorspace.to_code()? << 4) | depth.to_code()?)
}

fn parse_layout(layout: u8) -> Result<(ColorSpace, BitDepth), TicDecodeErrors> {
    let colorspace = ColorSpace::from_code(layout >> 4).ok_or(TicDecodeErrors::UnknownLayout(layout))?;
    let depth = BitDepth::from_code(layout & 15).ok_or(TicDecodeErrors::UnknownLayout(layout))?;

    Ok((colorspace, depth))
}

/// Reject inputs shorter than a magic, telling foreign bytes apart from
/// a truncated prefix
fn check_short_magic(data: &[u8], magic: [u8; 4], header_size: usize) -> Result<(), TicDecodeErrors> {
    if data.len() < magic.len() {
        if !magic.starts_with(data) {
            let mut found = [0; 4];
            found[..data.len()].copy_from_slice(data);
            return Err(TicDecodeErrors::BadMagic(found));
        }
        return Err(TicDecodeErrors::TruncatedContainer(header_size, data.len()));
    }
    Ok(())
}

/// Check dimensions read from a header against the decoder limits
fn check_dimensions(width: usize, height: usize, options: &DecoderOptions) -> Result<(), TicDecodeErrors> {
    if width == 0 {
        return Err(TicDecodeErrors::InvalidHeader("zero width"));
    }
    if height == 0 {
        return Err(TicDecodeErrors::InvalidHeader("zero height"));
    }
    if width > options.max_width() {
        return Err(TicDecodeErrors::TooLargeDimensions(
            "width",
            options.max_width(),
            width
        ));
    }
    if height > options.max_height() {
        return Err(TicDecodeErrors::TooLargeDimensions(
            "height",
            options.max_height(),
            height
        ));
    }
    Ok(())
}

/// Compare the stored trailing checksum with the content
fn confirm_checksum(data: &[u8]) -> Result<(), TicDecodeErrors> {
    let (content, stored) = data.split_at(data.len() - CHECKSUM_SIZE);
    let stored = u32::from_be_bytes([stored[0], stored[1], stored[2], stored[3]]);
    let computed = checksum(content);

    if stored != computed {
        return Err(TicDecodeErrors::ChecksumMismatch(stored, computed));
    }
    Ok(())
}

/// Serialize header, tile table, payloads and checksum
///
/// `tiles` must be ordered by index and match `info.tile_count`, anything
/// else is an internal error.
pub fn assemble(info: &ImageInfo, tiles: &[CodedTile]) -> Result<Vec<u8>, TicEncodeErrors> {
    if tiles.len() != info.tile_count {
        error!(
            "Expected {} coded tiles but got {}",
            info.tile_count,
            tiles.len()
        );
        return Err(TicEncodeErrors::Internal("tile count does not match header"));
    }
    if tiles.iter().enumerate().any(|(i, tile)| tile.index != i) {
        error!("Coded tiles are not in row major order");
        return Err(TicEncodeErrors::Internal("tiles out of order"));
    }
    let layout = layout_byte(info.colorspace, info.depth).ok_or(TicEncodeErrors::UnsupportedLayout(
        info.colorspace,
        info.depth
    ))?;
    let width = u32::try_from(info.width).map_err(|_| TicEncodeErrors::TooLargeDimensions(info.width))?;
    let height =
        u32::try_from(info.height).map_err(|_| TicEncodeErrors::TooLargeDimensions(info.height))?;
    let count = u32::try_from(info.tile_count)
        .map_err(|_| TicEncodeErrors::Internal("too many tiles for the container"))?;

    let payload: usize = tiles.iter().map(|x| x.data.len()).sum();
    let mut writer =
        ZByteWriter::with_capacity(FIXED_HEADER_SIZE + 4 * tiles.len() + payload + CHECKSUM_SIZE);

    writer.write_all(&TIC_MAGIC);
    writer.write_u8(TIC_VERSION);
    writer.write_u32_be(width);
    writer.write_u32_be(height);
    writer.write_u8(layout);
    writer.write_u8(info.mode.to_code());
    writer.write_u8(info.quality);
    writer.write_u8(info.tile_size.trailing_zeros() as u8);
    writer.write_u32_be(count);

    for tile in tiles {
        let length = u32::try_from(tile.data.len())
            .map_err(|_| TicEncodeErrors::Internal("tile payload too large"))?;
        writer.write_u32_be(length);
    }
    for tile in tiles {
        writer.write_all(&tile.data);
    }
    let sum = checksum(writer.as_slice());
    writer.write_u32_be(sum);

    Ok(writer.into_inner())
}

/// Parse and validate the fixed header
///
/// Magic and version are checked before anything else is trusted, the
/// remaining fields are then validated against `options`.
pub fn parse_header(data: &[u8], options: &DecoderOptions) -> Result<ImageInfo, TicDecodeErrors> {
    check_short_magic(data, TIC_MAGIC, FIXED_HEADER_SIZE)?;

    let mut stream = ZByteReader::new(data);

    let magic = stream.read_fixed_bytes_or_error::<4>()?;

    if magic != TIC_MAGIC {
        return Err(TicDecodeErrors::BadMagic(magic));
    }
    if data.len() < FIXED_HEADER_SIZE {
        // a version byte can still be judged on its own
        if let Some(version) = data.get(4) {
            if *version != TIC_VERSION {
                return Err(TicDecodeErrors::UnsupportedVersion(*version));
            }
        }
        return Err(TicDecodeErrors::TruncatedContainer(
            FIXED_HEADER_SIZE,
            data.len()
        ));
    }
    let version = stream.get_u8_err()?;

    if version != TIC_VERSION {
        return Err(TicDecodeErrors::UnsupportedVersion(version));
    }
    let width = stream.get_u32_be_err()? as usize;
    let height = stream.get_u32_be_err()? as usize;
    let layout = stream.get_u8_err()?;
    let mode = stream.get_u8_err()?;
    let quality = stream.get_u8_err()?;
    let tile_log2 = stream.get_u8_err()?;
    let count = stream.get_u32_be_err()? as usize;

    let (colorspace, depth) = parse_layout(layout)?;
    let mode = CompressionMode::from_code(mode).ok_or(TicDecodeErrors::UnknownMode(mode))?;

    if quality > 100 {
        return Err(TicDecodeErrors::InvalidHeader("quality above 100"));
    }
    check_dimensions(width, height, options)?;

    let tile_size = 1_usize
        .checked_shl(u32::from(tile_log2))
        .filter(|x| (MIN_TILE_SIZE..=MAX_TILE_SIZE).contains(x))
        .ok_or(TicDecodeErrors::InvalidHeader("tile size out of range"))?;

    let expected = tile_count(width, height, tile_size);

    if expected != count {
        return Err(TicDecodeErrors::TileCountMismatch(expected, count));
    }
    Ok(ImageInfo {
        width,
        height,
        colorspace,
        depth,
        mode,
        quality,
        tile_size,
        tile_count: count
    })
}

/// Parse a whole container, slicing out every tile payload
pub fn parse<'a>(data: &'a [u8], options: &DecoderOptions) -> Result<Container<'a>, TicDecodeErrors> {
    let info = parse_header(data, options)?;

    let table_end = FIXED_HEADER_SIZE + 4 * info.tile_count;

    if data.len() < table_end {
        return Err(TicDecodeErrors::TruncatedContainer(table_end, data.len()));
    }
    let mut stream = ZByteReader::new(data);
    stream.skip(FIXED_HEADER_SIZE)?;

    let mut lengths = Vec::with_capacity(info.tile_count);
    let mut total = table_end + CHECKSUM_SIZE;

    for _ in 0..info.tile_count {
        let length = stream.get_u32_be_err()? as usize;

        total = total
            .checked_add(length)
            .ok_or(TicDecodeErrors::InvalidHeader("tile lengths overflow"))?;
        lengths.push(length);
    }
    if total != data.len() {
        return Err(TicDecodeErrors::TruncatedContainer(total, data.len()));
    }
    if options.confirm_checksum() {
        confirm_checksum(data)?;
    }
    let mut tiles = Vec::with_capacity(info.tile_count);

    for length in lengths {
        tiles.push(stream.get_bytes(length)?);
    }
    Ok(Container { info, tiles })
}

/// Information stored in a frame sequence header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SequenceInfo {
    pub width:       usize,
    pub height:      usize,
    pub colorspace:  ColorSpace,
    pub depth:       BitDepth,
    /// Times the sequence is played, zero plays it forever
    pub loop_count:  u16,
    pub frame_count: usize
}

/// One frame of a parsed sequence, borrowing its still container
#[derive(Copy, Clone, Debug)]
pub struct FrameEntry<'a> {
    /// Display time in milliseconds
    pub duration: u32,
    pub data:     &'a [u8]
}

/// A parsed frame sequence
pub struct Sequence<'a> {
    pub info:   SequenceInfo,
    pub frames: Vec<FrameEntry<'a>>
}

/// Serialize a frame sequence from `(duration, still container)` pairs
pub fn assemble_sequence(
    info: &SequenceInfo, frames: &[(u32, Vec<u8>)]
) -> Result<Vec<u8>, TicEncodeErrors> {
    if frames.len() != info.frame_count {
        error!(
            "Expected {} frames but got {}",
            info.frame_count,
            frames.len()
        );
        return Err(TicEncodeErrors::Internal("frame count does not match header"));
    }
    let layout = layout_byte(info.colorspace, info.depth).ok_or(TicEncodeErrors::UnsupportedLayout(
        info.colorspace,
        info.depth
    ))?;
    let width = u32::try_from(info.width).map_err(|_| TicEncodeErrors::TooLargeDimensions(info.width))?;
    let height =
        u32::try_from(info.height).map_err(|_| TicEncodeErrors::TooLargeDimensions(info.height))?;
    let count = u32::try_from(frames.len())
        .map_err(|_| TicEncodeErrors::Internal("too many frames for the container"))?;

    let payload: usize = frames.iter().map(|(_, data)| data.len()).sum();
    let mut writer = ZByteWriter::with_capacity(
        SEQUENCE_HEADER_SIZE + FRAME_ENTRY_SIZE * frames.len() + payload + CHECKSUM_SIZE
    );

    writer.write_all(&SEQUENCE_MAGIC);
    writer.write_u8(TIC_VERSION);
    writer.write_u32_be(width);
    writer.write_u32_be(height);
    writer.write_u8(layout);
    writer.write_u16_be(info.loop_count);
    writer.write_u32_be(count);

    for (duration, data) in frames {
        let length = u32::try_from(data.len())
            .map_err(|_| TicEncodeErrors::Internal("frame payload too large"))?;
        writer.write_u32_be(*duration);
        writer.write_u32_be(length);
    }
    debug_assert_eq!(
        writer.bytes_written(),
        SEQUENCE_HEADER_SIZE + FRAME_ENTRY_SIZE * frames.len()
    );

    for (_, data) in frames {
        writer.write_all(data);
    }
    let sum = checksum(writer.as_slice());
    writer.write_u32_be(sum);

    Ok(writer.into_inner())
}

/// Parse a frame sequence, slicing out every frame
///
/// Follows the still container order: magic, version, header fields,
/// table, recorded length and finally the checksum. Frames themselves
/// are only parsed when they are decoded.
pub fn parse_sequence<'a>(
    data: &'a [u8], options: &DecoderOptions
) -> Result<Sequence<'a>, TicDecodeErrors> {
    check_short_magic(data, SEQUENCE_MAGIC, SEQUENCE_HEADER_SIZE)?;

    let mut stream = ZByteReader::new(data);
    let magic = stream.read_fixed_bytes_or_error::<4>()?;

    if magic != SEQUENCE_MAGIC {
        return Err(TicDecodeErrors::BadMagic(magic));
    }
    if let Some(version) = data.get(4) {
        if *version != TIC_VERSION {
            return Err(TicDecodeErrors::UnsupportedVersion(*version));
        }
    }
    if data.len() < SEQUENCE_HEADER_SIZE {
        return Err(TicDecodeErrors::TruncatedContainer(
            SEQUENCE_HEADER_SIZE,
            data.len()
        ));
    }
    stream.skip(1)?;

    let width = stream.get_u32_be_err()? as usize;
    let height = stream.get_u32_be_err()? as usize;
    let (colorspace, depth) = parse_layout(stream.get_u8_err()?)?;
    let loop_count = stream.get_u16_be_err()?;
    let count = stream.get_u32_be_err()? as usize;

    check_dimensions(width, height, options)?;

    if count == 0 {
        return Err(TicDecodeErrors::InvalidHeader("sequence without frames"));
    }
    debug_assert_eq!(stream.position(), SEQUENCE_HEADER_SIZE);

    let table_end = count
        .checked_mul(FRAME_ENTRY_SIZE)
        .and_then(|x| x.checked_add(SEQUENCE_HEADER_SIZE))
        .ok_or(TicDecodeErrors::InvalidHeader("frame table overflows"))?;

    if data.len() < table_end {
        return Err(TicDecodeErrors::TruncatedContainer(table_end, data.len()));
    }
    let mut entries = Vec::with_capacity(count);
    let mut total = table_end + CHECKSUM_SIZE;

    for _ in 0..count {
        let duration = stream.get_u32_be_err()?;
        let length = stream.get_u32_be_err()? as usize;

        total = total
            .checked_add(length)
            .ok_or(TicDecodeErrors::InvalidHeader("frame lengths overflow"))?;
        entries.push((duration, length));
    }
    if total != data.len() {
        return Err(TicDecodeErrors::TruncatedContainer(total, data.len()));
    }
    if options.confirm_checksum() {
        confirm_checksum(data)?;
    }
    let mut frames = Vec::with_capacity(count);

    for (duration, length) in entries {
        frames.push(FrameEntry {
            duration,
            data: stream.get_bytes(length)?
        });
    }
    let info = SequenceInfo {
        width,
        height,
        colorspace,
        depth,
        loop_count,
        frame_count: count
    };
    Ok(Sequence { info, frames })
}
