/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Whether reconstruction must be exact
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum CompressionMode {
    /// Decoded samples are bit exact copies of the input
    #[default]
    Lossless,
    /// Decoded samples may differ from the input by a bounded
    /// amount controlled by the quality
    Lossy
}

impl CompressionMode {
    /// The byte stored in headers for this mode
    pub const fn to_code(self) -> u8 {
        match self {
            Self::Lossless => 0,
            Self::Lossy => 1
        }
    }

    /// Inverse of [`to_code`](Self::to_code)
    pub const fn from_code(code: u8) -> Option<CompressionMode> {
        match code {
            0 => Some(Self::Lossless),
            1 => Some(Self::Lossy),
            _ => None
        }
    }
}

/// Smallest tile dimension the encoder accepts
pub const MIN_TILE_SIZE: usize = 16;
/// Largest tile dimension the encoder accepts
pub const MAX_TILE_SIZE: usize = 1024;

/// Options controlling how an image is compressed
///
/// The image geometry travels with the image itself, these options
/// only describe how it should be coded.
///
/// # Example
/// ```
/// use zune_core::options::{CompressionMode, EncoderOptions};
/// let options = EncoderOptions::default()
///     .set_mode(CompressionMode::Lossy)
///     .set_quality(90)
///     .set_num_threads(2);
/// assert_eq!(options.quality(), 90);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    mode:        CompressionMode,
    quality:     u8,
    effort:      u8,
    num_threads: u8,
    tile_size:   usize
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            mode:        CompressionMode::Lossless,
            quality:     100,
            effort:      4,
            num_threads: 4,
            tile_size:   256
        }
    }
}

impl EncoderOptions {
    /// Create new options with the given mode and quality,
    /// other fields keep their defaults
    pub fn new(mode: CompressionMode, quality: u8) -> EncoderOptions {
        EncoderOptions::default().set_mode(mode).set_quality(quality)
    }

    /// Get the compression mode
    pub const fn mode(&self) -> CompressionMode {
        self.mode
    }

    /// Get the quality the image will be encoded with
    ///
    /// # Lossy
    /// - Higher quality means a smaller reconstruction error and
    ///   bigger files, `100` is exact
    ///
    /// # Lossless
    /// - Ignored
    pub const fn quality(&self) -> u8 {
        self.quality
    }

    /// Get the effort, higher values spend more time looking for
    /// good predictors
    pub const fn effort(&self) -> u8 {
        self.effort
    }

    /// Get the number of threads the encoder may use
    pub const fn num_threads(&self) -> u8 {
        self.num_threads
    }

    /// Get the maximum tile dimension
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Set the compression mode
    pub fn set_mode(mut self, mode: CompressionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the quality, values above 100 are clamped to 100
    pub fn set_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }

    /// Set encoding effort, values above 9 are clamped to 9
    pub fn set_effort(mut self, effort: u8) -> Self {
        self.effort = effort.min(9);
        self
    }

    /// Set the number of threads to use
    ///
    /// `0` or `1` force single threaded execution
    pub fn set_num_threads(mut self, threads: u8) -> Self {
        self.num_threads = threads;
        self
    }

    /// Set the maximum tile dimension
    ///
    /// The value must be a power of two between [`MIN_TILE_SIZE`] and
    /// [`MAX_TILE_SIZE`], the encoder rejects anything else.
    pub fn set_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Whether the tile size is one the container can describe
    pub const fn is_valid_tile_size(&self) -> bool {
        self.tile_size.is_power_of_two()
            && self.tile_size >= MIN_TILE_SIZE
            && self.tile_size <= MAX_TILE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{CompressionMode, EncoderOptions};

    #[test]
    fn setters_clamp() {
        let options = EncoderOptions::new(CompressionMode::Lossy, 250).set_effort(200);
        assert_eq!(options.quality(), 100);
        assert_eq!(options.effort(), 9);
    }

    #[test]
    fn tile_size_validation() {
        assert!(EncoderOptions::default().is_valid_tile_size());
        assert!(!EncoderOptions::default().set_tile_size(100).is_valid_tile_size());
        assert!(!EncoderOptions::default().set_tile_size(8).is_valid_tile_size());
        assert!(!EncoderOptions::default().set_tile_size(2048).is_valid_tile_size());
    }
}
