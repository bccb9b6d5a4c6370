/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Largest width and height decoders accept unless configured otherwise
///
/// Encoders refuse anything larger so their output always decodes with
/// the default options.
pub const DEFAULT_MAX_DIMENSIONS: usize = 1 << 14;

/// Filter used when the decoder is asked for a different output size
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ResizeMethod {
    /// Pick the closest source sample
    Nearest,
    /// Weigh the two closest samples on each axis
    #[default]
    Bilinear,
    /// Catmull-Rom cubic over the four closest samples on each axis
    Bicubic
}

/// Decoder options
///
/// Limits and switches the decoder respects while reading a container.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    max_width:        usize,
    max_height:       usize,
    num_threads:      u8,
    confirm_checksum: bool,
    output_size:      Option<(usize, usize)>,
    resize_method:    ResizeMethod
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:        DEFAULT_MAX_DIMENSIONS,
            max_height:       DEFAULT_MAX_DIMENSIONS,
            num_threads:      4,
            confirm_checksum: true,
            output_size:      None,
            resize_method:    ResizeMethod::Bilinear
        }
    }
}

impl DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Number of threads used to decode tiles
    ///
    /// - Default value: 4
    pub const fn num_threads(&self) -> u8 {
        self.num_threads
    }

    /// Whether the trailing checksum is verified
    ///
    /// - Default value: true
    pub const fn confirm_checksum(&self) -> bool {
        self.confirm_checksum
    }

    /// Width and height decoded images are resampled to, `None` keeps the
    /// stored size
    ///
    /// - Default value: None
    pub const fn output_size(&self) -> Option<(usize, usize)> {
        self.output_size
    }

    /// Filter used when resampling to [`output_size`](Self::output_size)
    ///
    /// - Default value: [`ResizeMethod::Bilinear`]
    pub const fn resize_method(&self) -> ResizeMethod {
        self.resize_method
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set the number of threads, `0` or `1` decode on the calling thread
    pub fn set_num_threads(mut self, threads: u8) -> Self {
        self.num_threads = threads;
        self
    }

    /// Set whether the trailing checksum should be verified
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self {
        self.confirm_checksum = yes;
        self
    }

    /// Resample decoded images to `width` x `height`
    ///
    /// The output size is still subject to the maximum width and height
    pub fn set_output_size(mut self, width: usize, height: usize) -> Self {
        self.output_size = Some((width, height));
        self
    }

    /// Set the filter used for resampling
    pub fn set_resize_method(mut self, method: ResizeMethod) -> Self {
        self.resize_method = method;
        self
    }
}
