/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image bit depth, information and manipulations

/// The image bit depth.
///
/// Depths above eight bits are stored in a [`u16`] and only
/// use the lower `bit_size()` bits of it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum BitDepth {
    /// Eight bit depth, values in `0..=255`
    Eight,
    /// Ten bit depth, values in `0..=1023`
    Ten,
    /// Twelve bit depth, values in `0..=4095`
    Twelve,
    /// Sixteen bit depth, the whole `u16` range
    Sixteen,
    /// Bit depth information is unknown
    #[default]
    Unknown
}

impl BitDepth {
    /// Get the max value supported by the bit depth
    ///
    /// Samples larger than this cannot be represented
    /// by the depth
    #[rustfmt::skip]
    #[allow(clippy::zero_prefixed_literal)]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Eight => (1 << 08) - 1,
            Self::Ten => (1 << 10) - 1,
            Self::Twelve => (1 << 12) - 1,
            Self::Sixteen => u16::MAX,
            Self::Unknown => 0
        }
    }

    /// Number of significant bits per sample
    ///
    /// ```
    /// use zune_core::bit_depth::BitDepth;
    /// assert_eq!(BitDepth::Twelve.bit_size(), 12);
    /// ```
    pub const fn bit_size(self) -> usize {
        match self {
            Self::Eight => 8,
            Self::Ten => 10,
            Self::Twelve => 12,
            Self::Sixteen => 16,
            Self::Unknown => 0
        }
    }

    /// The 4 bit code used to store the depth in headers
    ///
    /// Returns `None` for [`BitDepth::Unknown`] which has no stored representation
    pub const fn to_code(self) -> Option<u8> {
        match self {
            Self::Eight => Some(0),
            Self::Ten => Some(1),
            Self::Twelve => Some(2),
            Self::Sixteen => Some(3),
            Self::Unknown => None
        }
    }

    /// Inverse of [`to_code`](Self::to_code)
    pub const fn from_code(code: u8) -> Option<BitDepth> {
        match code {
            0 => Some(Self::Eight),
            1 => Some(Self::Ten),
            2 => Some(Self::Twelve),
            3 => Some(Self::Sixteen),
            _ => None
        }
    }
}
