/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image Colorspace information and manipulation utilities.

/// Channel layouts an image can be stored in
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace {
    /// Red, Green , Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA,
    /// Grayscale colorspace
    Luma,
    /// Grayscale with alpha colorspace
    LumaA,
    /// Cyan , Magenta, Yellow, Black
    CMYK,
    /// The colorspace is unknown
    Unknown
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB => 3,
            Self::RGBA | Self::CMYK => 4,
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::Unknown => 0
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA)
    }

    /// The 4 bit code used to store the colorspace in headers
    ///
    /// Only layouts the codec can store have a code
    pub const fn to_code(&self) -> Option<u8> {
        match self {
            Self::Luma => Some(1),
            Self::LumaA => Some(2),
            Self::RGB => Some(3),
            Self::RGBA => Some(4),
            _ => None
        }
    }

    /// Inverse of [`to_code`](Self::to_code)
    pub const fn from_code(code: u8) -> Option<ColorSpace> {
        match code {
            1 => Some(Self::Luma),
            2 => Some(Self::LumaA),
            3 => Some(Self::RGB),
            4 => Some(Self::RGBA),
            _ => None
        }
    }
}
