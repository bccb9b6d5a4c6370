/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoder and decoder options
//!
//! Options are plain `Copy` structs configured with builder style
//! `set_*` methods and read back with getters.
pub use decoder::{DecoderOptions, ResizeMethod, DEFAULT_MAX_DIMENSIONS};
pub use encoder::{CompressionMode, EncoderOptions, MAX_TILE_SIZE, MIN_TILE_SIZE};

mod decoder;
mod encoder;
