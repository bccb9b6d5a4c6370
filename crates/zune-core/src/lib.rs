/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the codec crates
//!
//! This crate provides a set of core routines shared
//! by the encoder and decoder of the tiled image codec
//!
//! It currently contains
//!
//! - A bytestream reader and writer for big endian data
//! - Colorspace and bit depth information shared by images
//! - Image decoder and encoder options
//! - Logging macros which compile to nothing when the `log` feature is off
//!
//! This library is `#[no_std]` with `alloc` feature needed for defining `Vec`
//! which we need for storing encoded bytes.
//!
//! # Features
//!  - `std`: Enables `std::error::Error` implementations
//!
//!  - `log`: Routes the logging macros to the [log](https://docs.rs/log) crate
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bit_depth;
pub mod bytestream;
pub mod colorspace;
#[cfg(not(feature = "log"))]
pub mod log;
pub mod options;
pub mod serde;

#[cfg(feature = "log")]
pub extern crate log;
