/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! and writer.
//!
//! Both work on in-memory buffers with big endian integers,
//! the reader borrows its input while the writer owns its output.
pub use reader::{ZByteIoError, ZByteReader};
pub use writer::ZByteWriter;

mod reader;
mod writer;
