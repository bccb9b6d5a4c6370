/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

/// Encapsulates a simple Byte writer with
/// support for big endian integer writes
///
/// The writer owns a growable buffer, so writes never fail.
#[derive(Default, Debug, Clone)]
pub struct ZByteWriter {
    buffer: Vec<u8>
}

impl ZByteWriter {
    /// Create a new, empty writer
    pub const fn new() -> ZByteWriter {
        ZByteWriter { buffer: Vec::new() }
    }

    /// Create a writer which can hold `capacity` bytes without reallocating
    pub fn with_capacity(capacity: usize) -> ZByteWriter {
        ZByteWriter {
            buffer: Vec::with_capacity(capacity)
        }
    }

    /// Return the number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }

    /// Return the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer returning the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Write a single byte
    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Write all of `bytes`
    pub fn write_all(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write a u16 in big endian
    pub fn write_u16_be(&mut self, value: u16) {
        self.write_all(&value.to_be_bytes());
    }

    /// Write a u32 in big endian
    pub fn write_u32_be(&mut self, value: u32) {
        self.write_all(&value.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use crate::bytestream::{ZByteReader, ZByteWriter};

    #[test]
    fn write_then_read() {
        let mut writer = ZByteWriter::new();
        writer.write_u8(7);
        writer.write_u32_be(0xDEAD_BEEF);
        writer.write_u16_be(513);
        assert_eq!(writer.bytes_written(), 7);

        let bytes = writer.into_inner();
        let mut reader = ZByteReader::new(&bytes);
        assert_eq!(reader.get_u8_err().unwrap(), 7);
        assert_eq!(reader.get_u32_be_err().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.get_u16_be_err().unwrap(), 513);
    }
}
