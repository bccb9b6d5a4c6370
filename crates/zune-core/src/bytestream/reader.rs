/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors raised by the byte reader and writer
pub enum ZByteIoError {
    /// Not enough bytes to satisfy a read
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes requested
    /// - 2nd argument is number of bytes actually left
    NotEnoughBytes(usize, usize),
    /// Generic message does not need heap allocation
    Generic(&'static str)
}

impl Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ZByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ZByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZByteIoError {}

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// it provides fine grained options for reading different integer data types from
/// the underlying buffer.
///
/// Reads never advance the position when they fail.
pub struct ZByteReader<'a> {
    stream:   &'a [u8],
    position: usize
}

impl<'a> ZByteReader<'a> {
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }

    /// Return the current position of the inner cursor.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Return the number of bytes which haven't been read yet
    pub const fn remaining(&self) -> usize {
        self.stream.len().saturating_sub(self.position)
    }

    /// Return true if the stream can satisfy a read of `num` bytes
    pub const fn has(&self, num: usize) -> bool {
        self.position.saturating_add(num) <= self.stream.len()
    }

    /// Skip `num` bytes ahead, erroring if that moves us past the end
    pub fn skip(&mut self, num: usize) -> Result<(), ZByteIoError> {
        if !self.has(num) {
            return Err(ZByteIoError::NotEnoughBytes(num, self.remaining()));
        }
        self.position += num;
        Ok(())
    }

    /// Return the next `num` bytes as a slice and advance past them
    pub fn get_bytes(&mut self, num: usize) -> Result<&'a [u8], ZByteIoError> {
        if !self.has(num) {
            return Err(ZByteIoError::NotEnoughBytes(num, self.remaining()));
        }
        let bytes = &self.stream[self.position..self.position + num];
        self.position += num;
        Ok(bytes)
    }

    /// Read a fixed number of known bytes to a buffer and return the bytes or an error
    /// if it occurred.
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ZByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        byte_store.copy_from_slice(self.get_bytes(N)?);
        Ok(byte_store)
    }

    /// Retrieve a byte from the underlying stream
    /// returning an error if there are no more bytes available
    pub fn get_u8_err(&mut self) -> Result<u8, ZByteIoError> {
        Ok(self.read_fixed_bytes_or_error::<1>()?[0])
    }
}

macro_rules! get_single_type {
    ($name:tt,$int_type:tt) => {
        impl<'a> ZByteReader<'a> {
            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name(&mut self) -> Result<$int_type, ZByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes_or_error::<SIZE_OF_VAL>()?;

                Ok($int_type::from_be_bytes(space))
            }
        }
    };
}

get_single_type!(get_u16_be_err, u16);
get_single_type!(get_u32_be_err, u32);

#[cfg(test)]
mod tests {
    use crate::bytestream::ZByteReader;

    #[test]
    fn failed_reads_do_not_advance() {
        let data = [0, 0, 1];
        let mut reader = ZByteReader::new(&data);
        assert!(reader.get_u32_be_err().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.get_u16_be_err().unwrap(), 0);
        assert_eq!(reader.get_u8_err().unwrap(), 1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn big_endian_reads() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut reader = ZByteReader::new(&data);
        assert_eq!(reader.get_u32_be_err().unwrap(), 0x1234_5678);
    }
}
