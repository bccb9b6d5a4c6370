/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Range decoder mirroring [`BitWriter`](crate::bit_writer::BitWriter)

use crate::bit_writer::{FLUSH_BYTES, RANGE_TOP};
use crate::entropy::AdaptiveModel;
use crate::errors::TileErrors;

/// A range decoder borrowing a single tile stream
pub struct BitReader<'a> {
    src:      &'a [u8],
    position: usize,
    range:    u32,
    code:     u32
}

impl<'a> BitReader<'a> {
    /// Create a reader, priming it with the first bytes of `src`
    ///
    /// # Errors
    /// [`TileErrors::TruncatedStream`] if `src` is shorter than the
    /// bytes every flushed stream carries
    pub fn new(src: &'a [u8]) -> Result<BitReader<'a>, TileErrors> {
        let mut reader = BitReader {
            src,
            position: 0,
            range: u32::MAX,
            code: 0
        };
        for _ in 0..FLUSH_BYTES {
            reader.code = (reader.code << 8) | u32::from(reader.next_byte()?);
        }
        Ok(reader)
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Result<u8, TileErrors> {
        match self.src.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(TileErrors::TruncatedStream)
        }
    }

    #[inline(always)]
    fn normalize(&mut self) -> Result<(), TileErrors> {
        while self.range < RANGE_TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | u32::from(self.next_byte()?);
        }
        Ok(())
    }

    /// Return the cumulative frequency the next symbol falls in
    ///
    /// Must be followed by [`Self::decode_update`] with the interval of
    /// the symbol owning that frequency
    #[inline]
    fn decode_freq(&mut self, total: u32) -> Result<u32, TileErrors> {
        self.range /= total;
        let value = self.code / self.range;

        if value >= total {
            return Err(TileErrors::ModelDesync(
                "cumulative frequency outside of model total"
            ));
        }
        Ok(value)
    }

    #[inline]
    fn decode_update(&mut self, cum: u32, freq: u32) -> Result<(), TileErrors> {
        self.code -= cum * self.range;
        self.range *= freq;
        self.normalize()
    }

    /// Read `nbits` raw bits, most significant first
    pub fn get_bits(&mut self, nbits: u8) -> Result<u32, TileErrors> {
        debug_assert!(nbits <= 32);

        let mut value = 0_u32;

        for _ in 0..nbits {
            self.range >>= 1;

            let bit = if self.code >= self.range {
                self.code -= self.range;
                1
            } else {
                0
            };
            value = (value << 1) | bit;
            self.normalize()?;
        }
        Ok(value)
    }

    /// Read one symbol coded with `model` and let the model adapt to it
    pub fn get_symbol(&mut self, model: &mut AdaptiveModel) -> Result<usize, TileErrors> {
        let target = self.decode_freq(model.total())?;

        let (symbol, cum, freq) = model
            .find(target)
            .ok_or(TileErrors::ModelDesync("no symbol owns the decoded frequency"))?;

        self.decode_update(cum, freq)?;
        model.update(symbol);

        Ok(symbol)
    }
}
