/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bit I/O functionalities
//!
//! Output is produced by a carry propagating range coder, raw bits are
//! coded as equiprobable decisions and symbols go through an
//! [`AdaptiveModel`], so both share one byte stream without alignment.

use alloc::vec::Vec;

use crate::entropy::AdaptiveModel;

/// Renormalize whenever the range drops below this
pub(crate) const RANGE_TOP: u32 = 1 << 24;

/// Number of bytes the coder holds back until [`BitWriter::flush`]
pub(crate) const FLUSH_BYTES: usize = 5;

/// A range encoder owning its output
#[derive(Clone, Debug)]
pub struct BitWriter {
    // 33 bits in use, the top bit is a pending carry
    low:        u64,
    range:      u32,
    // last byte not yet written, it may still receive a carry
    cache:      u8,
    // cache byte plus the run of 0xFF bytes following it
    cache_size: u64,
    dest:       Vec<u8>
}

impl BitWriter {
    /// Construct a new bit-writer
    pub fn new() -> BitWriter {
        BitWriter::with_capacity(0)
    }

    /// Construct a bit writer with space for `capacity` output bytes
    pub fn with_capacity(capacity: usize) -> BitWriter {
        BitWriter {
            low:        0,
            range:      u32::MAX,
            cache:      0,
            cache_size: 1,
            dest:       Vec::with_capacity(capacity)
        }
    }

    fn shift_low(&mut self) {
        if (self.low as u32) < 0xFF00_0000 || (self.low >> 32) != 0 {
            let carry = (self.low >> 32) as u8;
            let mut temp = self.cache;

            loop {
                self.dest.push(temp.wrapping_add(carry));
                temp = 0xFF;
                self.cache_size -= 1;

                if self.cache_size == 0 {
                    break;
                }
            }
            self.cache = ((self.low >> 24) & 0xFF) as u8;
        }
        self.cache_size += 1;
        self.low = (self.low & 0x00FF_FFFF) << 8;
    }

    #[inline(always)]
    fn normalize(&mut self) {
        while self.range < RANGE_TOP {
            self.range <<= 8;
            self.shift_low();
        }
    }

    /// Narrow the interval to `[cum, cum + freq)` out of `total`
    #[inline]
    pub(crate) fn encode(&mut self, cum: u32, freq: u32, total: u32) {
        debug_assert!(freq > 0 && cum + freq <= total);

        let r = self.range / total;
        self.low += u64::from(r * cum);
        self.range = r * freq;
        self.normalize();
    }

    /// Put some bits to the stream, most significant first
    ///
    /// # Arguments
    /// - nbits: Number of bits to store, at most 32
    /// - bits: The bits, anything above `nbits` is ignored
    pub fn put_bits(&mut self, nbits: u8, bits: u32) {
        debug_assert!(nbits <= 32);

        for i in (0..nbits).rev() {
            self.range >>= 1;

            if (bits >> i) & 1 == 1 {
                self.low += u64::from(self.range);
            }
            self.normalize();
        }
    }

    /// Code `symbol` with `model` and let the model adapt to it
    pub fn put_symbol(&mut self, symbol: usize, model: &mut AdaptiveModel) {
        let (cum, freq) = model.cumulative(symbol);
        self.encode(cum, freq, model.total());
        model.update(symbol);
    }

    /// Write out every pending byte
    ///
    /// After this the output is byte aligned and decodable, nothing
    /// else should be coded into this writer.
    pub fn flush(&mut self) {
        for _ in 0..FLUSH_BYTES {
            self.shift_low();
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.dest
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        BitWriter::new()
    }
}
