/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adaptive context modelling of prediction residuals
//!
//! Residuals are zig-zag packed and split into a token (the bit length of
//! the packed value) and the raw bits below the leading one. Tokens go
//! through an adaptive frequency model picked by the tokens of the left and
//! top neighbours, the raw bits are stored as they are.
//!
//! A tile stream is laid out as
//! - one 3 bit predictor id per plane
//! - the residuals of each plane, row by row
use alloc::vec;
use alloc::vec::Vec;
use core::mem::swap;

use zune_core::bit_depth::BitDepth;

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::errors::TileErrors;

/// Largest alphabet any depth needs, see [`num_tokens`]
pub(crate) const MAX_SYMBOLS: usize = 20;
/// Rescale frequencies once their sum goes above this
pub(crate) const MAX_TOTAL: u32 = 1 << 15;
/// Frequency added to a symbol each time it is seen
pub(crate) const INCREMENT: u32 = 24;
/// Contexts per plane
pub(crate) const NUM_CONTEXTS: usize = 12;
/// Bits used to store a predictor id
pub(crate) const PREDICTOR_BITS: u8 = 3;

/// An adaptive frequency table over a small alphabet
///
/// Symbols are kept ordered by rank, the most frequent first. After
/// coding, a symbol moves ahead of every symbol whose frequency is lower
/// or equal to its own, so ties favour whatever was seen last.
/// Encoder and decoder must feed the same symbol sequence to identical
/// models to stay in sync.
#[derive(Clone, Debug)]
pub struct AdaptiveModel {
    // indexed by symbol
    freq:        [u32; MAX_SYMBOLS],
    // rank -> symbol
    order:       [u8; MAX_SYMBOLS],
    // symbol -> rank
    rank:        [u8; MAX_SYMBOLS],
    num_symbols: usize,
    total:       u32
}

impl AdaptiveModel {
    /// Create a model where every symbol starts with a frequency of one
    pub fn new(num_symbols: usize) -> AdaptiveModel {
        assert!(num_symbols > 0 && num_symbols <= MAX_SYMBOLS);

        let mut order = [0; MAX_SYMBOLS];
        let mut rank = [0; MAX_SYMBOLS];

        for i in 0..num_symbols {
            order[i] = i as u8;
            rank[i] = i as u8;
        }
        let mut freq = [0; MAX_SYMBOLS];
        freq[..num_symbols].fill(1);

        AdaptiveModel {
            freq,
            order,
            rank,
            num_symbols,
            total: num_symbols as u32
        }
    }

    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Return `(cumulative frequency, frequency)` of `symbol`
    pub fn cumulative(&self, symbol: usize) -> (u32, u32) {
        debug_assert!(symbol < self.num_symbols);

        let rank = usize::from(self.rank[symbol]);
        let cum = self.order[..rank]
            .iter()
            .map(|s| self.freq[usize::from(*s)])
            .sum();

        (cum, self.freq[symbol])
    }

    /// Find the symbol whose interval contains `target`
    ///
    /// Returns `(symbol, cumulative frequency, frequency)` or `None` when
    /// `target` is not below the total.
    pub fn find(&self, target: u32) -> Option<(usize, u32, u32)> {
        let mut cum = 0;

        for s in &self.order[..self.num_symbols] {
            let symbol = usize::from(*s);
            let freq = self.freq[symbol];

            if target < cum + freq {
                return Some((symbol, cum, freq));
            }
            cum += freq;
        }
        None
    }

    /// Adapt to one more occurrence of `symbol`
    pub fn update(&mut self, symbol: usize) {
        self.freq[symbol] += INCREMENT;
        self.total += INCREMENT;

        if self.total > MAX_TOTAL {
            self.total = 0;

            for freq in &mut self.freq[..self.num_symbols] {
                *freq = (*freq + 1) >> 1;
                self.total += *freq;
            }
        }
        let freq = self.freq[symbol];
        let mut rank = usize::from(self.rank[symbol]);

        while rank > 0 {
            let ahead = self.order[rank - 1];

            if self.freq[usize::from(ahead)] > freq {
                break;
            }
            self.order[rank] = ahead;
            self.rank[usize::from(ahead)] = rank as u8;
            rank -= 1;
        }
        self.order[rank] = symbol as u8;
        self.rank[symbol] = rank as u8;
    }
}

/// Number of tokens needed for residuals of `depth`
///
/// Prediction residuals lie in `[-2M, 2M]` where `M` is the largest sample,
/// packed they stay below `4M + 1`, so the leading bit is at most
/// `bit_size + 1` and the token at most `bit_size + 2`.
pub(crate) const fn num_tokens(depth: BitDepth) -> usize {
    depth.bit_size() + 3
}

/// Largest residual magnitude a valid stream can contain
pub(crate) const fn max_residual(depth: BitDepth) -> i32 {
    2 * depth.max_value() as i32
}

#[inline(always)]
fn packed_signed(value: i32) -> u32 {
    ((value as u32) << 1) ^ ((((!value) as u32) >> 31).wrapping_sub(1))
}

#[inline(always)]
fn unpack_signed(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Split a packed value into `(token, extra bit count, extra bits)`
#[inline(always)]
fn hybrid_token(value: u32) -> (u32, u8, u32) {
    if value == 0 {
        return (0, 0, 0);
    }
    let n = 31 - value.leading_zeros();

    (n + 1, n as u8, value - (1 << n))
}

#[inline(always)]
fn context(left: u8, top: u8) -> usize {
    usize::from(left + top).min(NUM_CONTEXTS - 1)
}

/// Tokens of the already coded neighbours of `x` in the current row
///
/// Missing neighbours are synthesised from the present one the same
/// way the predictors do it.
#[inline(always)]
fn neighbour_tokens(current: &[u8], above: &[u8], x: usize, y: usize) -> (u8, u8) {
    match (x, y) {
        (0, 0) => (0, 0),
        (_, 0) => (current[x - 1], current[x - 1]),
        (0, _) => (above[x], above[x]),
        _ => (current[x - 1], above[x])
    }
}

/// Entropy code the residual planes of a single tile
///
/// # Arguments
/// - predictors: predictor id of each plane
/// - planes: residuals of each plane, `width` samples per row
/// - width: tile width
/// - depth: bit depth of the image the tile came from
pub fn encode(predictors: &[u8], planes: &[Vec<i32>], width: usize, depth: BitDepth) -> Vec<u8> {
    debug_assert_eq!(predictors.len(), planes.len());

    let samples: usize = planes.iter().map(|x| x.len()).sum();
    let mut writer = BitWriter::with_capacity(samples / 2 + 16);

    for id in predictors {
        writer.put_bits(PREDICTOR_BITS, u32::from(*id));
    }
    let tokens = num_tokens(depth);

    for plane in planes {
        let mut models = vec![AdaptiveModel::new(tokens); NUM_CONTEXTS];
        let mut above = vec![0_u8; width];
        let mut current = vec![0_u8; width];

        for (y, row) in plane.chunks_exact(width).enumerate() {
            for (x, residual) in row.iter().enumerate() {
                let (left, top) = neighbour_tokens(&current, &above, x, y);
                let (token, nbits, bits) = hybrid_token(packed_signed(*residual));

                writer.put_symbol(token as usize, &mut models[context(left, top)]);
                writer.put_bits(nbits, bits);

                current[x] = token as u8;
            }
            swap(&mut current, &mut above);
        }
    }
    writer.flush();
    writer.into_inner()
}

/// Decode the predictor ids and residual planes of a tile
///
/// Returns the raw predictor ids, mapping them to predictors is left to
/// the caller.
pub fn decode(
    data: &[u8], width: usize, height: usize, num_planes: usize, depth: BitDepth
) -> Result<(Vec<u8>, Vec<Vec<i32>>), TileErrors> {
    let mut reader = BitReader::new(data)?;

    let mut predictors = Vec::with_capacity(num_planes);

    for _ in 0..num_planes {
        predictors.push(reader.get_bits(PREDICTOR_BITS)? as u8);
    }
    let tokens = num_tokens(depth);
    let limit = max_residual(depth);

    let mut planes = Vec::with_capacity(num_planes);

    for _ in 0..num_planes {
        let mut models = vec![AdaptiveModel::new(tokens); NUM_CONTEXTS];
        let mut above = vec![0_u8; width];
        let mut current = vec![0_u8; width];
        let mut plane = vec![0_i32; width * height];

        for (y, row) in plane.chunks_exact_mut(width).enumerate() {
            for (x, residual) in row.iter_mut().enumerate() {
                let (left, top) = neighbour_tokens(&current, &above, x, y);
                let token = reader.get_symbol(&mut models[context(left, top)])?;

                let packed = if token == 0 {
                    0
                } else {
                    let n = (token - 1) as u8;
                    (1_u32 << n) | reader.get_bits(n)?
                };
                let value = unpack_signed(packed);

                if value.abs() > limit {
                    return Err(TileErrors::ModelDesync("residual outside of depth range"));
                }
                *residual = value;
                current[x] = token as u8;
            }
            swap(&mut current, &mut above);
        }
        planes.push(plane);
    }
    Ok((predictors, planes))
}
