/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Splitting images into independently coded tiles
use alloc::vec::Vec;

use crate::color_convert::InternalSamples;
use crate::errors::TicEncodeErrors;

/// Position and size of a tile inside the image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TileRect {
    /// Row major index of the tile
    pub index:  usize,
    pub x:      usize,
    pub y:      usize,
    pub width:  usize,
    pub height: usize
}

/// Number of tiles needed to cover the image
pub const fn tile_count(width: usize, height: usize, tile_size: usize) -> usize {
    width.div_ceil(tile_size) * height.div_ceil(tile_size)
}

/// Cover an image with tiles of at most `tile_size` square
///
/// Tiles are returned in row major order, the ones touching the right and
/// bottom edges are truncated to the image.
///
/// # Errors
/// [`TicEncodeErrors::InvalidDimensions`] if width or height is zero
pub fn split(width: usize, height: usize, tile_size: usize) -> Result<Vec<TileRect>, TicEncodeErrors> {
    if width == 0 {
        return Err(TicEncodeErrors::InvalidDimensions("width"));
    }
    if height == 0 {
        return Err(TicEncodeErrors::InvalidDimensions("height"));
    }
    if tile_size == 0 {
        return Err(TicEncodeErrors::InvalidTileSize(tile_size));
    }
    let mut tiles = Vec::with_capacity(tile_count(width, height, tile_size));

    for y in (0..height).step_by(tile_size) {
        for x in (0..width).step_by(tile_size) {
            tiles.push(TileRect {
                index: tiles.len(),
                x,
                y,
                width: tile_size.min(width - x),
                height: tile_size.min(height - y)
            });
        }
    }
    Ok(tiles)
}

/// The planes of a single tile
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tile {
    pub rect:   TileRect,
    pub planes: Vec<Vec<i32>>
}

impl Tile {
    /// Copy the area covered by `rect` out of the image planes
    pub fn extract(samples: &InternalSamples, rect: TileRect) -> Tile {
        let planes = samples
            .planes
            .iter()
            .map(|plane| {
                let mut out = Vec::with_capacity(rect.width * rect.height);

                for row in plane
                    .chunks_exact(samples.width)
                    .skip(rect.y)
                    .take(rect.height)
                {
                    out.extend_from_slice(&row[rect.x..rect.x + rect.width]);
                }
                out
            })
            .collect();

        Tile { rect, planes }
    }

    /// Write this tile back to its place in the image planes
    pub fn scatter_into(&self, samples: &mut InternalSamples) {
        let rect = self.rect;
        let stride = samples.width;

        for (plane, tile_plane) in samples.planes.iter_mut().zip(self.planes.iter()) {
            let rows = plane.chunks_exact_mut(stride).skip(rect.y).take(rect.height);

            for (row, tile_row) in rows.zip(tile_plane.chunks_exact(rect.width)) {
                row[rect.x..rect.x + rect.width].copy_from_slice(tile_row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;

    use super::*;

    #[test]
    fn covers_image_once() {
        let (width, height) = (70, 33);
        let tiles = split(width, height, 32).unwrap();

        assert_eq!(tiles.len(), tile_count(width, height, 32));
        assert_eq!(tiles.len(), 3 * 2);

        let area: usize = tiles.iter().map(|t| t.width * t.height).sum();
        assert_eq!(area, width * height);

        assert_eq!(
            tiles[5],
            TileRect {
                index:  5,
                x:      64,
                y:      32,
                width:  6,
                height: 1
            }
        );
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.index, i);
        }
    }

    #[test]
    fn degenerate_shapes() {
        assert_eq!(split(1, 1000, 256).unwrap().len(), 4);
        assert_eq!(split(1000, 1, 256).unwrap().len(), 4);
        assert_eq!(split(256, 256, 256).unwrap().len(), 1);
        assert!(matches!(
            split(0, 5, 16),
            Err(TicEncodeErrors::InvalidDimensions("width"))
        ));
        assert!(matches!(
            split(5, 0, 16),
            Err(TicEncodeErrors::InvalidDimensions("height"))
        ));
    }

    #[test]
    fn extract_then_scatter() {
        let mut samples = InternalSamples::new(5, 4, ColorSpace::LumaA, BitDepth::Eight);
        for plane in samples.planes.iter_mut() {
            for (i, v) in plane.iter_mut().enumerate() {
                *v = i as i32;
            }
        }
        let mut rebuilt = InternalSamples::new(5, 4, ColorSpace::LumaA, BitDepth::Eight);

        for rect in split(5, 4, 2).unwrap() {
            let tile = Tile::extract(&samples, rect);
            assert_eq!(tile.planes[0].len(), rect.width * rect.height);
            tile.scatter_into(&mut rebuilt);
        }
        assert_eq!(rebuilt, samples);

        let corner = Tile::extract(&samples, split(5, 4, 2).unwrap()[2]);
        assert_eq!(corner.planes[1], [4, 9]);
    }
}
