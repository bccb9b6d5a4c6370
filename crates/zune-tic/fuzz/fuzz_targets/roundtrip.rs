#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_core::colorspace::ColorSpace;
use zune_core::options::{CompressionMode, EncoderOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() > 3 {
        let width = usize::from(data[0] % 64) + 1;
        let quality = data[1] % 101;
        let mode = if data[2] & 1 == 0 {
            CompressionMode::Lossless
        } else {
            CompressionMode::Lossy
        };
        let pixels = &data[3..];
        let height = pixels.len() / width;

        if height == 0 {
            return;
        }
        let pixels = &pixels[..width * height];
        let image = zune_tic::RasterImage::from_u8(width, height, ColorSpace::Luma, pixels).unwrap();
        let options = EncoderOptions::new(mode, quality).set_tile_size(16);

        let encoded = zune_tic::encode(&image, options).expect("Failed to encode valid image");
        let decoded = zune_tic::decode(&encoded).expect("Failed to decode valid container");

        let bound = zune_tic::max_error(&options, ColorSpace::Luma, image.depth());
        assert!(
            image.max_abs_diff(&decoded).unwrap() <= bound,
            "Decoded image exceeds the error bound"
        );
    }
});
