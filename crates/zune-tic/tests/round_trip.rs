/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use nanorand::{Rng, WyRand};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::{CompressionMode, DecoderOptions, EncoderOptions, ResizeMethod};
use zune_tic::{
    decode, encode, max_error, resize, RasterImage, TicAnimationDecoder, TicAnimationEncoder,
    TicDecoder
};

const LAYOUTS: [ColorSpace; 4] = [
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::RGB,
    ColorSpace::RGBA
];
const DEPTHS: [BitDepth; 4] = [
    BitDepth::Eight,
    BitDepth::Ten,
    BitDepth::Twelve,
    BitDepth::Sixteen
];

fn random_image(
    rand: &mut WyRand, width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth
) -> RasterImage {
    let samples = (0..width * height * colorspace.num_components())
        .map(|_| rand.generate_range(0..=depth.max_value()))
        .collect();

    RasterImage::new(width, height, colorspace, depth, samples).unwrap()
}

/// A smooth image with a little noise, the kind of content the
/// predictors are built for
fn smooth_image(
    rand: &mut WyRand, width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth
) -> RasterImage {
    let components = colorspace.num_components();
    let max = u32::from(depth.max_value());
    let mut samples = Vec::with_capacity(width * height * components);

    for y in 0..height {
        for x in 0..width {
            for c in 0..components {
                let base = ((x + 2 * y + 7 * c) as u32 * max) / (width + 2 * height + 21) as u32;
                let noise = rand.generate_range(0_u32..4);
                samples.push((base + noise).min(max) as u16);
            }
        }
    }
    RasterImage::new(width, height, colorspace, depth, samples).unwrap()
}

#[test]
fn lossless_all_layouts_and_depths() {
    let mut rand = WyRand::new_seed(0x5eed);
    let options = EncoderOptions::default().set_tile_size(16);

    for colorspace in LAYOUTS {
        for depth in DEPTHS {
            let image = random_image(&mut rand, 37, 19, colorspace, depth);
            let bytes = encode(&image, options).unwrap();
            let decoded = decode(&bytes).unwrap();

            assert_eq!(decoded, image, "{colorspace:?} {depth:?}");
        }
    }
}

#[test]
fn lossless_edge_geometry() {
    let mut rand = WyRand::new_seed(12);
    let options = EncoderOptions::default().set_tile_size(16);

    for (width, height) in [(1, 1), (1, 40), (40, 1), (16, 16), (17, 16), (16, 17), (33, 31)] {
        let image = random_image(&mut rand, width, height, ColorSpace::RGBA, BitDepth::Eight);
        let bytes = encode(&image, options).unwrap();

        assert_eq!(decode(&bytes).unwrap(), image, "{width}x{height}");
    }
}

#[test]
fn small_rgb_scenario() {
    let pixels = [0, 0, 0, 255, 255, 255, 128, 128, 128, 64, 64, 64];
    let image = RasterImage::from_u8(2, 2, ColorSpace::RGB, &pixels).unwrap();

    let lossless = EncoderOptions::new(CompressionMode::Lossless, 100);
    let decoded = decode(&encode(&image, lossless).unwrap()).unwrap();
    assert_eq!(decoded.to_u8().unwrap(), pixels);

    for quality in [0, 25, 50, 75, 99] {
        let options = EncoderOptions::new(CompressionMode::Lossy, quality);
        let decoded = decode(&encode(&image, options).unwrap()).unwrap();
        let bound = max_error(&options, ColorSpace::RGB, BitDepth::Eight);

        assert!(image.max_abs_diff(&decoded).unwrap() <= bound);
    }
}

#[test]
fn lossy_error_is_bounded() {
    let mut rand = WyRand::new_seed(77);

    for colorspace in LAYOUTS {
        for depth in [BitDepth::Eight, BitDepth::Twelve, BitDepth::Sixteen] {
            let noisy = random_image(&mut rand, 40, 23, colorspace, depth);
            let smooth = smooth_image(&mut rand, 40, 23, colorspace, depth);

            for quality in [0, 30, 60, 90, 100] {
                let options = EncoderOptions::new(CompressionMode::Lossy, quality).set_tile_size(16);
                let bound = max_error(&options, colorspace, depth);

                for image in [&noisy, &smooth] {
                    let decoded = decode(&encode(image, options).unwrap()).unwrap();
                    let diff = image.max_abs_diff(&decoded).unwrap();

                    assert!(
                        diff <= bound,
                        "{colorspace:?} {depth:?} q{quality}: {diff} > {bound}"
                    );
                }
            }
        }
    }
}

#[test]
fn bound_shrinks_with_quality() {
    for colorspace in LAYOUTS {
        let mut previous = u16::MAX;

        for quality in 0..=100 {
            let options = EncoderOptions::new(CompressionMode::Lossy, quality);
            let bound = max_error(&options, colorspace, BitDepth::Ten);

            assert!(bound <= previous);
            previous = bound;
        }
        assert_eq!(previous, 0);
        assert_eq!(
            max_error(&EncoderOptions::default(), colorspace, BitDepth::Ten),
            0
        );
    }
}

#[test]
fn output_is_deterministic() {
    let mut rand = WyRand::new_seed(3);
    let image = smooth_image(&mut rand, 70, 45, ColorSpace::RGB, BitDepth::Ten);
    let options = EncoderOptions::new(CompressionMode::Lossy, 80).set_tile_size(16);

    let first = encode(&image, options).unwrap();
    let second = encode(&image, options).unwrap();

    assert_eq!(first, second);
}

#[test]
fn thread_count_does_not_change_output() {
    let mut rand = WyRand::new_seed(9);
    let image = random_image(&mut rand, 100, 70, ColorSpace::LumaA, BitDepth::Eight);
    let base = EncoderOptions::default().set_tile_size(16);

    let single = encode(&image, base.set_num_threads(1)).unwrap();

    for threads in [2, 3, 8, 64] {
        let many = encode(&image, base.set_num_threads(threads)).unwrap();
        assert_eq!(single, many, "{threads} threads");
    }

    let options = zune_core::options::DecoderOptions::default().set_num_threads(1);
    let decoded = TicDecoder::new_with_options(&single, options)
        .decode()
        .unwrap();
    assert_eq!(decoded, image);
}

#[test]
fn every_effort_round_trips() {
    let mut rand = WyRand::new_seed(21);
    let image = smooth_image(&mut rand, 48, 33, ColorSpace::RGBA, BitDepth::Twelve);

    for effort in 0..=9 {
        let options = EncoderOptions::default()
            .set_effort(effort)
            .set_tile_size(32);
        let decoded = decode(&encode(&image, options).unwrap()).unwrap();

        assert_eq!(decoded, image, "effort {effort}");
    }
}

#[test]
fn smooth_content_compresses() {
    let (width, height) = (128, 128);
    let pixels: Vec<u8> = (0..width * height)
        .map(|i| (((i % width) + (i / width)) / 2) as u8)
        .collect();
    let image = RasterImage::from_u8(width, height, ColorSpace::Luma, &pixels).unwrap();

    let bytes = encode(&image, EncoderOptions::default()).unwrap();

    assert!(bytes.len() < pixels.len() / 2, "{} bytes", bytes.len());
    assert_eq!(decode(&bytes).unwrap(), image);

    let lossy = EncoderOptions::new(CompressionMode::Lossy, 50);
    let smaller = encode(&image, lossy).unwrap();
    assert!(smaller.len() <= bytes.len());
}

#[test]
fn headers_describe_image() {
    let mut rand = WyRand::new_seed(1);
    let image = random_image(&mut rand, 300, 20, ColorSpace::RGB, BitDepth::Sixteen);
    let options = EncoderOptions::new(CompressionMode::Lossy, 42).set_tile_size(128);
    let bytes = encode(&image, options).unwrap();

    let mut decoder = TicDecoder::new(&bytes);
    decoder.decode_headers().unwrap();
    let info = decoder.info().unwrap();

    assert_eq!((info.width, info.height), (300, 20));
    assert_eq!(info.colorspace, ColorSpace::RGB);
    assert_eq!(info.depth, BitDepth::Sixteen);
    assert_eq!(info.mode, CompressionMode::Lossy);
    assert_eq!(info.quality, 42);
    assert_eq!(info.tile_size, 128);
    assert_eq!(info.tile_count, 3);
}

#[test]
fn widest_image_decodes_with_default_options() {
    let mut rand = WyRand::new_seed(16);
    let image = random_image(&mut rand, 16384, 1, ColorSpace::Luma, BitDepth::Eight);

    let bytes = encode(&image, EncoderOptions::default()).unwrap();
    assert_eq!(decode(&bytes).unwrap(), image);
}

#[test]
fn decode_to_output_size() {
    let mut rand = WyRand::new_seed(30);
    let image = smooth_image(&mut rand, 40, 30, ColorSpace::RGB, BitDepth::Ten);
    let bytes = encode(&image, EncoderOptions::default().set_tile_size(16)).unwrap();

    for method in [
        ResizeMethod::Nearest,
        ResizeMethod::Bilinear,
        ResizeMethod::Bicubic
    ] {
        for (width, height) in [(20, 15), (57, 31), (40, 30)] {
            let options = DecoderOptions::default()
                .set_output_size(width, height)
                .set_resize_method(method);
            let mut decoder = TicDecoder::new_with_options(&bytes, options);

            decoder.decode_headers().unwrap();
            assert_eq!(decoder.dimensions(), Some((40, 30)));
            assert_eq!(decoder.output_buffer_size(), Some(width * height * 3));

            let decoded = decoder.decode().unwrap();
            assert_eq!(decoded.dimensions(), (width, height));
            assert_eq!(decoded, resize(&image, width, height, method), "{method:?}");
        }
    }
}

#[test]
fn animation_round_trip() {
    let mut rand = WyRand::new_seed(44);
    let frames: Vec<RasterImage> = (0..4)
        .map(|_| smooth_image(&mut rand, 37, 21, ColorSpace::RGBA, BitDepth::Eight))
        .collect();
    let durations = [16, 33, 0, 1000];

    let encode_with = |threads: u8| {
        let options = EncoderOptions::default()
            .set_tile_size(16)
            .set_num_threads(threads);
        let mut encoder = TicAnimationEncoder::new(37, 21, ColorSpace::RGBA, BitDepth::Eight, options)
            .set_loop_count(3);

        for (frame, duration) in frames.iter().zip(durations) {
            encoder.add_frame(frame, duration).unwrap();
        }
        encoder.encode().unwrap()
    };
    let bytes = encode_with(1);
    assert_eq!(bytes, encode_with(4));

    let mut decoder = TicAnimationDecoder::new(&bytes);
    decoder.decode_headers().unwrap();

    let info = decoder.info().unwrap();
    assert_eq!((info.width, info.height), (37, 21));
    assert_eq!(info.colorspace, ColorSpace::RGBA);
    assert_eq!(info.loop_count, 3);
    assert_eq!(info.frame_count, 4);

    for (i, (frame, duration)) in frames.iter().zip(durations).enumerate() {
        let decoded = decoder.next_frame().unwrap().unwrap();

        assert_eq!(decoded.duration(), duration, "frame {i}");
        assert_eq!(decoded.image(), frame, "frame {i}");
    }
    assert!(decoder.next_frame().unwrap().is_none());
}
