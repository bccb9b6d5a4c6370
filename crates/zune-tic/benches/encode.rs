/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nanorand::{Rng, WyRand};
use zune_core::colorspace::ColorSpace;
use zune_core::options::{CompressionMode, EncoderOptions};
use zune_tic::{decode, encode, RasterImage};

fn photo_like(width: usize, height: usize) -> RasterImage {
    let mut rand = WyRand::new_seed(42);
    let mut pixels = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        for x in 0..width {
            let base = ((x * 3 + y * 2) % 256) as u8;
            for c in 0..3_u8 {
                pixels.push(base.wrapping_add(c * 20).saturating_add(rand.generate_range(0_u8..6)));
            }
        }
    }
    RasterImage::from_u8(width, height, ColorSpace::RGB, &pixels).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let image = photo_like(1024, 768);
    let mut group = c.benchmark_group("tic: Simple encode");

    group.throughput(Throughput::Bytes(image.samples().len() as u64));

    group.bench_function("lossless 1 thread", |b| {
        let options = EncoderOptions::default().set_num_threads(1);
        b.iter(|| black_box(encode(&image, options).unwrap()))
    });

    group.bench_function("lossless 8 threads", |b| {
        let options = EncoderOptions::default().set_num_threads(8);
        b.iter(|| black_box(encode(&image, options).unwrap()))
    });

    group.bench_function("lossy q75", |b| {
        let options = EncoderOptions::new(CompressionMode::Lossy, 75);
        b.iter(|| black_box(encode(&image, options).unwrap()))
    });
}

fn bench_decode(c: &mut Criterion) {
    let image = photo_like(1024, 768);
    let data = encode(&image, EncoderOptions::default()).unwrap();
    let mut group = c.benchmark_group("tic: Simple decode");

    group.throughput(Throughput::Bytes(image.samples().len() as u64));

    group.bench_function("lossless", |b| {
        b.iter(|| black_box(decode(data.as_slice()).unwrap()))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_encode, bench_decode);

criterion_main!(benches);
