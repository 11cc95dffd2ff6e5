//! Benchmarks for the Darkroom transformation pipeline.
//!
//! Run with: cargo bench -p darkroom-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use std::sync::Arc;

use darkroom_core::{Config, ImagePipeline, ProcessOptions, RasterEngine};
use image::{ImageFormat, Rgba, RgbaImage};

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbaImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
    }
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

fn pipeline() -> ImagePipeline {
    let config = Config::default();
    let engine = Arc::new(RasterEngine::new(config.output.clone(), config.limits.clone()));
    ImagePipeline::new(&config, engine)
}

fn benchmark_passthrough(c: &mut Criterion) {
    let bytes = png_fixture(512, 512);
    let pipeline = pipeline();
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("passthrough_512", |b| {
        b.iter(|| {
            let _ = rt.block_on(pipeline.process_bytes(
                black_box(bytes.clone()),
                "[]",
                &ProcessOptions::default(),
            ));
        })
    });
}

fn benchmark_scale(c: &mut Criterion) {
    let bytes = png_fixture(512, 512);
    let pipeline = pipeline();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let steps = r#"[{"operation":"scale","params":{"width":128,"height":128}}]"#;

    c.bench_function("scale_512_to_128", |b| {
        b.iter(|| {
            let _ = rt.block_on(pipeline.process_bytes(
                black_box(bytes.clone()),
                steps,
                &ProcessOptions::default(),
            ));
        })
    });
}

fn benchmark_blur(c: &mut Criterion) {
    let bytes = png_fixture(512, 512);
    let pipeline = pipeline();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let steps = r#"[{"operation":"blur","params":{"factor":3}}]"#;

    c.bench_function("blur_512", |b| {
        b.iter(|| {
            let _ = rt.block_on(pipeline.process_bytes(
                black_box(bytes.clone()),
                steps,
                &ProcessOptions::default(),
            ));
        })
    });
}

fn benchmark_three_step_chain(c: &mut Criterion) {
    let bytes = png_fixture(512, 512);
    let pipeline = pipeline();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let steps = r#"[
        {"operation":"scale","params":{"width":256,"height":256}},
        {"operation":"sepia"},
        {"operation":"flip"}
    ]"#;

    c.bench_function("chain_scale_sepia_flip", |b| {
        b.iter(|| {
            let _ = rt.block_on(pipeline.process_bytes(
                black_box(bytes.clone()),
                steps,
                &ProcessOptions::default(),
            ));
        })
    });
}

criterion_group!(
    benches,
    benchmark_passthrough,
    benchmark_scale,
    benchmark_blur,
    benchmark_three_step_chain
);
criterion_main!(benches);
