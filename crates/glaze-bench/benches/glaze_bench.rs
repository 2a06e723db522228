//! Benchmarks for the glaze pipeline.
//!
//! Run with: `cargo bench -p glaze-bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use glaze_core::{PixelFormat, Raster};
use glaze_ops::color::{highlight_overlay, scale_luminance, HIGHLIGHT_THRESHOLD};
use glaze_ops::resize::{resize_with_filter, Filter};
use glaze_ops::{apply, blend, composite_over, BlendMode, Params};

fn test_image(width: u32, height: u32, format: PixelFormat) -> Raster {
    let n = format.channels();
    let data = (0..(width * height) as usize * n)
        .map(|i| ((i * 31 + i / 7) % 256) as u8)
        .collect();
    Raster::new(width, height, format, data).unwrap()
}

/// Per-pixel color stages.
fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    for size in [256u32, 1024] {
        let img = test_image(size, size, PixelFormat::Rgba);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("scale_luminance", size), &img, |b, img| {
            b.iter(|| scale_luminance(black_box(img), 1.3))
        });

        group.bench_with_input(BenchmarkId::new("highlight_overlay", size), &img, |b, img| {
            b.iter(|| highlight_overlay(black_box(img), [255, 200, 0], HIGHLIGHT_THRESHOLD))
        });
    }

    group.finish();
}

/// Blend modes and source-over.
fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend");
    let base = test_image(1024, 1024, PixelFormat::Rgba);
    let top = test_image(1024, 1024, PixelFormat::Rgb);
    let overlay = test_image(1024, 1024, PixelFormat::Rgba);
    group.throughput(Throughput::Elements(1024 * 1024));

    for mode in BlendMode::ALL {
        group.bench_function(mode.name(), |b| {
            b.iter(|| blend(black_box(&base), black_box(&top), mode).unwrap())
        });
    }

    group.bench_function("composite_over", |b| {
        b.iter(|| composite_over(black_box(&base), black_box(&overlay)).unwrap())
    });

    group.finish();
}

/// Resampling filters, down and up.
fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    let src = test_image(1024, 768, PixelFormat::Rgba);

    for filter in [Filter::Bilinear, Filter::Lanczos3] {
        for (w, h) in [(256u32, 192u32), (2048, 1536)] {
            let id = BenchmarkId::new(format!("{filter:?}"), format!("{w}x{h}"));
            group.bench_with_input(id, &(w, h), |b, &(w, h)| {
                b.iter(|| resize_with_filter(black_box(&src), w, h, filter).unwrap())
            });
        }
    }

    group.finish();
}

/// Full pipeline with every stage enabled.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let params = Params::default()
        .with_luminance(1.2)
        .with_invert(true)
        .with_highlight([255, 220, 180])
        .with_gradient(test_image(256, 1, PixelFormat::Rgb), BlendMode::Overlay)
        .with_texture(test_image(512, 512, PixelFormat::Rgba));

    for size in [512u32, 1920] {
        let base = test_image(size, size * 9 / 16, PixelFormat::Rgb);
        group.throughput(Throughput::Elements(base.pixel_count() as u64));
        group.bench_with_input(BenchmarkId::new("apply", size), &base, |b, base| {
            b.iter(|| apply(black_box(base), black_box(&params)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_color, bench_blend, bench_resize, bench_pipeline);
criterion_main!(benches);
