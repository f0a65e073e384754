//! Benchmarks for the pixel and grid comparators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use renderdiff::{compare_grid_documents, compare_pixels, pack_rgba, GridDocument, RasterImage};

fn bench_compare_pixels(c: &mut Criterion) {
    let a = pack_rgba(10, 20, 30, 255);
    let b = pack_rgba(12, 20, 30, 250);

    c.bench_function("compare_pixels", |bench| {
        bench.iter(|| compare_pixels(black_box(a), black_box(b), true, 1))
    });
}

fn bench_raster_compare_256(c: &mut Criterion) {
    let expected = RasterImage::filled(256, 256, 70, 130, 180, 255);
    let mut actual = expected.clone();
    for x in 0..256 {
        actual.set_pixel(x, 128, [128, 128, 128, 255]);
    }

    c.bench_function("raster_compare_256x256", |b| {
        b.iter(|| black_box(&actual).compare(black_box(&expected), 0, true))
    });
}

fn bench_grid_compare_64(c: &mut Criterion) {
    let row = "  !!!!##  ".repeat(7);
    let rows: Vec<String> = (0..64).map(|_| format!("\"{}\"", &row[..64])).collect();
    let json = format!(
        r#"{{"data":{{}},"keys":["","1","2"],"grid":[{}]}}"#,
        rows.join(",")
    );
    let doc: GridDocument = json.parse().expect("benchmark grid parses");

    c.bench_function("grid_compare_64x64", |b| {
        b.iter(|| compare_grid_documents(black_box(&doc), black_box(&doc)))
    });
}

criterion_group!(
    benches,
    bench_compare_pixels,
    bench_raster_compare_256,
    bench_grid_compare_64,
);
criterion_main!(benches);
