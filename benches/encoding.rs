use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qrbyte::common::ec::ecc;
use qrbyte::common::mask::{mask_layers, select_mask};
use qrbyte::{ECLevel, ModuleMatrix, QRBuilder, Version};

fn bench_ecc(c: &mut Criterion) {
    let block = (0..118).map(|i| (i * 37 % 256) as u8).collect::<Vec<_>>();
    c.bench_function("ecc_118_30", |b| b.iter(|| ecc(black_box(&block), black_box(30))));
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for len in [10, 100, 500, 2000] {
        let data = "B3@j#Z%8vK!3zC^8&rF9*b6".repeat(len / 23 + 1);
        let data = &data.as_bytes()[..len];
        group.bench_with_input(BenchmarkId::from_parameter(len), data, |b, data| {
            b.iter(|| QRBuilder::new(black_box(data)).ec_level(ECLevel::L).build())
        });
    }
    group.finish();
}

fn bench_mask_selection(c: &mut Criterion) {
    let qr = QRBuilder::new(&[0x5A; 1000])
        .version(Version::new(30).unwrap())
        .ec_level(ECLevel::M)
        .build()
        .unwrap();
    let matrix = qr.matrix().clone();
    let w = qr.width();
    let candidates = mask_layers(&ModuleMatrix::new(w, w));
    c.bench_function("select_mask_v30", |b| {
        b.iter(|| select_mask(black_box(&matrix), black_box(&candidates)))
    });
}

fn bench_render(c: &mut Criterion) {
    let qr = QRBuilder::new(&[0xA5; 500]).build().unwrap();
    c.bench_function("render_4px", |b| b.iter(|| qr.render(black_box(4))));
}

criterion_group!(benches, bench_ecc, bench_build, bench_mask_selection, bench_render);
criterion_main!(benches);
