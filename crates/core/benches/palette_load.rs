use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pal_core::{PaletteLoader, PaletteResource, RegisterBank, PALETTE_BANK_BYTES};

/// Gradient palette filling the whole bank
fn bench_data() -> Vec<u8> {
    (0..PALETTE_BANK_BYTES / 2)
        .flat_map(|i| ((i as u16) & 0x0FFF).to_le_bytes())
        .collect()
}

fn bench_full_load(c: &mut Criterion) {
    let data = bench_data();
    let mut group = c.benchmark_group("palette_full_load");

    for entries in [16usize, 64, 256].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(entries),
            entries,
            |b, &entries| {
                let res = PaletteResource::new(&data, entries);
                let mut loader = PaletteLoader::new(RegisterBank::new());
                b.iter(|| {
                    loader.load_palette(black_box(&res), 0);
                    black_box(loader.transfer().palette()[0]);
                });
            },
        );
    }

    group.finish();
}

fn bench_region_load(c: &mut Criterion) {
    let data = bench_data();
    let res = PaletteResource::from_bytes(&data);

    c.bench_function("palette_region_load_16", |b| {
        let mut loader = PaletteLoader::new(RegisterBank::new());
        b.iter(|| {
            loader.load_palette_region(black_box(&res), 32, 64, 16);
        });
    });
}

fn bench_checked_vs_unchecked(c: &mut Criterion) {
    let data = bench_data();
    let res = PaletteResource::new(&data, 64);
    let mut group = c.benchmark_group("palette_checked");

    group.bench_function("unchecked", |b| {
        let mut loader = PaletteLoader::new(RegisterBank::new());
        b.iter(|| loader.load_palette(black_box(&res), 0));
    });

    group.bench_function("checked", |b| {
        let mut loader = PaletteLoader::new(RegisterBank::new());
        b.iter(|| black_box(loader.try_load_palette(black_box(&res), 0)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_load,
    bench_region_load,
    bench_checked_vs_unchecked
);
criterion_main!(benches);
