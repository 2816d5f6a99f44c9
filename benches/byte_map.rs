use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use image_bytemap::{Addr, ImageByteMap, SequentialIdAllocator};

fn bench_image_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_byte_map");
    let ids = SequentialIdAllocator::new("bench");
    let mut image = ImageByteMap::new(&ids);
    image.set_addr_min_max(Addr::new(0x400000), Addr::new(0x4fffff));
    let chunk = vec![0x90u8; 4096];

    group.throughput(Throughput::Bytes(chunk.len() as u64));
    group.bench_function("set_data_4k", |b| {
        let mut at = 0x400000u64;
        b.iter(|| {
            image.set_data(Addr::new(at), &chunk).unwrap();
            at = if at >= 0x4ff000 { 0x400000 } else { at + 0x1000 };
        })
    });
    group.bench_function("get_data_4k", |b| {
        b.iter(|| image.get_data(Addr::new(0x480000), 4096).unwrap())
    });
    group.bench_function("to_bincode", |b| b.iter(|| image.to_bincode().unwrap()));
    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_data_fill");
    let ids = SequentialIdAllocator::new("bench");
    for size in [1usize << 12, 1 << 16, 1 << 20] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("fill_{size}"), |b| {
            b.iter_batched(
                || {
                    let mut image = ImageByteMap::new(&ids);
                    image.set_addr_min_max(Addr::new(0x400000), Addr::new(0x4fffff));
                    image
                },
                |mut image| {
                    image.set_data_fill(Addr::new(0x400000), size, 0xcc).unwrap();
                    image
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_image_access, bench_fill);
criterion_main!(benches);
