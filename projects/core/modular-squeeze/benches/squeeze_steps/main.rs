use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use modular_squeeze::bench::{h_squeeze_row, v_squeeze_row};
use modular_squeeze::{fwd_squeeze, Channel, Executor, Image, Pixel};
use std::hint::black_box;

// Square channel sizes to benchmark with
const SIZES: [usize; 3] = [256, 1024, 4096];

fn generate_channel(w: usize, h: usize) -> Channel {
    let mut channel = Channel::create(w, h, 0, 0).unwrap();
    for (i, pixel) in channel.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        // Smooth gradient with a little texture, roughly what photographic content looks like.
        *pixel = ((x + y) / 4) as Pixel + ((x * 31 + y * 17) % 7) as Pixel;
    }
    channel
}

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("Squeeze Rows");

    for size in SIZES {
        let chin = generate_channel(size, size);
        let mut p_out = vec![0; size.div_ceil(2)];
        let mut p_res = vec![0; size / 2];
        group.throughput(Throughput::Bytes((size * size * size_of::<Pixel>()) as u64));

        group.bench_with_input(BenchmarkId::new("horizontal", size), &chin, |b, chin| {
            b.iter(|| {
                for row in chin.rows() {
                    h_squeeze_row(black_box(row), &mut p_out, &mut p_res);
                }
            })
        });

        let mut p_out = vec![0; size];
        let mut p_res = vec![0; size];
        let res_h = size / 2;
        group.bench_with_input(BenchmarkId::new("vertical", size), &chin, |b, chin| {
            b.iter(|| {
                for y in 0..res_h {
                    v_squeeze_row(black_box(chin), y, res_h, &mut p_out, &mut p_res);
                }
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Squeeze Pipeline");

    for size in SIZES {
        let channels: Vec<_> = (0..3).map(|_| generate_channel(size, size)).collect();
        group.throughput(Throughput::Bytes(
            (3 * size * size * size_of::<Pixel>()) as u64,
        ));

        let mut executors = vec![("sequential", Executor::Sequential)];
        if cfg!(feature = "multithreaded") {
            executors.push(("default", Executor::default()));
        }

        for (name, executor) in executors {
            group.bench_with_input(BenchmarkId::new(name, size), &channels, |b, channels| {
                b.iter_batched(
                    || {
                        let copies = channels.iter().map(|c| c.try_clone().unwrap()).collect();
                        Image::new(copies, 0)
                    },
                    |mut image| fwd_squeeze(&mut image, &[], &executor).unwrap(),
                    BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_rows, bench_pipeline
}

criterion_main!(benches);
