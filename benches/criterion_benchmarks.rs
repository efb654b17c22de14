use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lzgreedy::dict::HashDict;
use lzgreedy::engine::{self, ParseOptions};
use lzgreedy::finder::{Greedy, OpFinder};
use lzgreedy::hash::config;
use lzgreedy::hash::table::PrefixTable;
use std::fs;
use std::path::Path;

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

/// Random blocks repeated with small edits, roughly like versioned text.
fn gen_repetitive(size: usize, block: usize, seed: u64) -> Vec<u8> {
    let base = gen_data(block, seed);
    let mut out = Vec::with_capacity(size);
    let mut round = 0u8;
    while out.len() < size {
        let start = out.len();
        out.extend_from_slice(&base);
        for i in (start..out.len()).step_by(97) {
            out[i] = out[i].wrapping_add(round);
        }
        round = round.wrapping_add(1);
    }
    out.truncate(size);
    out
}

fn parse_level(data: &[u8], level: u32) -> Vec<lzgreedy::ops::Operation> {
    let opts = ParseOptions {
        level,
        ..Default::default()
    };
    engine::parse_with_options(data, &opts).unwrap().0
}

fn write_ops_snapshot() {
    let data = gen_repetitive(2 * 1024 * 1024, 4096, 123);
    let mut csv = String::from("level,ops,input_bytes,ops_per_byte\n");
    for level in 0u32..=9 {
        let ops = parse_level(&data, level);
        let ratio = ops.len() as f64 / data.len() as f64;
        csv.push_str(&format!("{level},{},{},{}\n", ops.len(), data.len(), ratio));
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ops_snapshot.csv"), csv);
}

fn bench_parse_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("parse_speed_mb_s");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_repetitive(size, 8192, 1);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let ops = parse_level(black_box(&data), 6);
                black_box(ops);
            });
        });
    }
    g.finish();
}

fn bench_random_input(c: &mut Criterion) {
    let mut g = c.benchmark_group("parse_random_input");
    let data = gen_data(1024 * 1024, 2);
    g.throughput(Throughput::Bytes(data.len() as u64));
    g.bench_function("level_6", |b| {
        b.iter(|| {
            let ops = parse_level(black_box(&data), 6);
            black_box(ops);
        });
    });
    g.finish();
}

fn bench_decode_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("decode_speed");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_repetitive(size, 8192, 3);
        let ops = parse_level(&data, 6);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let out = engine::decode(black_box(&ops)).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_ops_vs_level(c: &mut Criterion) {
    write_ops_snapshot();
    let mut g = c.benchmark_group("ops_vs_level");
    let data = gen_repetitive(2 * 1024 * 1024, 4096, 4);
    for level in 0u32..=9u32 {
        g.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, level| {
            b.iter(|| {
                let ops = parse_level(&data, *level);
                black_box(ops.len());
            });
        });
    }
    g.finish();
}

fn bench_find_ops(c: &mut Criterion) {
    let mut g = c.benchmark_group("find_ops_single_run");
    let data = gen_repetitive(256 * 1024, 2048, 5);
    g.throughput(Throughput::Bytes(data.len() as u64));
    g.bench_function("cover_all", |b| {
        b.iter(|| {
            let mut d = HashDict::new(config::DEFAULT).unwrap();
            d.write_bytes(&data);
            let ops = Greedy.find_ops(&mut d, true).unwrap();
            black_box(ops);
        });
    });
    g.finish();
}

fn bench_prefix_table(c: &mut Criterion) {
    let mut g = c.benchmark_group("prefix_table_performance");
    let data = gen_data(1 << 18, 6);
    for window in [1usize << 14, 1 << 16, 1 << 18] {
        g.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, window| {
            b.iter(|| {
                let mut table = PrefixTable::new(*window);
                for (pos, key) in data[..*window].windows(4).enumerate() {
                    table.insert(key, pos as u64);
                }
                black_box(table.lookup(b"abcd"));
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_parse_speed,
    bench_random_input,
    bench_decode_speed,
    bench_ops_vs_level,
    bench_find_ops,
    bench_prefix_table
);
criterion_main!(benches);
