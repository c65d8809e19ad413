//! Benchmarks for CIDR collapse performance.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ipnet::Ipv4Net;
use std::hint::black_box;
use std::net::Ipv4Addr;

use roslist::collapse::collapse_v4;
use roslist::normalize::range_to_cidrs;

/// Generate /32 blocks scattered across the space
fn generate_hosts(count: usize) -> Vec<Ipv4Net> {
    (0..count)
        .map(|i| {
            let addr = Ipv4Addr::from((i as u32).wrapping_mul(2_654_435_761));
            Ipv4Net::new(addr, 32).unwrap()
        })
        .collect()
}

/// Generate CIDRs of varying sizes, many of them contiguous
fn generate_cidrs(count: usize) -> Vec<Ipv4Net> {
    (0..count)
        .map(|i| {
            let a = (i % 256) as u8;
            let b = ((i / 256) % 256) as u8;
            let prefix = 16 + (i % 17) as u8;
            Ipv4Net::new(Ipv4Addr::new(a, b, 0, 0), prefix).unwrap().trunc()
        })
        .collect()
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse");

    for size in [100, 1000, 10000, 50000] {
        let hosts = generate_hosts(size);
        group.bench_with_input(BenchmarkId::new("single_hosts", size), &hosts, |b, nets| {
            b.iter(|| black_box(collapse_v4(nets)));
        });

        let cidrs = generate_cidrs(size);
        group.bench_with_input(BenchmarkId::new("mixed_cidrs", size), &cidrs, |b, nets| {
            b.iter(|| black_box(collapse_v4(nets)));
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    // Worst case for the decomposition: an odd count starting just past an
    // alignment boundary produces a long run of shrinking blocks
    group.bench_function("odd_count", |b| {
        b.iter(|| black_box(range_to_cidrs(Ipv4Addr::new(1, 0, 0, 1), 16383).unwrap()));
    });

    group.bench_function("power_of_two_counts", |b| {
        b.iter(|| {
            for exp in 0..=20u32 {
                black_box(range_to_cidrs(Ipv4Addr::new(36, 128, 0, 0), 1 << exp).unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_collapse, bench_normalize);
criterion_main!(benches);
