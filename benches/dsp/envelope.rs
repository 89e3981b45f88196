//! Benchmarks for the timestamp-driven ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::dsp::envelope::Adsr;

use crate::BLOCK_SIZES;

const SAMPLE_PERIOD: f64 = 1.0 / 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let env = Adsr::new(0.01, 0.01, 0.8, 0.2);

    for &size in BLOCK_SIZES {
        // Held phase (attack/decay/sustain formula only)
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..size {
                    let time = 1.0 + i as f64 * SAMPLE_PERIOD;
                    acc += env.amplitude(black_box(time), black_box(1.0), black_box(0.0));
                }
                acc
            })
        });

        // Release phase (reconstructs its start amplitude every call)
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..size {
                    let time = 2.05 + i as f64 * SAMPLE_PERIOD;
                    acc += env.amplitude(black_box(time), black_box(1.0), black_box(2.0));
                }
                acc
            })
        });
    }

    group.finish();
}
