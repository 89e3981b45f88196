//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::dsp::oscillator::{self, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_PERIOD: f64 = 1.0 / 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        ("sine", Waveform::Sine),
        ("square", Waveform::Square),
        ("triangle", Waveform::Triangle),
        // The expensive one: 99 sin() calls per sample
        ("saw_additive", Waveform::SawAdditive),
        ("saw", Waveform::Saw),
        ("noise", Waveform::Noise),
    ];

    for &size in BLOCK_SIZES {
        for &(name, waveform) in &waveforms {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for i in 0..size {
                        let time = i as f64 * SAMPLE_PERIOD;
                        acc += oscillator::sample(black_box(time), black_box(440.0), waveform);
                    }
                    acc
                })
            });
        }

        // Vibrato adds one sin() of overhead to the phase
        group.bench_with_input(BenchmarkId::new("sine_vibrato", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..size {
                    let time = i as f64 * SAMPLE_PERIOD;
                    acc += oscillator::sample_lfo(
                        black_box(time),
                        black_box(440.0),
                        Waveform::Sine,
                        5.0,
                        0.001,
                    );
                }
                acc
            })
        });
    }

    group.finish();
}
