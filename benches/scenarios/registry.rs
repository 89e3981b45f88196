//! Benchmarks for full-polyphony registry passes.
//!
//! The registry render is the audio callback's entire critical section, so
//! a full sixteen-voice pass must stay comfortably inside the per-buffer
//! deadline.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use keytone::engine::{EngineConfig, SynthEngine};
use keytone::synth::{Roster, VoiceRegistry};

use crate::BLOCK_SIZES;

const SAMPLE_PERIOD: f64 = 1.0 / 48_000.0;

fn full_keyboard() -> VoiceRegistry {
    let mut registry = VoiceRegistry::new();
    for id in 0..16 {
        // Alternate harmonica and bell voices across the keyboard
        registry.key_down(id, id % 2, 1.0);
    }
    registry
}

pub fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/registry");
    let roster = Roster::standard();

    for &size in BLOCK_SIZES {
        // Sixteen held voices, the worst sustained case
        group.bench_with_input(BenchmarkId::new("sixteen_held", size), &size, |b, &size| {
            b.iter_batched(
                full_keyboard,
                |mut registry| {
                    let mut acc = 0.0;
                    for i in 0..size {
                        let time = 2.0 + i as f64 * SAMPLE_PERIOD;
                        acc += registry.render_and_reap(black_box(time), &roster);
                    }
                    acc
                },
                BatchSize::SmallInput,
            )
        });

        // The engine path the binary actually runs: one lock per block
        group.bench_with_input(BenchmarkId::new("engine_block", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let engine = SynthEngine::new(EngineConfig::default());
                    for id in 0..16 {
                        engine.key_down(id, 1.0);
                    }
                    (engine, vec![0.0f32; size])
                },
                |(engine, mut block)| {
                    engine.render_block(black_box(&mut block), 2.0, SAMPLE_PERIOD);
                    block
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
