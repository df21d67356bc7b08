//! Criterion benchmarks for veboost-decay.
//!
//! Covers: value evaluation in each phase of the schedule.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use veboost_core::constants::{COIN, WEEK};
use veboost_core::traits::DecayCurve;
use veboost_core::types::{AccountId, BoostRecord};
use veboost_decay::engine::TwoPhaseDecay;

fn sample_record() -> BoostRecord {
    BoostRecord {
        delegator: AccountId::from_label("alice"),
        receiver: AccountId::from_label("bob"),
        initial_magnitude: (1_000 * COIN) as i128,
        start_time: 1_700_000_000,
        expiry_time: 1_700_000_000 + 4 * WEEK,
        cancel_time: 1_700_000_000 + 8 * WEEK,
    }
}

fn bench_grant_phase(c: &mut Criterion) {
    let curve = TwoPhaseDecay::new();
    let record = sample_record();
    let now = record.start_time + WEEK;

    c.bench_function("value_grant_phase", |b| {
        b.iter(|| curve.value_at(black_box(&record), black_box(now)))
    });
}

fn bench_debt_phase(c: &mut Criterion) {
    let curve = TwoPhaseDecay::new();
    let record = sample_record();
    let now = record.expiry_time + WEEK;

    c.bench_function("value_debt_phase", |b| {
        b.iter(|| curve.value_at(black_box(&record), black_box(now)))
    });
}

fn bench_debt_at(c: &mut Criterion) {
    let curve = TwoPhaseDecay::new();
    let record = sample_record();
    let now = record.expiry_time + 2 * WEEK;

    c.bench_function("debt_at", |b| {
        b.iter(|| curve.debt_at(black_box(&record), black_box(now)))
    });
}

criterion_group!(benches, bench_grant_phase, bench_debt_phase, bench_debt_at);
criterion_main!(benches);
