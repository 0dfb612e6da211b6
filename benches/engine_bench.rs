//! Engine throughput benchmarks: battles and gauntlets per second.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use civodds::combat::{resolve_battle, resolve_gauntlet, Unit};
use civodds::parallel::{resolve_batch, Matchup};

fn attacker() -> Unit {
    Unit::new(3.0, 100, 1).unwrap()
}

fn defender() -> Unit {
    Unit::new(3.0 * 1.65, 100, 1).unwrap()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(100);

    group.throughput(Throughput::Elements(1));
    group.bench_function("battle_with_first_hits", |b| {
        let (a, d) = (attacker(), defender());
        b.iter(|| resolve_battle(black_box(&a), black_box(&d)).unwrap());
    });

    group.bench_function("gauntlet_three_attackers", |b| {
        let wave = [attacker(), attacker(), attacker()];
        let d = defender();
        b.iter(|| resolve_gauntlet(black_box(&wave), black_box(&d)).unwrap());
    });

    let matchups: Vec<Matchup> = (1..=64)
        .map(|hp| Matchup {
            attacker: attacker(),
            defender: defender().at_hp(hp + 36),
        })
        .collect();
    group.throughput(Throughput::Elements(matchups.len() as u64));
    group.bench_function("batch_64_matchups", |b| {
        b.iter(|| resolve_batch(black_box(&matchups)));
    });

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
