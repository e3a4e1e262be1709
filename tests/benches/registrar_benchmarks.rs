//! # Registrar Benchmarks
//!
//! | Path | Measured |
//! |------|----------|
//! | Fee split | `split_price` over prices and fees |
//! | Registration | Full journaled `register` including settlement |
//! | Query | Listed-domain lookup with subdomain ownership |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use registrar_tests::fixtures::{account, World};
use shared_types::U256;
use subdomain_registrar::prelude::*;

// ============================================================================
// Fee Settlement
// ============================================================================

fn bench_split_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("fee-settlement");
    let mut rng = rand::thread_rng();
    let inputs: Vec<(U256, ReferralFee)> = (0..1_000)
        .map(|_| {
            let price = U256::from(rng.gen::<u128>());
            let fee = ReferralFee::new(rng.gen_range(0..=1_000_000)).unwrap_or(ReferralFee::ZERO);
            (price, fee)
        })
        .collect();

    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("split_price_batch", |b| {
        b.iter(|| {
            for (price, fee) in &inputs {
                black_box(split_price(*price, *fee));
            }
        })
    });

    group.bench_function("split_price_max", |b| {
        let fee = ReferralFee::new(999_999).unwrap_or(ReferralFee::ZERO);
        b.iter(|| black_box(split_price(black_box(U256::MAX), fee)))
    });

    group.finish();
}

// ============================================================================
// Domain Registry
// ============================================================================

fn listed_world() -> World {
    let world = World::new();
    let owner = account(0);
    world.onboard("bench", owner);
    let _ = world
        .registry
        .configure_domain(owner, "bench", U256::from(1_000u64), 100_000);
    world
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain-registry");

    for batch in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("register", batch), &batch, |b, &batch| {
            b.iter_with_setup(
                || {
                    let world = listed_world();
                    let buyer = account(1);
                    world.env.ledger.mint(buyer, U256::from(1_000u64 * batch as u64));
                    world
                },
                |world| {
                    let buyer = account(1);
                    for i in 0..batch {
                        let request = RegistrationRequest::new(
                            "bench",
                            &format!("sub{i}"),
                            buyer,
                            U256::from(1_000u64),
                        )
                        .referrer(account(2));
                        black_box(world.registry.register(buyer, request).is_ok());
                    }
                },
            )
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain-registry");
    let world = listed_world();
    group.bench_function("query_listed", |b| {
        b.iter(|| black_box(world.registry.query(black_box("bench"), black_box("sub"))))
    });
    group.bench_function("query_unknown", |b| {
        b.iter(|| black_box(world.registry.query(black_box("missing"), black_box(""))))
    });
    group.finish();
}

criterion_group!(benches, bench_split_price, bench_register, bench_query);
criterion_main!(benches);
