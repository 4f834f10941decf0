use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pqc_tunnel::{CipherSuite, Handshake, KeyMaterial, Primitives, SessionSecret};

fn suites() -> [(&'static str, CipherSuite); 3] {
    [
        ("lightweight", CipherSuite::lightweight()),
        ("default", CipherSuite::default()),
        ("high_security", CipherSuite::high_security()),
    ]
}

/// One message from `from` to `to`
fn message(from: &Arc<KeyMaterial>, to: &Arc<KeyMaterial>) -> Vec<u8> {
    Handshake::new(Arc::clone(from), to.public_identity(), Primitives::for_suite(from.suite()))
        .unwrap()
        .encapsulate()
        .unwrap()
        .sign()
        .unwrap()
        .message()
        .to_bytes()
}

/// Both halves of a handshake in memory
fn full_handshake(alice: &Arc<KeyMaterial>, bob: &Arc<KeyMaterial>) -> SessionSecret {
    let primitives = Primitives::for_suite(alice.suite());
    let a = Handshake::new(Arc::clone(alice), bob.public_identity(), primitives)
        .unwrap()
        .encapsulate()
        .unwrap()
        .sign()
        .unwrap();
    let incoming = message(bob, alice);

    a.sent()
        .receive(&incoming)
        .unwrap()
        .verify()
        .unwrap()
        .establish()
        .unwrap()
}

fn benchmark_key_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_generation");

    for (name, suite) in suites() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &suite, |b, &suite| {
            b.iter(|| black_box(KeyMaterial::generate(suite).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_handshake_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("handshake_steps");
    let suite = CipherSuite::default();
    let alice = Arc::new(KeyMaterial::generate(suite).unwrap());
    let bob = Arc::new(KeyMaterial::generate(suite).unwrap());

    group.bench_function("encapsulate_and_sign", |b| {
        b.iter(|| black_box(message(&alice, &bob)));
    });

    let incoming = message(&bob, &alice);
    group.bench_function("verify_and_establish", |b| {
        b.iter_with_setup(
            || {
                Handshake::new(Arc::clone(&alice), bob.public_identity(), Primitives::for_suite(suite))
                    .unwrap()
                    .encapsulate()
                    .unwrap()
                    .sign()
                    .unwrap()
                    .sent()
            },
            |sent| {
                black_box(
                    sent.receive(&incoming)
                        .unwrap()
                        .verify()
                        .unwrap()
                        .establish()
                        .unwrap(),
                )
            },
        );
    });

    group.finish();
}

fn benchmark_full_handshake(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_handshake");

    for (name, suite) in suites() {
        let alice = Arc::new(KeyMaterial::generate(suite).unwrap());
        let bob = Arc::new(KeyMaterial::generate(suite).unwrap());

        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| black_box(full_handshake(&alice, &bob)));
        });
    }

    group.finish();
}

fn benchmark_derive_key(c: &mut Criterion) {
    let suite = CipherSuite::default();
    let alice = Arc::new(KeyMaterial::generate(suite).unwrap());
    let bob = Arc::new(KeyMaterial::generate(suite).unwrap());
    let secret = full_handshake(&alice, &bob);

    c.bench_function("derive_key", |b| {
        b.iter(|| black_box(secret.derive_key(black_box(b"client->server")).unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_key_generation,
    benchmark_handshake_steps,
    benchmark_full_handshake,
    benchmark_derive_key
);
criterion_main!(benches);
