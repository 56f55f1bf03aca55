#[macro_use]
extern crate criterion;

use criterion::{Benchmark, Criterion};
use mam_core::pow::search;
use mam_core::sponge::STATE_LEN;

fn nonce_search(c: &mut Criterion) {
    c.bench(
        "pow",
        Benchmark::new("search_security_1", |b| {
            let state = vec![0i8; STATE_LEN];
            b.iter(|| search(&state, 1, 81, 0).unwrap());
        })
        .sample_size(10),
    );
}

criterion_group!(benches, nonce_search);
criterion_main!(benches);
