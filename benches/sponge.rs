#[macro_use]
extern crate criterion;

use criterion::{Benchmark, Criterion};
use mam_core::sponge::Sponge;

fn absorb_squeeze(c: &mut Criterion) {
    c.bench(
        "sponge",
        Benchmark::new("absorb_squeeze_27_rounds", |b| {
            let input: Vec<i8> = (0..243).map(|i| (i % 3) as i8 - 1).collect();
            b.iter(|| {
                let mut s = Sponge::new(27);
                s.absorb(&input);
                s.squeeze(243)
            });
        })
        .sample_size(10),
    );
}

criterion_group!(benches, absorb_squeeze);
criterion_main!(benches);
