use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use keccak_gate_builder::refs::{GatePin, FIRST_NEXT_REF, ONE_REF, RATE_WIDTH, ZERO_REF};
use keccak_gate_builder::KeccakGateBuilder;

/// Sizes a builder generously enough for a handful of permutation rounds' worth of gates.
const BENCH_MAX_REFS: usize = FIRST_NEXT_REF as usize + 64_000;

fn bench_op_insertion(c: &mut Criterion) {
    c.bench_function("op_xor_insertion", |b| {
        b.iter_batched(
            || KeccakGateBuilder::new(BENCH_MAX_REFS, 32),
            |mut builder| {
                let r = builder.get_free_ref();
                builder.xor(ONE_REF, GatePin::Output, ZERO_REF, GatePin::Output, r);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_mix_rin(c: &mut Criterion) {
    c.bench_function("mix_rin", |b| {
        b.iter_batched(
            || {
                let mut builder = KeccakGateBuilder::new(BENCH_MAX_REFS, 32);
                builder.set_rin(&[0u8; RATE_WIDTH]);
                builder
            },
            |mut builder| builder.mix_rin(),
            BatchSize::SmallInput,
        )
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_op_insertion(c);
    bench_mix_rin(c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
