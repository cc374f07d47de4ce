//! Expression engine benchmarks: parsing and evaluation per mode.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robo_skirmish::dice::{DamageExpression, EvaluationMode};

const EXPRESSIONS: [&str; 3] = ["2d6+3", "(1d2*1d3)+2", "((3d6-2)*(1d4+1))/2"];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for source in EXPRESSIONS {
        group.bench_function(source, |b| {
            b.iter(|| DamageExpression::parse(black_box(source)))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let expression = DamageExpression::parse("((3d6-2)*(1d4+1))/2").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for mode in EvaluationMode::ALL {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| expression.evaluate(black_box(mode), &mut rng))
        });
    }
    group.finish();
}

fn bench_volley(c: &mut Criterion) {
    let expression = DamageExpression::parse("1d7").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("volley_of_6_random", |b| {
        b.iter(|| {
            let volley = expression.volley(black_box(6)).unwrap();
            volley.evaluate(EvaluationMode::Random, &mut rng)
        })
    });
}

criterion_group!(benches, bench_parse, bench_evaluate, bench_volley);
criterion_main!(benches);
