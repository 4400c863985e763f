use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use collision_survey::CollisionSurveyor;
use lcg_core::{JavaRandom, ReplaySource, SilentReporter, JAVA_RANDOM};
use repetition_finder::RepetitionDetector;
use seed_recovery::{recover_and_predict, recover_first_match};

fn bench_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("recover_and_predict");

    for observed_len in [2usize, 3, 5] {
        let mut random = JavaRandom::new(42);
        let observed = random.take_outputs(observed_len);
        group.bench_with_input(
            BenchmarkId::from_parameter(observed_len),
            &observed,
            |b, observed| {
                b.iter(|| recover_and_predict(observed, 10));
            },
        );
    }

    group.finish();
}

fn bench_first_match(c: &mut Criterion) {
    let mut random = JavaRandom::new(42);
    let observed = random.take_outputs(2);
    c.bench_function("recover_first_match", |b| {
        b.iter(|| recover_first_match(&JAVA_RANDOM, observed[0], observed[1]));
    });
}

fn bench_survey(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_survey");
    group.sample_size(20);

    let mut surveyor = CollisionSurveyor::new(&JAVA_RANDOM);
    let mut out = Vec::new();
    for first in [i32::MIN, 0, 1_568_757_050] {
        group.bench_with_input(BenchmarkId::from_parameter(first), &first, |b, &first| {
            b.iter(|| {
                out.clear();
                surveyor.collisions_for(first, &mut out)
            });
        });
    }

    group.finish();
}

fn bench_repetition(c: &mut Criterion) {
    let mut group = c.benchmark_group("repetition_finder");
    group.sample_size(10);

    let period = 1u64 << 16;
    let mut state = 42u64;
    let block: Vec<i32> = (0..period)
        .map(|_| {
            state = (state * 0xE66D + 0xB) & 0xFFFF;
            (state >> 8) as i32
        })
        .collect();

    for window_length in [4usize, 8, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(window_length),
            &window_length,
            |b, &window_length| {
                b.iter(|| {
                    let mut detector = RepetitionDetector::new(period, window_length).unwrap();
                    detector
                        .run(ReplaySource::repeated(&block, 2), &mut SilentReporter)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_recovery,
    bench_first_match,
    bench_survey,
    bench_repetition
);
criterion_main!(benches);
