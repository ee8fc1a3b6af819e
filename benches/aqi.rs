use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smogcheck::{pm25_to_aqi, pm25_to_cigarettes, AqiAssessment};

fn bench_classifier(c: &mut Criterion) {
    // One value per segment plus both out-of-table cases
    let samples = [-1.0, 6.0, 20.0, 45.0, 100.0, 200.0, 300.0, 420.0, 612.0];

    c.bench_function("pm25_to_aqi", |b| {
        b.iter(|| {
            for &pm in &samples {
                black_box(pm25_to_aqi(black_box(pm)));
            }
        })
    });

    c.bench_function("assess_and_convert", |b| {
        b.iter(|| {
            for &pm in &samples {
                black_box(AqiAssessment::from_pm25(black_box(pm)));
                black_box(pm25_to_cigarettes(black_box(pm)));
            }
        })
    });
}

criterion_group!(benches, bench_classifier);
criterion_main!(benches);
