//! Criterion benchmarks for hydrorating-curve: table build and full fit.

use criterion::{Criterion, criterion_group, criterion_main};

use hydrorating_curve::{LevelStep, ProbabilityLevel, ProbabilitySet, RatingConfig};
use hydrorating_section::{CrossSection, Polyline, SectorSpec};

/// A 200-point survey: a sinuous channel between two wide floodplains.
fn make_section() -> CrossSection {
    let n = 200;
    let xs: Vec<f64> = (0..n).map(|i| i as f64 * 2.5).collect();
    let ys: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let valley = 8.0 * (2.0 * t - 1.0).powi(2);
            let channel = if (90..110).contains(&i) { -3.0 } else { 0.0 };
            100.0 + valley + channel + 0.2 * (i as f64 * 0.7).sin()
        })
        .collect();
    let profile = Polyline::new(xs, ys).unwrap();
    let spec = |name: &str, roughness: f64, start_point: usize, end_point: usize| SectorSpec {
        name: name.to_string(),
        roughness,
        slope: 1.5,
        start_point,
        end_point,
    };
    CrossSection::new(
        profile,
        vec![
            spec("левая пойма", 0.07, 0, 89),
            spec("русло", 0.035, 89, 110),
            spec("правая пойма", 0.08, 110, n - 1),
        ],
    )
    .unwrap()
}

fn targets() -> ProbabilitySet {
    ProbabilitySet::new(
        vec![
            ProbabilityLevel::new("1%", 900.0),
            ProbabilityLevel::new("5%", 600.0),
            ProbabilityLevel::new("10%", 400.0),
        ],
        None,
    )
    .unwrap()
}

fn bench_build_table_overflow(c: &mut Criterion) {
    let section = make_section();
    let cfg = RatingConfig::new().with_level_step(LevelStep::from_centimeters(1.0));

    c.bench_function("build_table_200pt_3sect_1cm_overflow", |b| {
        b.iter(|| cfg.build_table(&section, 1000.0).unwrap());
    });
}

fn bench_build_table_independent(c: &mut Criterion) {
    let section = make_section();
    let cfg = RatingConfig::new()
        .with_overflow(false)
        .with_level_step(LevelStep::from_centimeters(1.0));

    c.bench_function("build_table_200pt_3sect_1cm_independent", |b| {
        b.iter(|| cfg.build_table(&section, 1000.0).unwrap());
    });
}

fn bench_fit(c: &mut Criterion) {
    let section = make_section();
    let set = targets();
    let cfg = RatingConfig::new().with_level_step(LevelStep::from_centimeters(5.0));

    c.bench_function("fit_200pt_3sect_5cm", |b| {
        b.iter(|| cfg.fit(&section, &set).unwrap());
    });
}

criterion_group!(
    benches,
    bench_build_table_overflow,
    bench_build_table_independent,
    bench_fit
);
criterion_main!(benches);
