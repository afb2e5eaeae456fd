use criterion::{black_box, criterion_group, criterion_main, Criterion};
use featkit::svmlight::SvmLightModel;
use featkit::{Feature, FeatureVector, VectorFeaturesEncoder};
use std::io::Cursor;

fn sample_features(count: usize) -> Vec<Feature> {
    (0..count)
        .map(|i| {
            if i % 3 == 0 {
                Feature::new(format!("numeric_{}", i), i as f64 * 0.5)
            } else {
                Feature::new(format!("categorical_{}", i % 40), format!("v{}", i))
            }
        })
        .collect()
}

fn linear_model(sv_count: usize) -> SvmLightModel {
    let mut text = String::from(
        "SVM-light Version V6.02\n0\n3\n1\n1\n1\nempty\n64\n100\n",
    );
    text.push_str(&format!("{}\n0.1\n", sv_count + 1));
    for i in 0..sv_count {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        text.push_str(&format!(
            "{} {}:{} {}:{} #\n",
            sign * 0.01 * (i + 1) as f64,
            i % 64 + 1,
            0.5,
            (i + 7) % 64 + 1,
            1.5,
        ));
    }
    SvmLightModel::from_reader(Cursor::new(text)).unwrap()
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encoding");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let features = sample_features(50);

    group.bench_function("encode_all_growing", |b| {
        b.iter(|| {
            let mut encoder = VectorFeaturesEncoder::new(1);
            encoder.encode_all(black_box(&features)).unwrap()
        })
    });

    let mut frozen = VectorFeaturesEncoder::new(1);
    frozen.encode_all(&features).unwrap();
    frozen.freeze();
    group.bench_function("encode_frozen", |b| {
        b.iter(|| frozen.encode(black_box(&features)).unwrap())
    });

    group.finish();
}

fn bench_model_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("SvmLightModel");
    group.sample_size(50);

    let query: FeatureVector = (1..=32).map(|i| (i, 0.25 * i as f64)).collect();

    let uncompressed = linear_model(200);
    group.bench_function("evaluate_support_vectors", |b| {
        b.iter(|| uncompressed.evaluate(black_box(&query)))
    });

    let mut compressed = linear_model(200);
    compressed.compress().unwrap();
    group.bench_function("evaluate_compressed", |b| {
        b.iter(|| compressed.evaluate(black_box(&query)))
    });

    group.finish();
}

criterion_group!(benches, bench_encoding, bench_model_evaluation);
criterion_main!(benches);
