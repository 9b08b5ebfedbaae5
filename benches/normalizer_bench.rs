//! Criterion benchmarks for the normalization engine

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use domainstack::services::{normalize, url_classifier, ProviderDirectory};

fn sample_node() -> serde_yaml::Value {
    serde_yaml::from_str(
        r#"
appsignal:
  dashboard: https://appsignal.com/acme/sites/1/dashboard
  errors: https://appsignal.com/acme/sites/1/exceptions
managed_by:
  service: easypanel
  url: https://panel.example.space
repo: https://github.com/example/repo
registrar: namecheap
"#,
    )
    .unwrap()
}

fn bench_normalize_tree(c: &mut Criterion) {
    let directory = ProviderDirectory::bundled();
    let node = sample_node();

    c.bench_function("normalize_nested_mapping", |b| {
        b.iter(|| normalize(black_box(&node), Some("infrastructure"), &directory))
    });
}

fn bench_normalize_url_string(c: &mut Criterion) {
    let directory = ProviderDirectory::bundled();
    let node = serde_yaml::Value::String("https://cloudfront.aws.amazon.com".into());

    c.bench_function("normalize_url_string", |b| {
        b.iter(|| normalize(black_box(&node), Some("cdn"), &directory))
    });
}

fn bench_classifier(c: &mut Criterion) {
    c.bench_function("is_url_like", |b| {
        b.iter(|| {
            url_classifier::is_url_like(black_box("sub.example.co.uk:8080/path?q=1"))
                && !url_classifier::is_url_like(black_box("not-a-url"))
        })
    });

    c.bench_function("extract_name", |b| {
        b.iter(|| url_classifier::extract_name(black_box("https://www.example.co.uk/path")))
    });
}

fn bench_directory_load(c: &mut Criterion) {
    c.bench_function("directory_bundled_load", |b| {
        b.iter(ProviderDirectory::bundled)
    });
}

criterion_group!(
    benches,
    bench_normalize_tree,
    bench_normalize_url_string,
    bench_classifier,
    bench_directory_load
);
criterion_main!(benches);
