//! Parse / serialize / map throughput over synthetic listing pages.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dynamic_json::{from_node, parse, to_string, Node};
use serde::Deserialize;

#[derive(Deserialize)]
#[allow(dead_code)]
struct Listing {
    id: u64,
    title: String,
    price: f64,
    tags: Vec<String>,
    seller: Option<String>,
}

fn listing_page(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id":{i},"title":"Item \"{i}\" – café","price":{}.5,"tags":["a","b","c"],"seller":null,"extra":{{"views":{}}}}}"#,
                i * 3,
                i * 17
            )
        })
        .collect();
    format!(r#"{{"page":1,"items":[{}]}}"#, items.join(","))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [10usize, 100, 1000] {
        let text = listing_page(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| parse(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for count in [10usize, 100, 1000] {
        let node = parse(&listing_page(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &node, |b, node| {
            b.iter(|| to_string(black_box(node)));
        });
    }
    group.finish();
}

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    for count in [10usize, 100, 1000] {
        let node = parse(&listing_page(count)).unwrap();
        let items = node.get("items").cloned().unwrap_or_else(Node::array);
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| from_node::<Vec<Listing>>(black_box(items)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_map);
criterion_main!(benches);
