//! Parsing and pagination benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tategaki_core::{
    compute_capacity, divide_into_pages, parse, FontMetrics, Orientation, Padding,
    PaginationOptions, Viewport,
};

fn sample_text() -> String {
    let paragraph = "吾輩《わがはい》は猫である。名前はまだ無い。\
        どこで生れたかとんと見当［＃「見当」に傍点］がつかぬ。\
        何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。\n";
    let mut text = String::from("吾輩は猫である\n夏目漱石\n\n");
    for chapter in 1..=10 {
        text.push_str(&format!("{}［＃「{}」は中見出し］\n", chapter, chapter));
        text.push_str(&paragraph.repeat(20));
    }
    text
}

fn pagination_benchmark(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("parse", |b| b.iter(|| parse(black_box(&text))));

    let document = parse(&text);
    let viewport = Viewport::new(600.0, 900.0);
    let font = FontMetrics::px(18.0, 1.8);
    let padding = Padding::px(24.0, 24.0);
    let options = PaginationOptions::default();

    for orientation in [Orientation::Vertical, Orientation::Horizontal] {
        let capacity = compute_capacity(viewport, font, padding, orientation);
        c.bench_function(&format!("divide_into_pages/{:?}", orientation), |b| {
            b.iter(|| {
                divide_into_pages(black_box(&document.nodes), capacity, orientation, &options)
            })
        });
    }
}

criterion_group!(benches, pagination_benchmark);
criterion_main!(benches);
