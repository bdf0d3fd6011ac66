use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use markdown_splice_engine::{ParseSettings, RenderSettings, parse_document, render_html};
use pulldown_cmark::Parser;
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    for size in [10, 100] {
        let content = common::generate_markdown_content(size);
        group.bench_with_input(BenchmarkId::new("parse_document", size), &content, |b, content| {
            b.iter(|| {
                let doc = parse_document(std::hint::black_box(content), &ParseSettings::default());
                std::hint::black_box(doc);
            });
        });
    }

    let content = common::generate_markdown_content(100);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    let content = common::generate_complex_markdown(20, 4);
    let doc = parse_document(&content, &ParseSettings::default());
    group.bench_function("render_html", |b| {
        b.iter(|| {
            let html = render_html(std::hint::black_box(&doc), &RenderSettings::default());
            std::hint::black_box(html);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
