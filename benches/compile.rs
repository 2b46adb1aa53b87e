use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use slidemark::codegen::{compile_document, requests::to_batch_requests};
use slidemark::config::Config;
use slidemark::layout::layout_document;
use slidemark::parser::parse_document;
use slidemark::render::render_svg;
use std::hint::black_box;

fn generated_deck(slides: usize) -> String {
    let mut out = Vec::with_capacity(slides);
    for i in 0..slides {
        let mut slide = format!("# Slide {i}\n");
        match i % 3 {
            0 => {
                for j in 0..6 {
                    slide.push_str(&format!("- point {j} with **bold {j}** text\n"));
                }
            }
            1 => {
                slide.push_str("## Numbers\n| metric | q1 | q2 |\n|---|---|---|\n");
                for j in 0..5 {
                    slide.push_str(&format!("| row {j} | {} | **{}** |\n", j * 10, j * 20));
                }
            }
            _ => {
                slide.push_str("A paragraph that is long enough to wrap across a couple of lines in the card.\n");
                slide.push_str("- one\n- two\n### Closing\nthanks\n");
            }
        }
        out.push(slide);
    }
    out.join("---\n")
}

fn fixture(name: &str) -> &'static str {
    match name {
        "quarterly" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/quarterly.md"
        )),
        "lecture" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/lecture.md"
        )),
        _ => panic!("unknown fixture: {name}"),
    }
}

fn inputs() -> Vec<(String, String)> {
    let mut inputs = vec![
        ("quarterly".to_string(), fixture("quarterly").to_string()),
        ("lecture".to_string(), fixture("lecture").to_string()),
    ];
    for slides in [10, 100, 500] {
        inputs.push((format!("generated_{slides}"), generated_deck(slides)));
    }
    inputs
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, input) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(&name), &input, |b, data| {
            b.iter(|| {
                let document = parse_document(black_box(data));
                black_box(document.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = Config::default();
    for (name, input) in inputs() {
        let document = parse_document(&input);
        group.bench_with_input(BenchmarkId::from_parameter(&name), &document, |b, doc| {
            b.iter(|| {
                let layouts = layout_document(
                    black_box(doc),
                    &config.registry,
                    &config.assignment,
                    &config.canvas,
                    &config.layout,
                );
                black_box(layouts.len());
            });
        });
    }
    group.finish();
}

fn bench_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");
    let config = Config::default();
    for (name, input) in inputs() {
        let document = parse_document(&input);
        group.bench_with_input(BenchmarkId::from_parameter(&name), &document, |b, doc| {
            b.iter(|| {
                let ops = compile_document(
                    black_box(doc),
                    &config.registry,
                    &config.assignment,
                    &config.layout,
                    &config.codegen,
                );
                black_box(to_batch_requests(&ops).len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = Config::default();
    for (name, input) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(&name), &input, |b, data| {
            b.iter(|| {
                let layouts = slidemark::layout_deck(black_box(data), &config);
                let bytes: usize = layouts.iter().map(|layout| render_svg(layout).len()).sum();
                black_box(bytes);
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_codegen, bench_end_to_end
);
criterion_main!(benches);
