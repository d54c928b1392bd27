//! Benchmarks for directive expansion and markdown rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quire_renderer::MarkdownRenderer;
use quire_renderer::directive::{
    DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveProcessor,
    InlineDirective,
};

struct Number;

impl InlineDirective for Number {
    fn name(&self) -> &'static str {
        "number"
    }

    fn process(
        &self,
        args: DirectiveArgs,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        Ok(DirectiveOutput::html(args.content.len().to_string()))
    }
}

/// Generate a chapter with headings, callouts and inline directives.
fn generate_chapter(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * paragraphs_per_section * 200);
    md.push_str("# Chapter Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str("::: callout\nSee chapter :number[intro] for **details**.\n:::\n\n");
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} of section {i} cites :number[systems] and <g key=\"ast\">ASTs</g>.\n\n"
            ));
        }
    }
    md
}

fn bench_expand(c: &mut Criterion) {
    let processor = DirectiveProcessor::new().with_inline(Number);
    let markdown = generate_chapter(20, 3);

    c.bench_function("expand_chapter_20_sections", |b| {
        b.iter(|| processor.process(&markdown));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let renderer = MarkdownRenderer::new();
    let mut group = c.benchmark_group("render_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_chapter(sections, paragraphs);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{paragraphs}p")),
            &markdown,
            |b, md| b.iter(|| renderer.render(md)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_expand, bench_render_varying_sizes);
criterion_main!(benches);
