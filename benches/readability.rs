use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use readerview::{dom_utils, is_probably_readerable, Reader, RuleSet, StructuralCleaner};
use url::Url;

const URL: &str = "https://example.com/news/2024/the-long-story";

/// A page with navigation, a sidebar, `paragraphs` paragraphs of article
/// text and a comment section.
fn synthetic_page(paragraphs: usize) -> String {
    let nav: String = (0..20)
        .map(|i| format!(r#"<li><a href="/section/{i}">Section {i}</a></li>"#, i = i))
        .collect();
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {} of the story keeps going, with commas, clauses and detail, \
                 long enough that the scorer treats it as real prose rather than chrome.</p>",
                i
            )
        })
        .collect();
    let comments: String = (0..10)
        .map(|i| format!(r#"<div class="comment"><p>Comment {}</p><a href="/reply">reply</a></div>"#, i))
        .collect();

    format!(
        r#"<html><head><title>The long story | Example News</title></head><body>
           <div id="header"><ul class="menu">{}</ul></div>
           <div class="sidebar"><p>Subscribe today, with offers, for readers.</p></div>
           <div id="content" class="article-body">{}</div>
           <div id="comments">{}</div>
           </body></html>"#,
        nav, body, comments
    )
}

fn bench_parse_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, paragraphs) in [("small", 5), ("medium", 50), ("large", 400)] {
        let html = synthetic_page(paragraphs);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("doc", name), &html, |b, html| {
            b.iter(|| {
                let reader = Reader::new(std::hint::black_box(html), Some(URL), None).unwrap();
                std::hint::black_box(reader.parse())
            });
        });
    }

    group.finish();
}

fn bench_readerable_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("readerable");
    let rules = RuleSet::classification();
    let url = Url::parse(URL).unwrap();

    for (name, paragraphs) in [("small", 5), ("large", 400)] {
        let document = dom_utils::parse_document(&synthetic_page(paragraphs));

        group.bench_with_input(BenchmarkId::new("check", name), &document, |b, document| {
            b.iter(|| {
                std::hint::black_box(is_probably_readerable(
                    std::hint::black_box(document),
                    Some(&url),
                    &rules,
                ))
            });
        });
    }

    group.finish();
}

fn bench_cleaner(c: &mut Criterion) {
    let rules = RuleSet::extraction();
    let html = synthetic_page(100);

    c.bench_function("clean/medium", |b| {
        b.iter(|| {
            let document = dom_utils::parse_document(&html);
            let body = dom_utils::body_of(&document).unwrap();
            StructuralCleaner::new(&rules).clean(std::hint::black_box(&body));
        });
    });
}

criterion_group!(
    benches,
    bench_parse_by_size,
    bench_readerable_check,
    bench_cleaner
);
criterion_main!(benches);
