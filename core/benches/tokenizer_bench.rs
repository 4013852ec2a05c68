use criterion::{criterion_group, criterion_main, Criterion};
use termindex_core::tokenizer::{Tokenizer, WordPunctTokenizer};

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../../README.md");
    c.bench_function("word_punct_readme", |b| b.iter(|| WordPunctTokenizer.tokenize(text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
