//! Criterion benchmarks for the n-gram synonym tokenizer.
//!
//! Covers plain n-gram tokenization, tokenization with synonym splicing in
//! both expand modes, and dictionary construction.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ngram_synonym::analysis::synonym::{SynonymFormat, parse_rules};
use ngram_synonym::analysis::tokenizer::ngram_synonym::{
    NGramSynonymConfig, NGramSynonymTokenizerFactory,
};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "東京", "タワー", "スカイツリー", "とうきょう", "駅", "search", "engine", "synonym", "ngram",
    "tokenizer", "dictionary", "index", "query", "検索", "形態素", "解析", "辞書", "同義語",
];

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100);
        let mut doc = String::new();

        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % WORDS.len();
            doc.push_str(WORDS[word_idx]);
            // Mostly long blocks, occasionally split by a delimiter.
            if j % 5 == 4 {
                doc.push(' ');
            }
        }

        documents.push(doc);
    }

    documents
}

fn synonym_rules() -> Vec<String> {
    vec![
        "東京,とうきょう,トウキョウ".to_string(),
        "検索,search,サーチ".to_string(),
        "同義語,synonym".to_string(),
        "辞書,dictionary".to_string(),
        "スカイツリー,skytree".to_string(),
    ]
}

fn factory(expand: bool, rules: Option<Vec<String>>) -> NGramSynonymTokenizerFactory {
    let mut config = NGramSynonymConfig::default().with_expand(expand);
    if let Some(rules) = rules {
        config = config.with_synonyms(rules);
    }
    NGramSynonymTokenizerFactory::new(config).unwrap()
}

/// Benchmark tokenization with and without a dictionary.
fn bench_tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenization");
    let texts = generate_test_documents(100);

    let cases = [
        ("ngram_only", factory(true, None)),
        ("synonyms_expand", factory(true, Some(synonym_rules()))),
        ("synonyms_no_expand", factory(false, Some(synonym_rules()))),
    ];

    for (name, factory) in &cases {
        group.throughput(Throughput::Elements(texts.len() as u64));
        group.bench_function(*name, |b| {
            b.iter(|| {
                for text in &texts {
                    let count = factory.create(black_box(text.as_bytes())).count();
                    black_box(count);
                }
            })
        });
    }

    group.finish();
}

/// Benchmark dictionary construction.
fn bench_dictionary(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary");
    group.sample_size(20);

    let rules: String = (0..1000)
        .map(|i| format!("term{i},alias{i},other{i}"))
        .collect::<Vec<_>>()
        .join("\n");

    group.throughput(Throughput::Elements(1000));
    group.bench_function("parse_solr_rules", |b| {
        b.iter(|| {
            let map = parse_rules(black_box(&rules), SynonymFormat::Solr, true, true).unwrap();
            black_box(map)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tokenization, bench_dictionary);
criterion_main!(benches);
