//! Criterion benchmarks for Tandem.
//!
//! Covers the hot paths of a query:
//! - Text analysis
//! - BM25 index construction and querying
//! - Brute-force vector search
//! - Score normalization and ensemble fusion

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tandem::analysis::analyzer::Analyzer;
use tandem::analysis::analyzer::standard::StandardNormalizer;
use tandem::document::corpus::Corpus;
use tandem::hybrid::config::ScoreNormalization;
use tandem::hybrid::merger::{ResultMerger, SourceList};
use tandem::lexical::bm25::Bm25Params;
use tandem::lexical::index::LexicalIndex;
use tandem::retrieval::RankedCandidate;
use tandem::vector::distance::DistanceMetric;
use tandem::vector::vector::Vector;

const WORDS: &[&str] = &[
    "search", "engine", "text", "index", "query", "document", "term", "vector", "similarity",
    "relevance", "score", "analysis", "ranking", "retrieval", "fusion", "embedding", "answer",
    "context", "model", "token", "corpus", "weight", "lexical", "semantic",
];

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let doc_length = 20 + (i % 60);
            (0..doc_length)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Generate test vectors for benchmarking.
fn generate_test_vectors(count: usize, dimension: usize) -> Vec<Vector> {
    (0..count)
        .map(|i| {
            let data = (0..dimension)
                .map(|j| ((i as f32 * 0.1 + j as f32 * 0.01).sin() * 0.5 + 0.5) * 2.0 - 1.0)
                .collect();
            Vector::new(data)
        })
        .collect()
}

fn generate_source_list(position: usize, source: &str, count: usize) -> SourceList {
    let candidates = (0..count)
        .map(|i| {
            let doc = (i * (position + 3)) % (count * 2);
            RankedCandidate::new(doc.to_string(), 1.0 / (i as f32 + 1.0), source)
        })
        .collect();

    SourceList {
        position,
        source: source.to_string(),
        weight: 0.5,
        candidates,
    }
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardNormalizer::new().unwrap();
    let texts = generate_test_documents(100);

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("analyze_batch_documents", |b| {
        b.iter(|| {
            for text in &texts {
                let _ = black_box(analyzer.analyze(black_box(text)));
            }
        })
    });

    group.finish();
}

fn bench_lexical(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexical");

    let corpus = Arc::new(Corpus::from_texts(generate_test_documents(5000)));
    let analyzer = Arc::new(StandardNormalizer::new().unwrap());

    group.sample_size(20);
    group.bench_function("build_index_5000_documents", |b| {
        b.iter(|| {
            let index =
                LexicalIndex::build(corpus.clone(), analyzer.clone(), Bm25Params::default())
                    .unwrap();
            black_box(index)
        })
    });

    let index = LexicalIndex::build(corpus, analyzer, Bm25Params::default()).unwrap();
    for query in ["fusion", "semantic vector retrieval", "lexical ranking of the corpus"] {
        group.bench_function(format!("query/{query}"), |b| {
            b.iter(|| black_box(index.query(black_box(query), 10).unwrap()))
        });
    }

    group.finish();
}

fn bench_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector");

    let vectors = generate_test_vectors(1000, 384);
    let query = &vectors[0];

    for metric in [
        DistanceMetric::Cosine,
        DistanceMetric::DotProduct,
        DistanceMetric::Euclidean,
    ] {
        group.throughput(Throughput::Elements(vectors.len() as u64));
        group.bench_function(format!("similarity_scan/{metric}"), |b| {
            b.iter(|| {
                for vector in &vectors {
                    let score = metric
                        .similarity(black_box(&query.data), black_box(&vector.data))
                        .unwrap();
                    black_box(score);
                }
            })
        });
    }

    group.finish();
}

fn bench_fusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion");

    let corpus = Corpus::from_texts(generate_test_documents(2000));
    let lists = vec![
        generate_source_list(0, "bm25", 1000),
        generate_source_list(1, "vector", 1000),
    ];

    for normalization in [
        ScoreNormalization::MinMax,
        ScoreNormalization::Rank,
        ScoreNormalization::reciprocal_rank(),
    ] {
        let merger = ResultMerger::new(normalization);
        group.bench_function(format!("fuse_2x1000/{}", normalization.name()), |b| {
            b.iter(|| black_box(merger.fuse(black_box(&lists), &corpus, 10)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_lexical,
    bench_vector,
    bench_fusion
);
criterion_main!(benches);
