//! Criterion benchmarks for Sentindex.
//!
//! Covers corpus construction, flat id resolution, slicing and merging.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use sentindex::corpus::{CorpusBuilder, FlatCorpus, FlatId, SentenceSet, merge};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "virus", "protein", "binding", "receptor", "spike", "cell", "host", "infection", "genome",
    "sequence", "patient", "clinical", "trial", "dose", "response", "immune", "antibody",
    "vaccine", "transmission", "incubation",
];

/// Generate `count` documents with a varying number of sentences each.
fn generate_documents(count: usize, first_id: u64) -> Vec<(u64, Vec<String>)> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let num_sentences = rng.random_range(1..=20);
            let sentences = (0..num_sentences)
                .map(|_| {
                    let len = rng.random_range(5..25);
                    (0..len)
                        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            (first_id + i as u64, sentences)
        })
        .collect()
}

fn build_corpus(documents: Vec<(u64, Vec<String>)>) -> FlatCorpus {
    let ids = documents.iter().map(|(id, _)| *id).collect();
    let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(ids));
    for (id, sentences) in documents {
        builder.add_document(id, sentences).unwrap();
    }
    builder.build().unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.sample_size(20);

    for &count in &[100, 1000, 5000] {
        let documents = generate_documents(count, 0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &documents, |b, docs| {
            b.iter(|| black_box(build_corpus(docs.clone())));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let corpus = build_corpus(generate_documents(2000, 0));
    let n = corpus.len() as FlatId;

    let mut rng = rand::rng();
    let ids: Vec<FlatId> = (0..1000).map(|_| rng.random_range(-n..n)).collect();

    group.bench_function("get_sentence_single", |b| {
        b.iter(|| black_box(corpus.get_sentence(black_box(n / 2)).unwrap()));
    });

    group.throughput(Throughput::Elements(ids.len() as u64));
    group.bench_function("get_sentence_batch", |b| {
        b.iter(|| {
            for &id in &ids {
                black_box(corpus.get_sentence(id).unwrap());
            }
        });
    });

    group.throughput(Throughput::Elements(ids.len() as u64));
    group.bench_function("lookup_batch", |b| {
        b.iter(|| black_box(corpus.lookup(&ids).unwrap()));
    });

    group.bench_function("slice_stepped", |b| {
        b.iter(|| black_box(corpus.slice(Some(10), Some(-10), Some(7)).unwrap()));
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    group.sample_size(10);

    for &num_shards in &[2, 8] {
        let shards: Vec<FlatCorpus> = (0..num_shards)
            .map(|s| build_corpus(generate_documents(500, s as u64 * 500)))
            .collect();
        let total: usize = shards.iter().map(FlatCorpus::len).sum();

        group.throughput(Throughput::Elements(total as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_shards), &shards, |b, shards| {
            b.iter(|| black_box(merge(shards).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_lookup, bench_merge);
criterion_main!(benches);
