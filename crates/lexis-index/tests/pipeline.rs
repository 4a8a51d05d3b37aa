//! End-to-end tests for index construction and search.
//!
//! Each test writes a small collection to a temporary directory, builds an index over it
//! and inspects the resulting files or search results.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use lexis_index::{
    IndexContext, IndexError, IndexFiles, IndexStats, Indexer, Normalizer, SearchParams,
    SearchResults, Searcher, SilentReporter, Stopwords, backfill_norms, read_documents,
    read_manifest, read_vocabulary, stemmer_from_name,
};
use tempfile::TempDir;

/// A collection directory plus an index directory.
struct TestEnv {
    /// Collection root.
    collection: TempDir,
    /// Index directory.
    index: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            collection: tempfile::tempdir().unwrap(),
            index: tempfile::tempdir().unwrap(),
        }
    }

    /// Writes a collection file.
    fn write(&self, rel_path: &str, content: &str) {
        let path = self.collection.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn build(&self, context: &IndexContext) -> Result<IndexStats, IndexError> {
        Indexer::new(context, self.index.path())
            .index(self.collection.path(), &mut SilentReporter)
    }

    fn files(&self) -> IndexFiles {
        IndexFiles::new(self.index.path())
    }
}

/// Identity stemming, no stopwords.
fn plain_context(threshold: usize) -> IndexContext {
    let stemmer = stemmer_from_name("none").unwrap();
    IndexContext::new(Normalizer::new(Stopwords::empty(), stemmer))
        .with_spill_threshold(threshold)
}

fn write_corpus(env: &TestEnv) {
    env.write("d1.txt", "alpha beta");
    env.write("d2.txt", "beta gamma");
    env.write("d3.txt", "gamma delta alpha");
}

#[test]
fn spill_per_document_keeps_corpus_wide_df() {
    let env = TestEnv::new();
    write_corpus(&env);

    let stats = env.build(&plain_context(1)).unwrap();
    assert_eq!(stats.partial_indexes, 3);
    assert_eq!(stats.terms, 4);

    let vocabulary: Vec<(String, u64)> = read_vocabulary(&env.files().vocabulary)
        .unwrap()
        .into_iter()
        .map(|(term, entry)| (term, entry.document_frequency))
        .collect();
    assert_eq!(
        vocabulary,
        vec![
            ("alpha".to_string(), 2),
            ("beta".to_string(), 2),
            ("delta".to_string(), 1),
            ("gamma".to_string(), 2),
        ]
    );
}

#[test]
fn single_term_partials_merge_into_corpus_wide_df() {
    let env = TestEnv::new();
    for (name, term) in [
        ("a.txt", "heart"),
        ("b.txt", "lung"),
        ("c.txt", "heart"),
        ("d.txt", "liver"),
        ("e.txt", "kidney"),
    ] {
        env.write(name, term);
    }

    let stats = env.build(&plain_context(1)).unwrap();
    assert_eq!(stats.partial_indexes, 5);
    assert_eq!(stats.merges, 4);
    assert_eq!(stats.terms, 4);

    let vocabulary: Vec<(String, u64)> = read_vocabulary(&env.files().vocabulary)
        .unwrap()
        .into_iter()
        .map(|(term, entry)| (term, entry.document_frequency))
        .collect();
    assert_eq!(
        vocabulary,
        vec![
            ("heart".to_string(), 2),
            ("kidney".to_string(), 1),
            ("liver".to_string(), 1),
            ("lung".to_string(), 1),
        ]
    );

    let leftovers = fs::read_dir(env.index.path())
        .unwrap()
        .filter(|entry| {
            let name = entry.as_ref().unwrap().file_name();
            name.to_string_lossy().ends_with(".part")
        })
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn spill_threshold_does_not_change_the_index() {
    let small = TestEnv::new();
    let large = TestEnv::new();
    for env in [&small, &large] {
        write_corpus(env);
        env.write("nested/d4.md", "# Alpha\n\nDelta *epsilon* beta.\n");
    }
    small.build(&plain_context(1)).unwrap();
    large.build(&plain_context(1_000_000)).unwrap();

    assert_eq!(
        read_vocabulary(&small.files().vocabulary).unwrap(),
        read_vocabulary(&large.files().vocabulary).unwrap()
    );

    let norms = |env: &TestEnv| -> Vec<(String, f64)> {
        read_documents(&env.files().documents)
            .unwrap()
            .into_iter()
            .map(|(_, record)| (record.id, record.norm))
            .collect()
    };
    assert_eq!(norms(&small), norms(&large));

    let small_context = plain_context(1);
    let large_context = plain_context(1_000_000);
    let small_searcher = Searcher::open(&small_context, small.index.path()).unwrap();
    let large_searcher = Searcher::open(&large_context, large.index.path()).unwrap();
    let params = SearchParams::default();
    for query in ["alpha", "beta delta", "epsilon gamma"] {
        let a = small_searcher.search(query, None, &params).unwrap();
        let b = large_searcher.search(query, None, &params).unwrap();
        let scores = |r: &SearchResults| -> Vec<(String, f64)> {
            r.hits
                .iter()
                .map(|h| (h.document_id.clone(), h.score))
                .collect()
        };
        assert_eq!(scores(&a), scores(&b), "query {query}");
    }
}

#[test]
fn backfill_is_idempotent() {
    let env = TestEnv::new();
    write_corpus(&env);
    env.build(&plain_context(2)).unwrap();

    let stored: Vec<f64> = read_documents(&env.files().documents)
        .unwrap()
        .into_iter()
        .map(|(_, record)| record.norm)
        .collect();
    let again = backfill_norms(&env.files()).unwrap();
    assert_eq!(stored, again);
    assert!(stored.iter().all(|norm| *norm > 0.0));
}

#[test]
fn heavier_fields_rank_higher() {
    let env = TestEnv::new();
    env.write("a.json", r#"{"id": "a", "title": "heart", "body": "lung"}"#);
    env.write("b.json", r#"{"id": "b", "title": "lung", "body": "heart"}"#);
    env.write("c.json", r#"{"id": "c", "body": "kidney"}"#);
    let context = plain_context(1_000_000);
    env.build(&context).unwrap();

    let searcher = Searcher::open(&context, env.index.path()).unwrap();
    let results = searcher
        .search("heart", None, &SearchParams::default())
        .unwrap();
    let ids: Vec<&str> = results.hits.iter().map(|h| h.document_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(results.hits[0].score > results.hits[1].score);
}

#[test]
fn duplicate_document_ids_abort_the_build() {
    let env = TestEnv::new();
    env.write("one.json", r#"{"id": "same", "body": "heart"}"#);
    env.write("two.json", r#"{"id": "same", "body": "lung"}"#);

    let err = env.build(&plain_context(10)).unwrap_err();
    assert!(matches!(err, IndexError::DuplicateDocument { ref id, .. } if id == "same"));
    assert!(read_manifest(&env.files()).unwrap().is_none());
}

#[test]
fn rebuild_replaces_the_previous_index() {
    let env = TestEnv::new();
    write_corpus(&env);
    let context = plain_context(10);
    env.build(&context).unwrap();

    fs::remove_file(env.collection.path().join("d3.txt")).unwrap();
    let stats = env.build(&context).unwrap();
    assert_eq!(stats.documents, 2);

    let manifest = read_manifest(&env.files()).unwrap().unwrap();
    assert_eq!(manifest.documents, 2);
    assert_eq!(manifest.terms, 3);
    assert_eq!(manifest.collection, env.collection.path());
    assert_eq!(manifest.stemmer, "custom");
}

#[test]
fn single_file_collection() {
    let env = TestEnv::new();
    env.write("only.md", "---\ntitle: Cardiac care\n---\n\nHeart treatment.\n");
    let context = plain_context(10);
    let root = env.collection.path().join("only.md");
    let stats = Indexer::new(&context, env.index.path())
        .index(&root, &mut SilentReporter)
        .unwrap();
    assert_eq!(stats.documents, 1);
    assert_eq!(stats.terms, 4);
}
