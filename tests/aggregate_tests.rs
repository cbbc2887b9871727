mod common;

use codebundle::aggregate::Aggregator;
use codebundle::ignore::ExclusionPolicy;
use codebundle::model::TreeModel;
use codebundle::source::{LocalSource, ProjectSource};
use codebundle::tokens::{TiktokenCounter, TokenCounter, DEFAULT_MODEL};
use codebundle::utils::strip_blank_lines;
use common::{sample_tree, MockSource, WordCounter};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::fs;

#[tokio::test]
async fn test_end_to_end_bundle_of_a_real_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.ts"), "x\n\n y \n").await.unwrap();
    fs::create_dir_all(root.join("b")).await.unwrap();
    fs::write(root.join("b/c.ts"), "z").await.unwrap();

    let source = Arc::new(LocalSource::new(root.to_path_buf(), ExclusionPolicy::default()));
    let counter = Arc::new(TiktokenCounter::for_model(DEFAULT_MODEL).unwrap());

    let mut model = TreeModel::new();
    model.ingest(source.list(".").await.unwrap());
    assert_eq!(model.selected_paths(), vec!["a.ts", "b/c.ts"]);

    let aggregator = Aggregator::new(source, counter.clone());
    let result = aggregator.aggregate(&model, ".", "note").await;

    assert_eq!(
        result.text,
        "a.ts\nb\nb/c.ts\n\nFile: a.ts\nx\n y\n\nFile: b/c.ts\nz\n\nnote"
    );
    assert_eq!(result.token_count, counter.count(&result.text));
    assert_eq!(result.files.len(), 2);
    assert_eq!(result.failed_files().count(), 0);
}

#[tokio::test]
async fn test_failed_fetch_is_isolated_to_its_file() {
    let source = Arc::new(MockSource::new().with_content("a.ts", "x\n\n y \n"));
    let mut model = TreeModel::new();
    model.ingest(sample_tree());

    let aggregator = Aggregator::new(source, Arc::new(WordCounter));
    let result = aggregator.aggregate(&model, "project", "note").await;

    assert!(result.text.contains("File: a.ts\nx\n y\n\n"));
    assert!(result.text.contains("File: b/c.ts\nError: "));
    assert!(result.text.ends_with("\n\nnote"));

    let failed: Vec<&str> = result.failed_files().map(|f| f.path.as_str()).collect();
    assert_eq!(failed, vec!["b/c.ts"]);
}

#[tokio::test(start_paused = true)]
async fn test_blocks_follow_tree_order_not_completion_order() {
    let source = Arc::new(
        MockSource::new()
            .with_content("a.ts", "first")
            .with_delay("a.ts", Duration::from_millis(300))
            .with_content("b/c.ts", "second"),
    );
    let mut model = TreeModel::new();
    model.ingest(sample_tree());

    let aggregator = Aggregator::new(source, Arc::new(WordCounter));
    let result = aggregator.aggregate(&model, "project", "").await;

    let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.ts", "b/c.ts"]);
    assert_eq!(
        result.text,
        "a.ts\nb\nb/c.ts\n\nFile: a.ts\nfirst\n\nFile: b/c.ts\nsecond\n\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_fetches_run_concurrently() {
    let source = Arc::new(
        MockSource::new()
            .with_content("a.ts", "a")
            .with_delay("a.ts", Duration::from_secs(1))
            .with_content("b/c.ts", "c")
            .with_delay("b/c.ts", Duration::from_secs(1)),
    );
    let mut model = TreeModel::new();
    model.ingest(sample_tree());

    let started = tokio::time::Instant::now();
    let aggregator = Aggregator::new(source, Arc::new(WordCounter));
    aggregator.aggregate(&model, "project", "").await;

    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn test_only_selected_files_are_fetched_but_listing_is_complete() {
    let source = Arc::new(
        MockSource::new()
            .with_content("a.ts", "a")
            .with_content("b/c.ts", "c"),
    );
    let mut model = TreeModel::new();
    model.ingest(sample_tree());
    model.toggle("a.ts");

    let aggregator = Aggregator::new(source, Arc::new(WordCounter));
    let result = aggregator.aggregate(&model, "project", "done").await;

    assert_eq!(result.text, "a.ts\nb\nb/c.ts\n\nFile: b/c.ts\nc\n\ndone");
    assert_eq!(result.token_count, WordCounter.count(&result.text));
    assert_eq!(result.files[0].token_count, 3);
}

#[tokio::test]
async fn test_strip_blank_lines() {
    assert_eq!(strip_blank_lines("x\n\n y \n"), "x\n y");
    assert_eq!(strip_blank_lines("\n\n  a\n \t \nb\n\n"), "a\nb");
    assert_eq!(strip_blank_lines("   "), "");
}
