use codebundle::config::{BundleConfig, SessionConfig, SourceConfig};
use codebundle::copy_bundle;
use codebundle::errors::BundleError;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use tokio::fs;

async fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    fs::write(&path, content).await.unwrap();
}

fn bundle_config(base: &Path, dir: &str, exclude: Vec<&str>) -> BundleConfig {
    BundleConfig {
        session: SessionConfig {
            source: SourceConfig::Local {
                base: base.to_path_buf(),
            },
            initial_dir: dir.to_string(),
            debounce: Duration::ZERO,
            ..SessionConfig::default()
        },
        exclude: exclude.into_iter().map(String::from).collect(),
        trailing_text: "Explain this project.".to_string(),
        no_copy: true,
        print: false,
        no_stats: true,
    }
}

#[tokio::test]
async fn test_bundle_whole_directory_without_excluded_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app/main.ts", "console.log(1);\n").await;
    write(dir.path(), "app/lib/util.ts", "export {}").await;
    write(dir.path(), "app/package-lock.json", "{}").await;

    let result = copy_bundle(bundle_config(dir.path(), "app", vec!["lib/util.ts"]))
        .await
        .unwrap();

    assert_eq!(
        result.text,
        "lib\nlib/util.ts\nmain.ts\n\nFile: main.ts\nconsole.log(1);\n\nExplain this project."
    );
    assert_eq!(result.files.len(), 1);
    assert!(result.token_count > 0);
}

#[tokio::test]
async fn test_bundle_ignores_unknown_and_directory_excludes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app/main.ts", "x").await;
    write(dir.path(), "app/lib/util.ts", "y").await;

    let result = copy_bundle(bundle_config(dir.path(), "app", vec!["lib", "nope.ts"]))
        .await
        .unwrap();

    let paths: Vec<_> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["lib/util.ts", "main.ts"]);
}

#[tokio::test]
async fn test_bundle_of_missing_directory_is_empty() {
    let dir = tempdir().unwrap();

    let result = copy_bundle(bundle_config(dir.path(), "missing", vec![])).await;

    // Local listing degrades to an empty tree rather than failing.
    let result = result.unwrap();
    assert!(result.files.is_empty());
    assert_eq!(result.text, "\n\nExplain this project.");
}

#[tokio::test]
async fn test_bundle_with_unknown_model_fails() {
    let dir = tempdir().unwrap();
    let mut config = bundle_config(dir.path(), "app", vec![]);
    config.session.model = "definitely-not-a-model".to_string();

    let result = copy_bundle(config).await;
    assert!(matches!(result, Err(BundleError::TokenizerError(_))));
}
