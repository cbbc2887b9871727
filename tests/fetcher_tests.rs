use codebundle::errors::BundleError;
use codebundle::fetcher::{read_content, resolve_contained};
use std::path::Path;
use tempfile::tempdir;
use tokio::fs;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_parent_traversal_is_denied_without_touching_the_filesystem() {
    // The root does not exist: a denial here proves nothing was opened.
    let result = read_content(Path::new("/a/b"), "../../etc/passwd").await;

    assert!(
        matches!(result, Err(BundleError::AccessDenied(_))),
        "Expected access denied, got {:?}",
        result
    );
    assert!(logs_contain("Access denied"));
}

#[tokio::test]
async fn test_relative_path_inside_root_is_read() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("c")).await.unwrap();
    fs::write(root.join("c/d.txt"), "inside").await.unwrap();

    let content = read_content(root, "c/d.txt").await.unwrap();
    assert_eq!(content, "inside");

    let content = read_content(root, "./c/../c/d.txt").await.unwrap();
    assert_eq!(content, "inside");
}

#[tokio::test]
async fn test_traversal_that_stays_inside_is_allowed_but_escape_is_not() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("project");
    fs::create_dir_all(root.join("src")).await.unwrap();
    fs::write(root.join("top.txt"), "top").await.unwrap();
    fs::write(dir.path().join("secret.txt"), "secret").await.unwrap();

    assert_eq!(read_content(&root, "src/../top.txt").await.unwrap(), "top");

    let escaped = read_content(&root, "src/../../secret.txt").await;
    assert!(matches!(escaped, Err(BundleError::AccessDenied(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_pointing_outside_root_is_denied() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("project");
    fs::create_dir_all(&root).await.unwrap();
    fs::write(dir.path().join("secret.txt"), "secret").await.unwrap();
    std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("link.txt")).unwrap();

    let result = resolve_contained(&root, "link.txt");
    assert!(
        matches!(result, Err(BundleError::AccessDenied(_))),
        "Expected access denied, got {:?}",
        result
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_inside_root_is_allowed() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("real.txt"), "real").await.unwrap();
    std::os::unix::fs::symlink(root.join("real.txt"), root.join("alias.txt")).unwrap();

    assert_eq!(read_content(root, "alias.txt").await.unwrap(), "real");
}

#[tokio::test]
async fn test_missing_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let result = read_content(dir.path(), "gone.ts").await;
    assert!(matches!(result, Err(BundleError::ReadError(_))));
}

#[tokio::test]
async fn test_non_utf8_content_is_a_read_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x81])
        .await
        .unwrap();
    let result = read_content(dir.path(), "blob.bin").await;
    assert!(matches!(result, Err(BundleError::ReadError(_))));
}

#[tokio::test]
async fn test_empty_path_is_invalid() {
    let dir = tempdir().unwrap();
    for path in ["", ".", "./", "/"] {
        let result = resolve_contained(dir.path(), path);
        assert!(
            matches!(result, Err(BundleError::InvalidPath(_))),
            "Expected invalid path for {:?}, got {:?}",
            path,
            result
        );
    }
}

#[tokio::test]
async fn test_status_codes_for_fetch_errors() {
    assert_eq!(BundleError::InvalidPath("x".into()).status_code(), 400);
    assert_eq!(BundleError::AccessDenied("x".into()).status_code(), 403);
    assert_eq!(BundleError::ReadError("x".into()).status_code(), 500);
}
