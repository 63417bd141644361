//! FileService naming and deduplication behavior

use tempfile::TempDir;

use writur::test_helpers::create_test_file_service;

// sha256 of "hello world"
const HELLO_WORLD_SHA256: &str =
    "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

#[tokio::test]
async fn test_upload_names_file_by_content_hash() {
    let dir = TempDir::new().unwrap();
    let service = create_test_file_service(dir.path().to_str().unwrap()).await;

    let url = service
        .upload_file("articles", "photo.png", b"hello world")
        .await
        .unwrap();

    assert_eq!(
        url,
        format!(
            "http://localhost:8000/upload/articles/{}.png",
            HELLO_WORLD_SHA256
        )
    );
    assert!(
        service
            .exists(&format!("articles/{}.png", HELLO_WORLD_SHA256))
            .await
    );
}

#[tokio::test]
async fn test_identical_content_skips_rewrite_and_returns_same_url() {
    let dir = TempDir::new().unwrap();
    let service = create_test_file_service(dir.path().to_str().unwrap()).await;

    let first_url = service
        .upload_file("articles", "a.png", b"hello world")
        .await
        .unwrap();

    // Plant a sentinel at the stored path; a second upload of the same
    // content must leave it untouched.
    let stored = dir
        .path()
        .join(format!("articles/{}.png", HELLO_WORLD_SHA256));
    tokio::fs::write(&stored, b"sentinel").await.unwrap();

    let second_url = service
        .upload_file("articles", "b.png", b"hello world")
        .await
        .unwrap();

    assert_eq!(first_url, second_url);
    assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"sentinel");
}

#[tokio::test]
async fn test_different_content_maps_to_different_urls() {
    let dir = TempDir::new().unwrap();
    let service = create_test_file_service(dir.path().to_str().unwrap()).await;

    let a = service
        .upload_file("articles", "same-name.png", b"payload one")
        .await
        .unwrap();
    let b = service
        .upload_file("articles", "same-name.png", b"payload two")
        .await
        .unwrap();

    assert_ne!(a, b);
}

#[tokio::test]
async fn test_missing_extension_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let service = create_test_file_service(dir.path().to_str().unwrap()).await;

    let url = service
        .upload_file("articles", "README", b"no extension here")
        .await
        .unwrap();

    let name = url.rsplit('/').next().unwrap();
    assert_eq!(name.len(), 64);
    assert!(!name.contains('.'));
}

#[tokio::test]
async fn test_access_url_is_pure_and_works_for_unstored_paths() {
    let dir = TempDir::new().unwrap();
    let service = create_test_file_service(dir.path().to_str().unwrap()).await;

    // Nothing was uploaded; the URL is still computable
    assert_eq!(
        service.file_access_url("/img/a.png"),
        "http://localhost:8000/upload/img/a.png"
    );
    assert!(!service.exists("img/a.png").await);
}
