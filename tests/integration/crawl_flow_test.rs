// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::*;
use config::Map;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wpcrawlrs::application::bootstrap;
use wpcrawlrs::application::dto::crawl_request::CrawlRequest;
use wpcrawlrs::application::use_cases::crawl_use_case::{CrawlUseCase, CrawlUseCaseError};
use wpcrawlrs::config::settings::Settings;
use wpcrawlrs::domain::models::crawl_summary::{CrawlSummary, SUMMARY_FILE};
use wpcrawlrs::infrastructure::storage::LocalStorage;
use wpcrawlrs::infrastructure::wordpress_client::WordPressClient;

async fn run_crawl(
    server: &MockServer,
    author: &str,
    count: i64,
    output: &std::path::Path,
) -> Result<wpcrawlrs::application::use_cases::crawl_use_case::CrawlReport, CrawlUseCaseError> {
    let request = CrawlRequest::new(&server.uri(), author, count, output).unwrap();
    let client = WordPressClient::new(&request.wordpress_url, &http_settings()).unwrap();
    CrawlUseCase::new(Arc::new(client), Arc::new(LocalStorage::new(output)))
        .execute(&request)
        .await
}

fn read_summary(dir: &std::path::Path) -> CrawlSummary {
    let raw = std::fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn markdown_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_exports_author_posts_to_markdown() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, posts_json(7, 0..3), Some(1)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 5, dir.path()).await.unwrap();

    assert_eq!(report.summary.fetched_articles, 3);
    assert_eq!(report.summary.saved_articles, 3);
    assert!(report.warnings.is_empty());
    assert_eq!(
        markdown_files(dir.path()),
        vec![
            "2024-06-28_Post_2.md",
            "2024-06-29_Post_1.md",
            "2024-06-30_Post_0.md",
        ]
    );

    let markdown = std::fs::read_to_string(dir.path().join("2024-06-30_Post_0.md")).unwrap();
    assert_eq!(
        markdown,
        "# Post 0\n\n\
         **Author:** John Smith  \n\
         **Date:** 2024-06-30  \n\
         **Original URL:** https://example.com/?p=7000  \n\
         \n---\n\n\
         ## Excerpt\n\nAbout Post 0\n\n\
         Body of **Post 0**\n\n\
         - one\n\
         - two\n"
    );

    let requests = post_requests(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query_value(&requests[0], "author").as_deref(), Some("7"));
    assert_eq!(query_value(&requests[0], "per_page").as_deref(), Some("5"));
    assert_eq!(query_value(&requests[0], "orderby").as_deref(), Some("date"));
    assert_eq!(query_value(&requests[0], "order").as_deref(), Some("desc"));
}

#[tokio::test]
async fn test_summary_file_is_written() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, posts_json(7, 0..2), None).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 2, dir.path()).await.unwrap();

    let summary = read_summary(dir.path());
    assert_eq!(summary, report.summary);
    assert_eq!(summary.wordpress_url, server.uri());
    assert_eq!(summary.author_name, "john");
    assert_eq!(summary.requested_articles, 2);
    assert_eq!(summary.saved_articles, 2);
    let canonical = dir.path().canonicalize().unwrap();
    assert_eq!(summary.output_directory, canonical.display().to_string());
}

#[tokio::test]
async fn test_unknown_author_fetches_without_filter() {
    let server = MockServer::start().await;
    mount_slug(&server, "ghost", vec![]).await;
    mount_search(&server, "ghost", vec![]).await;
    mount_posts_page(&server, 1, posts_json(3, 0..2), Some(1)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "ghost", 10, dir.path()).await.unwrap();

    assert!(report.author.is_none());
    assert_eq!(report.summary.saved_articles, 2);
    assert_eq!(report.warnings.len(), 1);
    let requests = post_requests(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query_value(&requests[0], "author"), None);
}

#[tokio::test]
async fn test_author_found_by_name_search() {
    let server = MockServer::start().await;
    mount_slug(&server, "John Smith", vec![]).await;
    mount_search(
        &server,
        "John Smith",
        vec![user_json(5, "Johnny", "johnny"), user_json(7, "John Smith", "john")],
    )
    .await;
    mount_posts_page(&server, 1, posts_json(7, 0..1), None).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "John Smith", 1, dir.path()).await.unwrap();

    assert_eq!(report.author.map(|a| a.id), Some(7));
    let requests = post_requests(&server).await;
    assert_eq!(query_value(&requests[0], "author").as_deref(), Some("7"));
}

#[tokio::test]
async fn test_paginates_until_requested_count() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, posts_json(7, 0..100), Some(3)).await;
    mount_posts_page(&server, 2, posts_json(7, 100..200), Some(3)).await;
    mount_posts_page(&server, 3, posts_json(7, 200..250), Some(3)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 150, dir.path()).await.unwrap();

    assert_eq!(report.summary.fetched_articles, 150);
    assert_eq!(report.summary.saved_articles, 150);
    assert_eq!(markdown_files(dir.path()).len(), 150);
    let pages: Vec<String> = post_requests(&server)
        .await
        .iter()
        .filter_map(|url| query_value(url, "page"))
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
}

#[tokio::test]
async fn test_invalid_page_ends_pagination() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, posts_json(7, 0..100), None).await;
    mount_invalid_page(&server, 2).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 150, dir.path()).await.unwrap();

    assert_eq!(report.summary.fetched_articles, 100);
    assert_eq!(report.summary.saved_articles, 100);
    assert!(report.warnings.iter().any(|w| w.contains("400")));
    assert_eq!(read_summary(dir.path()).saved_articles, 100);
}

#[tokio::test]
async fn test_empty_result_still_writes_summary() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, vec![], Some(0)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 10, dir.path()).await.unwrap();

    assert_eq!(report.summary.fetched_articles, 0);
    assert!(markdown_files(dir.path()).is_empty());
    assert_eq!(read_summary(dir.path()).saved_articles, 0);
}

#[tokio::test]
async fn test_unwritable_output_directory_fails_before_requests() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    std::fs::write(&blocker, b"").unwrap();

    let result = run_crawl(&server, "john", 5, &blocker.join("out")).await;

    assert!(matches!(result, Err(CrawlUseCaseError::OutputUnavailable(_))));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_user_lookup_errors_are_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_posts_page(&server, 1, posts_json(7, 0..1), None).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(&server, "john", 1, dir.path()).await.unwrap();

    assert!(report.author.is_none());
    assert_eq!(report.summary.saved_articles, 1);
    assert_eq!(report.warnings.len(), 3);
}

#[tokio::test]
async fn test_bootstrap_runs_from_settings() {
    let server = MockServer::start().await;
    mount_slug(&server, "john", vec![user_json(7, "John Smith", "john")]).await;
    mount_posts_page(&server, 1, posts_json(7, 0..2), Some(1)).await;
    let dir = tempfile::tempdir().unwrap();

    let vars: Map<String, String> = [
        ("WORDPRESS_URL", format!("{}/", server.uri())),
        ("AUTHOR_NAME", "john".to_string()),
        ("NUM_ARTICLES", "2".to_string()),
        ("OUTPUT_DIR", dir.path().display().to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let settings = Settings::load(Some(vars)).unwrap();

    let report = bootstrap::run(&settings).await.unwrap();

    assert_eq!(report.summary.saved_articles, 2);
    assert_eq!(report.summary.wordpress_url, server.uri());
    assert_eq!(markdown_files(dir.path()).len(), 2);
}

#[tokio::test]
async fn test_bootstrap_rejects_missing_url() {
    let vars: Map<String, String> = [("AUTHOR_NAME".to_string(), "john".to_string())]
        .into_iter()
        .collect();
    let settings = Settings::load(Some(vars)).unwrap();

    let err = bootstrap::run(&settings).await.unwrap_err();

    assert!(err.to_string().contains("WORDPRESS_URL"));
}
