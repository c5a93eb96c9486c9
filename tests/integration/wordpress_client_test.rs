// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wpcrawlrs::domain::repositories::wordpress_repository::{ApiError, PostQuery, WordPressApi};
use wpcrawlrs::infrastructure::wordpress_client::WordPressClient;

fn client(server: &MockServer) -> WordPressClient {
    WordPressClient::new(&server.uri(), &http_settings()).unwrap()
}

fn first_page(author_id: Option<u64>) -> PostQuery {
    PostQuery {
        author_id,
        page: 1,
        per_page: 10,
    }
}

#[tokio::test]
async fn test_reads_pagination_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "42")
                .insert_header("X-WP-TotalPages", "5")
                .set_body_json(posts_json(7, 0..2)),
        )
        .mount(&server)
        .await;

    let page = client(&server).posts_page(&first_page(Some(7))).await.unwrap();

    assert_eq!(page.posts.len(), 2);
    assert_eq!(page.total_pages, Some(5));
    assert_eq!(page.total_posts, Some(42));
    assert_eq!(page.posts[0].embedded_author_name(), Some("John Smith"));
}

#[tokio::test]
async fn test_missing_headers_are_none() {
    let server = MockServer::start().await;
    mount_posts_page(&server, 1, posts_json(7, 0..1), None).await;

    let page = client(&server).posts_page(&first_page(None)).await.unwrap();

    assert_eq!(page.total_pages, None);
    assert_eq!(page.total_posts, None);
}

#[tokio::test]
async fn test_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(header("user-agent", "WordPress-Article-Crawler/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![user_json(7, "John Smith", "john")]))
        .mount(&server)
        .await;

    let users = client(&server).users_by_slug("john").await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 7);
    assert_eq!(users[0].slug, "john");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    mount_invalid_page(&server, 1).await;

    let err = client(&server).posts_page(&first_page(None)).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_undecodable_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).posts_page(&first_page(None)).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_site_in_subdirectory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/wp-json/wp/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&server)
        .await;
    let client = WordPressClient::new(&format!("{}/blog/", server.uri()), &http_settings()).unwrap();

    let users = client.search_users("nobody").await.unwrap();

    assert!(users.is_empty());
}
