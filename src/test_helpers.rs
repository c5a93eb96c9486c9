// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 单元测试共用的 WordPress API 与存储替身

use crate::domain::models::author::Author;
use crate::domain::models::post::{Embedded, EmbeddedAuthor, Post, Rendered};
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use crate::domain::repositories::wordpress_repository::{
    ApiError, PostPage, PostQuery, WordPressApi,
};
use crate::infrastructure::storage::InMemoryStorage;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// 内存中的 WordPress 站点
///
/// 行为与真实站点一致：文章按日期倒序分页，越界页返回 400。
#[derive(Default)]
pub(crate) struct FakeWordPressApi {
    pub slug_users: Vec<Author>,
    pub search_users: Vec<Author>,
    pub fail_user_lookups: bool,
    pub posts: Vec<Post>,
    pub send_total_pages: bool,
    pub fail_on_page: Option<u32>,
    pub user_requests: Mutex<Vec<String>>,
    pub post_requests: Mutex<Vec<PostQuery>>,
}

impl FakeWordPressApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn post_requests(&self) -> Vec<PostQuery> {
        self.post_requests.lock().unwrap().clone()
    }

    pub fn user_requests(&self) -> Vec<String> {
        self.user_requests.lock().unwrap().clone()
    }

    fn lookup_failure(&self, kind: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            url: format!("http://fake/wp-json/wp/v2/users?{}", kind),
        }
    }
}

#[async_trait]
impl WordPressApi for FakeWordPressApi {
    async fn users_by_slug(&self, slug: &str) -> Result<Vec<Author>, ApiError> {
        self.user_requests.lock().unwrap().push(format!("slug={}", slug));
        if self.fail_user_lookups {
            return Err(self.lookup_failure("slug"));
        }
        Ok(self.slug_users.clone())
    }

    async fn search_users(&self, term: &str) -> Result<Vec<Author>, ApiError> {
        self.user_requests.lock().unwrap().push(format!("search={}", term));
        if self.fail_user_lookups {
            return Err(self.lookup_failure("search"));
        }
        Ok(self.search_users.clone())
    }

    async fn posts_page(&self, query: &PostQuery) -> Result<PostPage, ApiError> {
        self.post_requests.lock().unwrap().push(*query);
        if self.fail_on_page == Some(query.page) {
            return Err(ApiError::Decode {
                url: format!("http://fake/wp-json/wp/v2/posts?page={}", query.page),
                reason: "expected value at line 1 column 1".to_string(),
            });
        }

        let matching: Vec<&Post> = self
            .posts
            .iter()
            .filter(|post| query.author_id.is_none() || post.author == query.author_id)
            .collect();
        let per_page = query.per_page.max(1) as usize;
        let total_pages = matching.len().div_ceil(per_page).max(1) as u32;

        if query.page == 0 || query.page > total_pages {
            return Err(ApiError::Status {
                status: 400,
                url: format!("http://fake/wp-json/wp/v2/posts?page={}", query.page),
            });
        }

        let start = (query.page as usize - 1) * per_page;
        let posts = matching
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        Ok(PostPage {
            posts,
            total_pages: self.send_total_pages.then_some(total_pages),
            total_posts: None,
        })
    }
}

pub(crate) fn author(id: u64, name: &str, slug: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

/// 构造一篇文章；`days_ago` 越大越旧
pub(crate) fn post(id: u64, author_id: u64, days_ago: i64, title: &str) -> Post {
    let base = NaiveDate::from_ymd_opt(2024, 6, 30)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    let date = base - Duration::days(days_ago);

    Post {
        id,
        date: Some(date.format("%Y-%m-%dT%H:%M:%S").to_string()),
        title: Rendered::new(title),
        content: Rendered::new(format!("<p>Body of {}</p>", title)),
        excerpt: Rendered::new(format!("<p>About {}</p>", title)),
        link: Some(format!("https://example.com/?p={}", id)),
        author: Some(author_id),
        embedded: Some(Embedded {
            author: vec![EmbeddedAuthor {
                id: Some(author_id),
                name: Some(format!("Author {}", author_id)),
                slug: None,
            }],
        }),
    }
}

/// 生成 `count` 篇同一作者的文章，最新的在前
pub(crate) fn posts_by(author_id: u64, count: u64) -> Vec<Post> {
    (0..count)
        .map(|i| post(author_id * 1000 + i, author_id, i as i64, &format!("Post {}", i)))
        .collect()
}

/// 可按文件名注入写入失败的内存存储
#[derive(Default)]
pub(crate) struct FlakyStorage {
    pub inner: InMemoryStorage,
    pub fail_prepare: bool,
    /// 文件名包含该片段时写入失败
    pub fail_keys_containing: Option<String>,
}

#[async_trait]
impl StorageRepository for FlakyStorage {
    async fn prepare(&self) -> Result<PathBuf, StorageError> {
        if self.fail_prepare {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.inner.prepare().await
    }

    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if let Some(fragment) = &self.fail_keys_containing {
            if key.contains(fragment.as_str()) {
                return Err(StorageError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "no space left on device",
                )));
            }
        }
        self.inner.save(key, data).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }
}
