// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::author::Author;
use crate::domain::repositories::wordpress_repository::WordPressApi;
use std::sync::Arc;
use tracing::{info, warn};

/// 作者解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorLookup {
    /// 解析到的作者；`None` 表示按不过滤作者的方式继续抓取
    pub author: Option<Author>,
    /// 解析过程中被吸收的问题
    pub warnings: Vec<String>,
}

/// 作者解析服务
///
/// 先按 slug 精确查找，再按名称搜索。查找失败不是致命错误：
/// 找不到作者时返回 `None`，由调用方降级为不过滤作者的抓取。
pub struct AuthorResolver<A: WordPressApi> {
    api: Arc<A>,
}

impl<A: WordPressApi> AuthorResolver<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// 将作者名称或 slug 解析为作者
    pub async fn resolve(&self, query: &str) -> AuthorLookup {
        let query = query.trim();
        let mut lookup = AuthorLookup::default();
        info!("Looking up author: {}", query);

        match self.api.users_by_slug(query).await {
            Ok(users) => {
                if let Some(author) = pick(users, query) {
                    info!("Found author by slug: {} (ID: {})", author.name, author.id);
                    lookup.author = Some(author);
                    return lookup;
                }
            }
            Err(e) => {
                warn!("Could not find author by slug: {}", e);
                lookup
                    .warnings
                    .push(format!("author lookup by slug failed: {}", e));
            }
        }

        match self.api.search_users(query).await {
            Ok(users) => {
                if let Some(author) = pick(users, query) {
                    info!("Found author by name: {} (ID: {})", author.name, author.id);
                    lookup.author = Some(author);
                    return lookup;
                }
            }
            Err(e) => {
                warn!("Could not search author by name: {}", e);
                lookup
                    .warnings
                    .push(format!("author search by name failed: {}", e));
            }
        }

        warn!(
            "Could not find author '{}', will fetch articles without author filter",
            query
        );
        lookup.warnings.push(format!(
            "author '{}' not found; articles were fetched without an author filter",
            query
        ));
        lookup
    }
}

/// 优先选择 slug 或名称完全匹配的用户，否则取第一个
fn pick(users: Vec<Author>, query: &str) -> Option<Author> {
    let exact = users.iter().position(|user| user.matches(query));
    match exact {
        Some(idx) => users.into_iter().nth(idx),
        None => users.into_iter().next(),
    }
}
