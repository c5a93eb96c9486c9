// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::HttpSettings;
use crate::domain::models::author::Author;
use crate::domain::models::post::Post;
use crate::domain::repositories::wordpress_repository::{
    ApiError, PostPage, PostQuery, WordPressApi,
};
use crate::utils::url_utils::wp_api_base;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// 基于 reqwest 的 WordPress REST API 客户端
///
/// 整个运行共用一个连接池；每个请求都受超时约束，
/// 服务器无响应时不会无限期挂起。
pub struct WordPressClient {
    client: reqwest::Client,
    api_base: Url,
}

impl WordPressClient {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `site_url` - 站点地址（不含 `wp-json`）
    /// * `settings` - HTTP 配置
    pub fn new(site_url: &str, settings: &HttpSettings) -> Result<Self, ApiError> {
        let api_base =
            wp_api_base(site_url).map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", site_url, e)))?;
        let timeout = Duration::from_secs(settings.timeout_secs);

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client, api_base })
    }

    /// REST API 根地址
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<(T, HeaderMap), ApiError> {
        let url = self
            .api_base
            .join(endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(e.to_string()))?;

        let start = Instant::now();
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        debug!(
            "GET {} -> {} ({} ms)",
            final_url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: final_url,
            reason: e.to_string(),
        })?;

        Ok((value, headers))
    }
}

fn header_number<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// 构造文章列表的查询参数；未解析到作者时不带 `author`
pub fn posts_query_params(query: &PostQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(6);
    if let Some(author_id) = query.author_id {
        params.push(("author", author_id.to_string()));
    }
    params.push(("per_page", query.per_page.to_string()));
    params.push(("page", query.page.to_string()));
    params.push(("orderby", "date".to_string()));
    params.push(("order", "desc".to_string()));
    params.push(("_embed", "1".to_string()));
    params
}

#[async_trait]
impl WordPressApi for WordPressClient {
    async fn users_by_slug(&self, slug: &str) -> Result<Vec<Author>, ApiError> {
        let (users, _) = self
            .get_json::<Vec<Author>>("users", &[("slug", slug.to_string())])
            .await?;
        Ok(users)
    }

    async fn search_users(&self, term: &str) -> Result<Vec<Author>, ApiError> {
        let (users, _) = self
            .get_json::<Vec<Author>>("users", &[("search", term.to_string())])
            .await?;
        Ok(users)
    }

    async fn posts_page(&self, query: &PostQuery) -> Result<PostPage, ApiError> {
        let params = posts_query_params(query);
        let (posts, headers) = self.get_json::<Vec<Post>>("posts", &params).await?;

        Ok(PostPage {
            posts,
            total_pages: header_number(&headers, "x-wp-totalpages"),
            total_posts: header_number(&headers, "x-wp-total"),
        })
    }
}
