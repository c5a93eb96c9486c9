// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::author::Author;
use crate::domain::models::post::Post;
use async_trait::async_trait;
use thiserror::Error;

/// WordPress 单页最多返回的文章数
pub const MAX_PER_PAGE: u32 = 100;

/// WordPress API 错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求失败（网络错误、超时等）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 服务器返回非成功状态码
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    /// 响应体无法解析
    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
    /// 无法构造请求地址
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// 文章分页查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    /// 作者过滤，`None` 时不过滤
    pub author_id: Option<u64>,
    /// 页码，从 1 开始
    pub page: u32,
    /// 每页数量
    pub per_page: u32,
}

/// 一页文章
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    /// 本页文章，按发布时间倒序
    pub posts: Vec<Post>,
    /// `X-WP-TotalPages` 响应头，并非所有部署都会返回
    pub total_pages: Option<u32>,
    /// `X-WP-Total` 响应头
    pub total_posts: Option<u64>,
}

/// WordPress REST API 访问接口
///
/// 只读访问 `wp/v2/users` 和 `wp/v2/posts`。
#[async_trait]
pub trait WordPressApi: Send + Sync {
    /// `GET users?slug={slug}`
    async fn users_by_slug(&self, slug: &str) -> Result<Vec<Author>, ApiError>;

    /// `GET users?search={term}`
    async fn search_users(&self, term: &str) -> Result<Vec<Author>, ApiError>;

    /// `GET posts?author={id}&per_page={n}&page={p}&orderby=date&order=desc&_embed`
    async fn posts_page(&self, query: &PostQuery) -> Result<PostPage, ApiError>;
}
