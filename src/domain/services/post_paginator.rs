// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::Post;
use crate::domain::repositories::wordpress_repository::{PostQuery, WordPressApi, MAX_PER_PAGE};
use chrono::NaiveDateTime;
use futures::stream::{self, Stream};
use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 分页停止原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// 已收集到请求的数量
    LimitReached,
    /// 某页没有返回文章
    EmptyPage,
    /// 某页返回的文章少于页大小
    ShortPage,
    /// 已到达 `X-WP-TotalPages` 指示的最后一页
    LastPage,
    /// 达到页数上限
    PageCeiling,
    /// 请求失败，保留已获取的文章
    Failed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StopReason::LimitReached => write!(f, "requested count reached"),
            StopReason::EmptyPage => write!(f, "no more articles"),
            StopReason::ShortPage => write!(f, "last partial page"),
            StopReason::LastPage => write!(f, "last page reported by server"),
            StopReason::PageCeiling => write!(f, "page limit reached"),
            StopReason::Failed(reason) => write!(f, "page request failed: {}", reason),
        }
    }
}

/// 文章分页器
///
/// 惰性地按发布时间倒序产出文章，总数不超过 `limit`。
/// 单页请求失败时停止分页并保留已获取的文章，不会中断整个运行。
/// 页数受 `max_pages` 约束，异常的服务器也不会导致无限循环。
pub struct PostPaginator<A: WordPressApi> {
    api: Arc<A>,
    author_id: Option<u64>,
    limit: usize,
    per_page: u32,
    max_pages: u32,
    next_page: u32,
    pages_fetched: u32,
    buffer: VecDeque<Post>,
    seen: HashSet<u64>,
    emitted: usize,
    last_date: Option<NaiveDateTime>,
    stop_reason: Option<StopReason>,
}

impl<A: WordPressApi> PostPaginator<A> {
    /// 创建分页器
    ///
    /// # 参数
    ///
    /// * `api` - WordPress API
    /// * `author_id` - 作者过滤，`None` 时不过滤
    /// * `limit` - 最多产出的文章数
    /// * `max_pages` - 最多请求的页数
    pub fn new(api: Arc<A>, author_id: Option<u64>, limit: u32, max_pages: u32) -> Self {
        Self {
            api,
            author_id,
            limit: limit as usize,
            per_page: limit.clamp(1, MAX_PER_PAGE),
            max_pages: max_pages.max(1),
            next_page: 1,
            pages_fetched: 0,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            emitted: 0,
            last_date: None,
            stop_reason: None,
        }
    }

    /// 每页请求的文章数
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// 已产出的文章数
    pub fn fetched(&self) -> usize {
        self.emitted
    }

    /// 已请求的页数（含失败的请求）
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// 分页停止原因，尚未停止时为 `None`
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    /// 分页因请求失败而提前结束时的警告信息
    pub fn failure(&self) -> Option<String> {
        match &self.stop_reason {
            Some(reason @ StopReason::Failed(_)) => Some(format!(
                "pagination stopped early ({}); kept {} article(s)",
                reason, self.emitted
            )),
            _ => None,
        }
    }

    /// 获取下一篇文章，没有更多文章时返回 `None`
    pub async fn next_post(&mut self) -> Option<Post> {
        loop {
            if self.emitted >= self.limit {
                self.stop(StopReason::LimitReached);
                return None;
            }
            if let Some(post) = self.buffer.pop_front() {
                self.emitted += 1;
                return Some(post);
            }
            if self.stop_reason.is_some() {
                return None;
            }
            self.fetch_next_page().await;
        }
    }

    /// 以 `Stream` 形式产出文章
    pub fn stream(&mut self) -> impl Stream<Item = Post> + '_ {
        stream::unfold(self, |paginator| async move {
            let post = paginator.next_post().await?;
            Some((post, paginator))
        })
    }

    /// 收集全部文章
    pub async fn collect_all(&mut self) -> Vec<Post> {
        let mut posts = Vec::new();
        while let Some(post) = self.next_post().await {
            posts.push(post);
        }
        posts
    }

    async fn fetch_next_page(&mut self) {
        if self.next_page > self.max_pages {
            self.stop(StopReason::PageCeiling);
            return;
        }

        let page = self.next_page;
        let query = PostQuery {
            author_id: self.author_id,
            page,
            per_page: self.per_page,
        };
        self.next_page += 1;
        self.pages_fetched += 1;

        let result = match self.api.posts_page(&query).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Error fetching articles (page {}): {}", page, e);
                self.stop(StopReason::Failed(e.to_string()));
                return;
            }
        };

        let received = result.posts.len();
        if received == 0 {
            info!("No more articles found (page {})", page);
            self.stop(StopReason::EmptyPage);
            return;
        }

        let mut posts = result.posts;
        posts.sort_by_cached_key(|post| Reverse(post.published_at()));

        if let (Some(previous), Some(first)) = (self.last_date, posts[0].published_at()) {
            if first > previous {
                warn!(
                    "Page {} starts with a post newer than the previous page ({} > {})",
                    page, first, previous
                );
            }
        }
        if let Some(last) = posts.iter().rev().find_map(Post::published_at) {
            self.last_date = Some(last);
        }

        for post in posts {
            if self.seen.insert(post.id) {
                self.buffer.push_back(post);
            } else {
                debug!("Skipping duplicate post {} on page {}", post.id, page);
            }
        }

        let collected = self.emitted + self.buffer.len();
        info!(
            "Page {}: fetched {} articles (total: {})",
            page,
            received,
            collected.min(self.limit)
        );

        if collected >= self.limit {
            self.stop(StopReason::LimitReached);
        } else if received < self.per_page as usize {
            self.stop(StopReason::ShortPage);
        } else if result.total_pages.is_some_and(|total| page >= total) {
            info!("Reached last page ({})", page);
            self.stop(StopReason::LastPage);
        } else if page >= self.max_pages {
            warn!("Stopping after {} pages", page);
            self.stop(StopReason::PageCeiling);
        }
    }

    fn stop(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            debug!("Pagination stopped: {}", reason);
            self.stop_reason = Some(reason);
        }
    }
}

#[cfg(test)]
#[path = "post_paginator_test.rs"]
mod tests;
