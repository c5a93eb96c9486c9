// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 运行摘要文件名
pub const SUMMARY_FILE: &str = "crawl_summary.json";

/// 单次抓取的运行摘要
///
/// 在处理文章的过程中逐步累加计数，运行结束时写入一次。
/// 计数满足 `saved_articles <= fetched_articles <= requested_articles`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// 站点地址
    pub wordpress_url: String,
    /// 请求时输入的作者名称或 slug
    pub author_name: String,
    /// 请求的文章数
    pub requested_articles: u32,
    /// 实际获取的文章数
    pub fetched_articles: u32,
    /// 成功保存的文章数
    pub saved_articles: u32,
    /// 运行时间
    pub crawl_date: DateTime<Utc>,
    /// 输出目录（解析后的绝对路径）
    pub output_directory: String,
}

impl CrawlSummary {
    pub fn new(
        wordpress_url: impl Into<String>,
        author_name: impl Into<String>,
        requested_articles: u32,
        output_directory: impl Into<String>,
    ) -> Self {
        Self {
            wordpress_url: wordpress_url.into(),
            author_name: author_name.into(),
            requested_articles,
            fetched_articles: 0,
            saved_articles: 0,
            crawl_date: Utc::now(),
            output_directory: output_directory.into(),
        }
    }

    /// 记录一篇已获取的文章
    pub fn record_fetched(&mut self) {
        debug_assert!(self.fetched_articles < self.requested_articles);
        self.fetched_articles += 1;
    }

    /// 记录一篇已保存的文章
    pub fn record_saved(&mut self) {
        debug_assert!(self.saved_articles < self.fetched_articles);
        self.saved_articles += 1;
    }

    /// 获取但未能保存的文章数
    pub fn skipped_articles(&self) -> u32 {
        self.fetched_articles - self.saved_articles
    }

    /// 设置最终的运行时间
    pub fn finish(&mut self, at: DateTime<Utc>) {
        self.crawl_date = at;
    }
}
