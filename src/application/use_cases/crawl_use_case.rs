// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::crawl_request::{CrawlRequest, ValidationError},
    domain::{
        models::{author::Author, crawl_summary::CrawlSummary},
        repositories::{
            storage_repository::{StorageError, StorageRepository},
            wordpress_repository::WordPressApi,
        },
        services::{
            article_writer::{ArticleWriter, SummaryEmitter},
            author_resolver::AuthorResolver,
            content_converter::ContentConverter,
            post_paginator::PostPaginator,
        },
    },
};
use chrono::Utc;
use futures::{pin_mut, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// 默认最多请求的页数
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// 致命错误，发生时运行中止
#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Output directory is not usable: {0}")]
    OutputUnavailable(#[source] StorageError),
    #[error("Failed to write crawl summary: {0}")]
    SummaryFailed(#[source] StorageError),
}

/// 一次完整运行的结果
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub summary: CrawlSummary,
    /// 解析到的作者，未找到时为 `None`
    pub author: Option<Author>,
    /// 运行中被吸收的非致命问题
    pub warnings: Vec<String>,
}

/// 抓取用例
///
/// 按顺序执行：校验请求，准备输出目录，解析作者，逐篇抓取、转换并写入文章，
/// 最后写入运行摘要。单篇文章的失败只记录为警告。
pub struct CrawlUseCase<A, S> {
    api: Arc<A>,
    storage: Arc<S>,
    max_pages: u32,
}

impl<A, S> CrawlUseCase<A, S>
where
    A: WordPressApi,
    S: StorageRepository,
{
    pub fn new(api: Arc<A>, storage: Arc<S>) -> Self {
        Self {
            api,
            storage,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub async fn execute(&self, request: &CrawlRequest) -> Result<CrawlReport, CrawlUseCaseError> {
        // 1. Validate before touching the network
        request.check()?;

        // 2. Output directory must be writable
        let output_dir = self
            .storage
            .prepare()
            .await
            .map_err(CrawlUseCaseError::OutputUnavailable)?;
        info!("Output directory: {}", output_dir.display());

        let mut summary = CrawlSummary::new(
            request.wordpress_url.as_str(),
            request.author.as_str(),
            request.num_articles,
            output_dir.display().to_string(),
        );

        // 3. Resolve author
        let lookup = AuthorResolver::new(self.api.clone())
            .resolve(&request.author)
            .await;
        let mut warnings = lookup.warnings;
        let author = lookup.author;

        // 4. Fetch, convert and write
        info!(
            "Fetching up to {} articles from {}",
            request.num_articles, request.wordpress_url
        );
        let mut paginator = PostPaginator::new(
            self.api.clone(),
            author.as_ref().map(|a| a.id),
            request.num_articles,
            self.max_pages,
        );
        let mut converter = ContentConverter::new(author.as_ref().map(|a| a.name.clone()));
        let writer = ArticleWriter::new(self.storage.clone());

        {
            let posts = paginator.stream();
            pin_mut!(posts);
            while let Some(post) = posts.next().await {
                summary.record_fetched();

                let article = match converter.convert(&post) {
                    Ok(article) => article,
                    Err(e) => {
                        warn!("Skipping post {}: {}", post.id, e);
                        warnings.push(e.to_string());
                        continue;
                    }
                };

                match writer.write(&article).await {
                    Ok(()) => summary.record_saved(),
                    Err(e) => {
                        warn!("Error saving article '{}': {}", article.filename, e);
                        warnings.push(format!("failed to save {}: {}", article.filename, e));
                    }
                }
            }
        }

        if let Some(failure) = paginator.failure() {
            warnings.push(failure);
        }

        // 5. Summary
        summary.finish(Utc::now());
        SummaryEmitter::new(self.storage.clone())
            .emit(&summary)
            .await
            .map_err(CrawlUseCaseError::SummaryFailed)?;

        info!(
            "Crawl complete: {} fetched, {} saved, {} skipped",
            summary.fetched_articles,
            summary.saved_articles,
            summary.skipped_articles()
        );

        Ok(CrawlReport {
            summary,
            author,
            warnings,
        })
    }
}

#[cfg(test)]
#[path = "crawl_use_case_test.rs"]
mod tests;
