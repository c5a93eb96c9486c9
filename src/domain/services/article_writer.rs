// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::RenderedArticle;
use crate::domain::models::crawl_summary::{CrawlSummary, SUMMARY_FILE};
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// 文章写入服务
pub struct ArticleWriter<S: StorageRepository> {
    storage: Arc<S>,
}

impl<S: StorageRepository> ArticleWriter<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// 将渲染后的文章写入输出目录，同名文件会被覆盖
    pub async fn write(&self, article: &RenderedArticle) -> Result<(), StorageError> {
        self.storage
            .save(&article.filename, article.markdown.as_bytes())
            .await?;
        info!("Saved: {}", article.filename);
        Ok(())
    }
}

/// 运行摘要写入服务
pub struct SummaryEmitter<S: StorageRepository> {
    storage: Arc<S>,
}

impl<S: StorageRepository> SummaryEmitter<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// 以格式化 JSON 写入 `crawl_summary.json`
    pub async fn emit(&self, summary: &CrawlSummary) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(summary)?;
        self.storage.save(SUMMARY_FILE, &json).await?;
        debug!("Summary written to {}", SUMMARY_FILE);
        Ok(())
    }

    /// 读取已写入的摘要
    pub async fn load(&self) -> Result<Option<CrawlSummary>, StorageError> {
        match self.storage.get(SUMMARY_FILE).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
