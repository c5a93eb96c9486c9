// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::crawl_use_case::{CrawlReport, CrawlUseCase};
use crate::config::settings::Settings;
use crate::infrastructure::storage::LocalStorage;
use crate::infrastructure::wordpress_client::WordPressClient;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

/// 根据配置组装具体实现并执行一次抓取
pub async fn run(settings: &Settings) -> anyhow::Result<CrawlReport> {
    let request = settings.crawl_request()?;
    info!(
        "WordPress URL: {}, author: {}, articles: {}, output: {}",
        request.wordpress_url,
        request.author,
        request.num_articles,
        request.output_dir.display()
    );

    let client = WordPressClient::new(&request.wordpress_url, &settings.http)
        .context("Failed to create WordPress client")?;
    let storage = LocalStorage::new(&request.output_dir);

    let report = CrawlUseCase::new(Arc::new(client), Arc::new(storage))
        .with_max_pages(settings.http.max_pages)
        .execute(&request)
        .await?;
    Ok(report)
}
