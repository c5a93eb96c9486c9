// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::process::ExitCode;
use tracing::{error, info, warn};
use wpcrawlrs::application::bootstrap;
use wpcrawlrs::config::settings::{LogFormat, Settings};
use wpcrawlrs::utils::telemetry;

/// 主函数
///
/// 读取配置，执行一次抓取并输出摘要。致命错误返回非零退出码，
/// 未保存任何文章的运行仍视为成功。
#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            telemetry::init_telemetry(LogFormat::default());
            error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    // 2. Initialize logging
    telemetry::init_telemetry(settings.log.format);
    info!("Starting wpcrawlrs {}", env!("CARGO_PKG_VERSION"));

    // 3. Run
    match bootstrap::run(&settings).await {
        Ok(report) => {
            let summary = &report.summary;
            info!(
                "Summary: requested {}, fetched {}, saved {}",
                summary.requested_articles, summary.fetched_articles, summary.saved_articles
            );
            info!("Output directory: {}", summary.output_directory);
            for warning in &report.warnings {
                warn!("{}", warning);
            }
            if summary.saved_articles == 0 {
                warn!("No articles were saved");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Crawl failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
