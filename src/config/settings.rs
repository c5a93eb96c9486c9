// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;

use crate::application::dto::crawl_request::{CrawlRequest, ValidationError};

/// 环境变量前缀，例如 `WPCRAWLRS__HTTP__TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "WPCRAWLRS";

/// 容器层直接提供的调用参数（环境变量名, 配置键）
pub const INVOCATION_VARS: [(&str, &str); 4] = [
    ("WORDPRESS_URL", "wordpress_url"),
    ("AUTHOR_NAME", "author_name"),
    ("NUM_ARTICLES", "num_articles"),
    ("OUTPUT_DIR", "output_dir"),
];

/// 应用程序配置设置
///
/// 包含调用参数、HTTP 客户端和日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// WordPress 站点地址
    pub wordpress_url: Option<String>,
    /// 作者名称或 slug
    pub author_name: Option<String>,
    /// 请求的文章数
    pub num_articles: i64,
    /// 输出目录
    pub output_dir: String,
    /// HTTP 配置
    pub http: HttpSettings,
    /// 日志配置
    pub log: LogSettings,
}

/// HTTP 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 单个请求的超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent 请求头
    pub user_agent: String,
    /// 单次运行最多请求的文章页数
    pub max_pages: u32,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// 输出格式
    pub format: LogFormat,
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和进程环境变量加载配置，支持默认值
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// 从给定的环境变量集合加载配置
    ///
    /// `vars` 为 `None` 时读取进程环境变量。优先级从低到高：
    /// 默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// `WPCRAWLRS__*` 前缀变量、[`INVOCATION_VARS`]。
    pub fn load(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let lookup = |name: &str| match &vars {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        };

        let env = lookup("APP_ENVIRONMENT").unwrap_or_else(|| "default".to_string());
        let mut builder = Config::builder()
            // Start with default settings
            .set_default("num_articles", 10)?
            .set_default("output_dir", "/output")?
            .set_default("http.timeout_secs", 30)?
            .set_default("http.user_agent", "WordPress-Article-Crawler/1.0")?
            .set_default("http.max_pages", 100)?
            .set_default("log.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(vars.clone()),
            );

        for (var, key) in INVOCATION_VARS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// 转换为经过校验的抓取请求
    pub fn crawl_request(&self) -> Result<CrawlRequest, ValidationError> {
        CrawlRequest::new(
            self.wordpress_url.as_deref().unwrap_or_default(),
            self.author_name.as_deref().unwrap_or_default(),
            self.num_articles,
            &self.output_dir,
        )
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
