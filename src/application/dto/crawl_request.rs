// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;
use validator::Validate;

/// 输入校验错误
///
/// 均为致命错误，在发起任何网络请求之前返回
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid URL scheme '{0}': must be http or https")]
    InvalidScheme(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid number of articles: {0} (must be a positive integer)")]
    InvalidCount(i64),
    #[error("Validation failed: {0}")]
    Rules(String),
}

/// 抓取请求
///
/// 单次运行内不可变，构造时完成校验
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct CrawlRequest {
    /// 站点地址，已去掉末尾的 `/`
    #[validate(url)]
    pub wordpress_url: String,
    /// 作者名称或 slug
    #[validate(length(min = 1))]
    pub author: String,
    /// 请求的文章数
    #[validate(range(min = 1))]
    pub num_articles: u32,
    /// 输出目录
    pub output_dir: PathBuf,
}

impl CrawlRequest {
    pub fn new(
        wordpress_url: &str,
        author: &str,
        num_articles: i64,
        output_dir: impl AsRef<Path>,
    ) -> Result<Self, ValidationError> {
        let wordpress_url = wordpress_url.trim().trim_end_matches('/');
        if wordpress_url.is_empty() {
            return Err(ValidationError::Missing("WORDPRESS_URL"));
        }
        check_scheme(wordpress_url)?;

        let author = author.trim();
        if author.is_empty() {
            return Err(ValidationError::Missing("AUTHOR_NAME"));
        }

        let num_articles = u32::try_from(num_articles)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or(ValidationError::InvalidCount(num_articles))?;

        let output_dir = output_dir.as_ref();
        if output_dir.as_os_str().is_empty() {
            return Err(ValidationError::Missing("OUTPUT_DIR"));
        }

        let request = Self {
            wordpress_url: wordpress_url.to_string(),
            author: author.to_string(),
            num_articles,
            output_dir: output_dir.to_path_buf(),
        };
        request.check()?;
        Ok(request)
    }

    /// 重新执行校验规则
    pub fn check(&self) -> Result<(), ValidationError> {
        check_scheme(&self.wordpress_url)?;
        self.validate()
            .map_err(|e| ValidationError::Rules(e.to_string()))
    }
}

fn check_scheme(url: &str) -> Result<(), ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            if parsed.host_str().is_none() {
                return Err(ValidationError::InvalidUrl(url.to_string()));
            }
            Ok(())
        }
        Ok(parsed) => Err(ValidationError::InvalidScheme(parsed.scheme().to_string())),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(ValidationError::InvalidScheme(String::new()))
        }
        Err(e) => Err(ValidationError::InvalidUrl(format!("{}: {}", url, e))),
    }
}
