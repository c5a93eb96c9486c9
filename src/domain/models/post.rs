// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 无法解析发布日期时使用的占位符
pub const UNKNOWN_DATE: &str = "unknown-date";

/// WordPress 文章
///
/// 对应 `wp/v2/posts?_embed` 返回的文章对象。除 `id` 外的字段都允许缺失，
/// 缺失时取默认值，由渲染阶段决定如何降级。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// 文章ID
    pub id: u64,
    /// 发布时间（站点本地时间，ISO-8601）
    #[serde(default)]
    pub date: Option<String>,
    /// 标题（HTML 转义文本）
    #[serde(default)]
    pub title: Rendered,
    /// 正文 HTML
    #[serde(default)]
    pub content: Rendered,
    /// 摘要 HTML
    #[serde(default)]
    pub excerpt: Rendered,
    /// 原文链接
    #[serde(default)]
    pub link: Option<String>,
    /// 作者ID
    #[serde(default)]
    pub author: Option<u64>,
    /// `_embed` 附带的关联数据
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

/// WordPress 的 `{"rendered": "..."}` 字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl Rendered {
    pub fn new(rendered: impl Into<String>) -> Self {
        Self {
            rendered: rendered.into(),
        }
    }
}

/// `_embedded` 对象
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub author: Vec<EmbeddedAuthor>,
}

/// 内嵌的作者信息
///
/// 作者不可公开访问时 WordPress 会在此处返回错误对象，因此所有字段均为可选。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Post {
    /// 解析发布时间
    ///
    /// 兼容带时区偏移的 RFC 3339 和 WordPress 默认的无时区格式。
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_local());
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    /// `YYYY-MM-DD` 格式的发布日期，无法解析时为 [`UNKNOWN_DATE`]
    pub fn date_label(&self) -> String {
        self.published_at()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }

    /// 内嵌作者的显示名称
    pub fn embedded_author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .author
            .first()?
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// 非空的原文链接
    pub fn source_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}
