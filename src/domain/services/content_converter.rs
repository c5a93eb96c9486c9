// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::RenderedArticle;
use crate::domain::models::post::Post;
use crate::utils::filename::{article_filename, FilenameRegistry};
use crate::utils::html_markdown::{html_to_markdown, html_to_plain_text, MarkdownError};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// 标题为空时显示的标题
pub const UNTITLED: &str = "Untitled";

/// 无法确定作者时显示的名称
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// 单篇文章的渲染错误，不影响其他文章
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Failed to convert article {id}: {source}")]
    Markdown {
        id: u64,
        #[source]
        source: MarkdownError,
    },
}

/// 内容转换服务
///
/// 将文章渲染为带元数据头的 Markdown，并分配本次运行内唯一的文件名
pub struct ContentConverter {
    registry: FilenameRegistry,
    fallback_author: Option<String>,
}

impl ContentConverter {
    /// # 参数
    ///
    /// * `fallback_author` - 文章未内嵌作者信息时使用的作者名称
    pub fn new(fallback_author: Option<String>) -> Self {
        Self {
            registry: FilenameRegistry::new(),
            fallback_author,
        }
    }

    /// 渲染文章并登记文件名
    ///
    /// 渲染失败时不会占用文件名
    pub fn convert(&mut self, post: &Post) -> Result<RenderedArticle, ConvertError> {
        let mut article = render_article(post, self.fallback_author.as_deref())?;
        let unique = self.registry.claim(&article.filename);
        if unique != article.filename {
            debug!(
                "Filename {} already used, saving post {} as {}",
                article.filename, post.id, unique
            );
            article.filename = unique;
        }
        Ok(article)
    }
}

/// 渲染单篇文章
///
/// 输出格式：
///
/// ```text
/// # 标题
///
/// **Author:** 作者
/// **Date:** YYYY-MM-DD
/// **Original URL:** 链接
///
/// ---
///
/// ## Excerpt
///
/// 摘要
///
/// 正文
/// ```
pub fn render_article(
    post: &Post,
    fallback_author: Option<&str>,
) -> Result<RenderedArticle, ConvertError> {
    let plain_title = html_to_plain_text(&post.title.rendered);
    let title = if plain_title.is_empty() {
        UNTITLED
    } else {
        plain_title.as_str()
    };
    let author = post
        .embedded_author_name()
        .or(fallback_author.map(str::trim).filter(|name| !name.is_empty()))
        .unwrap_or(UNKNOWN_AUTHOR);
    let date = post.date_label();
    let link = post.source_link();
    let base_url = link.and_then(|link| Url::parse(link).ok());

    let to_markdown = |html: &str| {
        html_to_markdown(html, base_url.as_ref())
            .map_err(|source| ConvertError::Markdown { id: post.id, source })
    };
    let excerpt = to_markdown(&post.excerpt.rendered)?;
    let body = to_markdown(&post.content.rendered)?;

    let mut markdown = String::new();
    let _ = write!(markdown, "# {}\n\n", title);
    let _ = write!(markdown, "**Author:** {}  \n", author);
    let _ = write!(markdown, "**Date:** {}  \n", date);
    if let Some(link) = link {
        let _ = write!(markdown, "**Original URL:** {}  \n", link);
    }
    markdown.push_str("\n---\n\n");
    if !excerpt.is_empty() {
        let _ = write!(markdown, "## Excerpt\n\n{}\n", excerpt);
    }
    markdown.push_str(&body);
    if !markdown.ends_with('\n') {
        markdown.push('\n');
    }

    Ok(RenderedArticle {
        filename: article_filename(&date, &plain_title),
        markdown,
    })
}

#[cfg(test)]
#[path = "content_converter_test.rs"]
mod tests;
