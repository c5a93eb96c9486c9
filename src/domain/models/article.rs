// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 渲染完成的文章
///
/// 由 [`Post`](crate::domain::models::post::Post) 确定性地生成，写入一次后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    /// 本次运行内唯一的文件名
    pub filename: String,
    /// Markdown 正文（含元数据头）
    pub markdown: String,
}
