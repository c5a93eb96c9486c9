// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义作者、文章、渲染结果和运行摘要
pub mod article;
pub mod author;
pub mod crawl_summary;
pub mod post;
