// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 导出流水线的各个阶段：
/// - 作者解析（author_resolver）：将作者名称或 slug 解析为作者ID
/// - 文章分页（post_paginator）：按页惰性获取文章并在满足条件时停止
/// - 内容转换（content_converter）：HTML 转 Markdown 并生成文件名
/// - 文件写入（article_writer）：写入文章和运行摘要
pub mod article_writer;
pub mod author_resolver;
pub mod content_converter;
pub mod post_paginator;
