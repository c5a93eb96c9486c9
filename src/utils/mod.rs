// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括文件名处理、HTML 转换、URL 处理和日志初始化
pub mod filename;
pub mod html_markdown;
pub mod telemetry;
pub mod url_utils;
