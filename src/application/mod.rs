// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求对象、抓取用例以及组装具体实现的启动代码
pub mod bootstrap;
pub mod dto;
pub mod use_cases;
