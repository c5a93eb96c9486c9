// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域仓库接口的具体实现：
/// - 存储（storage）：本地文件系统与内存存储
/// - WordPress 客户端（wordpress_client）：基于 reqwest 的 REST API 客户端
pub mod storage;
pub mod wordpress_client;
