// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层依赖的外部接口，具体实现由基础设施层提供：
/// - WordPress 仓库（wordpress_repository）：只读访问站点的 REST API
/// - 存储仓库（storage_repository）：写入输出目录
pub mod storage_repository;
pub mod wordpress_repository;
