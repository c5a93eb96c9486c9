// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 键不是合法的单层文件名
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 存储仓库特质
///
/// 输出目录的抽象，键为目录内的文件名
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 创建输出位置并确认可写，返回解析后的位置
    async fn prepare(&self) -> Result<PathBuf, StorageError>;

    /// 使用指定键保存数据到存储中，已存在时覆盖
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
