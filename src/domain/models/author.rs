// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// WordPress 作者
///
/// 对应 `wp/v2/users` 返回的用户对象，只保留抓取需要的字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// 作者数字ID，用于过滤文章
    pub id: u64,
    /// 显示名称
    #[serde(default)]
    pub name: String,
    /// URL 友好的短标识
    #[serde(default)]
    pub slug: String,
}

impl Author {
    /// 判断作者是否与输入的名称或 slug 匹配（忽略大小写）
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.slug.eq_ignore_ascii_case(query) || self.name.to_lowercase() == query.to_lowercase()
    }
}
