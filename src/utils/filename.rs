// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// 文件名主体的最大字节数
pub const MAX_TITLE_BYTES: usize = 200;

/// 标题为空时使用的文件名
pub const FALLBACK_TITLE: &str = "untitled";

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Failed to compile unsafe char regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// 将标题转换为安全的文件名主体
///
/// 纯函数：相同输入始终得到相同输出，不访问文件系统。
///
/// 1. 移除文件系统不允许的字符和控制字符
/// 2. 将连续空白替换为下划线
/// 3. 截断到 [`MAX_TITLE_BYTES`] 字节（按字符边界）
/// 4. 去掉首尾的下划线和点
pub fn sanitize_title(title: &str) -> String {
    let without_unsafe = UNSAFE_CHARS.replace_all(title, "");
    let printable: String = without_unsafe
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let underscored = WHITESPACE.replace_all(&printable, "_");
    let capped = truncate_on_char_boundary(&underscored, MAX_TITLE_BYTES);
    let trimmed = capped.trim_matches(|c| c == '_' || c == '.');

    if trimmed.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 生成文章文件名：`YYYY-MM-DD_<标题>.md`
pub fn article_filename(date_label: &str, title: &str) -> String {
    format!("{}_{}.md", date_label, sanitize_title(title))
}

fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// 单次运行内的文件名登记表
///
/// 记录本次运行已使用的文件名，重名时追加 `_2`、`_3` 等数字后缀。
/// 比较时忽略大小写，保证在大小写不敏感的文件系统上同样不会覆盖。
#[derive(Debug, Default)]
pub struct FilenameRegistry {
    used: HashSet<String>,
}

impl FilenameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记文件名并返回本次运行内唯一的名称
    pub fn claim(&mut self, filename: &str) -> String {
        let (stem, extension) = match filename.rfind('.') {
            Some(idx) if idx > 0 => filename.split_at(idx),
            _ => (filename, ""),
        };

        let mut candidate = filename.to_string();
        let mut suffix = 1;
        while !self.used.insert(candidate.to_lowercase()) {
            suffix += 1;
            candidate = format!("{}_{}{}", stem, suffix, extension);
        }
        candidate
    }

    /// 已登记的文件名数量
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
