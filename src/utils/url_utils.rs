// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// WordPress REST API v2 的相对路径
pub const WP_API_PATH: &str = "wp-json/wp/v2/";

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 由站点地址得到 REST API 根地址
///
/// 站点可以部署在子路径下（如 `https://example.com/blog`），
/// 因此先补齐末尾的 `/` 再拼接。
pub fn wp_api_base(site_url: &str) -> Result<Url, ParseError> {
    let site = Url::parse(&format!("{}/", site_url.trim_end_matches('/')))?;
    site.join(WP_API_PATH)
}
