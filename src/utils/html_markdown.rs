// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::resolve_url;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use thiserror::Error;
use url::Url;

/// 允许的最大元素嵌套深度
pub const MAX_NESTING_DEPTH: usize = 256;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").expect("Failed to compile tag regex"));
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));
static BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Failed to compile blank line regex"));
static INLINE_SPECIAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\`*_\[\]]").expect("Failed to compile inline special regex"));
static LEADING_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[#>+-]").expect("Failed to compile leading marker regex"));
static ORDERED_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([.)])").expect("Failed to compile ordered marker regex"));

// Placeholder for <br>, resolved once the whole fragment is rendered
const HARD_BREAK: char = '\u{1}';

/// HTML 转换错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkdownError {
    /// 元素嵌套过深
    #[error("HTML nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// 将 HTML 片段转换为 Markdown
///
/// 保留标题、段落、链接、图片、强调、列表、引用、代码块和表格，
/// 丢弃脚本与样式。`base_url` 用于解析相对链接。
pub fn html_to_markdown(html: &str, base_url: Option<&Url>) -> Result<String, MarkdownError> {
    let fragment = Html::parse_fragment(html);
    let renderer = MarkdownRenderer { base_url };
    let raw = renderer.render_children(fragment.root_element(), 0)?;
    Ok(normalize_blank_lines(&resolve_hard_breaks(&raw)))
}

/// 将带实体和标签的短文本（如文章标题）转换为纯文本
pub fn html_to_plain_text(html: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(html, "");
    let decoded = html_escape::decode_html_entities(&without_tags);
    WHITESPACE_REGEX.replace_all(decoded.trim(), " ").to_string()
}

/// 规范化空行：去除行尾空白，连续空行压缩为一行，以单个换行结尾
pub fn normalize_blank_lines(markdown: &str) -> String {
    let trimmed_lines = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = BLANK_LINES_REGEX.replace_all(&trimmed_lines, "\n\n");
    let body = collapsed.trim_matches('\n');
    if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    }
}

/// 将 `<br>` 占位符替换为 Markdown 硬换行
///
/// 只有后面仍有正文的行才保留硬换行，块边缘和空行上的占位符直接丢弃。
fn resolve_hard_breaks(markdown: &str) -> String {
    fn has_text(line: &str) -> bool {
        !line.replace(HARD_BREAK, "").trim().is_empty()
    }

    let lines: Vec<&str> = markdown.split('\n').collect();
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let stripped = line.replace(HARD_BREAK, "");
            let text = stripped.trim_end();
            let breaks_here = line.trim_end().ends_with(HARD_BREAK)
                && !text.trim().is_empty()
                && lines.get(idx + 1).is_some_and(|next| has_text(next));
            if breaks_here {
                format!("{}\\", text)
            } else {
                text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 转义文本节点中的 Markdown 特殊字符
///
/// `at_line_start` 为真时还会转义行首的标题、引用、列表标记。
fn escape_text(text: &str, at_line_start: bool) -> String {
    let escaped = INLINE_SPECIAL_REGEX.replace_all(text, r"\$0");
    if !at_line_start {
        return escaped.into_owned();
    }
    let marker_escaped = LEADING_MARKER_REGEX.replace(&escaped, r"\$0");
    ORDERED_MARKER_REGEX
        .replace(&marker_escaped, r"${1}\${2}")
        .into_owned()
}

/// 去除块内容两端的空白和换行占位符
fn trim_block(content: &str) -> &str {
    content.trim_matches(|c: char| c.is_whitespace() || c == HARD_BREAK)
}

/// 生成行内代码，围栏长度超过内容中最长的反引号串
fn code_span(code: &str) -> String {
    let longest_run = code.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    let padding = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{padding}{code}{padding}{fence}")
}

/// 用标记包裹行内内容，元素边缘的空白移到标记外侧
fn surround(element: ElementRef<'_>, content: &str, open: &str, close: &str) -> String {
    let texts: Vec<&str> = element.text().filter(|text| !text.is_empty()).collect();
    let leading = texts.first().is_some_and(|text| text.starts_with(char::is_whitespace));
    let trailing = texts.last().is_some_and(|text| text.ends_with(char::is_whitespace));

    let flattened = content.replace(HARD_BREAK, " ");
    let inner = WHITESPACE_REGEX.replace_all(flattened.trim(), " ");
    if inner.is_empty() {
        return if leading || trailing { " ".to_string() } else { String::new() };
    }
    format!(
        "{}{}{}{}{}",
        if leading { " " } else { "" },
        open,
        inner,
        close,
        if trailing { " " } else { "" }
    )
}

struct MarkdownRenderer<'a> {
    base_url: Option<&'a Url>,
}

impl MarkdownRenderer<'_> {
    fn render_children(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let mut out = String::new();
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let collapsed = WHITESPACE_REGEX.replace_all(text, " ");
                    let at_line_start = out.is_empty() || out.ends_with('\n');
                    let piece: &str = if at_line_start || out.ends_with(' ') {
                        collapsed.trim_start()
                    } else {
                        &collapsed
                    };
                    out.push_str(&escape_text(piece, at_line_start));
                }
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        let rendered = self.render_element(child_element, depth + 1)?;
                        // Never stack a space from an inline wrapper onto existing whitespace
                        if out.is_empty() || out.ends_with(|c: char| c == ' ' || c == '\n') {
                            out.push_str(rendered.trim_start_matches(' '));
                        } else {
                            out.push_str(&rendered);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    fn render_element(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(MarkdownError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        let name = element.value().name();
        let rendered = match name {
            "script" | "style" | "noscript" | "iframe" | "template" | "head" | "title" => {
                String::new()
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                let text = self.inline(element, depth)?;
                if text.is_empty() {
                    String::new()
                } else {
                    format!("\n\n{} {}\n\n", "#".repeat(level), text)
                }
            }
            "p" => format!("\n\n{}\n\n", trim_block(&self.render_children(element, depth)?)),
            "br" => format!("{}\n", HARD_BREAK),
            "hr" => "\n\n---\n\n".to_string(),
            "strong" | "b" => self.wrap_inline(element, depth, "**")?,
            "em" | "i" => self.wrap_inline(element, depth, "_")?,
            "del" | "s" | "strike" => self.wrap_inline(element, depth, "~~")?,
            "code" => {
                let code: String = element.text().collect();
                if code.is_empty() {
                    String::new()
                } else {
                    code_span(&code)
                }
            }
            "pre" => self.render_preformatted(element),
            "a" => self.render_link(element, depth)?,
            "img" => self.render_image(element),
            "ul" | "ol" => self.render_list(element, depth)?,
            "blockquote" => self.render_blockquote(element, depth)?,
            "table" => self.render_table(element, depth)?,
            "figcaption" => {
                let caption = self.inline(element, depth)?;
                if caption.is_empty() {
                    String::new()
                } else {
                    format!("\n\n_{}_\n\n", caption)
                }
            }
            "div" | "section" | "article" | "header" | "footer" | "main" | "aside" | "nav"
            | "figure" | "details" | "summary" | "dl" | "dt" | "dd" | "li" | "tr" => {
                format!("\n\n{}\n\n", trim_block(&self.render_children(element, depth)?))
            }
            _ => self.render_children(element, depth)?,
        };
        Ok(rendered)
    }

    /// 渲染行内内容：合并为单行
    fn inline(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let content = self.render_children(element, depth)?;
        let flattened = content.replace(HARD_BREAK, " ");
        Ok(WHITESPACE_REGEX.replace_all(flattened.trim(), " ").to_string())
    }

    fn wrap_inline(
        &self,
        element: ElementRef<'_>,
        depth: usize,
        marker: &str,
    ) -> Result<String, MarkdownError> {
        let content = self.render_children(element, depth)?;
        Ok(surround(element, &content, marker, marker))
    }

    fn resolve(&self, target: &str) -> String {
        match self.base_url {
            Some(base) => resolve_url(base, target)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| target.to_string()),
            None => target.to_string(),
        }
    }

    fn render_link(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let text = self.render_children(element, depth)?;
        let href = element.value().attr("href").map(str::trim).unwrap_or("");
        if href.is_empty() || href.starts_with("javascript:") {
            return Ok(surround(element, &text, "", ""));
        }
        let close = format!("]({})", self.resolve(href));
        Ok(surround(element, &text, "[", &close))
    }

    fn render_image(&self, element: ElementRef<'_>) -> String {
        let value = element.value();
        let src = value
            .attr("src")
            .or_else(|| value.attr("data-src"))
            .map(str::trim)
            .unwrap_or("");
        if src.is_empty() {
            return String::new();
        }
        let alt = value.attr("alt").unwrap_or("").trim();
        format!("![{}]({})", alt, self.resolve(src))
    }

    fn render_preformatted(&self, element: ElementRef<'_>) -> String {
        let language = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "code")
            .and_then(|code| {
                code.value()
                    .classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let code: String = element.text().collect();
        format!("\n\n```{}\n{}\n```\n\n", language, code.trim_matches('\n'))
    }

    fn render_list(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let ordered = element.value().name() == "ol";
        let mut number = element
            .value()
            .attr("start")
            .and_then(|start| start.trim().parse::<u64>().ok())
            .unwrap_or(1);

        let mut items = Vec::new();
        for item in element.children().filter_map(ElementRef::wrap) {
            if item.value().name() != "li" {
                continue;
            }
            let marker = if ordered {
                let marker = format!("{}. ", number);
                number += 1;
                marker
            } else {
                "- ".to_string()
            };
            let content = self.render_children(item, depth + 1)?;
            let tight = BLANK_LINES_REGEX.replace_all(trim_block(&content), "\n");
            let tight = tight.replace("\n\n", "\n");
            let indent = " ".repeat(marker.len());
            let body = tight
                .lines()
                .enumerate()
                .map(|(idx, line)| {
                    if idx == 0 || line.is_empty() {
                        line.to_string()
                    } else {
                        format!("{}{}", indent, line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            items.push(format!("{}{}", marker, body));
        }

        if items.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("\n\n{}\n\n", items.join("\n")))
    }

    fn render_blockquote(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let content = normalize_blank_lines(&self.render_children(element, depth)?);
        if content.is_empty() {
            return Ok(String::new());
        }
        let quoted = trim_block(&content)
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("\n\n{}\n\n", quoted))
    }

    fn render_table(&self, element: ElementRef<'_>, depth: usize) -> Result<String, MarkdownError> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        self.collect_rows(element, depth, &mut rows)?;
        if rows.is_empty() {
            return Ok(String::new());
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for row in &mut rows {
            row.resize(columns, String::new());
        }

        let separator = vec!["---".to_string(); columns];
        let mut lines = vec![table_row(&rows[0]), table_row(&separator)];
        lines.extend(rows[1..].iter().map(|row| table_row(row)));
        Ok(format!("\n\n{}\n\n", lines.join("\n")))
    }

    fn collect_rows(
        &self,
        element: ElementRef<'_>,
        depth: usize,
        rows: &mut Vec<Vec<String>>,
    ) -> Result<(), MarkdownError> {
        for child in element.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "thead" | "tbody" | "tfoot" => self.collect_rows(child, depth + 1, rows)?,
                "tr" => {
                    let mut cells = Vec::new();
                    for cell in child.children().filter_map(ElementRef::wrap) {
                        if matches!(cell.value().name(), "th" | "td") {
                            let text = self.inline(cell, depth + 2)?;
                            cells.push(text.replace('|', "\\|"));
                        }
                    }
                    if !cells.is_empty() {
                        rows.push(cells);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
#[path = "html_markdown_test.rs"]
mod tests;
