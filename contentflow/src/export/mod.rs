//! Download renderings of a final result.

use crate::errors::Result;
use crate::fanout::{GraphView, QueryRow};
use crate::pipeline::FinalResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Write as _};

/// Header row of the query table.
pub const CSV_HEADER: &str = "type,query,similarity";

/// Download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The body as markdown.
    Markdown,
    /// The body rendered into a standalone page.
    Html,
    /// The whole final result.
    Json,
    /// The query table.
    Csv,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// MIME type for data URIs.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Title with spaces replaced by underscores.
#[must_use]
pub fn filename_stem(title: &str) -> String {
    title.trim().replace(' ', "_")
}

/// Download file name for a result in `format`.
#[must_use]
pub fn file_name(result: &FinalResult, format: ExportFormat) -> String {
    format!("{}.{}", filename_stem(&result.title), format.extension())
}

/// The body as markdown text.
#[must_use]
pub fn to_markdown(result: &FinalResult) -> String {
    result.body.clone()
}

/// The body rendered to HTML inside a titled page.
#[must_use]
pub fn to_html(result: &FinalResult) -> String {
    let mut rendered = String::new();
    html::push_html(
        &mut rendered,
        Parser::new_ext(&result.body, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH),
    );
    format!(
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\nbody {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}\nh1, h2, h3 {{ color: #333; }}\n</style>\n</head>\n<body>\n{rendered}</body>\n</html>\n",
        escape_html(&result.title)
    )
}

/// The final result as pretty-printed JSON.
pub fn to_json(result: &FinalResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Query rows as CSV with a header line.
#[must_use]
pub fn queries_csv(rows: &[QueryRow]) -> String {
    write_csv(
        rows.iter()
            .map(|r| (r.query_type.to_string(), r.query.as_str(), r.similarity)),
    )
}

/// The non-root nodes of a graph view as CSV, most similar first.
#[must_use]
pub fn graph_csv(view: &GraphView) -> String {
    let mut nodes: Vec<_> = view.nodes.iter().filter(|n| n.level > 0).collect();
    nodes.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    write_csv(
        nodes
            .into_iter()
            .map(|n| (n.query_type.clone(), n.label.as_str(), n.similarity)),
    )
}

/// Renders `result` in `format`. CSV uses the result's graph and is empty
/// apart from the header when the result has none.
pub fn render(result: &FinalResult, format: ExportFormat) -> Result<String> {
    Ok(match format {
        ExportFormat::Markdown => to_markdown(result),
        ExportFormat::Html => to_html(result),
        ExportFormat::Json => to_json(result)?,
        ExportFormat::Csv => result
            .graph
            .as_ref()
            .map_or_else(|| write_csv(std::iter::empty()), graph_csv),
    })
}

/// `data:` URI embedding `content` as base64.
#[must_use]
pub fn data_uri(mime_type: &str, content: &str) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(content.as_bytes()))
}

/// Renders `result` and wraps it in a `data:` URI.
pub fn to_data_uri(result: &FinalResult, format: ExportFormat) -> Result<String> {
    Ok(data_uri(format.mime_type(), &render(result, format)?))
}

fn write_csv<'a, I>(rows: I) -> String
where
    I: Iterator<Item = (String, &'a str, f32)>,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for (query_type, query, similarity) in rows {
        out.push_str(&csv_field(&query_type));
        out.push(',');
        out.push_str(&csv_field(query));
        out.push(',');
        let _ = writeln!(out, "{similarity:.3}");
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
