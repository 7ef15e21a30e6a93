//! Page fetching and HTML-to-text conversion.
//!
//! The fetcher is the only network edge on the ingestion path. It enforces a
//! bounded timeout, checks the HTTP status, and accepts only textual content
//! types; HTML is reduced to plain text with scripts and styles elided.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::core::errors::ChatError;

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::InvalidConfiguration(format!("http client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its content as normalized plain text.
    pub async fn fetch(&self, url: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ChatError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::fetch(url, format!("status {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_lowercase())
            // Servers that omit the header are treated as HTML.
            .unwrap_or_else(|| "text/html".to_string());

        let body = response.text().await.map_err(|e| ChatError::fetch(url, e))?;

        match content_type.as_str() {
            "text/html" | "application/xhtml+xml" => Ok(html_to_text(&body)),
            t if t.starts_with("text/") => Ok(body),
            other => Err(ChatError::fetch(
                url,
                format!("unsupported content type '{}'", other),
            )),
        }
    }
}

#[derive(PartialEq)]
enum ParseState {
    Text,
    Tag,
    Script,
    Style,
}

/// Reduce an HTML document to its visible text.
///
/// Tags are dropped, script and style elements are elided wholesale, common
/// entities are decoded, and blank lines are collapsed.
pub fn html_to_text(html: &str) -> String {
    let mut result = String::with_capacity(html.len() / 4);
    let mut state = ParseState::Text;
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        match state {
            ParseState::Text => {
                if c == '<' {
                    let lower = lowercase_prefix(rest, 8);
                    state = if lower.starts_with("<script") {
                        ParseState::Script
                    } else if lower.starts_with("<style") {
                        ParseState::Style
                    } else {
                        ParseState::Tag
                    };
                    rest = &rest[1..];
                } else if c == '&' {
                    let (decoded, consumed) = decode_entity(rest);
                    result.push_str(&decoded);
                    rest = &rest[consumed..];
                } else {
                    result.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
            ParseState::Tag => {
                if c == '>' {
                    state = ParseState::Text;
                }
                rest = &rest[c.len_utf8()..];
            }
            ParseState::Script => {
                if lowercase_prefix(rest, 9).starts_with("</script>") {
                    state = ParseState::Text;
                    rest = &rest["</script>".len()..];
                } else {
                    rest = &rest[c.len_utf8()..];
                }
            }
            ParseState::Style => {
                if lowercase_prefix(rest, 8).starts_with("</style>") {
                    state = ParseState::Text;
                    rest = &rest["</style>".len()..];
                } else {
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
    }

    let lines: Vec<&str> = result
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    lines.join("\n")
}

fn lowercase_prefix(s: &str, max: usize) -> String {
    s.chars().take(max).collect::<String>().to_lowercase()
}

/// Decode a single entity at the start of `s` (which begins with '&').
/// Returns the decoded text and the number of bytes consumed.
fn decode_entity(s: &str) -> (String, usize) {
    const ENTITIES: [(&str, &str); 6] = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", " "),
    ];

    for (entity, decoded) in ENTITIES {
        if s.starts_with(entity) {
            return (decoded.to_string(), entity.len());
        }
    }
    ("&".to_string(), 1)
}
