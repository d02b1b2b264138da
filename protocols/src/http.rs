//! # HTTP Metadata Probe
//!
//! Fetches the landing page of a port that is already known to be open and
//! pulls out the bits worth showing to a user: status, `<title>` and the
//! `Server` banner.
//!
//! Reading stops after [`MAX_BODY_BYTES`]. Callers are expected to treat any
//! error from here as "no metadata", never as "service down".

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{CONTENT_TYPE, SERVER};
use thiserror::Error;
use tracing::{debug, trace};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const MAX_BODY_BYTES: usize = 5_000;
pub const USER_AGENT: &str = concat!("lanseek/", env!("CARGO_PKG_VERSION"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>(.*?)</title>").expect("valid title pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// HTML document with a title.
    WebPage,
    /// Anything else that answered with an HTTP response.
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMetadata {
    pub status: u16,
    pub title: Option<String>,
    pub server: Option<String>,
    pub kind: ServiceKind,
}

impl ServiceMetadata {
    pub fn display_title(&self, port: u16) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Server at port {port}"))
    }
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub async fn fetch_metadata(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<ServiceMetadata, MetadataError> {
    let url = format!("http://{host}:{port}/");

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(MetadataError::Client)?;

    let mut response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| MetadataError::Request {
            url: url.clone(),
            source,
        })?;

    let status = response.status().as_u16();
    let server = header_value(&response, SERVER.as_str());
    let content_type = header_value(&response, CONTENT_TYPE.as_str());

    let mut body: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() >= MAX_BODY_BYTES {
                    trace!("Body of {url} truncated at {MAX_BODY_BYTES} bytes");
                    body.truncate(MAX_BODY_BYTES);
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading body of {url}: {e}");
                break;
            }
        }
    }

    let title = extract_title(&String::from_utf8_lossy(&body));
    let kind = classify(content_type.as_deref(), title.as_deref());
    debug!("{url} answered {status} ({kind:?})");

    Ok(ServiceMetadata {
        status,
        title,
        server,
        kind,
    })
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}

fn classify(content_type: Option<&str>, title: Option<&str>) -> ServiceKind {
    let is_html = content_type.is_none_or(|ct| ct.contains("html"));
    if is_html && title.is_some() {
        ServiceKind::WebPage
    } else {
        ServiceKind::Http
    }
}

/// Text of the first `<title>` element, trimmed and unescaped.
pub fn extract_title(html: &str) -> Option<String> {
    let title = TITLE_RE.captures(html)?.get(1)?.as_str().trim();
    if title.is_empty() {
        return None;
    }
    Some(unescape_html(title))
}

/// Decodes `&lt; &gt; &amp; &quot; &#039;` in one pass; other entities are kept.
pub fn unescape_html(s: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&#039;", '\''),
    ];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
