//! Load articles from files or URLs and wrap them in a reader page shell.

use std::path::Path;

use crate::dom::parser::parse_html;
use crate::dom::shell::{reading_view, stream_view, ArticleSource};
use crate::dom::DomTree;
use crate::net::fetch::{fetch_url, is_remote};

/// Error while loading article sources
#[derive(Debug)]
pub struct LoadError {
    pub message: String,
    pub phase: &'static str,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

impl std::error::Error for LoadError {}

/// Parse a full HTML page into an article: the `<body>` children become
/// the article body, the `<title>` (or `fallback_title`) its title.
pub fn article_from_html(html: &str, url: &str, fallback_title: &str) -> ArticleSource {
    let dom = parse_html(html, url);
    let body_path = dom.body();
    let body = dom
        .node(&body_path)
        .map(|b| b.children.clone())
        .unwrap_or_default();
    let title = if dom.title.is_empty() {
        fallback_title.to_string()
    } else {
        dom.title.clone()
    };
    ArticleSource {
        title,
        url: url.to_string(),
        body,
    }
}

/// Read one source: an http(s) URL or a local file path.
pub fn load_article(source: &str) -> Result<ArticleSource, LoadError> {
    if is_remote(source) {
        let fetched = fetch_url(source).map_err(|e| LoadError {
            message: e.to_string(),
            phase: "fetch",
        })?;
        if !fetched.is_html() {
            log::warn!("{} is {}, parsing as HTML anyway", fetched.url, fetched.content_type);
        }
        return Ok(article_from_html(&fetched.html, &fetched.url, source));
    }

    let path = Path::new(source);
    let html = std::fs::read_to_string(path).map_err(|e| LoadError {
        message: format!("{}: {}", path.display(), e),
        phase: "read",
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    log::info!("read {} ({} bytes)", path.display(), html.len());
    Ok(article_from_html(&html, source, &name))
}

/// Build the page shell for `sources`: one source opens in reading mode,
/// several become a stream with the first entry expanded. Sources that fail
/// to load are skipped as long as at least one succeeds.
pub fn load_sources(sources: &[String]) -> Result<DomTree, LoadError> {
    if sources.is_empty() {
        return Err(LoadError {
            message: "no article sources given".to_string(),
            phase: "args",
        });
    }

    let mut articles = Vec::with_capacity(sources.len());
    let mut last_error = None;
    for source in sources {
        match load_article(source) {
            Ok(article) => articles.push(article),
            Err(e) => {
                log::warn!("skipping {}: {}", source, e);
                last_error = Some(e);
            }
        }
    }

    match articles.len() {
        0 => Err(last_error.unwrap_or(LoadError {
            message: "nothing loaded".to_string(),
            phase: "load",
        })),
        1 if sources.len() == 1 => Ok(reading_view(articles.remove(0))),
        _ => Ok(stream_view(articles)),
    }
}
