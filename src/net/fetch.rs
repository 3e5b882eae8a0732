use url::Url;

/// Result of fetching a URL
#[derive(Clone)]
pub struct FetchResult {
    pub html: String,
    pub url: String,
    pub content_type: String,
}

/// Error during fetch
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

impl FetchResult {
    /// Whether the server labelled the body as HTML or XHTML.
    pub fn is_html(&self) -> bool {
        let mime = self.content_type.to_ascii_lowercase();
        mime.contains("html") || mime.contains("xml")
    }
}

/// Whether `source` names a web resource rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parse `url_str` as an http(s) URL.
pub fn normalize_url(url_str: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url_str.trim()).map_err(|e| FetchError {
        message: format!("Invalid URL: {}", e),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError {
            message: format!("Unsupported scheme: {}", other),
        }),
    }
}

/// Fetch an article page (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult, FetchError> {
    let parsed = normalize_url(url_str)?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("reader-outline/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError {
            message: format!("Client error: {}", e),
        })?;

    let response = client
        .get(parsed.as_str())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()
        .map_err(|e| FetchError {
            message: format!("Request failed: {}", e),
        })?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        return Err(FetchError {
            message: format!("HTTP {} for {}", status, parsed),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let final_url = response.url().to_string();

    let html = response.text().map_err(|e| FetchError {
        message: format!("Failed to read body: {}", e),
    })?;

    log::info!("fetched {} ({} bytes, {})", final_url, html.len(), content_type);

    Ok(FetchResult {
        html,
        url: final_url,
        content_type,
    })
}
