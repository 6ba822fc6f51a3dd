/// Origin the page talks to when `API_BASE_URL` is not set at build time.
pub const DEFAULT_API_BASE_URL: &str = "https://pagina-web-finansas-b6474cfcee14.herokuapp.com";

/// API route configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_url(DEFAULT_API_BASE_URL)
    }
}

impl ApiConfig {
    /// Build from the `API_BASE_URL` environment variable captured at compile
    /// time, falling back to [`DEFAULT_API_BASE_URL`].
    pub fn new() -> Self {
        Self::from_url(option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Get a full API URL for a given path
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Current user's profile, used for both GET and PUT.
    pub fn me_url(&self) -> String {
        self.url("/auth/me/")
    }

    /// Turn a `profile_image` reference into something an `<img>` can load.
    /// Absolute `http(s)://` references pass through untouched; anything else
    /// is treated as a path on the API origin.
    pub fn resolve_image_url(&self, reference: &str) -> String {
        if is_absolute_http(reference) {
            return reference.to_string();
        }
        let separator = if reference.starts_with('/') { "" } else { "/" };
        format!("{}{}{}", self.base_url, separator, reference)
    }
}

fn is_absolute_http(reference: &str) -> bool {
    let lower = reference
        .get(..8)
        .unwrap_or(reference)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
