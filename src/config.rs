const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base address of the backend REST API, without a trailing slash.
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("ADMIN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}
