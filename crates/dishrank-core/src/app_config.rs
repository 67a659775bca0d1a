#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub places_api_key: String,
    pub places_base_url: String,
    pub extract_api_key: String,
    pub extract_base_url: String,
    pub extract_model: String,
    pub request_timeout_secs: u64,
    pub extract_max_concurrent: usize,
    pub cache_ttl_secs: u64,
    pub top_dishes: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("extract_api_key", &"[redacted]")
            .field("extract_base_url", &self.extract_base_url)
            .field("extract_model", &self.extract_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("extract_max_concurrent", &self.extract_max_concurrent)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("top_dishes", &self.top_dishes)
            .finish()
    }
}
