use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub jwt_secret: String,
    pub public_origin: String,
    pub classifier_url: String,
    pub classifier_api_key: Option<String>,
    pub classifier_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("public_origin", &self.public_origin)
            .field("classifier_url", &self.classifier_url)
            .field(
                "classifier_api_key",
                &self.classifier_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("classifier_timeout_secs", &self.classifier_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()),
            public_origin: env::var("PUBLIC_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            classifier_url: env::var("CLASSIFIER_URL").unwrap_or_else(|_| "http://localhost:8080/classify".to_string()),
            classifier_api_key: env::var("CLASSIFIER_API_KEY").ok().filter(|k| !k.is_empty()),
            classifier_timeout_secs: env::var("CLASSIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
