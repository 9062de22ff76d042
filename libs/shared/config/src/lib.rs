use std::env;
use tracing::warn;

/// Minimum length accepted for the JWT signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;
/// Minimum length accepted for the check-in digest secret. The same value
/// must be flashed onto every verifying device.
pub const MIN_CHECKIN_SECRET_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_api_url: String,
    pub storage_api_key: String,
    pub jwt_secret: String,
    pub checkin_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub bot_username: String,
    pub bot_password: String,
    pub device_username: String,
    pub device_password: String,
    pub token_ttl_hours: i64,
    pub api_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            storage_api_url: env::var("STORAGE_API_URL")
                .unwrap_or_else(|_| {
                    warn!("STORAGE_API_URL not set, falling back to in-memory storage");
                    String::new()
                }),
            storage_api_key: env::var("STORAGE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORAGE_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            checkin_secret: env::var("CHECKIN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("CHECKIN_SECRET not set, using empty value");
                    String::new()
                }),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD not set, admin login disabled");
                    String::new()
                }),
            bot_username: env::var("BOT_USERNAME").unwrap_or_else(|_| "bot".to_string()),
            bot_password: env::var("BOT_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("BOT_PASSWORD not set, bot login disabled");
                    String::new()
                }),
            device_username: env::var("DEVICE_USERNAME").unwrap_or_else(|_| "device".to_string()),
            device_password: env::var("DEVICE_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("DEVICE_PASSWORD not set, device login disabled");
                    String::new()
                }),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(720),
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing or weak environment variables");
        }

        config
    }

    /// Both secrets present at their minimum strength and every service
    /// identity has a password.
    pub fn is_configured(&self) -> bool {
        self.jwt_secret.len() >= MIN_JWT_SECRET_LEN
            && self.checkin_secret.len() >= MIN_CHECKIN_SECRET_LEN
            && !self.admin_password.is_empty()
            && !self.bot_password.is_empty()
            && !self.device_password.is_empty()
    }

    pub fn is_storage_configured(&self) -> bool {
        !self.storage_api_url.is_empty() && !self.storage_api_key.is_empty()
    }
}
