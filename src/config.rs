use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::trade_levels::DEFAULT_TICK_SIZE;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub telegram_enabled: bool,
    pub telegram_api_url: String,

    // Instrument
    pub tick_size: f64,
    /// Used for missing high/low: entry ± offset.
    pub default_bar_offset: f64,

    // Server
    pub host: String,
    pub port: u16,

    // Display
    pub display_tz: String,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            telegram_chat_id: String::new(),
            telegram_enabled: true,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            tick_size: DEFAULT_TICK_SIZE,
            default_bar_offset: 2.0,
            host: "0.0.0.0".to_string(),
            port: 5000,
            display_tz: "UTC".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let env = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let tick_size = env("TICK_SIZE", "0.25")
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(defaults.tick_size);

        let default_bar_offset = env("DEFAULT_BAR_OFFSET", "2.0")
            .parse::<f64>()
            .ok()
            .filter(|o| o.is_finite() && *o >= 0.0)
            .unwrap_or(defaults.default_bar_offset);

        Config {
            telegram_token: env("TELEGRAM_TOKEN", ""),
            telegram_chat_id: env("TELEGRAM_CHAT_ID", ""),
            telegram_enabled: env("TELEGRAM_ENABLED", "true").to_lowercase() == "true",
            telegram_api_url: env("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL)
                .trim_end_matches('/')
                .to_string(),
            tick_size,
            default_bar_offset,
            host: env("HOST", &defaults.host),
            port: env("PORT", "5000").parse().unwrap_or(defaults.port),
            display_tz: env("DISPLAY_TZ", &defaults.display_tz),
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Zone for notification time stamps. Unknown names fall back to UTC.
    pub fn timezone(&self) -> Tz {
        self.display_tz.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown DISPLAY_TZ {:?}, using UTC", self.display_tz);
            Tz::UTC
        })
    }
}
