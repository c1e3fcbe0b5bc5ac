use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tv_alert_relay::config::Config;
use tv_alert_relay::notify::{Notifier, TelegramNotifier};
use tv_alert_relay::server::{self, AppState};
use tv_alert_relay::trading::AlertHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    info!("{}", "=".repeat(60));
    info!("TradingView alert relay starting up");
    info!("Tick size: {}", cfg.tick_size);
    info!("Display timezone: {}", cfg.timezone());

    let notifier = TelegramNotifier::new(&cfg).context("Failed to build Telegram client")?;
    if notifier.is_enabled() {
        info!("Telegram delivery: chat {}", cfg.telegram_chat_id);
    } else {
        warn!("Telegram is not configured (TELEGRAM_TOKEN / TELEGRAM_CHAT_ID); notifications will be skipped");
    }
    info!("{}", "=".repeat(60));

    let handler = AlertHandler::new(&cfg, Arc::new(notifier));
    let state = Arc::new(AppState::new(handler));

    server::serve(&cfg.bind_addr(), state).await?;

    info!("Relay stopped");
    Ok(())
}
