use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::trade_levels::{ReferenceLevels, Rejection, TradeLevelCalculator, TradeLevels, TradeSignal};
use crate::error::AppError;
use crate::models::{AlertKind, AlertPayload, Direction};
use crate::notify::format::entry_message;
use crate::notify::{Notifier, OutboundMessage};

/// Result of one processed alert.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    Entry(TradeLevels),
    Rejected(Rejection),
    Management,
    Unknown,
}

/// Applies the alert decision table and delivers the resulting notification.
pub struct AlertHandler {
    calculator: TradeLevelCalculator,
    notifier: Arc<dyn Notifier>,
    default_bar_offset: f64,
    tz: Tz,
}

impl AlertHandler {
    pub fn new(cfg: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            calculator: TradeLevelCalculator::from_config(cfg),
            notifier,
            default_bar_offset: cfg.default_bar_offset,
            tz: cfg.timezone(),
        }
    }

    pub async fn handle(&self, payload: &AlertPayload) -> Result<AlertOutcome, AppError> {
        let kind = payload.classify();
        info!(ticker = %payload.ticker, ?kind, "Alert received");

        match kind {
            AlertKind::Management => {
                self.notifier
                    .send(&OutboundMessage::plain(management_text(payload)))
                    .await?;
                Ok(AlertOutcome::Management)
            }
            AlertKind::Entry(direction) => self.handle_entry(payload, direction).await,
            AlertKind::Unknown => {
                warn!("Unrecognised alert message: {:?}", payload.message);
                Ok(AlertOutcome::Unknown)
            }
        }
    }

    async fn handle_entry(
        &self,
        payload: &AlertPayload,
        direction: Direction,
    ) -> Result<AlertOutcome, AppError> {
        let signal = match self.signal_from(payload, direction) {
            Some(signal) => signal,
            None => {
                let rejection = Rejection::InvalidInput("missing close price");
                info!(ticker = %payload.ticker, "Signal rejected: {}", rejection);
                return Ok(AlertOutcome::Rejected(rejection));
            }
        };

        let levels = match self.calculator.compute(&signal) {
            Ok(levels) => levels,
            Err(rejection) => {
                info!(ticker = %payload.ticker, %direction, "Signal rejected: {}", rejection);
                return Ok(AlertOutcome::Rejected(rejection));
            }
        };

        info!(
            ticker = %payload.ticker,
            %direction,
            entry = levels.entry,
            sl = levels.stop,
            tp1 = levels.target1,
            tp2 = levels.target2,
            rr = levels.risk_reward,
            targets = ?levels.target_source,
            "Signal accepted"
        );

        let now = Utc::now().with_timezone(&self.tz);
        self.notifier
            .send(&entry_message(&payload.ticker, &levels, &now))
            .await?;

        Ok(AlertOutcome::Entry(levels))
    }

    /// `None` when the alert carries no close price.
    fn signal_from(&self, payload: &AlertPayload, direction: Direction) -> Option<TradeSignal> {
        let entry_price = payload.close?;
        Some(TradeSignal {
            direction,
            entry_price,
            bar_high: payload.high.unwrap_or(entry_price + self.default_bar_offset),
            bar_low: payload.low.unwrap_or(entry_price - self.default_bar_offset),
            reference: ReferenceLevels {
                point_of_control: payload.poc,
                value_area_high: payload.vah,
                value_area_low: payload.val,
            },
        })
    }
}

/// The alert's own message, or "<TYPE> <ticker>" when an explicit
/// management type arrives with a blank message.
fn management_text(payload: &AlertPayload) -> String {
    match payload.alert_type {
        Some(alert_type) if payload.message.trim().is_empty() => {
            format!("{} {}", alert_type.to_string().to_uppercase(), payload.ticker)
        }
        _ => payload.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trade_levels::TargetSource;
    use crate::models::AlertType;
    use crate::notify::ParseMode;
    use crate::test_helpers::{default_test_config, RecordingNotifier};

    fn handler() -> (AlertHandler, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = AlertHandler::new(&default_test_config(), notifier.clone());
        (handler, notifier)
    }

    fn payload(message: &str, close: Option<f64>) -> AlertPayload {
        AlertPayload {
            ticker: "ES1!".to_string(),
            close,
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn management_alert_is_forwarded_verbatim() {
        let (handler, notifier) = handler();
        let outcome = handler
            .handle(&payload("TP1 hit on ES", None))
            .await
            .unwrap();
        assert_eq!(outcome, AlertOutcome::Management);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], OutboundMessage::plain("TP1 hit on ES"));
    }

    #[tokio::test]
    async fn blank_management_message_gets_type_and_ticker() {
        let (handler, notifier) = handler();
        let mut p = payload("  ", None);
        p.alert_type = Some(AlertType::Tp2);
        let outcome = handler.handle(&p).await.unwrap();
        assert_eq!(outcome, AlertOutcome::Management);
        assert_eq!(notifier.sent(), vec![OutboundMessage::plain("TP2 ES1!")]);
    }

    #[tokio::test]
    async fn entry_uses_default_bar_offset() {
        let (handler, notifier) = handler();
        let outcome = handler.handle(&payload("BUY", Some(100.0))).await.unwrap();
        match outcome {
            AlertOutcome::Entry(levels) => {
                // low defaults to 98
                assert_eq!(levels.stop, 97.75);
                assert_eq!(levels.target1, 104.5);
                assert_eq!(levels.target2, 109.0);
                assert_eq!(levels.target_source, TargetSource::RiskMultiple);
            }
            other => panic!("expected entry, got {other:?}"),
        }
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].parse_mode, Some(ParseMode::Html));
        assert!(sent[0].text.contains("BUY ES1!"));
    }

    #[tokio::test]
    async fn rejected_entry_sends_nothing() {
        let (handler, notifier) = handler();
        let mut p = payload("SELL", Some(100.0));
        p.high = Some(102.0);
        p.poc = Some(99.0);
        p.val = Some(97.0);
        let outcome = handler.handle(&p).await.unwrap();
        assert!(matches!(
            outcome,
            AlertOutcome::Rejected(Rejection::InsufficientReward { .. })
        ));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_close_is_rejected() {
        let (handler, notifier) = handler();
        let outcome = handler.handle(&payload("BUY", None)).await.unwrap();
        assert!(matches!(
            outcome,
            AlertOutcome::Rejected(Rejection::InvalidInput(_))
        ));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_alert_sends_nothing() {
        let (handler, notifier) = handler();
        let outcome = handler.handle(&payload("ping", Some(100.0))).await.unwrap();
        assert_eq!(outcome, AlertOutcome::Unknown);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_an_error() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let handler = AlertHandler::new(&default_test_config(), notifier);
        let result = handler.handle(&payload("BE reached", None)).await;
        assert!(matches!(result, Err(AppError::Notification(_))));
    }
}
