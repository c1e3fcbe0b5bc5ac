use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Direction;

/// Keywords marking a trade-management alert. Matched case-sensitively.
pub const MANAGEMENT_KEYWORDS: [&str; 4] = ["TP1", "TP2", "BE", "SL"];

const DEFAULT_TICKER: &str = "N/A";

/// Webhook body as sent by the charting platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPayload {
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub low: Option<f64>,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub vah: Option<f64>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub poc: Option<f64>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub val: Option<f64>,
    #[serde(default)]
    pub alert_type: Option<AlertType>,
}

fn default_ticker() -> String {
    DEFAULT_TICKER.to_string()
}

/// Explicit alert type, used instead of scanning `message` when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Buy,
    Sell,
    Tp1,
    Tp2,
    Be,
    Sl,
}

impl AlertType {
    pub fn is_management(&self) -> bool {
        matches!(self, AlertType::Tp1 | AlertType::Tp2 | AlertType::Be | AlertType::Sl)
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Buy => write!(f, "buy"),
            AlertType::Sell => write!(f, "sell"),
            AlertType::Tp1 => write!(f, "tp1"),
            AlertType::Tp2 => write!(f, "tp2"),
            AlertType::Be => write!(f, "be"),
            AlertType::Sl => write!(f, "sl"),
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(AlertType::Buy),
            "sell" => Ok(AlertType::Sell),
            "tp1" => Ok(AlertType::Tp1),
            "tp2" => Ok(AlertType::Tp2),
            "be" => Ok(AlertType::Be),
            "sl" => Ok(AlertType::Sl),
            other => Err(format!("unknown alert type: {other:?}")),
        }
    }
}

impl<'de> Deserialize<'de> for AlertType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// What an inbound alert asks the relay to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Forward the message verbatim, no level computation.
    Management,
    Entry(Direction),
    Unknown,
}

impl AlertPayload {
    /// Management wins over entry: a message carrying both a keyword and
    /// BUY/SELL is forwarded untouched.
    pub fn classify(&self) -> AlertKind {
        if let Some(alert_type) = self.alert_type {
            return match alert_type {
                AlertType::Buy => AlertKind::Entry(Direction::Long),
                AlertType::Sell => AlertKind::Entry(Direction::Short),
                _ => AlertKind::Management,
            };
        }

        if MANAGEMENT_KEYWORDS
            .iter()
            .any(|keyword| self.message.contains(keyword))
        {
            return AlertKind::Management;
        }

        let upper = self.message.to_uppercase();
        if upper.contains("BUY") {
            AlertKind::Entry(Direction::Long)
        } else if upper.contains("SELL") {
            AlertKind::Entry(Direction::Short)
        } else {
            AlertKind::Unknown
        }
    }
}

/// Accepts a JSON number, a numeric string, an empty string or null.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid number: {s:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_message(message: &str) -> AlertPayload {
        AlertPayload {
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn buy_and_sell_are_case_insensitive() {
        assert_eq!(
            with_message("Smart buy signal").classify(),
            AlertKind::Entry(Direction::Long)
        );
        assert_eq!(
            with_message("sell now").classify(),
            AlertKind::Entry(Direction::Short)
        );
    }

    #[test]
    fn management_keyword_beats_direction() {
        assert_eq!(with_message("BUY TP1 hit").classify(), AlertKind::Management);
        assert_eq!(with_message("Move SL to BE").classify(), AlertKind::Management);
    }

    #[test]
    fn management_keywords_are_case_sensitive() {
        // lowercase "be" inside a word does not count
        assert_eq!(
            with_message("buy before close").classify(),
            AlertKind::Entry(Direction::Long)
        );
    }

    #[test]
    fn unrecognised_message_is_unknown() {
        assert_eq!(with_message("hello").classify(), AlertKind::Unknown);
        assert_eq!(with_message("").classify(), AlertKind::Unknown);
    }

    #[test]
    fn explicit_alert_type_takes_precedence() {
        let mut payload = with_message("TP1 reached");
        payload.alert_type = Some(AlertType::Sell);
        assert_eq!(payload.classify(), AlertKind::Entry(Direction::Short));

        payload.alert_type = Some(AlertType::Be);
        payload.message = "BUY".to_string();
        assert_eq!(payload.classify(), AlertKind::Management);
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        let payload: AlertPayload = serde_json::from_str(
            r#"{"ticker":"ES1!","close":"5000.25","high":5001,"low":"","message":"BUY","poc":null}"#,
        )
        .unwrap();
        assert_eq!(payload.close, Some(5000.25));
        assert_eq!(payload.high, Some(5001.0));
        assert_eq!(payload.low, None);
        assert_eq!(payload.poc, None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let payload: AlertPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.ticker, "N/A");
        assert!(payload.message.is_empty());
        assert!(payload.close.is_none());
        assert!(payload.alert_type.is_none());
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let result = serde_json::from_str::<AlertPayload>(r#"{"close":"abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn alert_type_parses_any_case() {
        let payload: AlertPayload = serde_json::from_str(r#"{"alert_type":"TP2"}"#).unwrap();
        assert_eq!(payload.alert_type, Some(AlertType::Tp2));
        assert!(serde_json::from_str::<AlertPayload>(r#"{"alert_type":"hold"}"#).is_err());
    }
}
