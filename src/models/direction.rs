use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl Direction {
    /// Order side shown to the trader.
    pub fn action(&self) -> &'static str {
        match self {
            Direction::Long => "BUY",
            Direction::Short => "SELL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Long => "🟢",
            Direction::Short => "🔴",
        }
    }

    /// Distance from `from` to `to` measured in the trade's favour.
    pub fn favourable_distance(&self, from: f64, to: f64) -> f64 {
        match self {
            Direction::Long => to - from,
            Direction::Short => from - to,
        }
    }
}
