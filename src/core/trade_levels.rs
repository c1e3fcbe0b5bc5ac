use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::models::Direction;

/// Tick of the reference instrument (ES futures).
pub const DEFAULT_TICK_SIZE: f64 = 0.25;

const TP1_RISK_MULTIPLE: f64 = 2.0;
const TP2_RISK_MULTIPLE: f64 = 4.0;
const MIN_TP1_REWARD_TO_RISK: f64 = 1.0;

/// Volume-profile levels supplied with the alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLevels {
    pub point_of_control: Option<f64>,
    pub value_area_high: Option<f64>,
    pub value_area_low: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub direction: Direction,
    pub entry_price: f64,
    pub bar_high: f64,
    pub bar_low: f64,
    #[serde(default)]
    pub reference: ReferenceLevels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// POC then VAH (long) or VAL (short).
    Structure,
    /// 2R and 4R from entry.
    RiskMultiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub direction: Direction,
    pub entry: f64,
    pub stop: f64,
    pub target1: f64,
    pub target2: f64,
    /// TP2 reward over risk, one decimal. Display only.
    pub risk_reward: f64,
    pub target_source: TargetSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("degenerate bar: risk {risk} <= 0")]
    DegenerateRisk { risk: f64 },
    #[error("RR < 1:1")]
    InsufficientReward { reward: f64, risk: f64 },
}

impl Rejection {
    /// Reason reported to webhook callers for every rejection kind.
    pub const REPLY_REASON: &'static str = "RR < 1:1";
}

/// Stateless stop/target derivation for a single entry alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevelCalculator {
    tick_size: f64,
}

impl Default for TradeLevelCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_SIZE)
    }
}

impl TradeLevelCalculator {
    pub fn new(tick_size: f64) -> Self {
        let tick_size = if tick_size.is_finite() && tick_size > 0.0 {
            tick_size
        } else {
            DEFAULT_TICK_SIZE
        };
        Self { tick_size }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.tick_size)
    }

    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    pub fn compute(&self, signal: &TradeSignal) -> Result<TradeLevels, Rejection> {
        self.compute_levels(
            signal.direction,
            signal.entry_price,
            signal.bar_high,
            signal.bar_low,
            Some(&signal.reference),
        )
    }

    pub fn compute_levels(
        &self,
        direction: Direction,
        entry_price: f64,
        bar_high: f64,
        bar_low: f64,
        reference: Option<&ReferenceLevels>,
    ) -> Result<TradeLevels, Rejection> {
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(Rejection::InvalidInput("entry price must be a positive number"));
        }
        if !bar_high.is_finite() || !bar_low.is_finite() {
            return Err(Rejection::InvalidInput("bar high/low must be finite"));
        }

        // Risk uses the unrounded stop; rounding is applied on the way out.
        let stop = match direction {
            Direction::Long => bar_low - self.tick_size,
            Direction::Short => bar_high + self.tick_size,
        };
        let risk = direction.favourable_distance(stop, entry_price);
        if risk <= 0.0 {
            return Err(Rejection::DegenerateRisk { risk });
        }

        let (target1, target2, target_source) =
            match structure_targets(direction, entry_price, reference) {
                Some((t1, t2)) => (t1, t2, TargetSource::Structure),
                None => {
                    let t1 = entry_price + sign(direction) * risk * TP1_RISK_MULTIPLE;
                    let t2 = entry_price + sign(direction) * risk * TP2_RISK_MULTIPLE;
                    (t1, t2, TargetSource::RiskMultiple)
                }
            };

        let reward = direction.favourable_distance(entry_price, target1);
        if reward < risk * MIN_TP1_REWARD_TO_RISK {
            return Err(Rejection::InsufficientReward { reward, risk });
        }

        let stop = round2(stop);
        let target1 = round2(target1);
        let target2 = round2(target2);

        Ok(TradeLevels {
            direction,
            entry: entry_price,
            stop,
            target1,
            target2,
            risk_reward: risk_reward_ratio(direction, entry_price, stop, target2),
            target_source,
        })
    }
}

/// Structure targets apply only when POC sits beyond entry and the value-area
/// edge sits beyond POC, both in the trade's direction.
fn structure_targets(
    direction: Direction,
    entry: f64,
    reference: Option<&ReferenceLevels>,
) -> Option<(f64, f64)> {
    let reference = reference?;
    let poc = reference.point_of_control.filter(|v| v.is_finite())?;
    let edge = match direction {
        Direction::Long => reference.value_area_high,
        Direction::Short => reference.value_area_low,
    }
    .filter(|v| v.is_finite())?;

    let ordered = match direction {
        Direction::Long => poc > entry && edge > poc,
        Direction::Short => poc < entry && edge < poc,
    };
    ordered.then_some((poc, edge))
}

/// TP2 reward over risk measured against the rounded stop, one decimal.
/// Zero when the rounded stop leaves no risk.
pub fn risk_reward_ratio(direction: Direction, entry: f64, stop: f64, target2: f64) -> f64 {
    let risk = direction.favourable_distance(stop, entry);
    if risk <= 0.0 {
        return 0.0;
    }
    round1(direction.favourable_distance(entry, target2) / risk)
}

fn sign(direction: Direction) -> f64 {
    match direction {
        Direction::Long => 1.0,
        Direction::Short => -1.0,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}
