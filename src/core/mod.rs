pub mod trade_levels;

pub use trade_levels::{
    ReferenceLevels, Rejection, TargetSource, TradeLevelCalculator, TradeLevels, TradeSignal,
};
