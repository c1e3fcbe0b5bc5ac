use chrono::{DateTime, TimeZone};

use crate::core::trade_levels::TradeLevels;
use crate::notify::OutboundMessage;

/// HTML entry card for an accepted signal.
pub fn entry_message<Tz>(ticker: &str, levels: &TradeLevels, at: &DateTime<Tz>) -> OutboundMessage
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let direction = levels.direction;
    let text = format!(
        "{emoji} <b>{action} {ticker}</b>\n\
         \n\
         💰 Entry: {entry}\n\
         🛑 SL: {sl}\n\
         🎯 TP1: {tp1}\n\
         🚀 TP2: {tp2}\n\
         \n\
         📊 RR: {rr}:1\n\
         ⏰ {time}",
        emoji = direction.emoji(),
        action = direction.action(),
        ticker = escape_html(ticker),
        entry = price(levels.entry),
        sl = price(levels.stop),
        tp1 = price(levels.target1),
        tp2 = price(levels.target2),
        rr = price(levels.risk_reward),
        time = at.format("%H:%M:%S"),
    );
    OutboundMessage::html(text)
}

/// Whole prices keep one decimal ("109.0").
pub fn price(value: f64) -> String {
    format!("{value:?}")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
