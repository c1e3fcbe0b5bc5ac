use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use tv_alert_relay::config::Config;
use tv_alert_relay::core::trade_levels::{ReferenceLevels, TradeLevelCalculator, TradeSignal};
use tv_alert_relay::models::Direction;
use tv_alert_relay::notify::format::price;

const USAGE: &str = "usage: levels <long|short> <entry> <high> <low> [--poc X] [--vah X] [--val X] [--tick X]";

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (signal, tick) = parse_args(&args).context(USAGE)?;

    let calculator = TradeLevelCalculator::new(tick.unwrap_or(cfg.tick_size));

    println!("Direction:  {}", signal.direction.action());
    println!("Entry:      {}", price(signal.entry_price));
    println!("Bar:        H {} / L {}", price(signal.bar_high), price(signal.bar_low));
    println!("Tick:       {}", calculator.tick_size());
    println!();

    match calculator.compute(&signal) {
        Ok(levels) => {
            println!("SL:         {}", price(levels.stop));
            println!("TP1:        {}", price(levels.target1));
            println!("TP2:        {}", price(levels.target2));
            println!("RR:         {}:1", price(levels.risk_reward));
            println!("Targets:    {:?}", levels.target_source);
        }
        Err(rejection) => println!("REJECTED:   {}", rejection),
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<(TradeSignal, Option<f64>)> {
    if args.len() < 4 {
        bail!("expected direction, entry, high and low");
    }

    let direction = match args[0].to_lowercase().as_str() {
        "long" | "buy" => Direction::Long,
        "short" | "sell" => Direction::Short,
        other => bail!("unknown direction {other:?}"),
    };

    let number = |name: &str, raw: &str| -> Result<f64> {
        raw.parse::<f64>()
            .with_context(|| format!("{name} must be a number, got {raw:?}"))
    };

    let entry_price = number("entry", &args[1])?;
    let bar_high = number("high", &args[2])?;
    let bar_low = number("low", &args[3])?;

    let mut reference = ReferenceLevels::default();
    let mut tick = None;

    let mut rest = args[4..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .with_context(|| format!("{flag} needs a value"))?;
        let value = number(flag, value)?;
        match flag.as_str() {
            "--poc" => reference.point_of_control = Some(value),
            "--vah" => reference.value_area_high = Some(value),
            "--val" => reference.value_area_low = Some(value),
            "--tick" => tick = Some(value),
            other => bail!("unknown flag {other:?}"),
        }
    }

    Ok((
        TradeSignal {
            direction,
            entry_price,
            bar_high,
            bar_low,
            reference,
        },
        tick,
    ))
}
