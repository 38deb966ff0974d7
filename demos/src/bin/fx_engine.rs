// demos/src/bin/fx_engine.rs

use fx_matching_engine::codec::decode_snapshot;
use fx_matching_engine::{
    EngineConfig, EngineError, MarketDataSnapshot, MatchingEngine, Side, Symbol,
    setup_logger,
};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<(), EngineError> {
    // Set up logging
    setup_logger();
    info!("FX Matching Engine Demo");

    // Optional JSON configuration file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_file(&path)?,
        None => EngineConfig::default(),
    };
    info!("Configuration:\n{}", config.to_json_string()?);

    let engine = MatchingEngine::with_ipc(config)?;
    engine.start()?;

    // Prime the matching path before the real flow
    let warm_up_orders = engine.config().completion_threshold as usize;
    let completed = engine.warm_up(warm_up_orders, Symbol::EurUsd, 0)?;
    if !completed {
        warn!("Warm-up did not complete within the configured timeout");
    }
    let warm_up_trades = engine.drain_trades().len();
    let warm_up_acks = engine.drain_acks().len();
    info!(
        "Warm-up accepted {} orders and produced {} trades",
        warm_up_acks, warm_up_trades
    );

    demo_price_time_priority(&engine)?;
    demo_cancel_and_modify(&engine)?;

    // Give the publishers a chance to sweep the latest state
    thread::sleep(Duration::from_millis(20));
    engine.shutdown();

    display_trades(&engine);
    display_latest_market_data(&engine);
    Ok(())
}

fn demo_price_time_priority(engine: &MatchingEngine) -> Result<(), EngineError> {
    info!("\nPrice-time priority on GBP/USD");

    // Two bids at the same price, then a sell that crosses both
    engine.submit_order(Symbol::GbpUsd, Side::Buy, 127_000, 100, 1001)?;
    engine.submit_order(Symbol::GbpUsd, Side::Buy, 127_000, 50, 1002)?;
    engine.submit_order(Symbol::GbpUsd, Side::Buy, 126_990, 75, 1003)?;
    engine.submit_order(Symbol::GbpUsd, Side::Sell, 127_000, 120, 2001)?;
    engine.submit_order(Symbol::GbpUsd, Side::Sell, 127_020, 60, 2002)?;
    Ok(())
}

fn demo_cancel_and_modify(engine: &MatchingEngine) -> Result<(), EngineError> {
    info!("\nCancel and modify on USD/JPY");

    engine.submit_order(Symbol::UsdJpy, Side::Sell, 15_012_300, 40, 3001)?;
    engine.submit_order(Symbol::UsdJpy, Side::Sell, 15_012_400, 40, 3002)?;

    // Ids are assigned by the matching thread; wait for both acknowledgements
    let mut acks = Vec::new();
    for _ in 0..1_000 {
        acks.extend(engine.drain_acks());
        if acks.len() >= 7 {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    let usd_jpy: Vec<u64> = acks
        .iter()
        .filter(|ack| ack.symbol == Symbol::UsdJpy)
        .map(|ack| ack.order_id)
        .collect();
    if let &[first, second] = usd_jpy.as_slice() {
        info!("Cancelling order {} and halving order {}", first, second);
        engine.submit_cancel(Symbol::UsdJpy, first)?;
        engine.submit_modify(Symbol::UsdJpy, second, 15_012_400, 20)?;
    } else {
        warn!("Expected two USD/JPY acknowledgements, got {}", usd_jpy.len());
    }
    Ok(())
}

fn display_trades(engine: &MatchingEngine) {
    let trades = engine.drain_trades();
    info!("\nTrades ({}):", trades.len());
    for trade in trades {
        info!(
            "  {} {} {}@{} maker={} taker={}",
            trade.symbol,
            trade.taker_side,
            trade.quantity,
            trade.price,
            trade.maker_order_id,
            trade.taker_order_id
        );
    }
}

fn display_latest_market_data(engine: &MatchingEngine) {
    let outbound = engine.outbound();

    // Discard what the publishers streamed while running, then take one
    // fresh sweep of the final state
    let mut streamed = 0;
    loop {
        let polled = outbound.poll(&mut |_| {}, 256);
        if polled == 0 {
            break;
        }
        streamed += polled;
    }
    info!("\nPublishers streamed {} snapshots", streamed);
    engine.publish_sweep();

    let mut latest: Vec<MarketDataSnapshot> = Vec::new();
    outbound.poll(
        &mut |message| match decode_snapshot(message) {
            Ok(snapshot) => latest.push(snapshot),
            Err(err) => warn!("Undecodable market data: {}", err),
        },
        Symbol::ALL.len(),
    );

    latest.sort_by_key(|snapshot| snapshot.symbol);
    for snapshot in latest {
        info!("\nMarket data {}:", snapshot.symbol);
        for level in snapshot.asks.iter().rev() {
            info!(
                "  ASK {:>10} {:>8} ({} orders)",
                level.price, level.total_quantity, level.order_count
            );
        }
        for level in &snapshot.bids {
            info!(
                "  BID {:>10} {:>8} ({} orders)",
                level.price, level.total_quantity, level.order_count
            );
        }
        if let Some(spread) = snapshot.spread() {
            info!("  spread {}", spread);
        }
    }
}
