//! Instrument definition walkthrough.
//!
//! Builds an index contract directly, round-trips it through the mapping schema,
//! adopts one from the fixed-point layout, and shows the validation failures.
//! Set `INSTRUMENT_ENV=development` for the lenient conversion preset.

use instrument_core::*;
use rust_decimal_macros::dec;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let env = std::env::var("INSTRUMENT_ENV")
        .ok()
        .and_then(|s| s.parse::<Environment>().ok())
        .unwrap_or(Environment::Production);
    let config = env.config();
    info!(?env, ?config, "Conversion config selected");

    println!("Instrument Core Walkthrough\n");

    let spx = scenario_1_direct_construction();
    let map = scenario_2_to_mapping(&spx);
    scenario_3_from_mapping(&map, &config);
    scenario_4_foreign_adoption(&spx, &config);
    scenario_5_validation_failures();
    scenario_6_cache(&config);

    println!("\nAll scenarios completed.");
}

fn spx_contract() -> InstrumentResult<IndexContract> {
    IndexContract::new(
        "SPX.CME".parse()?,
        "SPX".parse()?,
        Currency::USD,
        0,
        Quantity::new(dec!(1), 0)?,
        2,
        Price::new(dec!(0.01), 2)?,
        UnixNanos::new(0),
        UnixNanos::new(0),
        None,
    )
}

/// Direct construction with the fixed contract attributes.
fn scenario_1_direct_construction() -> IndexContract {
    println!("Scenario 1: Direct Construction\n");

    let spx = spx_contract().unwrap();

    println!("  {}", spx);
    println!("  asset class: {}, instrument class: {}", spx.asset_class(), spx.instrument_class());
    println!("  multiplier: {}, inverse: {}", spx.multiplier(), spx.is_inverse());
    println!("  maker/taker fee: {}/{}", spx.maker_fee(), spx.taker_fee());
    println!("  make_price(4512.3456) = {}\n", spx.make_price(dec!(4512.3456)).unwrap());
    spx
}

/// Canonical mapping representation.
fn scenario_2_to_mapping(spx: &IndexContract) -> InstrumentMap {
    println!("Scenario 2: To Mapping\n");

    let map = spx.to_mapping();
    println!("  {}\n", serde_json::to_string_pretty(&map).unwrap());
    map
}

/// Mapping back to a contract, field for field.
fn scenario_3_from_mapping(map: &InstrumentMap, config: &ConversionConfig) {
    println!("Scenario 3: From Mapping\n");

    let back = IndexContract::from_mapping_with_config(map, config).unwrap();
    println!("  restored: {}", back);
    println!("  identical fields: {}", back.fields_eq(&spx_contract().unwrap()));

    let any = InstrumentAny::from_mapping_with_config(map, config).unwrap();
    println!("  dispatched on type tag '{}': {}\n", any.type_name(), any);
}

/// Adopting a contract from the fixed-point layout.
fn scenario_4_foreign_adoption(spx: &IndexContract, config: &ConversionConfig) {
    println!("Scenario 4: Foreign Adoption\n");

    let raw = RawIndexContract::from(spx);
    println!(
        "  raw tick {} at precision {}, raw lot {} at precision {}",
        raw.price_increment.raw, raw.price_precision, raw.size_increment.raw, raw.size_precision
    );

    let adopted = IndexContract::from_foreign_with_config(&raw, config).unwrap();
    println!("  adopted: {}", adopted);
    println!("  same instrument: {}", adopted == *spx);

    let mut noisy = raw.clone();
    noisy.price_increment.raw += 3;
    match IndexContract::from_foreign_with_config(&noisy, config) {
        Ok(inst) => println!("  off-grid tick rounded to {}\n", inst.price_increment()),
        Err(e) => println!("  off-grid tick rejected: {}\n", e),
    }
}

/// Every construction path rejects bad input with a specific error.
fn scenario_5_validation_failures() {
    println!("Scenario 5: Validation Failures\n");

    let zero_tick = IndexContract::new(
        "SPX.CME".parse().unwrap(),
        "SPX".parse().unwrap(),
        Currency::USD,
        0,
        Quantity::new(dec!(1), 0).unwrap(),
        2,
        Price::new(dec!(0), 2).unwrap(),
        UnixNanos::new(0),
        UnixNanos::new(0),
        None,
    );
    report("zero tick", zero_tick);

    let mut map = spx_contract().unwrap().to_mapping();
    map.remove("currency");
    report("missing currency", IndexContract::from_mapping(&map));

    let mut map = spx_contract().unwrap().to_mapping();
    map.insert("price_precision".to_string(), json!(-1));
    report("negative precision", IndexContract::from_mapping(&map));

    let mut map = spx_contract().unwrap().to_mapping();
    map.insert("currency".to_string(), json!("XYZ"));
    report("unknown currency", IndexContract::from_mapping(&map));
    println!();
}

fn report(label: &str, result: InstrumentResult<IndexContract>) {
    match result {
        Ok(inst) => println!("  {}: unexpectedly built {}", label, inst),
        Err(e) => {
            error!(field = e.field(), "{}", e);
            println!("  {}: {}", label, e);
        }
    }
}

/// Cache keyed by id, persisted as mappings.
fn scenario_6_cache(config: &ConversionConfig) {
    println!("Scenario 6: Instrument Cache\n");

    let mut cache = InstrumentCache::new();
    for (id, tick) in [("SPX.CME", dec!(0.25)), ("NDX.CME", dec!(0.25)), ("DJI.CBOT", dec!(1))] {
        let id: InstrumentId = id.parse().unwrap();
        let raw_symbol = id.symbol().clone();
        let contract = IndexContract::new(
            id,
            raw_symbol,
            Currency::USD,
            0,
            Quantity::new(dec!(1), 0).unwrap(),
            2,
            Price::new(tick, 2).unwrap(),
            UnixNanos::now(),
            UnixNanos::now(),
            None,
        )
        .unwrap();
        cache.add(contract);
    }

    let maps = cache.to_mappings();
    let mut restored = InstrumentCache::new();
    let loaded = restored.load_mappings(&maps, config).unwrap();

    println!("  cached: {}", cache.len());
    println!("  restored from mappings: {}", loaded);
    for id in restored.ids() {
        println!("    {}", restored.get(id).unwrap());
    }
}
