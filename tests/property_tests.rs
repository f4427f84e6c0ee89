//! Property-based tests for the conversion laws.
//!
//! These tests verify invariants hold under random inputs.

use instrument_core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

// Strategies for generating test data
fn symbol_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,5}"
}

fn venue_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2,5}"
}

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop::sample::select(vec![Currency::USD, Currency::EUR, Currency::JPY, Currency::HKD, Currency::USDT])
}

// (precision, tick in units of the last digit)
fn increment_strategy() -> impl Strategy<Value = (u8, i64)> {
    (0u8..=9u8, 1i64..100_000i64)
}

fn contract_strategy() -> impl Strategy<Value = IndexContract> {
    (
        symbol_strategy(),
        venue_strategy(),
        currency_strategy(),
        increment_strategy(),
        increment_strategy(),
        any::<u64>(),
        any::<u64>(),
        any::<bool>(),
        prop::option::of("[A-Z]{1,2}"),
    )
        .prop_map(|(symbol, venue, currency, (pp, tick), (sp, lot), ts_event, ts_init, with_info, suffix)| {
            let id = InstrumentId::new(Symbol::new(symbol.clone()).unwrap(), Venue::new(venue).unwrap());
            // venue-native ticker may differ from the id symbol ("SPX" vs "SPXW")
            let raw_symbol = match suffix {
                Some(suffix) => format!("{symbol}{suffix}"),
                None => symbol,
            };
            let info = with_info.then(|| {
                let mut info = InstrumentMap::new();
                info.insert("source".to_string(), json!("proptest"));
                info.insert("tick_units".to_string(), json!(tick));
                info
            });
            IndexContract::new(
                id,
                Symbol::new(raw_symbol).unwrap(),
                currency,
                sp,
                Quantity::new(Decimal::new(lot, u32::from(sp)), sp).unwrap(),
                pp,
                Price::new(Decimal::new(tick, u32::from(pp)), pp).unwrap(),
                UnixNanos::new(ts_event),
                UnixNanos::new(ts_init),
                info,
            )
            .unwrap()
        })
}

proptest! {
    /// from_mapping(to_mapping(x)) reproduces every field
    #[test]
    fn mapping_roundtrip(inst in contract_strategy()) {
        let back = IndexContract::from_mapping(&inst.to_mapping()).unwrap();
        prop_assert!(back.fields_eq(&inst));
        prop_assert_eq!(back.to_mapping(), inst.to_mapping());
    }

    /// Same law through JSON text, the way mappings are persisted
    #[test]
    fn json_text_roundtrip(inst in contract_strategy()) {
        let text = serde_json::to_string(&inst).unwrap();
        let back: IndexContract = serde_json::from_str(&text).unwrap();
        prop_assert!(back.fields_eq(&inst));
    }

    /// Export to the fixed-point layout and adopt it back. The layout carries no raw
    /// symbol, so the adopted contract takes it from the id.
    #[test]
    fn foreign_roundtrip(inst in contract_strategy()) {
        let raw = RawIndexContract::from(&inst);
        let id: InstrumentId = raw.id.value.parse().unwrap();
        prop_assert_eq!(id.symbol().as_str(), raw.id.symbol.value.as_str());

        let back = IndexContract::from_foreign(&raw).unwrap();
        prop_assert_eq!(back.raw_symbol(), inst.id().symbol());
        prop_assert_eq!(&back, &inst);
        prop_assert_eq!(back.price_increment(), inst.price_increment());
        prop_assert_eq!(back.size_increment(), inst.size_increment());
        prop_assert_eq!(back.quote_currency(), inst.quote_currency());
        prop_assert_eq!(back.ts_event(), inst.ts_event());
        prop_assert_eq!(back.ts_init(), inst.ts_init());
        prop_assert_eq!(back.info(), inst.info());
        if inst.raw_symbol() == inst.id().symbol() {
            prop_assert!(back.fields_eq(&inst));
        }
    }

    /// Every mapping carries the type tag of its variant
    #[test]
    fn mapping_has_type_tag(inst in contract_strategy()) {
        let map = inst.to_mapping();
        prop_assert_eq!(&map["type"], &json!("IndexContract"));
        let any = InstrumentAny::from_mapping_with_config(&map, &ConversionConfig::default()).unwrap();
        prop_assert_eq!(any.type_name(), IndexContract::TYPE_NAME);
    }

    /// Equality and hashing follow the id, whatever the other fields say
    #[test]
    fn identity_follows_id(a in contract_strategy(), b in contract_strategy()) {
        prop_assert_eq!(a == b, a.id() == b.id());

        let mut map = b.to_mapping();
        map.insert("id".to_string(), json!(a.id().to_string()));
        let b_as_a = IndexContract::from_mapping(&map).unwrap();
        prop_assert_eq!(&b_as_a, &a);
    }

    /// Non-positive ticks never produce an instrument
    #[test]
    fn non_positive_tick_rejected(inst in contract_strategy(), units in -1_000i64..=0i64) {
        let pp = inst.price_precision();
        let tick = Price::new(Decimal::new(units, u32::from(pp)), pp).unwrap();
        let result = IndexContract::new(
            inst.id().clone(),
            inst.raw_symbol().clone(),
            inst.quote_currency(),
            inst.size_precision(),
            inst.size_increment(),
            pp,
            tick,
            inst.ts_event(),
            inst.ts_init(),
            None,
        );
        let err = result.unwrap_err();
        prop_assert!(err.is_validation());
        prop_assert_eq!(err.field(), "price_increment");
    }

    /// Negative precisions in a mapping are validation errors, not parse errors
    #[test]
    fn negative_precision_rejected(inst in contract_strategy(), precision in i64::MIN..0i64, key_idx in 0usize..2) {
        let key = ["price_precision", "size_precision"][key_idx];
        let mut map = inst.to_mapping();
        map.insert(key.to_string(), json!(precision));
        let err = IndexContract::from_mapping(&map).unwrap_err();
        prop_assert!(err.is_validation());
        prop_assert_eq!(err.field(), key);
    }

    /// make_price always lands on the instrument grid
    #[test]
    fn make_price_on_grid(inst in contract_strategy(), mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..=12u32) {
        let price = inst.make_price(Decimal::new(mantissa, scale)).unwrap();
        prop_assert_eq!(price.precision(), inst.price_precision());
        let step = 10i64.pow(u32::from(FIXED_PRECISION - inst.price_precision()));
        prop_assert_eq!(price.raw() % step, 0);
    }
}
