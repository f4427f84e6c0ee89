// 6.0: foreign runtime boundary. instruments built by a separate fixed-point implementation
// of the same model are read through ForeignInstrument and nothing else.
// 6.1 RawIndexContract mirrors the foreign object layout (raw integers at FIXED_PRECISION).

use crate::index_contract::IndexContract;
use crate::instrument::Instrument;
use crate::mapping::InstrumentMap;

/// The surface a foreign instrument object exposes.
///
/// Accessors are named after the foreign attribute paths (`id.value`, `id.symbol.value`,
/// `price_increment.raw`, ...). Raw values are fixed point at
/// [`FIXED_PRECISION`](crate::types::FIXED_PRECISION) digits and are interpreted with the
/// paired precision.
pub trait ForeignInstrument {
    /// Class name on the foreign side, matched against the variant type tags.
    fn type_name(&self) -> &str;
    fn id_value(&self) -> &str;
    fn id_symbol_value(&self) -> &str;
    fn quote_currency_code(&self) -> &str;
    fn price_precision(&self) -> u8;
    fn price_increment_raw(&self) -> i64;
    fn size_precision(&self) -> u8;
    fn size_increment_raw(&self) -> u64;
    fn ts_event(&self) -> u64;
    fn ts_init(&self) -> u64;
    fn info(&self) -> Option<&InstrumentMap>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSymbol {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstrumentId {
    pub value: String,
    pub symbol: RawSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCurrency {
    pub code: String,
    pub precision: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPrice {
    pub raw: i64,
    pub precision: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawQuantity {
    pub raw: u64,
    pub precision: u8,
}

/// Index contract as laid out by the fixed-point implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIndexContract {
    pub id: RawInstrumentId,
    pub quote_currency: RawCurrency,
    pub price_precision: u8,
    pub price_increment: RawPrice,
    pub size_precision: u8,
    pub size_increment: RawQuantity,
    pub ts_event: u64,
    pub ts_init: u64,
    pub info: Option<InstrumentMap>,
}

impl ForeignInstrument for RawIndexContract {
    fn type_name(&self) -> &str {
        IndexContract::TYPE_NAME
    }

    fn id_value(&self) -> &str {
        &self.id.value
    }

    fn id_symbol_value(&self) -> &str {
        &self.id.symbol.value
    }

    fn quote_currency_code(&self) -> &str {
        &self.quote_currency.code
    }

    fn price_precision(&self) -> u8 {
        self.price_precision
    }

    fn price_increment_raw(&self) -> i64 {
        self.price_increment.raw
    }

    fn size_precision(&self) -> u8 {
        self.size_precision
    }

    fn size_increment_raw(&self) -> u64 {
        self.size_increment.raw
    }

    fn ts_event(&self) -> u64 {
        self.ts_event
    }

    fn ts_init(&self) -> u64 {
        self.ts_init
    }

    fn info(&self) -> Option<&InstrumentMap> {
        self.info.as_ref()
    }
}

// export direction: hand a native contract to the fixed-point side.
// the layout has no raw symbol slot; id.symbol is the symbol half of id.value.
impl From<&IndexContract> for RawIndexContract {
    fn from(inst: &IndexContract) -> Self {
        let currency = inst.quote_currency();
        Self {
            id: RawInstrumentId {
                value: inst.id().to_string(),
                symbol: RawSymbol {
                    value: inst.id().symbol().to_string(),
                },
            },
            quote_currency: RawCurrency {
                code: currency.code().to_string(),
                precision: currency.precision(),
            },
            price_precision: inst.price_precision(),
            price_increment: RawPrice {
                raw: inst.price_increment().raw(),
                precision: inst.price_increment().precision(),
            },
            size_precision: inst.size_precision(),
            size_increment: RawQuantity {
                raw: inst.size_increment().raw(),
                precision: inst.size_increment().precision(),
            },
            ts_event: inst.ts_event().as_u64(),
            ts_init: inst.ts_init().as_u64(),
            info: inst.info().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, Price, Quantity, UnixNanos};
    use rust_decimal_macros::dec;

    #[test]
    fn export_carries_raw_encodings() {
        let inst = IndexContract::new(
            "SPX.CME".parse().unwrap(),
            "SPX".parse().unwrap(),
            Currency::USD,
            0,
            Quantity::new(dec!(1), 0).unwrap(),
            2,
            Price::new(dec!(0.05), 2).unwrap(),
            UnixNanos::new(7),
            UnixNanos::new(9),
            None,
        )
        .unwrap();

        let raw = RawIndexContract::from(&inst);
        assert_eq!(raw.id_value(), "SPX.CME");
        assert_eq!(raw.id_symbol_value(), "SPX");
        assert_eq!(raw.quote_currency_code(), "USD");
        assert_eq!(raw.price_increment_raw(), 50_000_000);
        assert_eq!(raw.size_increment_raw(), 1_000_000_000);
        assert_eq!(raw.ts_event(), 7);
        assert_eq!(raw.ts_init(), 9);
        assert_eq!(raw.type_name(), "IndexContract");
        assert!(raw.info().is_none());
    }

    #[test]
    fn export_id_symbol_is_half_of_id() {
        let inst = IndexContract::new(
            "SPX.CME".parse().unwrap(),
            "SPXW".parse().unwrap(),
            Currency::USD,
            0,
            Quantity::new(dec!(1), 0).unwrap(),
            2,
            Price::new(dec!(0.05), 2).unwrap(),
            UnixNanos::new(0),
            UnixNanos::new(0),
            None,
        )
        .unwrap();

        let raw = RawIndexContract::from(&inst);
        assert_eq!(raw.id.value, "SPX.CME");
        assert_eq!(raw.id.symbol.value, "SPX");

        // adoption takes the raw symbol from id.symbol
        let back = IndexContract::from_foreign(&raw).unwrap();
        assert_eq!(back, inst);
        assert_eq!(back.raw_symbol().as_str(), "SPX");
        assert!(!back.fields_eq(&inst));
    }
}
