// 3.0: instrument base contract. the Instrument trait is the capability set every variant
// implements; validate_base holds the invariants shared by all of them.
// 3.1 InstrumentAny is the tagged union used when the concrete variant is only known at runtime.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::ConversionConfig;
use crate::enums::{AssetClass, InstrumentClass};
use crate::error::{InstrumentError, InstrumentResult};
use crate::foreign::ForeignInstrument;
use crate::identifiers::{InstrumentId, Symbol, Venue};
use crate::index_contract::IndexContract;
use crate::mapping::{get_str, keys, InstrumentMap};
use crate::types::{check_precision, Currency, Price, Quantity, UnixNanos};

/// Static metadata of a tradable product.
///
/// Implementors are immutable after construction and compare by [`Instrument::id`] only.
pub trait Instrument: Send + Sync {
    fn id(&self) -> &InstrumentId;

    fn symbol(&self) -> &Symbol {
        self.id().symbol()
    }

    fn venue(&self) -> &Venue {
        self.id().venue()
    }

    fn raw_symbol(&self) -> &Symbol;
    fn asset_class(&self) -> AssetClass;
    fn instrument_class(&self) -> InstrumentClass;
    fn quote_currency(&self) -> Currency;
    fn is_inverse(&self) -> bool;
    fn price_precision(&self) -> u8;
    fn size_precision(&self) -> u8;
    fn price_increment(&self) -> Price;
    fn size_increment(&self) -> Quantity;
    fn multiplier(&self) -> Quantity;
    fn margin_init(&self) -> Decimal;
    fn margin_maint(&self) -> Decimal;
    fn maker_fee(&self) -> Decimal;
    fn taker_fee(&self) -> Decimal;
    fn ts_event(&self) -> UnixNanos;
    fn ts_init(&self) -> UnixNanos;
    fn info(&self) -> Option<&InstrumentMap>;

    /// Discriminator written under the `type` key.
    fn type_name(&self) -> &'static str;

    fn to_mapping(&self) -> InstrumentMap;

    fn from_mapping(map: &InstrumentMap) -> InstrumentResult<Self>
    where
        Self: Sized;

    fn from_foreign<F: ForeignInstrument + ?Sized>(foreign: &F) -> InstrumentResult<Self>
    where
        Self: Sized;

    /// Rounds `value` onto the price grid of this instrument (midpoint away from zero).
    fn make_price(&self, value: Decimal) -> InstrumentResult<Price> {
        let precision = self.price_precision();
        let rounded = value
            .round_dp_with_strategy(u32::from(precision), RoundingStrategy::MidpointAwayFromZero);
        Price::new(rounded, precision)
    }

    /// Rounds `value` onto the size grid of this instrument (midpoint away from zero).
    fn make_qty(&self, value: Decimal) -> InstrumentResult<Quantity> {
        let precision = self.size_precision();
        let rounded = value
            .round_dp_with_strategy(u32::from(precision), RoundingStrategy::MidpointAwayFromZero);
        Quantity::new(rounded, precision)
    }

    fn is_same_instrument(&self, other: &dyn Instrument) -> bool {
        self.id() == other.id()
    }

    /// Field-by-field comparison, unlike `==` which looks at the id alone.
    fn fields_eq(&self, other: &dyn Instrument) -> bool {
        self.type_name() == other.type_name()
            && self.id() == other.id()
            && self.raw_symbol() == other.raw_symbol()
            && self.asset_class() == other.asset_class()
            && self.instrument_class() == other.instrument_class()
            && self.quote_currency() == other.quote_currency()
            && self.is_inverse() == other.is_inverse()
            && self.price_precision() == other.price_precision()
            && self.size_precision() == other.size_precision()
            && self.price_increment() == other.price_increment()
            && self.size_increment() == other.size_increment()
            && self.multiplier() == other.multiplier()
            && self.margin_init() == other.margin_init()
            && self.margin_maint() == other.margin_maint()
            && self.maker_fee() == other.maker_fee()
            && self.taker_fee() == other.taker_fee()
            && self.ts_event() == other.ts_event()
            && self.ts_init() == other.ts_init()
            && self.info() == other.info()
    }
}

/// Invariants every instrument checks before it exists.
pub fn validate_base(
    price_precision: u8,
    price_increment: Price,
    size_precision: u8,
    size_increment: Quantity,
) -> InstrumentResult<()> {
    check_precision("price_precision", price_precision)?;
    check_precision("size_precision", size_precision)?;

    if !price_increment.is_positive() {
        return Err(InstrumentError::validation(
            "price_increment",
            format!("must be positive, was {price_increment}"),
        ));
    }
    if price_increment.precision() != price_precision {
        return Err(InstrumentError::validation(
            "price_increment",
            format!(
                "precision {} does not match price_precision {price_precision}",
                price_increment.precision()
            ),
        ));
    }

    if !size_increment.is_positive() {
        return Err(InstrumentError::validation(
            "size_increment",
            format!("must be positive, was {size_increment}"),
        ));
    }
    if size_increment.precision() != size_precision {
        return Err(InstrumentError::validation(
            "size_increment",
            format!(
                "precision {} does not match size_precision {size_precision}",
                size_increment.precision()
            ),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstrumentMap", into = "InstrumentMap")]
pub enum InstrumentAny {
    IndexContract(IndexContract),
}

impl InstrumentAny {
    /// Selects the variant from the `type` tag and decodes the rest with it.
    pub fn from_mapping_with_config(
        map: &InstrumentMap,
        config: &ConversionConfig,
    ) -> InstrumentResult<Self> {
        let tag = get_str(map, keys::TYPE)?;
        match tag {
            IndexContract::TYPE_NAME => {
                IndexContract::from_mapping_with_config(map, config).map(Self::IndexContract)
            }
            other => Err(InstrumentError::parse(
                keys::TYPE,
                other,
                "unknown instrument type",
            )),
        }
    }

    pub fn from_foreign_with_config<F: ForeignInstrument + ?Sized>(
        foreign: &F,
        config: &ConversionConfig,
    ) -> InstrumentResult<Self> {
        match foreign.type_name() {
            IndexContract::TYPE_NAME => {
                IndexContract::from_foreign_with_config(foreign, config).map(Self::IndexContract)
            }
            other => Err(InstrumentError::parse(
                keys::TYPE,
                other,
                "unknown instrument type",
            )),
        }
    }

    fn inner(&self) -> &dyn Instrument {
        match self {
            InstrumentAny::IndexContract(inst) => inst,
        }
    }
}

impl Instrument for InstrumentAny {
    fn id(&self) -> &InstrumentId {
        self.inner().id()
    }

    fn raw_symbol(&self) -> &Symbol {
        self.inner().raw_symbol()
    }

    fn asset_class(&self) -> AssetClass {
        self.inner().asset_class()
    }

    fn instrument_class(&self) -> InstrumentClass {
        self.inner().instrument_class()
    }

    fn quote_currency(&self) -> Currency {
        self.inner().quote_currency()
    }

    fn is_inverse(&self) -> bool {
        self.inner().is_inverse()
    }

    fn price_precision(&self) -> u8 {
        self.inner().price_precision()
    }

    fn size_precision(&self) -> u8 {
        self.inner().size_precision()
    }

    fn price_increment(&self) -> Price {
        self.inner().price_increment()
    }

    fn size_increment(&self) -> Quantity {
        self.inner().size_increment()
    }

    fn multiplier(&self) -> Quantity {
        self.inner().multiplier()
    }

    fn margin_init(&self) -> Decimal {
        self.inner().margin_init()
    }

    fn margin_maint(&self) -> Decimal {
        self.inner().margin_maint()
    }

    fn maker_fee(&self) -> Decimal {
        self.inner().maker_fee()
    }

    fn taker_fee(&self) -> Decimal {
        self.inner().taker_fee()
    }

    fn ts_event(&self) -> UnixNanos {
        self.inner().ts_event()
    }

    fn ts_init(&self) -> UnixNanos {
        self.inner().ts_init()
    }

    fn info(&self) -> Option<&InstrumentMap> {
        self.inner().info()
    }

    fn type_name(&self) -> &'static str {
        self.inner().type_name()
    }

    fn to_mapping(&self) -> InstrumentMap {
        self.inner().to_mapping()
    }

    fn from_mapping(map: &InstrumentMap) -> InstrumentResult<Self> {
        Self::from_mapping_with_config(map, &ConversionConfig::default())
    }

    fn from_foreign<F: ForeignInstrument + ?Sized>(foreign: &F) -> InstrumentResult<Self> {
        Self::from_foreign_with_config(foreign, &ConversionConfig::default())
    }
}

impl From<IndexContract> for InstrumentAny {
    fn from(inst: IndexContract) -> Self {
        InstrumentAny::IndexContract(inst)
    }
}

impl TryFrom<InstrumentMap> for InstrumentAny {
    type Error = InstrumentError;

    fn try_from(map: InstrumentMap) -> Result<Self, Self::Error> {
        Self::from_mapping(&map)
    }
}

impl From<InstrumentAny> for InstrumentMap {
    fn from(inst: InstrumentAny) -> Self {
        inst.to_mapping()
    }
}

impl PartialEq for InstrumentAny {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for InstrumentAny {}

impl Hash for InstrumentAny {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for InstrumentAny {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentAny::IndexContract(inst) => fmt::Display::fmt(inst, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn spx() -> IndexContract {
        IndexContract::new(
            "SPX.CME".parse().unwrap(),
            Symbol::new("SPX").unwrap(),
            Currency::USD,
            0,
            Quantity::new(dec!(1), 0).unwrap(),
            2,
            Price::new(dec!(0.01), 2).unwrap(),
            UnixNanos::new(0),
            UnixNanos::new(0),
            None,
        )
        .unwrap()
    }

    fn as_map(value: serde_json::Value) -> InstrumentMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn validate_base_accepts_valid_fields() {
        let result = validate_base(
            2,
            Price::new(dec!(0.25), 2).unwrap(),
            1,
            Quantity::new(dec!(0.1), 1).unwrap(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn validate_base_rejects_zero_tick() {
        let err = validate_base(
            2,
            Price::new(dec!(0), 2).unwrap(),
            0,
            Quantity::new(dec!(1), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "price_increment");
        assert!(err.is_validation());
    }

    #[test]
    fn validate_base_rejects_negative_tick() {
        let err = validate_base(
            2,
            Price::new(dec!(-0.01), 2).unwrap(),
            0,
            Quantity::new(dec!(1), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "price_increment");
    }

    #[test]
    fn validate_base_rejects_zero_lot() {
        let err = validate_base(
            2,
            Price::new(dec!(0.01), 2).unwrap(),
            0,
            Quantity::new(dec!(0), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "size_increment");
    }

    #[test]
    fn validate_base_rejects_precision_mismatch() {
        let err = validate_base(
            3,
            Price::new(dec!(0.01), 2).unwrap(),
            0,
            Quantity::new(dec!(1), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "price_increment");

        let err = validate_base(
            2,
            Price::new(dec!(0.01), 2).unwrap(),
            2,
            Quantity::new(dec!(1), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "size_increment");
    }

    #[test]
    fn validate_base_rejects_excess_precision() {
        let err = validate_base(
            10,
            Price::new(dec!(0.01), 2).unwrap(),
            0,
            Quantity::new(dec!(1), 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "price_precision");
    }

    #[test]
    fn make_price_rounds_to_tick_precision() {
        let inst = spx();
        assert_eq!(inst.make_price(dec!(4500.125)).unwrap().to_string(), "4500.13");
        assert_eq!(inst.make_qty(dec!(2.4)).unwrap().to_string(), "2");
        assert!(inst.make_qty(dec!(-1)).unwrap_err().is_validation());
    }

    #[test]
    fn any_dispatches_on_type_tag() {
        let inst = spx();
        let any = InstrumentAny::from_mapping(&inst.to_mapping()).unwrap();
        assert_eq!(any.type_name(), "IndexContract");
        assert!(any.fields_eq(&inst));
        assert!(matches!(any, InstrumentAny::IndexContract(_)));
    }

    #[test]
    fn any_requires_type_tag() {
        let mut map = spx().to_mapping();
        map.remove("type");
        assert_eq!(
            InstrumentAny::from_mapping(&map),
            Err(InstrumentError::MissingField("type"))
        );
    }

    #[test]
    fn any_rejects_unknown_type() {
        let map = as_map(json!({"type": "Betting"}));
        let err = InstrumentAny::from_mapping(&map).unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.field(), "type");
    }

    #[test]
    fn any_identity_equality() {
        let a: InstrumentAny = spx().into();
        let b = a.clone();
        assert_eq!(a, b);
        assert!(a.is_same_instrument(&spx()));
    }

    #[test]
    fn any_serde_uses_mapping_schema() {
        let any: InstrumentAny = spx().into();
        let json = serde_json::to_value(&any).unwrap();
        assert_eq!(json["type"], "IndexContract");
        let back: InstrumentAny = serde_json::from_value(json).unwrap();
        assert!(back.fields_eq(&any));
    }
}
