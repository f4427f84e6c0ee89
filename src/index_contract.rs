// 5.0: index contract. a cash-settled contract on an index (SPX, NDX, ...).
// asset class, instrument class, inversion, multiplier, fees and margins are fixed;
// everything else is supplied by the caller and checked by validate_base.
// 5.1 mapping conversion, 5.2 foreign adoption.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

use crate::config::ConversionConfig;
use crate::enums::{AssetClass, InstrumentClass};
use crate::error::{InstrumentError, InstrumentResult};
use crate::foreign::ForeignInstrument;
use crate::identifiers::{InstrumentId, Symbol};
use crate::instrument::{validate_base, Instrument};
use crate::mapping::{
    check_known_keys, check_type_tag, get_info, get_precision, get_str, get_u64, info_value, keys,
    InstrumentMap,
};
use crate::types::{parse_price, parse_quantity, Currency, Price, Quantity, UnixNanos};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstrumentMap", into = "InstrumentMap")]
pub struct IndexContract {
    id: InstrumentId,
    raw_symbol: Symbol,
    currency: Currency,
    price_precision: u8,
    price_increment: Price,
    size_precision: u8,
    size_increment: Quantity,
    ts_event: UnixNanos,
    ts_init: UnixNanos,
    info: Option<InstrumentMap>,
}

impl IndexContract {
    pub const TYPE_NAME: &'static str = "IndexContract";

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: InstrumentId,
        raw_symbol: Symbol,
        currency: Currency,
        size_precision: u8,
        size_increment: Quantity,
        price_precision: u8,
        price_increment: Price,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
        info: Option<InstrumentMap>,
    ) -> InstrumentResult<Self> {
        validate_base(price_precision, price_increment, size_precision, size_increment)?;

        debug!(
            instrument_id = %id,
            price_increment = %price_increment,
            size_increment = %size_increment,
            "Index contract created"
        );

        Ok(Self {
            id,
            raw_symbol,
            currency,
            price_precision,
            price_increment,
            size_precision,
            size_increment,
            ts_event,
            ts_init,
            info,
        })
    }

    // 5.1: mapping -> contract. keys are read in schema order so the first bad one is reported.
    pub fn from_mapping_with_config(
        map: &InstrumentMap,
        config: &ConversionConfig,
    ) -> InstrumentResult<Self> {
        check_type_tag(map, Self::TYPE_NAME)?;
        if !config.allow_unknown_keys {
            check_known_keys(map)?;
        }

        let id: InstrumentId = get_str(map, keys::ID)?.parse()?;
        let raw_symbol = Symbol::new(get_str(map, keys::RAW_SYMBOL)?)
            .map_err(|e| e.with_field(keys::RAW_SYMBOL))?;
        let currency: Currency = get_str(map, keys::CURRENCY)?.parse()?;
        let price_precision = get_precision(map, keys::PRICE_PRECISION, config.max_precision)?;
        let price_increment = parse_price(
            keys::PRICE_INCREMENT,
            get_str(map, keys::PRICE_INCREMENT)?,
            price_precision,
        )?;
        let size_precision = get_precision(map, keys::SIZE_PRECISION, config.max_precision)?;
        let size_increment = parse_quantity(
            keys::SIZE_INCREMENT,
            get_str(map, keys::SIZE_INCREMENT)?,
            size_precision,
        )?;
        let ts_event = UnixNanos::new(get_u64(map, keys::TS_EVENT)?);
        let ts_init = UnixNanos::new(get_u64(map, keys::TS_INIT)?);
        let info = get_info(map)?;

        Self::new(
            id,
            raw_symbol,
            currency,
            size_precision,
            size_increment,
            price_precision,
            price_increment,
            ts_event,
            ts_init,
            info,
        )
    }

    // 5.2: foreign -> contract. raw integers are rescaled at the foreign object's own precision,
    // then the result goes through new() like any other construction.
    pub fn from_foreign_with_config<F: ForeignInstrument + ?Sized>(
        foreign: &F,
        config: &ConversionConfig,
    ) -> InstrumentResult<Self> {
        if foreign.type_name() != Self::TYPE_NAME {
            return Err(InstrumentError::parse(
                keys::TYPE,
                foreign.type_name(),
                format!("expected type tag '{}'", Self::TYPE_NAME),
            ));
        }

        let id: InstrumentId = foreign.id_value().parse()?;
        let raw_symbol =
            Symbol::new(foreign.id_symbol_value()).map_err(|e| e.with_field(keys::RAW_SYMBOL))?;
        let currency: Currency = foreign.quote_currency_code().parse()?;
        let price_precision = foreign.price_precision();
        let size_precision = foreign.size_precision();

        let (price_increment, size_increment) = if config.validate_foreign {
            (
                Price::from_raw(foreign.price_increment_raw(), price_precision)
                    .map_err(|e| e.with_field(keys::PRICE_INCREMENT))?,
                Quantity::from_raw(foreign.size_increment_raw(), size_precision)
                    .map_err(|e| e.with_field(keys::SIZE_INCREMENT))?,
            )
        } else {
            let price = Price::from_raw_rounded(foreign.price_increment_raw(), price_precision)
                .map_err(|e| e.with_field(keys::PRICE_INCREMENT))?;
            let size = Quantity::from_raw_rounded(foreign.size_increment_raw(), size_precision)
                .map_err(|e| e.with_field(keys::SIZE_INCREMENT))?;
            if price.raw() != foreign.price_increment_raw() || size.raw() != foreign.size_increment_raw() {
                warn!(
                    instrument_id = %id,
                    price_raw = foreign.price_increment_raw(),
                    size_raw = foreign.size_increment_raw(),
                    "Foreign increments off precision grid, rounded"
                );
            }
            (price, size)
        };

        Self::new(
            id,
            raw_symbol,
            currency,
            size_precision,
            size_increment,
            price_precision,
            price_increment,
            UnixNanos::new(foreign.ts_event()),
            UnixNanos::new(foreign.ts_init()),
            foreign.info().cloned(),
        )
    }
}

impl Instrument for IndexContract {
    fn id(&self) -> &InstrumentId {
        &self.id
    }

    fn raw_symbol(&self) -> &Symbol {
        &self.raw_symbol
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Index
    }

    fn instrument_class(&self) -> InstrumentClass {
        InstrumentClass::Future
    }

    fn quote_currency(&self) -> Currency {
        self.currency
    }

    fn is_inverse(&self) -> bool {
        false
    }

    fn price_precision(&self) -> u8 {
        self.price_precision
    }

    fn size_precision(&self) -> u8 {
        self.size_precision
    }

    fn price_increment(&self) -> Price {
        self.price_increment
    }

    fn size_increment(&self) -> Quantity {
        self.size_increment
    }

    fn multiplier(&self) -> Quantity {
        Quantity::ONE
    }

    fn margin_init(&self) -> Decimal {
        Decimal::ZERO
    }

    fn margin_maint(&self) -> Decimal {
        Decimal::ZERO
    }

    fn maker_fee(&self) -> Decimal {
        Decimal::ZERO
    }

    fn taker_fee(&self) -> Decimal {
        Decimal::ZERO
    }

    fn ts_event(&self) -> UnixNanos {
        self.ts_event
    }

    fn ts_init(&self) -> UnixNanos {
        self.ts_init
    }

    fn info(&self) -> Option<&InstrumentMap> {
        self.info.as_ref()
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn to_mapping(&self) -> InstrumentMap {
        let mut map = InstrumentMap::new();
        map.insert(keys::TYPE.to_string(), Value::from(Self::TYPE_NAME));
        map.insert(keys::ID.to_string(), Value::from(self.id.to_string()));
        map.insert(keys::RAW_SYMBOL.to_string(), Value::from(self.raw_symbol.as_str()));
        map.insert(keys::CURRENCY.to_string(), Value::from(self.currency.code()));
        map.insert(keys::PRICE_PRECISION.to_string(), Value::from(self.price_precision));
        map.insert(keys::PRICE_INCREMENT.to_string(), Value::from(self.price_increment.to_string()));
        map.insert(keys::SIZE_PRECISION.to_string(), Value::from(self.size_precision));
        map.insert(keys::SIZE_INCREMENT.to_string(), Value::from(self.size_increment.to_string()));
        map.insert(keys::TS_EVENT.to_string(), Value::from(self.ts_event.as_u64()));
        map.insert(keys::TS_INIT.to_string(), Value::from(self.ts_init.as_u64()));
        map.insert(keys::INFO.to_string(), info_value(self.info.as_ref()));
        map
    }

    fn from_mapping(map: &InstrumentMap) -> InstrumentResult<Self> {
        Self::from_mapping_with_config(map, &ConversionConfig::default())
    }

    fn from_foreign<F: ForeignInstrument + ?Sized>(foreign: &F) -> InstrumentResult<Self> {
        Self::from_foreign_with_config(foreign, &ConversionConfig::default())
    }
}

impl TryFrom<InstrumentMap> for IndexContract {
    type Error = InstrumentError;

    fn try_from(map: InstrumentMap) -> Result<Self, Self::Error> {
        Self::from_mapping(&map)
    }
}

impl From<IndexContract> for InstrumentMap {
    fn from(inst: IndexContract) -> Self {
        inst.to_mapping()
    }
}

// identity: two contracts with the same id are the same instrument
impl PartialEq for IndexContract {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IndexContract {}

impl Hash for IndexContract {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for IndexContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(id={}, tick={}, lot={}, currency={})",
            Self::TYPE_NAME,
            self.id,
            self.price_increment,
            self.size_increment,
            self.currency
        )
    }
}
