// 4.0: mapping representation. a flat JSON object used for persistence and messaging.
// 4.1 typed field extraction; every helper names the key it failed on.

use serde_json::Value;

use crate::error::{InstrumentError, InstrumentResult};
use crate::types::FIXED_PRECISION;

/// Key/value form of an instrument.
pub type InstrumentMap = serde_json::Map<String, Value>;

/// Canonical key names.
pub mod keys {
    pub const TYPE: &str = "type";
    pub const ID: &str = "id";
    pub const RAW_SYMBOL: &str = "raw_symbol";
    pub const CURRENCY: &str = "currency";
    pub const PRICE_PRECISION: &str = "price_precision";
    pub const PRICE_INCREMENT: &str = "price_increment";
    pub const SIZE_PRECISION: &str = "size_precision";
    pub const SIZE_INCREMENT: &str = "size_increment";
    pub const TS_EVENT: &str = "ts_event";
    pub const TS_INIT: &str = "ts_init";
    pub const INFO: &str = "info";
}

pub const CANONICAL_KEYS: [&str; 11] = [
    keys::TYPE,
    keys::ID,
    keys::RAW_SYMBOL,
    keys::CURRENCY,
    keys::PRICE_PRECISION,
    keys::PRICE_INCREMENT,
    keys::SIZE_PRECISION,
    keys::SIZE_INCREMENT,
    keys::TS_EVENT,
    keys::TS_INIT,
    keys::INFO,
];

pub fn require<'a>(map: &'a InstrumentMap, key: &'static str) -> InstrumentResult<&'a Value> {
    map.get(key).ok_or(InstrumentError::MissingField(key))
}

pub fn get_str<'a>(map: &'a InstrumentMap, key: &'static str) -> InstrumentResult<&'a str> {
    let value = require(map, key)?;
    value
        .as_str()
        .ok_or_else(|| InstrumentError::parse(key, value.to_string(), "expected a string"))
}

/// Reads a precision. Arrives signed so negative values surface as validation failures.
/// `max` is capped at [`FIXED_PRECISION`] whatever the caller passes.
pub fn get_precision(map: &InstrumentMap, key: &'static str, max: u8) -> InstrumentResult<u8> {
    let max = max.min(FIXED_PRECISION);
    let value = require(map, key)?;
    let precision = match (value.as_i64(), value.as_u64()) {
        (Some(precision), _) => precision,
        // integer, but past i64::MAX
        (None, Some(precision)) => {
            return Err(InstrumentError::validation(
                key,
                format!("must not exceed {max}, was {precision}"),
            ));
        }
        (None, None) => {
            return Err(InstrumentError::parse(key, value.to_string(), "expected an integer"));
        }
    };
    if precision < 0 {
        return Err(InstrumentError::validation(
            key,
            format!("must be non-negative, was {precision}"),
        ));
    }
    if precision > i64::from(max) {
        return Err(InstrumentError::validation(
            key,
            format!("must not exceed {max}, was {precision}"),
        ));
    }
    // bounded by max above
    Ok(precision as u8)
}

pub fn get_u64(map: &InstrumentMap, key: &'static str) -> InstrumentResult<u64> {
    let value = require(map, key)?;
    value.as_u64().ok_or_else(|| {
        InstrumentError::parse(key, value.to_string(), "expected an unsigned 64-bit integer")
    })
}

/// `info` may be absent, null or an object. The object is copied out of the mapping.
pub fn get_info(map: &InstrumentMap) -> InstrumentResult<Option<InstrumentMap>> {
    match map.get(keys::INFO) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(info)) => Ok(Some(info.clone())),
        Some(other) => Err(InstrumentError::parse(
            keys::INFO,
            other.to_string(),
            "expected an object or null",
        )),
    }
}

pub fn info_value(info: Option<&InstrumentMap>) -> Value {
    info.map_or(Value::Null, |info| Value::Object(info.clone()))
}

/// A present `type` tag must match; an absent one is accepted.
pub fn check_type_tag(map: &InstrumentMap, expected: &str) -> InstrumentResult<()> {
    match map.get(keys::TYPE) {
        None => Ok(()),
        Some(Value::String(tag)) if tag == expected => Ok(()),
        Some(other) => Err(InstrumentError::parse(
            keys::TYPE,
            other.as_str().map_or_else(|| other.to_string(), str::to_string),
            format!("expected type tag '{expected}'"),
        )),
    }
}

pub fn check_known_keys(map: &InstrumentMap) -> InstrumentResult<()> {
    match map.keys().find(|key| !CANONICAL_KEYS.contains(&key.as_str())) {
        Some(key) => Err(InstrumentError::validation(
            "mapping",
            format!("unexpected key '{key}'"),
        )),
        None => Ok(()),
    }
}
