// 1.0: fixed-precision values. every numeric field of an instrument is one of these.
// raw integers are fixed point at FIXED_PRECISION digits; precision is the declared display scale.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{InstrumentError, InstrumentResult};

/// Decimal digits carried by every raw integer encoding.
pub const FIXED_PRECISION: u8 = 9;

/// 10^FIXED_PRECISION. one unit at precision 0 in raw form.
pub const FIXED_SCALAR: i64 = 1_000_000_000;

pub fn check_precision(field: &'static str, precision: u8) -> InstrumentResult<()> {
    if precision > FIXED_PRECISION {
        return Err(InstrumentError::validation(
            field,
            format!("precision {precision} exceeds maximum {FIXED_PRECISION}"),
        ));
    }
    Ok(())
}

// 1.1: decimal <-> raw. the decimal must already sit exactly on the precision grid.
fn decimal_to_raw(field: &'static str, value: Decimal, precision: u8) -> InstrumentResult<i128> {
    check_precision(field, precision)?;
    if value.round_dp(u32::from(precision)) != value {
        return Err(InstrumentError::validation(
            field,
            format!("{value} is not representable at precision {precision}"),
        ));
    }
    value
        .checked_mul(Decimal::from(FIXED_SCALAR))
        .and_then(|scaled| scaled.to_i128())
        .ok_or_else(|| InstrumentError::validation(field, format!("{value} exceeds the raw range")))
}

fn raw_to_decimal(raw: i128, precision: u8) -> Decimal {
    let mut value = Decimal::from_i128_with_scale(raw, u32::from(FIXED_PRECISION));
    value.rescale(u32::from(precision));
    value
}

// raw % 10^(9 - precision) == 0
fn check_raw_alignment(field: &'static str, raw: i128, precision: u8) -> InstrumentResult<()> {
    check_precision(field, precision)?;
    let step = 10i128.pow(u32::from(FIXED_PRECISION - precision));
    if raw % step != 0 {
        return Err(InstrumentError::validation(
            field,
            format!("raw value {raw} is not aligned to precision {precision}"),
        ));
    }
    Ok(())
}

fn round_raw(field: &'static str, raw: i128, precision: u8) -> InstrumentResult<i128> {
    check_precision(field, precision)?;
    let rounded = Decimal::from_i128_with_scale(raw, u32::from(FIXED_PRECISION))
        .round_dp_with_strategy(u32::from(precision), RoundingStrategy::MidpointAwayFromZero);
    decimal_to_raw(field, rounded, precision)
}

fn parse_decimal(field: &'static str, s: &str) -> InstrumentResult<Decimal> {
    Decimal::from_str(s.trim()).map_err(|e| InstrumentError::parse(field, s, e.to_string()))
}

// scale of a parsed literal, checked against FIXED_PRECISION
fn inferred_precision(field: &'static str, value: Decimal) -> InstrumentResult<u8> {
    let precision = u8::try_from(value.scale()).unwrap_or(u8::MAX);
    check_precision(field, precision)?;
    Ok(precision)
}

// 1.2: price. signed, so it can express negative spreads; instruments require a positive tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    raw: i64,
    precision: u8,
}

impl Price {
    pub fn new(value: Decimal, precision: u8) -> InstrumentResult<Self> {
        let raw = decimal_to_raw("price", value, precision)?;
        let raw = i64::try_from(raw).map_err(|_| {
            InstrumentError::validation("price", format!("{value} exceeds the raw range"))
        })?;
        Ok(Self { raw, precision })
    }

    /// Builds from the fixed-point encoding. The raw value must sit on the precision grid.
    pub fn from_raw(raw: i64, precision: u8) -> InstrumentResult<Self> {
        check_raw_alignment("price", i128::from(raw), precision)?;
        Ok(Self { raw, precision })
    }

    /// Builds from the fixed-point encoding, rounding off-grid digits (midpoint away from zero).
    pub fn from_raw_rounded(raw: i64, precision: u8) -> InstrumentResult<Self> {
        let rounded = round_raw("price", i128::from(raw), precision)?;
        let raw = i64::try_from(rounded).map_err(|_| {
            InstrumentError::validation("price", format!("raw value {raw} overflows after rounding"))
        })?;
        Ok(Self { raw, precision })
    }

    pub fn raw(&self) -> i64 {
        self.raw
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn as_decimal(&self) -> Decimal {
        raw_to_decimal(i128::from(self.raw), self.precision)
    }

    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

// precision is taken from the literal: "0.010" is precision 3
impl FromStr for Price {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_decimal("price", s)?;
        Self::new(value, inferred_precision("price", value)?)
    }
}

impl TryFrom<String> for Price {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

// 1.3: quantity. never negative; raw is unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    raw: u64,
    precision: u8,
}

impl Quantity {
    /// One unit at precision 0.
    pub const ONE: Quantity = Quantity {
        raw: FIXED_SCALAR as u64,
        precision: 0,
    };

    pub fn new(value: Decimal, precision: u8) -> InstrumentResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(InstrumentError::validation(
                "quantity",
                format!("{value} is negative"),
            ));
        }
        let raw = decimal_to_raw("quantity", value, precision)?;
        let raw = u64::try_from(raw).map_err(|_| {
            InstrumentError::validation("quantity", format!("{value} exceeds the raw range"))
        })?;
        Ok(Self { raw, precision })
    }

    pub fn from_raw(raw: u64, precision: u8) -> InstrumentResult<Self> {
        check_raw_alignment("quantity", i128::from(raw), precision)?;
        Ok(Self { raw, precision })
    }

    pub fn from_raw_rounded(raw: u64, precision: u8) -> InstrumentResult<Self> {
        let rounded = round_raw("quantity", i128::from(raw), precision)?;
        let raw = u64::try_from(rounded).map_err(|_| {
            InstrumentError::validation("quantity", format!("raw value {raw} overflows after rounding"))
        })?;
        Ok(Self { raw, precision })
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn as_decimal(&self) -> Decimal {
        raw_to_decimal(i128::from(self.raw), self.precision)
    }

    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl FromStr for Quantity {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_decimal("quantity", s)?;
        Self::new(value, inferred_precision("quantity", value)?)
    }
}

impl TryFrom<String> for Quantity {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_string()
    }
}

/// Parses a decimal string into a [`Price`] at an externally declared precision.
pub fn parse_price(field: &'static str, s: &str, precision: u8) -> InstrumentResult<Price> {
    let value = parse_decimal(field, s)?;
    Price::new(value, precision).map_err(|e| e.with_field(field))
}

/// Parses a decimal string into a [`Quantity`] at an externally declared precision.
pub fn parse_quantity(field: &'static str, s: &str, precision: u8) -> InstrumentResult<Quantity> {
    let value = parse_decimal(field, s)?;
    Quantity::new(value, precision).map_err(|e| e.with_field(field))
}

// 1.4: currency. only codes in the built-in table are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency {
    code: &'static str,
    precision: u8,
    name: &'static str,
}

impl Currency {
    pub const USD: Currency = Currency::new_static("USD", 2, "United States dollar");
    pub const EUR: Currency = Currency::new_static("EUR", 2, "Euro");
    pub const GBP: Currency = Currency::new_static("GBP", 2, "British pound");
    pub const JPY: Currency = Currency::new_static("JPY", 0, "Japanese yen");
    pub const CHF: Currency = Currency::new_static("CHF", 2, "Swiss franc");
    pub const AUD: Currency = Currency::new_static("AUD", 2, "Australian dollar");
    pub const CAD: Currency = Currency::new_static("CAD", 2, "Canadian dollar");
    pub const HKD: Currency = Currency::new_static("HKD", 2, "Hong Kong dollar");
    pub const BTC: Currency = Currency::new_static("BTC", 8, "Bitcoin");
    pub const ETH: Currency = Currency::new_static("ETH", 8, "Ether");
    pub const USDT: Currency = Currency::new_static("USDT", 8, "Tether");
    pub const USDC: Currency = Currency::new_static("USDC", 8, "USD Coin");

    const ALL: [Currency; 12] = [
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::JPY,
        Self::CHF,
        Self::AUD,
        Self::CAD,
        Self::HKD,
        Self::BTC,
        Self::ETH,
        Self::USDT,
        Self::USDC,
    ];

    const fn new_static(code: &'static str, precision: u8, name: &'static str) -> Self {
        Self {
            code,
            precision,
            name,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Currency {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(InstrumentError::parse(
                "currency",
                s,
                "expected an uppercase alphanumeric code",
            ));
        }
        Self::ALL
            .iter()
            .find(|c| c.code == s)
            .copied()
            .ok_or_else(|| InstrumentError::parse("currency", s, "unknown currency code"))
    }
}

impl TryFrom<String> for Currency {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code.to_string()
    }
}

// 1.5: nanosecond unix timestamp. opaque marker, no ordering rules between ts_event and ts_init.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixNanos(u64);

impl UnixNanos {
    pub fn new(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn now() -> Self {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self(u64::try_from(nanos).unwrap_or_default())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    // None past year 2262, where i64 nanos run out
    pub fn to_datetime_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.0)
            .ok()
            .map(chrono::DateTime::from_timestamp_nanos)
    }
}

impl From<u64> for UnixNanos {
    fn from(nanos: u64) -> Self {
        Self(nanos)
    }
}

impl From<UnixNanos> for u64 {
    fn from(nanos: UnixNanos) -> Self {
        nanos.0
    }
}

impl fmt::Display for UnixNanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
