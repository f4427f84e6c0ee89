// 2.0: identifiers. validated string newtypes; InstrumentId is the identity key of every instrument.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{InstrumentError, InstrumentResult};

fn check_identifier(field: &'static str, value: &str) -> InstrumentResult<()> {
    if value.is_empty() {
        return Err(InstrumentError::parse(field, value, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(InstrumentError::parse(field, value, "must not contain whitespace"));
    }
    Ok(())
}

// 2.1: venue-native ticker, e.g. "SPX" or "ESZ4"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> InstrumentResult<Self> {
        let value = value.into();
        check_identifier("symbol", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

// 2.2: trading venue. no '.' allowed so that "SYMBOL.VENUE" splits unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Venue(String);

impl Venue {
    pub fn new(value: impl Into<String>) -> InstrumentResult<Self> {
        let value = value.into();
        check_identifier("venue", &value)?;
        if value.contains('.') {
            return Err(InstrumentError::parse("venue", value, "must not contain '.'"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Venue {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Venue {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Venue> for String {
    fn from(venue: Venue) -> Self {
        venue.0
    }
}

// 2.3: "SYMBOL.VENUE". split on the last '.', symbols may carry dots ("BRK.B.XNYS").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstrumentId {
    symbol: Symbol,
    venue: Venue,
}

impl InstrumentId {
    pub fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

impl FromStr for InstrumentId {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, venue) = s
            .rsplit_once('.')
            .ok_or_else(|| InstrumentError::parse("id", s, "expected SYMBOL.VENUE"))?;
        let symbol = Symbol::new(symbol).map_err(|e| e.with_field("id"))?;
        let venue = Venue::new(venue).map_err(|e| e.with_field("id"))?;
        Ok(Self { symbol, venue })
    }
}

impl TryFrom<String> for InstrumentId {
    type Error = InstrumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InstrumentId> for String {
    fn from(id: InstrumentId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_id_parse() {
        let id: InstrumentId = "SPX.CME".parse().unwrap();
        assert_eq!(id.symbol().as_str(), "SPX");
        assert_eq!(id.venue().as_str(), "CME");
        assert_eq!(id.to_string(), "SPX.CME");
    }

    #[test]
    fn instrument_id_splits_on_last_dot() {
        let id: InstrumentId = "BRK.B.XNYS".parse().unwrap();
        assert_eq!(id.symbol().as_str(), "BRK.B");
        assert_eq!(id.venue().as_str(), "XNYS");
    }

    #[test]
    fn instrument_id_malformed() {
        for bad in ["SPXCME", ".CME", "SPX.", "SP X.CME", ""] {
            let err = bad.parse::<InstrumentId>().unwrap_err();
            assert!(err.is_parse(), "{bad} should fail to parse");
            assert_eq!(err.field(), "id");
        }
    }

    #[test]
    fn symbol_rules() {
        assert!(Symbol::new("ESZ4").is_ok());
        assert!(Symbol::new("").unwrap_err().is_parse());
        assert!(Symbol::new("E S").unwrap_err().is_parse());
    }

    #[test]
    fn venue_rejects_dot() {
        assert!(Venue::new("CME.X").unwrap_err().is_parse());
    }

    #[test]
    fn serde_as_string() {
        let id: InstrumentId = "SPX.CME".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"SPX.CME\"");
        let back: InstrumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<InstrumentId>("\"nodot\"").is_err());
    }
}
