// 2.5: classification tags. fixed per variant, rendered SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InstrumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Fx,
    Equity,
    Commodity,
    Debt,
    Index,
    Cryptocurrency,
    Alternative,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Fx => "FX",
            AssetClass::Equity => "EQUITY",
            AssetClass::Commodity => "COMMODITY",
            AssetClass::Debt => "DEBT",
            AssetClass::Index => "INDEX",
            AssetClass::Cryptocurrency => "CRYPTOCURRENCY",
            AssetClass::Alternative => "ALTERNATIVE",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FX" => Ok(AssetClass::Fx),
            "EQUITY" => Ok(AssetClass::Equity),
            "COMMODITY" => Ok(AssetClass::Commodity),
            "DEBT" => Ok(AssetClass::Debt),
            "INDEX" => Ok(AssetClass::Index),
            "CRYPTOCURRENCY" => Ok(AssetClass::Cryptocurrency),
            "ALTERNATIVE" => Ok(AssetClass::Alternative),
            _ => Err(InstrumentError::parse("asset_class", s, "unknown asset class")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentClass {
    Spot,
    Swap,
    Future,
    FuturesSpread,
    Forward,
    Cfd,
    Bond,
    Option,
    OptionSpread,
    Warrant,
    SportsBetting,
}

impl InstrumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentClass::Spot => "SPOT",
            InstrumentClass::Swap => "SWAP",
            InstrumentClass::Future => "FUTURE",
            InstrumentClass::FuturesSpread => "FUTURES_SPREAD",
            InstrumentClass::Forward => "FORWARD",
            InstrumentClass::Cfd => "CFD",
            InstrumentClass::Bond => "BOND",
            InstrumentClass::Option => "OPTION",
            InstrumentClass::OptionSpread => "OPTION_SPREAD",
            InstrumentClass::Warrant => "WARRANT",
            InstrumentClass::SportsBetting => "SPORTS_BETTING",
        }
    }

    /// Classes that carry an expiration.
    pub fn is_expiring(&self) -> bool {
        matches!(
            self,
            InstrumentClass::Future
                | InstrumentClass::FuturesSpread
                | InstrumentClass::Option
                | InstrumentClass::OptionSpread
        )
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentClass {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPOT" => Ok(InstrumentClass::Spot),
            "SWAP" => Ok(InstrumentClass::Swap),
            "FUTURE" => Ok(InstrumentClass::Future),
            "FUTURES_SPREAD" => Ok(InstrumentClass::FuturesSpread),
            "FORWARD" => Ok(InstrumentClass::Forward),
            "CFD" => Ok(InstrumentClass::Cfd),
            "BOND" => Ok(InstrumentClass::Bond),
            "OPTION" => Ok(InstrumentClass::Option),
            "OPTION_SPREAD" => Ok(InstrumentClass::OptionSpread),
            "WARRANT" => Ok(InstrumentClass::Warrant),
            "SPORTS_BETTING" => Ok(InstrumentClass::SportsBetting),
            _ => Err(InstrumentError::parse(
                "instrument_class",
                s,
                "unknown instrument class",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde() {
        let json = serde_json::to_string(&InstrumentClass::FuturesSpread).unwrap();
        assert_eq!(json, format!("\"{}\"", InstrumentClass::FuturesSpread));

        let json = serde_json::to_string(&AssetClass::Index).unwrap();
        assert_eq!(json, "\"INDEX\"");
    }

    #[test]
    fn parse_roundtrip() {
        assert_eq!("INDEX".parse::<AssetClass>().unwrap(), AssetClass::Index);
        assert_eq!(
            "OPTION_SPREAD".parse::<InstrumentClass>().unwrap(),
            InstrumentClass::OptionSpread
        );
        assert!("index".parse::<AssetClass>().unwrap_err().is_parse());
    }

    #[test]
    fn expiring_classes() {
        assert!(InstrumentClass::Future.is_expiring());
        assert!(!InstrumentClass::Spot.is_expiring());
    }
}
