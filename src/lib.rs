// instrument-core: immutable, precision-exact instrument definitions.
// every instrument is validated on construction and never changes afterwards.
// three ways in: direct construction, a flat mapping, or a foreign fixed-point object.
//
// file map (search X.0 for structs, X.1+ for logic):
//   0.x  error.rs: InstrumentError (validation / parse / missing field)
//   1.x  types.rs: primitives: Price, Quantity, Currency, UnixNanos
//   2.x  identifiers.rs: Symbol, Venue, InstrumentId
//   2.5  enums.rs: AssetClass, InstrumentClass
//   3.x  instrument.rs: Instrument trait, base validation, InstrumentAny
//   4.x  mapping.rs: mapping schema keys and extraction helpers
//   5.x  index_contract.rs: IndexContract, mapping and foreign conversion
//   6.x  foreign.rs: ForeignInstrument boundary + raw fixed-point layout
//   7.x  config.rs: conversion strictness, env presets
//   8.x  cache.rs: instruments keyed by id

// core value types
pub mod enums;
pub mod error;
pub mod identifiers;
pub mod types;

// instruments
pub mod index_contract;
pub mod instrument;
pub mod mapping;

// integration modules
pub mod cache;
pub mod config;
pub mod foreign;

// re exports for convenience
pub use enums::*;
pub use error::*;
pub use identifiers::*;
pub use index_contract::IndexContract;
pub use instrument::{validate_base, Instrument, InstrumentAny};
pub use mapping::InstrumentMap;
pub use types::*;
pub use cache::InstrumentCache;
pub use config::{ConfigError, ConversionConfig, Environment};
pub use foreign::{ForeignInstrument, RawCurrency, RawIndexContract, RawInstrumentId, RawPrice, RawQuantity, RawSymbol};
