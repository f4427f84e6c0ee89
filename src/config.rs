// 7.0 config.rs: conversion settings in one place. how strict mapping and foreign input is treated.
// 7.1 presets per environment, loaded from JSON when a deployment overrides them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::FIXED_PRECISION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    // Largest precision accepted from a mapping (never above FIXED_PRECISION)
    pub max_precision: u8,
    // Reject foreign raw increments that are off the declared precision grid.
    // When false they are rounded and a warning is logged.
    pub validate_foreign: bool,
    // Accept mapping keys outside the canonical schema
    pub allow_unknown_keys: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl ConversionConfig {
    pub fn strict() -> Self {
        Self {
            max_precision: FIXED_PRECISION,
            validate_foreign: true,
            allow_unknown_keys: false,
        }
    }

    // tolerant of newer writers adding keys and of foreign rounding noise
    pub fn lenient() -> Self {
        Self {
            max_precision: FIXED_PRECISION,
            validate_foreign: false,
            allow_unknown_keys: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_precision > FIXED_PRECISION {
            return Err(ConfigError::InvalidPrecision {
                max_precision: self.max_precision,
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing keys fall back to the strict preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_precision {max_precision} exceeds the fixed-point limit")]
    InvalidPrecision { max_precision: u8 },

    #[error("Malformed config: {0}")]
    Malformed(String),
}

// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn config(&self) -> ConversionConfig {
        match self {
            Environment::Development => ConversionConfig::lenient(),
            Environment::Production => ConversionConfig::strict(),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Malformed(format!("unknown environment '{other}'"))),
        }
    }
}
