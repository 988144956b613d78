use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Pallet;

/// Pallet geometry plus the height limits to evaluate, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalletConfig {
    #[serde(default = "PalletConfig::default_length")]
    pub length: u32,
    #[serde(default = "PalletConfig::default_width")]
    pub width: u32,
    #[serde(default = "PalletConfig::default_overhang")]
    pub overhang: u32,
    #[serde(default = "PalletConfig::default_height_limits")]
    pub height_limits: Vec<u32>,
}

impl PalletConfig {
    pub const DEFAULT_LENGTH: u32 = 1200;
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_OVERHANG: u32 = 30;
    pub const DEFAULT_HEIGHT_LIMITS: [u32; 2] = [1800, 1700];

    const LENGTH_VAR: &'static str = "PALLET_LENGTH";
    const WIDTH_VAR: &'static str = "PALLET_WIDTH";
    const OVERHANG_VAR: &'static str = "PALLET_OVERHANG";
    const HEIGHT_LIMITS_VAR: &'static str = "PALLET_HEIGHT_LIMITS";

    fn default_length() -> u32 {
        Self::DEFAULT_LENGTH
    }

    fn default_width() -> u32 {
        Self::DEFAULT_WIDTH
    }

    fn default_overhang() -> u32 {
        Self::DEFAULT_OVERHANG
    }

    fn default_height_limits() -> Vec<u32> {
        Self::DEFAULT_HEIGHT_LIMITS.to_vec()
    }

    /// Defaults overridden by `PALLET_*` environment variables. Values that
    /// do not parse or are zero are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`PalletConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let length = load_with_warning(
            Self::LENGTH_VAR,
            read(Self::LENGTH_VAR),
            defaults.length,
            |v| v > 0,
        );
        let width = load_with_warning(
            Self::WIDTH_VAR,
            read(Self::WIDTH_VAR),
            defaults.width,
            |v| v > 0,
        );
        let overhang = load_with_warning(
            Self::OVERHANG_VAR,
            read(Self::OVERHANG_VAR),
            defaults.overhang,
            |_| true,
        );

        let height_limits = match read(Self::HEIGHT_LIMITS_VAR) {
            Some(raw) => match parse_height_limits(&raw) {
                Ok(limits) => limits,
                Err(err) => {
                    tracing::warn!(
                        var = Self::HEIGHT_LIMITS_VAR,
                        value = %raw,
                        "{err}, using defaults"
                    );
                    defaults.height_limits
                }
            },
            None => defaults.height_limits,
        };

        Self {
            length,
            width,
            overhang,
            height_limits,
        }
    }

    pub fn pallet(&self) -> Pallet {
        Pallet::new(self.length, self.width, self.overhang)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.length == 0 || self.width == 0 {
            return Err("pallet dimensions must be non-zero".to_string());
        }
        if self.height_limits.is_empty() {
            return Err("at least one height limit is required".to_string());
        }
        if self.height_limits.contains(&0) {
            return Err("height limits must be non-zero".to_string());
        }
        for (i, limit) in self.height_limits.iter().enumerate() {
            if self.height_limits[..i].contains(limit) {
                return Err(format!("height limit {} is listed twice", limit));
            }
        }
        Ok(())
    }
}

impl Default for PalletConfig {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
            width: Self::DEFAULT_WIDTH,
            overhang: Self::DEFAULT_OVERHANG,
            height_limits: Self::DEFAULT_HEIGHT_LIMITS.to_vec(),
        }
    }
}

/// Comma-separated millimetre limits, e.g. `1800,1700`.
pub fn parse_height_limits(raw: &str) -> Result<Vec<u32>, String> {
    let limits = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| format!("invalid height limit '{}'", s))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if limits.is_empty() {
        return Err("no height limits given".to_string());
    }
    if limits.contains(&0) {
        return Err("height limits must be non-zero".to_string());
    }
    Ok(limits)
}

fn load_with_warning<T, F>(name: &str, raw: Option<String>, default: T, is_valid: F) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(T) -> bool,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if is_valid(value) => value,
        Ok(value) => {
            tracing::warn!(var = name, %value, "rejected value, using {default}");
            default
        }
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "could not parse, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PalletConfig::default();
        assert_eq!(config.pallet(), Pallet::new(1200, 800, 30));
        assert_eq!(config.height_limits, vec![1800, 1700]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_height_limits() {
        assert_eq!(parse_height_limits("1800, 1700"), Ok(vec![1800, 1700]));
        assert!(parse_height_limits("").is_err());
        assert!(parse_height_limits("1800,abc").is_err());
        assert!(parse_height_limits("0").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = PalletConfig::default();
        config.height_limits = vec![1800, 1800];
        assert!(config.validate().is_err());
        config.height_limits = vec![];
        assert!(config.validate().is_err());
        config = PalletConfig {
            width: 0,
            ..PalletConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PalletConfig = serde_json::from_str(r#"{"length": 1000}"#).unwrap();
        assert_eq!(config.length, 1000);
        assert_eq!(config.width, PalletConfig::DEFAULT_WIDTH);
        assert_eq!(config.height_limits, vec![1800, 1700]);
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_without_vars_is_default() {
        assert_eq!(PalletConfig::from_lookup(|_| None), PalletConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = PalletConfig::from_lookup(lookup_from(&[
            ("PALLET_LENGTH", " 1000 "),
            ("PALLET_OVERHANG", "0"),
            ("PALLET_HEIGHT_LIMITS", "1600,1500"),
        ]));
        assert_eq!(config.pallet(), Pallet::new(1000, 800, 0));
        assert_eq!(config.height_limits, vec![1600, 1500]);
    }

    #[test]
    fn test_from_lookup_rejects_zero_and_garbage() {
        let config = PalletConfig::from_lookup(lookup_from(&[
            ("PALLET_LENGTH", "long"),
            ("PALLET_WIDTH", "0"),
            ("PALLET_HEIGHT_LIMITS", "abc"),
        ]));
        assert_eq!(config, PalletConfig::default());
    }

    #[test]
    fn test_from_lookup_blank_height_limits_use_defaults() {
        let config = PalletConfig::from_lookup(lookup_from(&[("PALLET_HEIGHT_LIMITS", " , ")]));
        assert_eq!(config.height_limits, vec![1800, 1700]);
    }
}
