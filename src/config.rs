//! Runtime configuration from the environment (and an optional `.env`).

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RATES_CSV: &str = "Foreign_Exchange_Rates.csv";
pub const DEFAULT_INFLATION_CSV: &str = "Filtered_Inflation_Data.csv";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub rates_path: PathBuf,
    pub inflation_path: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rates_path: PathBuf::from(DEFAULT_RATES_CSV),
            inflation_path: PathBuf::from(DEFAULT_INFLATION_CSV),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Read `PORT`, `FX_RATES_CSV`, `FX_INFLATION_CSV` and `RUST_LOG`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::input(format!("Invalid PORT value '{raw}': expected 0-65535.")))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            rates_path: lookup("FX_RATES_CSV").map(PathBuf::from).unwrap_or(defaults.rates_path),
            inflation_path: lookup("FX_INFLATION_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.inflation_path),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.port, 8080);
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(|k| match k {
            "PORT" => Some("9000".into()),
            "FX_RATES_CSV" => Some("/data/rates.csv".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.port, 9000);
        assert_eq!(s.rates_path, PathBuf::from("/data/rates.csv"));
        assert_eq!(s.inflation_path, PathBuf::from(DEFAULT_INFLATION_CSV));
    }

    #[test]
    fn bad_port_is_input_error() {
        let err = Settings::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string())).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
