use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::food::{edamam, ranking::DEFAULT_MAX_RESULTS, ProviderCredentials};
use crate::translate::{deepl, LanguagePair};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub deepl_api_key: Option<String>,
    pub deepl_api_url: String,
    pub edamam_app_id: Option<String>,
    pub edamam_app_key: Option<String>,
    pub edamam_api_url: String,
    pub languages: LanguagePair,
    pub translate_timeout: Duration,
    pub food_db_timeout: Duration,
    pub cache_ttl: Duration,
    /// `None` disables the periodic cache sweep.
    pub cache_sweep_interval: Option<Duration>,
    pub max_results: usize,
    pub glossary_path: PathBuf,
}

impl Config {
    /// Load from the process environment, after an optional `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sweep_secs: u64 = try_load(&lookup, "CACHE_SWEEP_INTERVAL_SECS", "3600")?;

        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "3000")?,
            deepl_api_key: secret(&lookup, "DEEPL_API_KEY"),
            deepl_api_url: try_load(&lookup, "DEEPL_API_URL", deepl::DEFAULT_API_URL)?,
            edamam_app_id: secret(&lookup, "EDAMAM_APP_ID"),
            edamam_app_key: secret(&lookup, "EDAMAM_APP_KEY"),
            edamam_api_url: try_load(&lookup, "EDAMAM_API_URL", edamam::DEFAULT_API_URL)?,
            languages: LanguagePair {
                provider: try_load(&lookup, "PROVIDER_LANG", "EN")?,
                display: try_load(&lookup, "DISPLAY_LANG", "JA")?,
            },
            translate_timeout: Duration::from_secs(try_load(
                &lookup,
                "TRANSLATE_TIMEOUT_SECS",
                "10",
            )?),
            food_db_timeout: Duration::from_secs(try_load(&lookup, "FOOD_DB_TIMEOUT_SECS", "10")?),
            cache_ttl: Duration::from_secs(try_load(
                &lookup,
                "TRANSLATION_CACHE_TTL_SECS",
                "86400",
            )?),
            cache_sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            max_results: try_load(&lookup, "MAX_RESULTS", &DEFAULT_MAX_RESULTS.to_string())?,
            glossary_path: try_load(&lookup, "GLOSSARY_PATH", "glossary/foods.json")?,
        })
    }

    pub fn credentials(&self) -> Option<ProviderCredentials> {
        ProviderCredentials::from_parts(self.edamam_app_id.clone(), self.edamam_app_key.clone())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }
    })
}

/// Optional credential; blank values count as unset.
fn secret(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if value.is_none() {
        warn!("{key} not set");
    }
    value
}
