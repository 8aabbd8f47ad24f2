//! Nutrition database lookup and result ranking.

pub mod edamam;
pub mod ranking;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application id + key pair the food database requires on every call.
#[derive(Clone)]
pub struct ProviderCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl ProviderCredentials {
    /// Both values must be present and non-empty.
    pub fn from_parts(app_id: Option<String>, app_key: Option<String>) -> Option<Self> {
        let app_id = app_id.filter(|v| !v.trim().is_empty())?;
        let app_key = app_key.filter(|v| !v.trim().is_empty())?;
        Some(Self { app_id, app_key })
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// One food record as the provider returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFood {
    pub food_id: String,
    pub label: String,
    #[serde(default)]
    pub known_as: Option<String>,
    #[serde(default)]
    pub nutrients: ProviderNutrients,
}

impl ProviderFood {
    /// The alternate "known as" name when present, else the primary label.
    pub fn preferred_label(&self) -> &str {
        match self.known_as.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => &self.label,
        }
    }
}

/// Provider nutrient codes, per serving. Missing values read as zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProviderNutrients {
    #[serde(rename = "ENERC_KCAL", default)]
    pub energy_kcal: f64,
    #[serde(rename = "PROCNT", default)]
    pub protein: f64,
    #[serde(rename = "FAT", default)]
    pub fat: f64,
    #[serde(rename = "CHOCDF", default)]
    pub carbohydrate: f64,
}

/// A search result as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCandidate {
    pub food_id: String,
    /// Label in the display language.
    pub label: String,
    /// Provider label before translation.
    pub original_label: String,
    pub nutrients: Nutrients,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrients {
    pub kcal: f64,
    pub protein_grams: f64,
    pub fat_grams: f64,
    pub carbs_grams: f64,
}

impl From<ProviderNutrients> for Nutrients {
    fn from(n: ProviderNutrients) -> Self {
        Self {
            kcal: n.energy_kcal,
            protein_grams: n.protein,
            fat_grams: n.fat,
            carbs_grams: n.carbohydrate,
        }
    }
}

#[derive(Debug, Error)]
pub enum FoodDbError {
    #[error("network error: {0}")]
    Network(String),

    #[error("food database error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FoodDbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FoodDbError::Parse(err.to_string())
        } else {
            FoodDbError::Network(err.to_string())
        }
    }
}

/// Food database backend. One attempt per call, no retries.
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    async fn search(
        &self,
        credentials: &ProviderCredentials,
        query: &str,
    ) -> Result<Vec<ProviderFood>, FoodDbError>;
}
