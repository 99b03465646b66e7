use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Per-1K-token prices for one model, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ModelPrice {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

#[derive(Debug, Deserialize)]
struct PricesFile {
    models: HashMap<String, ModelPrice>,
}

/// Static price table keyed by model identifier.
///
/// Unknown models contribute zero cost and log a warning rather than failing
/// the call that produced the usage numbers.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    models: HashMap<String, ModelPrice>,
}

impl PriceTable {
    /// Load the price table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PricingIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: PricesFile = serde_yaml::from_str(&content).map_err(ConfigError::PricingParse)?;
        Ok(Self {
            models: file.models,
        })
    }

    /// Build a table from in-memory pairs. Primarily for tests.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, ModelPrice)]) -> Self {
        Self {
            models: pairs
                .iter()
                .map(|(model, price)| ((*model).to_string(), *price))
                .collect(),
        }
    }

    #[must_use]
    pub fn price_for(&self, model: &str) -> Option<ModelPrice> {
        self.models.get(model).copied()
    }

    /// Estimated spend for one call:
    /// `input/1000 × input_price + output/1000 × output_price`.
    ///
    /// Unknown models log a warning and return `0.0`.
    #[must_use]
    pub fn estimate(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        let Some(price) = self.models.get(model) else {
            tracing::warn!(model, "no price configured for model; recording zero cost");
            return 0.0;
        };
        f64::from(input_tokens) / 1000.0 * price.input_per_1k
            + f64::from(output_tokens) / 1000.0 * price.output_per_1k
    }
}
