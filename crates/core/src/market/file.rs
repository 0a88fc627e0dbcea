//! Market definition files.
//!
//! A market is one JSON document:
//!
//! ```json
//! {
//!   "market": { "id": "...", "lookup": {...}, "rule": {...}, "deadline": "..." },
//!   "schema": { "kind": "head_to_head", ... },
//!   "primary": { "name": "primary", "url": "https://.../{date}" },
//!   "secondary": { "name": "proxy", "url": "https://.../{date}" }
//! }
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use settle_feeds::source::template_placeholders;
use settle_feeds::EndpointConfig;

use super::MarketSpec;
use crate::errors::{Error, Result};
use crate::normalizer::SchemaConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFile {
    pub market: MarketSpec,
    pub schema: SchemaConfig,
    pub primary: EndpointConfig,
    #[serde(default)]
    pub secondary: Option<EndpointConfig>,
}

impl MarketFile {
    /// Read, parse and validate a market file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::MarketFileIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file = Self::from_json(&text)?;
        debug!(
            "Loaded market '{}' ({} key, {} schema) from {}",
            file.market.id,
            file.market.lookup.kind(),
            file.schema.name(),
            path.display()
        );
        Ok(file)
    }

    /// Parse and validate a market definition.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: Self = serde_json::from_str(text)?;
        file.validate()?;
        Ok(file)
    }

    /// Cross-checks between the market, its schema and its endpoints.
    pub fn validate(&self) -> Result<()> {
        self.market.validate()?;

        let key = &self.market.lookup;
        if !self.schema.accepts(key) {
            return Err(Error::InvalidMarket(format!(
                "{} schema cannot interpret a {} lookup key",
                self.schema.name(),
                key.kind()
            )));
        }

        if let SchemaConfig::Candles(schema) = &self.schema {
            schema.validate()?;
        }

        let produced = self.schema.produces();
        if let Some(missing) = self
            .market
            .rule
            .required_comparables()
            .into_iter()
            .find(|name| !produced.iter().any(|p| p == name))
        {
            return Err(Error::InvalidMarket(format!(
                "rule needs '{}' which the {} schema does not produce",
                missing,
                self.schema.name()
            )));
        }

        self.check_endpoint(&self.primary)?;
        if let Some(secondary) = &self.secondary {
            self.check_endpoint(secondary)?;
        }
        Ok(())
    }

    /// Every placeholder in the endpoint's URL template can be filled from
    /// the market's lookup key.
    pub fn check_endpoint(&self, endpoint: &EndpointConfig) -> Result<()> {
        let key = &self.market.lookup;
        match template_placeholders(&endpoint.url)
            .into_iter()
            .find(|name| key.param(name).is_none())
        {
            Some(name) => Err(Error::InvalidMarket(format!(
                "endpoint '{}' uses {{{}}} which a {} key does not provide",
                endpoint.name,
                name,
                key.kind()
            ))),
            None => Ok(()),
        }
    }
}
