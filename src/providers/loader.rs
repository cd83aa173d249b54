use crate::core::config::{DataConfig, DataSource};
use crate::core::reference::{AmcDataset, FundOverride, FundRecord, ReferenceData};
use crate::core::{ReferenceProvider, cache::Store};
use crate::providers::{FileProvider, HttpProvider};
use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};

/// Loads the reference documents named in [`DataConfig`], choosing the
/// provider per source.
pub struct ReferenceLoader {
    files: FileProvider,
    http: HttpProvider,
}

impl ReferenceLoader {
    pub fn new(store: &dyn Store, cache_ttl: Duration) -> Result<Self> {
        Ok(ReferenceLoader {
            files: FileProvider::new(),
            http: HttpProvider::new(store, cache_ttl)?,
        })
    }

    fn provider_for(&self, source: &DataSource) -> &dyn ReferenceProvider {
        match source {
            DataSource::File { .. } => &self.files,
            DataSource::Remote { .. } => &self.http,
        }
    }

    /// Fetches and parses one document. A document that fails to parse is
    /// dropped from the provider's cache so the next load downloads it again.
    async fn fetch<T: DeserializeOwned>(&self, source: &DataSource) -> Result<T> {
        let location = source.location();
        let provider = self.provider_for(source);
        let document = provider.fetch_document(&location).await?;
        match serde_json::from_str(&document) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!(%location, "Discarding unparseable reference document");
                provider.discard(&location).await;
                Err(e).with_context(|| format!("Failed to parse reference document: {location}"))
            }
        }
    }

    /// Fetches funds and AMC data concurrently, then the optional overrides.
    /// Fails when the fund list has no usable rows.
    pub async fn load(&self, config: &DataConfig) -> Result<ReferenceData> {
        let (funds, amc) = futures::try_join!(
            self.fetch::<Vec<FundRecord>>(&config.funds),
            self.fetch::<AmcDataset>(&config.amc),
        )?;

        let overrides = match &config.overrides {
            Some(source) => self.fetch::<Vec<FundOverride>>(source).await?,
            None => Vec::new(),
        };

        let reference = ReferenceData::new(funds, amc, overrides);
        if reference.fund_count() == 0 {
            bail!(
                "{} has no valid fund rows",
                config.funds.location()
            );
        }
        info!(
            funds = reference.fund_count(),
            amcs = reference.amc().colors.len(),
            "Loaded reference data"
        );
        Ok(reference)
    }
}
