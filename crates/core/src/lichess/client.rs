//! Lichess API client for cloud evaluations

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::*;
use crate::error::{Error, Result};

const LICHESS_API_BASE: &str = "https://lichess.org/api";

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(LICHESS_API_BASE)
    }

    /// Client against another API root, e.g. a local mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get cloud evaluation for a FEN position
    ///
    /// Lichess answers 404 when the position is not in its cache; that
    /// surfaces as `Error::Lichess`.
    pub async fn cloud_eval(&self, fen: &str, multi_pv: u8) -> Result<CloudEval> {
        let url = format!("{}/cloud-eval", self.base_url);
        debug!(fen, multi_pv, "requesting cloud eval");

        let response = self
            .client
            .get(&url)
            .query(&[("fen", fen), ("multiPv", &multi_pv.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Lichess(format!("Cloud eval error: {}", response.status())));
        }

        let eval: CloudEval = response.json().await?;
        Ok(eval)
    }
}
