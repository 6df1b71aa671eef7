use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::QuoteConfig;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("quote service returned no quotes")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
}

/// Wire shape of the zenquotes.io payload
#[derive(Debug, Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

/// Fetches the inspirational quote shown on the home route
#[derive(Clone)]
pub struct QuoteService {
    http: reqwest::Client,
    url: String,
}

impl QuoteService {
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    pub async fn random(&self) -> Result<Quote, QuoteError> {
        let quotes: Vec<ZenQuote> = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_quote(quotes)
    }
}

fn first_quote(quotes: Vec<ZenQuote>) -> Result<Quote, QuoteError> {
    quotes
        .into_iter()
        .next()
        .map(|z| Quote { quote: z.q, author: z.a })
        .ok_or(QuoteError::Empty)
}
