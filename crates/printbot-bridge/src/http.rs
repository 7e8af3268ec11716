// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain HTTP(S) downloads of documents to print.

use std::time::Duration;

use printbot_core::error::{PrintbotError, Result};
use reqwest::Client;
use tracing::{debug, instrument};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared HTTP client for document downloads.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PrintbotError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` and return the body.  Non-2xx statuses are errors.
    ///
    /// The URL is not recorded: Telegram file URLs embed the bot token.
    #[instrument(skip_all)]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PrintbotError::Fetch(e.without_url().to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| PrintbotError::Fetch(e.without_url().to_string()))?;

        debug!(size = body.len(), "download complete");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unparsable_url_is_a_fetch_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(PrintbotError::Fetch(_))));
    }
}
