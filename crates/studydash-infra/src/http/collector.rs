// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `reqwest`-based implementation of [`CollectorTransport`].

use async_trait::async_trait;
use std::time::Duration;
use studydash_core::telemetry::{CollectorPayload, CollectorTransport, TransportError};

/// Default timeout of one delivery.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts monitoring batches as JSON to a collector URL.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCollector {
    /// Creates a collector posting to `endpoint`, an absolute URL.
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Creates a collector that reuses an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The URL batches are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn post(
    client: &reqwest::Client,
    endpoint: &str,
    payload: &CollectorPayload,
) -> Result<(), TransportError> {
    let response = client
        .post(endpoint)
        .json(payload)
        .send()
        .await
        .map_err(|e| {
            if e.is_builder() || e.is_body() {
                TransportError::Encoding(e.to_string())
            } else {
                TransportError::Unreachable(e.to_string())
            }
        })?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(TransportError::Rejected(status.as_u16()))
    }
}

#[async_trait]
impl CollectorTransport for HttpCollector {
    async fn send(&self, payload: &CollectorPayload) -> Result<(), TransportError> {
        post(&self.client, &self.endpoint, payload).await?;
        log::trace!("Delivered {} events to {}.", payload.len(), self.endpoint);
        Ok(())
    }

    fn send_beacon(&self, payload: CollectorPayload) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!(
                    "No async runtime for the beacon; dropping {} events.",
                    payload.len()
                );
                return;
            }
        };
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        runtime.spawn(async move {
            if let Err(e) = post(&client, &endpoint, &payload).await {
                log::debug!("Beacon to {endpoint} failed: {e}");
            }
        });
    }
}
