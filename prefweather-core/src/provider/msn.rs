use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::{
    model::UnitSystem,
    provider::{ConnectorError, ConnectorOperation},
};

use super::WeatherConnector;

/// HTTP client for the MSN Weather connector.
///
/// Requests go to `{base_url}/{connection_id}/{operation path}/{location}?units=...`.
#[derive(Debug, Clone)]
pub struct MsnWeatherConnector {
    base_url: Url,
    connection_id: String,
    api_token: Option<String>,
    http: Client,
}

impl MsnWeatherConnector {
    pub fn new(base_url: String, connection_id: String, api_token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(&base_url).map_err(|_| ConnectorError::InvalidUrl(base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConnectorError::InvalidUrl(base_url.to_string()).into());
        }

        Ok(Self { base_url, connection_id, api_token, http: Client::new() })
    }

    fn endpoint(&self, operation: ConnectorOperation, location: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConnectorError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&self.connection_id)
            .extend(operation.path_segments())
            .push(location);

        Ok(url)
    }
}

#[async_trait]
impl WeatherConnector for MsnWeatherConnector {
    async fn call(
        &self,
        operation: ConnectorOperation,
        location: &str,
        units: UnitSystem,
    ) -> Result<Value> {
        let url = self.endpoint(operation, location)?;

        let mut req = self.http.get(url).query(&[("units", units.as_str())]);
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(%operation, location, %units, "calling connector");

        let res = req
            .send()
            .await
            .with_context(|| format!("Failed to send {operation} request to MSN Weather"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read MSN Weather {operation} response body"))?;

        if !status.is_success() {
            return Err(ConnectorError::Status {
                operation,
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse MSN Weather {operation} JSON"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
