//! JSON-over-HTTP clients for the lead, conversion and weather services.

use std::time::Duration;

use async_trait::async_trait;
use leadflow_core::config::AppConfig;
use leadflow_core::remote::{
    ConversionService, ConvertLeadRequest, ConvertLeadResponse, CreateLeadRequest,
    CreateLeadResponse, LeadService, RemoteError, WeatherRequest, WeatherResponse, WeatherService,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

#[derive(Clone, Debug)]
pub struct Endpoints {
    pub base_url: String,
    pub lead_path: String,
    pub conversion_path: String,
    pub weather_base_url: String,
    pub weather_path: String,
}

impl Endpoints {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.remote.base_url.clone(),
            lead_path: config.remote.lead_path.clone(),
            conversion_path: config.remote.conversion_path.clone(),
            weather_base_url: config.weather.effective_base_url(&config.remote).to_string(),
            weather_path: config.weather.path.clone(),
        }
    }

    fn lead_url(&self) -> String {
        join_url(&self.base_url, &self.lead_path)
    }

    fn conversion_url(&self) -> String {
        join_url(&self.base_url, &self.conversion_path)
    }

    fn weather_url(&self) -> String {
        join_url(&self.weather_base_url, &self.weather_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[derive(Clone)]
pub struct CrmHttpClient {
    client: Client,
    endpoints: Endpoints,
    api_token: Option<SecretString>,
    timeout_secs: u64,
}

impl CrmHttpClient {
    pub fn new(
        endpoints: Endpoints,
        api_token: Option<SecretString>,
        timeout_secs: u64,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|error| RemoteError::other(format!("failed to build http client: {error}")))?;
        Ok(Self { client, endpoints, api_token, timeout_secs })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, RemoteError> {
        Self::new(
            Endpoints::from_config(config),
            config.remote.api_token.clone(),
            config.remote.timeout_secs,
        )
    }

    async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, RemoteError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|error| {
            error!(error = %error, url = %url, "remote request failed");
            if error.is_timeout() {
                RemoteError::Timeout { timeout_secs: self.timeout_secs }
            } else {
                RemoteError::Http { message: error.to_string() }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "remote service returned an error status");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body_message: extract_body_message(&body),
            });
        }

        let decoded = response.json::<Resp>().await.map_err(|error| {
            if error.is_timeout() {
                RemoteError::Timeout { timeout_secs: self.timeout_secs }
            } else {
                RemoteError::Decode { message: error.to_string() }
            }
        })?;
        debug!(url = %url, "remote call completed");
        Ok(decoded)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pulls `message` out of `{"message": ...}` or the first element of
/// `[{"message": ...}]`. Anything else yields `None`.
fn extract_body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = match value {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };
    serde_json::from_value::<ErrorBody>(candidate)
        .ok()?
        .message
        .filter(|message| !message.trim().is_empty())
}

#[async_trait]
impl LeadService for CrmHttpClient {
    async fn create_lead(
        &self,
        request: &CreateLeadRequest,
    ) -> Result<CreateLeadResponse, RemoteError> {
        self.post_json(&self.endpoints.lead_url(), request).await
    }
}

#[async_trait]
impl ConversionService for CrmHttpClient {
    async fn convert_lead(
        &self,
        request: &ConvertLeadRequest,
    ) -> Result<ConvertLeadResponse, RemoteError> {
        self.post_json(&self.endpoints.conversion_url(), request).await
    }
}

#[async_trait]
impl WeatherService for CrmHttpClient {
    async fn weather_by_city(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherResponse, RemoteError> {
        self.post_json(&self.endpoints.weather_url(), request).await
    }
}

/// Stand-in used when enrichment is switched off in configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledWeather;

#[async_trait]
impl WeatherService for DisabledWeather {
    async fn weather_by_city(
        &self,
        _request: &WeatherRequest,
    ) -> Result<WeatherResponse, RemoteError> {
        Ok(WeatherResponse::unavailable())
    }
}
