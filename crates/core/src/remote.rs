//! Contracts for the services the signup workflow talks to.
//!
//! Business failures travel in-band (`success: false` on an `Ok` response);
//! transport failures are `Err(RemoteError)`. The controller treats the two
//! differently, so implementations must not fold one into the other.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::draft::Region;
use crate::domain::records::WeatherSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub region: Region,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLeadResponse {
    pub success: bool,
    pub lead_id: Option<String>,
    pub message: Option<String>,
}

impl CreateLeadResponse {
    pub fn created(lead_id: impl Into<String>) -> Self {
        Self { success: true, lead_id: Some(lead_id.into()), message: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, lead_id: None, message: Some(message.into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertLeadRequest {
    pub lead_id: String,
    pub opportunity_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertLeadResponse {
    pub success: bool,
    pub opportunity_id: Option<String>,
    pub emirate_city: Option<String>,
    pub message: Option<String>,
}

impl ConvertLeadResponse {
    pub fn converted(opportunity_id: impl Into<String>, emirate_city: impl Into<String>) -> Self {
        Self {
            success: true,
            opportunity_id: Some(opportunity_id.into()),
            emirate_city: Some(emirate_city.into()),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            opportunity_id: None,
            emirate_city: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub city: String,
    pub opportunity_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherResponse {
    pub status: bool,
    pub name: Option<String>,
    pub main: Option<WeatherMain>,
}

impl WeatherResponse {
    pub fn reading(name: impl Into<String>, temp: f64) -> Self {
        Self { status: true, name: Some(name.into()), main: Some(WeatherMain { temp }) }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A reading counts only when the service reports success and a temperature.
    pub fn snapshot(&self, requested_city: &str) -> WeatherSnapshot {
        let city = self.name.clone().unwrap_or_else(|| requested_city.to_string());
        match (&self.main, self.status) {
            (Some(main), true) => WeatherSnapshot::available(city, main.temp),
            _ => WeatherSnapshot::unavailable(city),
        }
    }
}

const UNKNOWN_DIAGNOSTIC: &str = "unknown error";

/// A remote call that did not complete normally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("request failed: {message}")]
    Http { message: String },
    #[error("service responded with status {status}")]
    Status { status: u16, body_message: Option<String> },
    #[error("could not decode response: {message}")]
    Decode { message: String },
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("{message}")]
    Other { message: String, body_message: Option<String> },
}

impl RemoteError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other { message: message.into(), body_message: None }
    }

    /// Message carried in a structured error payload, if the service sent one.
    pub fn body_message(&self) -> Option<&str> {
        match self {
            Self::Status { body_message, .. } | Self::Other { body_message, .. } => {
                body_message.as_deref()
            }
            Self::Http { .. } | Self::Decode { .. } | Self::Timeout { .. } => None,
        }
    }

    /// Best available text for operators and users.
    ///
    /// Order: structured body message, then the error's own display text, then
    /// a fixed fallback. Blank entries fall through.
    pub fn diagnostic(&self) -> String {
        if let Some(body) = self.body_message().map(str::trim).filter(|body| !body.is_empty()) {
            return body.to_string();
        }
        let display = self.to_string();
        if !display.trim().is_empty() {
            return display;
        }
        UNKNOWN_DIAGNOSTIC.to_string()
    }
}

#[async_trait]
pub trait LeadService: Send + Sync {
    async fn create_lead(
        &self,
        request: &CreateLeadRequest,
    ) -> Result<CreateLeadResponse, RemoteError>;
}

#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn convert_lead(
        &self,
        request: &ConvertLeadRequest,
    ) -> Result<ConvertLeadResponse, RemoteError>;
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn weather_by_city(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherResponse, RemoteError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.into(),
            variant: NotificationVariant::Success,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            title: "Failed".to_string(),
            message: message.into(),
            variant: NotificationVariant::Error,
        }
    }
}

/// Fire-and-forget toast channel.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Everything the controller calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub leads: Arc<dyn LeadService>,
    pub conversions: Arc<dyn ConversionService>,
    pub weather: Arc<dyn WeatherService>,
    pub notifications: Arc<dyn NotificationSink>,
}
