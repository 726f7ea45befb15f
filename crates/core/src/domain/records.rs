use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lead created by the remote lead service. Read-only once returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_id: LeadId,
    pub opportunity_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub opportunity_id: OpportunityId,
    /// Lookup key for the weather service, derived remotely from the region.
    pub emirate_city: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub temperature_celsius: Option<f64>,
    pub available: bool,
}

impl WeatherSnapshot {
    pub fn available(city_name: impl Into<String>, temperature_celsius: f64) -> Self {
        Self {
            city_name: city_name.into(),
            temperature_celsius: Some(temperature_celsius),
            available: true,
        }
    }

    pub fn unavailable(city_name: impl Into<String>) -> Self {
        Self { city_name: city_name.into(), temperature_celsius: None, available: false }
    }
}
