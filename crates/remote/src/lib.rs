pub mod http;
pub mod notify;

use std::sync::Arc;

use leadflow_core::config::AppConfig;
use leadflow_core::remote::{Collaborators, RemoteError, WeatherService};

pub use http::{CrmHttpClient, DisabledWeather, Endpoints};
pub use notify::TracingNotificationSink;

/// Wires the HTTP clients from configuration. Weather lookups go through the
/// same client unless enrichment is disabled.
pub fn collaborators_from_config(config: &AppConfig) -> Result<Collaborators, RemoteError> {
    let client = Arc::new(CrmHttpClient::from_config(config)?);
    let weather: Arc<dyn WeatherService> =
        if config.weather.enabled { client.clone() } else { Arc::new(DisabledWeather) };

    Ok(Collaborators {
        leads: client.clone(),
        conversions: client,
        weather,
        notifications: Arc::new(TracingNotificationSink),
    })
}

#[cfg(test)]
mod tests {
    use leadflow_core::config::{AppConfig, WeatherConfig};

    use super::collaborators_from_config;

    #[test]
    fn default_config_builds_collaborators() {
        assert!(collaborators_from_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn disabled_weather_still_builds() {
        let mut config = AppConfig::default();
        config.weather = WeatherConfig { enabled: false, ..config.weather.clone() };
        assert!(collaborators_from_config(&config).is_ok());
    }
}
