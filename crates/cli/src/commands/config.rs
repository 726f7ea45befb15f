use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadflow_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let unset = || "<unset>".to_string();
    let api_token = config
        .remote
        .api_token
        .as_ref()
        .map(|token| redact_token(token.expose_secret()))
        .unwrap_or_else(unset);

    let entries: [(&str, &[&str], String); 11] = [
        ("remote.base_url", &["LEADFLOW_REMOTE_BASE_URL"], config.remote.base_url.clone()),
        ("remote.lead_path", &["LEADFLOW_REMOTE_LEAD_PATH"], config.remote.lead_path.clone()),
        (
            "remote.conversion_path",
            &["LEADFLOW_REMOTE_CONVERSION_PATH"],
            config.remote.conversion_path.clone(),
        ),
        (
            "remote.timeout_secs",
            &["LEADFLOW_REMOTE_TIMEOUT_SECS"],
            config.remote.timeout_secs.to_string(),
        ),
        ("remote.api_token", &["LEADFLOW_REMOTE_API_TOKEN"], api_token),
        ("weather.enabled", &["LEADFLOW_WEATHER_ENABLED"], config.weather.enabled.to_string()),
        (
            "weather.base_url",
            &["LEADFLOW_WEATHER_BASE_URL"],
            config.weather.base_url.clone().unwrap_or_else(|| "<remote.base_url>".to_string()),
        ),
        ("weather.path", &["LEADFLOW_WEATHER_PATH"], config.weather.path.clone()),
        (
            "workflow.opportunity_name_suffix",
            &["LEADFLOW_WORKFLOW_OPPORTUNITY_NAME_SUFFIX"],
            config.workflow.opportunity_name_suffix.clone().unwrap_or_else(unset),
        ),
        (
            "logging.level",
            &["LEADFLOW_LOGGING_LEVEL", "LEADFLOW_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        (
            "logging.format",
            &["LEADFLOW_LOGGING_FORMAT", "LEADFLOW_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, env_keys, value) in entries {
        lines.push(render_line(
            key_path,
            &value,
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    ["leadflow.toml", "config/leadflow.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps at most the first four characters of a bearer token.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.char_indices().nth(4) {
        Some((cut, _)) if trimmed.len() > 8 => format!("{}***", &trimmed[..cut]),
        _ => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_token, render_line};

    #[test]
    fn short_tokens_are_fully_redacted() {
        assert_eq!(redact_token("abc"), "<redacted>");
        assert_eq!(redact_token("   "), "<empty>");
    }

    #[test]
    fn long_tokens_keep_a_short_prefix() {
        assert_eq!(redact_token("00Dxx0000001gPL!AQ4AQ"), "00Dx***");
    }

    #[test]
    fn nested_key_lookup_walks_tables() {
        let doc: Value = "[remote]\nbase_url = \"https://crm.test\"\n".parse().expect("toml");
        assert!(contains_path(&doc, "remote.base_url"));
        assert!(!contains_path(&doc, "remote.timeout_secs"));
        assert!(!contains_path(&doc, "weather.enabled"));
    }

    #[test]
    fn render_line_includes_source() {
        assert_eq!(
            render_line("weather.enabled", "true", "default".to_string()),
            "- weather.enabled = true (source: default)"
        );
    }
}
