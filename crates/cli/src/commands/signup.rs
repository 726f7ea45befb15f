use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use leadflow_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use leadflow_core::domain::draft::DraftField;
use leadflow_core::domain::records::WeatherSnapshot;
use leadflow_core::errors::WorkflowError;
use leadflow_core::flows::WorkflowState;
use leadflow_core::remote::Notification;
use leadflow_core::validation::ValidationResult;
use leadflow_core::SignupController;
use leadflow_remote::collaborators_from_config;
use serde::Serialize;
use tracing::{info, warn};

use super::validate::DraftArgs;
use super::{CommandResult, EXIT_CLIENT_SETUP, EXIT_CONFIG, EXIT_REMOTE, EXIT_VALIDATION};

#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(long, help = "Leave the created lead unconverted")]
    pub cancel: bool,
    #[arg(long, help = "Override remote.base_url for this run")]
    pub base_url: Option<String>,
    #[arg(long, help = "Skip the weather lookup after conversion")]
    pub no_weather: bool,
    #[arg(long, help = "Load configuration from this file instead of the default locations")]
    pub config: Option<PathBuf>,
}

impl SignupArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_file: self.config.is_some(),
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                remote_base_url: self.base_url.clone(),
                weather_enabled: self.no_weather.then_some(false),
                ..ConfigOverrides::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SignupReport {
    command: &'static str,
    status: &'static str,
    error_class: Option<&'static str>,
    state: WorkflowState,
    correlation_id: String,
    lead_id: Option<String>,
    opportunity_id: Option<String>,
    server_message: Option<String>,
    notification: Option<Notification>,
    weather: Option<WeatherSnapshot>,
    #[serde(flatten)]
    errors: Option<ValidationResult>,
}

impl SignupReport {
    fn from_controller(controller: &SignupController) -> Self {
        let server_message = controller.server_message();
        Self {
            command: "signup",
            status: "ok",
            error_class: None,
            state: controller.state(),
            correlation_id: controller.correlation_id().to_string(),
            lead_id: controller.lead_id().map(ToString::to_string),
            opportunity_id: controller.opportunity_id().map(ToString::to_string),
            server_message: (!server_message.is_empty()).then(|| server_message.to_string()),
            notification: controller.last_notification().cloned(),
            weather: controller.weather().cloned(),
            errors: None,
        }
    }
}

pub fn run(args: &SignupArgs) -> CommandResult {
    let config = match AppConfig::load(args.load_options()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "signup",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };

    let collaborators = match collaborators_from_config(&config) {
        Ok(collaborators) => collaborators,
        Err(error) => {
            return CommandResult::failure(
                "signup",
                "client_setup",
                error.to_string(),
                EXIT_CLIENT_SETUP,
            )
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "signup",
                "runtime",
                format!("{error:#}"),
                EXIT_CLIENT_SETUP,
            )
        }
    };

    let mut controller = SignupController::new(collaborators)
        .with_opportunity_name_suffix(config.workflow.opportunity_name_suffix.clone());

    let outcome = runtime.block_on(drive(&mut controller, args));
    match outcome {
        Ok(exit_code) => {
            let mut report = SignupReport::from_controller(&controller);
            match exit_code {
                0 if controller.state() == WorkflowState::Summary => {}
                0 => report.status = "cancelled",
                _ => {
                    report.status = "error";
                    report.error_class = Some("remote");
                }
            }
            CommandResult::report(exit_code, &report)
        }
        Err(WorkflowError::Validation(result)) => {
            let mut report = SignupReport::from_controller(&controller);
            report.status = "error";
            report.error_class = Some("validation");
            report.errors = Some(result);
            CommandResult::report(EXIT_VALIDATION, &report)
        }
        Err(error) => CommandResult::failure(
            "signup",
            error.error_class(),
            error.to_string(),
            EXIT_REMOTE,
        ),
    }
}

/// Runs one pass through the workflow and returns the exit code for where it
/// came to rest.
async fn drive(controller: &mut SignupController, args: &SignupArgs) -> Result<u8, WorkflowError> {
    let fields = [
        (DraftField::FullName, &args.draft.name),
        (DraftField::Email, &args.draft.email),
        (DraftField::Phone, &args.draft.phone),
        (DraftField::Region, &args.draft.region),
    ];
    for (field, value) in fields {
        controller.update_field(field, value.as_str())?;
    }

    if controller.submit().await? != WorkflowState::ConfirmConversion {
        warn!(
            event_name = "cli.signup.create_failed",
            correlation_id = %controller.correlation_id(),
            "lead was not created"
        );
        return Ok(EXIT_REMOTE);
    }

    if args.cancel {
        controller.cancel_conversion()?;
        return Ok(0);
    }

    let state = controller.confirm_conversion().await?;
    info!(
        event_name = "cli.signup.finished",
        correlation_id = %controller.correlation_id(),
        state = ?state,
        "signup workflow finished"
    );
    Ok(if state == WorkflowState::Summary { 0 } else { EXIT_REMOTE })
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")
}
