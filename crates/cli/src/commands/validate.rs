use clap::Args;
use leadflow_core::domain::draft::SubmissionDraft;
use leadflow_core::validation::{validate_draft, ValidationResult};
use serde::Serialize;

use super::{CommandResult, EXIT_VALIDATION};

/// The four signup fields as they would arrive from the form.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    #[arg(long, default_value = "", help = "Full name of the prospect")]
    pub name: String,
    #[arg(long, default_value = "", help = "Contact email address")]
    pub email: String,
    #[arg(long, default_value = "", help = "UAE mobile number")]
    pub phone: String,
    #[arg(long, default_value = "", help = "Emirate, e.g. `Abu Dhabi` or `Dubai`")]
    pub region: String,
}

impl DraftArgs {
    pub fn to_draft(&self) -> SubmissionDraft {
        SubmissionDraft::new(&self.name, &self.email, &self.phone, &self.region)
    }
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    command: &'static str,
    status: &'static str,
    error_class: Option<&'static str>,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

pub fn run(args: &DraftArgs) -> CommandResult {
    let result = validate_draft(&args.to_draft());
    let valid = result.is_valid();
    let report = ValidationReport {
        command: "validate",
        status: if valid { "ok" } else { "error" },
        error_class: (!valid).then_some("validation"),
        result: &result,
    };

    CommandResult::report(if valid { 0 } else { EXIT_VALIDATION }, &report)
}
