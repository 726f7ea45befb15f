use thiserror::Error;

use crate::flows::{FlowTransitionError, WorkflowState};
use crate::validation::ValidationResult;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown region `{0}`")]
    UnknownRegion(String),
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
}

/// Rejections raised before any remote call is issued.
///
/// Remote failures never surface here; the controller folds them into
/// workflow state and message text instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("a remote call is already in flight (state {state:?})")]
    Busy { state: WorkflowState },
    #[error("draft fields cannot be edited in state {state:?}")]
    NotEditable { state: WorkflowState },
    #[error("draft failed validation on {} field(s)", .0.len())]
    Validation(ValidationResult),
    #[error(transparent)]
    Transition(#[from] FlowTransitionError),
}

impl WorkflowError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Busy { .. } => "busy",
            Self::NotEditable { .. } => "not_editable",
            Self::Validation(_) => "validation",
            Self::Transition(_) => "invalid_transition",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::draft::SubmissionDraft;
    use crate::errors::{DomainError, WorkflowError};
    use crate::flows::{FlowTransitionError, WorkflowEvent, WorkflowState};
    use crate::validation::validate_draft;

    #[test]
    fn flow_error_converts_into_domain_error() {
        let error = DomainError::from(FlowTransitionError::InvalidTransition {
            state: WorkflowState::Summary,
            event: WorkflowEvent::SubmitRequested,
        });
        assert!(error.to_string().contains("Summary"));
    }

    #[test]
    fn validation_error_reports_field_count() {
        let result = validate_draft(&SubmissionDraft::new("A", "bad", "bad", ""));
        let error = WorkflowError::Validation(result);
        assert_eq!(error.to_string(), "draft failed validation on 3 field(s)");
        assert_eq!(error.error_class(), "validation");
    }

    #[test]
    fn busy_error_names_transient_state() {
        let error = WorkflowError::Busy { state: WorkflowState::PendingCreate };
        assert!(error.to_string().contains("PendingCreate"));
        assert_eq!(error.error_class(), "busy");
    }
}
