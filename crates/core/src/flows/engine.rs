use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::draft::DraftField;
use crate::flows::states::{
    FlowContext, TransitionOutcome, WorkflowAction, WorkflowEvent, WorkflowState,
};

pub trait FlowDefinition {
    fn initial_state(&self) -> WorkflowState;
    fn transition(
        &self,
        current: &WorkflowState,
        event: &WorkflowEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// Form → lead → opportunity signup flow.
#[derive(Clone, Debug, Default)]
pub struct SignupFlow;

impl FlowDefinition for SignupFlow {
    fn initial_state(&self) -> WorkflowState {
        WorkflowState::Form
    }

    fn transition(
        &self,
        current: &WorkflowState,
        event: &WorkflowEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_signup(current, event, context)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> WorkflowState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &WorkflowState,
        event: &WorkflowEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event, context)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: &WorkflowState,
        event: &WorkflowEvent,
        context: &FlowContext,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, event, context);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_applied",
                        AuditCategory::Flow,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", format!("{:?}", outcome.from))
                    .with_metadata("to", format!("{:?}", outcome.to))
                    .with_metadata("event", format!("{:?}", outcome.event)),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_rejected",
                        AuditCategory::Flow,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

impl Default for FlowEngine<SignupFlow> {
    fn default() -> Self {
        Self::new(SignupFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("draft has invalid fields in state {state:?}: {invalid_fields:?}")]
    ValidationFailed { state: WorkflowState, invalid_fields: Vec<DraftField> },
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: WorkflowState, event: WorkflowEvent },
}

fn transition_signup(
    current: &WorkflowState,
    event: &WorkflowEvent,
    context: &FlowContext,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use WorkflowAction::{
        ClearServerMessage, InvokeConversion, InvokeLeadCreation, InvokeWeatherLookup,
        NotifyFailure, NotifySuccess, ResetDraft, StoreLeadId, SurfaceServerMessage,
    };
    use WorkflowEvent::{
        BackRequested, ConversionCancelled, ConversionConfirmed, ConversionFailed,
        ConversionSucceeded, EnrichmentCompleted, LeadCreated, LeadCreationFailed,
        SubmitRequested,
    };
    use WorkflowState::{ConfirmConversion, Converting, Form, PendingCreate, Summary};

    let (to, actions) = match (current, event) {
        (Form, SubmitRequested) => {
            if !context.invalid_fields.is_empty() {
                return Err(FlowTransitionError::ValidationFailed {
                    state: *current,
                    invalid_fields: context.invalid_fields.clone(),
                });
            }
            (PendingCreate, vec![InvokeLeadCreation])
        }
        (PendingCreate, LeadCreated) => (ConfirmConversion, vec![StoreLeadId, ClearServerMessage]),
        (PendingCreate, LeadCreationFailed) => (Form, vec![SurfaceServerMessage]),
        (ConfirmConversion, ConversionConfirmed) => (Converting, vec![InvokeConversion]),
        (ConfirmConversion, ConversionCancelled) => (Form, vec![SurfaceServerMessage]),
        (Converting, ConversionSucceeded) => (Converting, vec![InvokeWeatherLookup]),
        (Converting, EnrichmentCompleted) => (Summary, vec![NotifySuccess, ClearServerMessage]),
        (Converting, ConversionFailed) => (Form, vec![NotifyFailure]),
        (Summary, BackRequested) => (Form, vec![ResetDraft]),
        _ => {
            return Err(FlowTransitionError::InvalidTransition { state: *current, event: *event });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}
