use serde::{Deserialize, Serialize};

use crate::domain::draft::DraftField;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Form,
    PendingCreate,
    ConfirmConversion,
    Converting,
    Summary,
}

impl WorkflowState {
    /// States that exist only while a remote call is outstanding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::PendingCreate | Self::Converting)
    }

    pub fn view_flags(&self) -> ViewFlags {
        ViewFlags {
            show_form: matches!(self, Self::Form | Self::PendingCreate),
            show_conversion_prompt: matches!(self, Self::ConfirmConversion),
            loading: self.is_transient(),
            show_summary: matches!(self, Self::Summary),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    SubmitRequested,
    LeadCreated,
    LeadCreationFailed,
    ConversionConfirmed,
    ConversionCancelled,
    ConversionSucceeded,
    ConversionFailed,
    EnrichmentCompleted,
    BackRequested,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowContext {
    pub invalid_fields: Vec<DraftField>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    InvokeLeadCreation,
    StoreLeadId,
    ClearServerMessage,
    SurfaceServerMessage,
    InvokeConversion,
    InvokeWeatherLookup,
    NotifySuccess,
    NotifyFailure,
    ResetDraft,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WorkflowState,
    pub to: WorkflowState,
    pub event: WorkflowEvent,
    pub actions: Vec<WorkflowAction>,
}

/// Visibility hints for the view layer. Always derived from the current
/// [`WorkflowState`], never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewFlags {
    pub show_form: bool,
    pub show_conversion_prompt: bool,
    pub loading: bool,
    pub show_summary: bool,
}
