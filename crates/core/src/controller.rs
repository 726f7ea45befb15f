//! Signup workflow controller.
//!
//! Owns the draft and the workflow state for one signup attempt and drives
//! the create → confirm → convert → enrich sequence through [`FlowEngine`].
//! Every remote outcome is folded back into state plus message text; only
//! requests rejected before a remote call is issued come back as
//! [`WorkflowError`].

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, NoopAuditSink,
};
use crate::domain::draft::{DraftField, SubmissionDraft};
use crate::domain::records::{
    ConversionResult, LeadId, LeadRecord, OpportunityId, WeatherSnapshot,
};
use crate::errors::WorkflowError;
use crate::flows::{
    FlowContext, FlowEngine, FlowTransitionError, SignupFlow, TransitionOutcome, ViewFlags,
    WorkflowEvent, WorkflowState,
};
use crate::remote::{
    Collaborators, ConvertLeadRequest, CreateLeadRequest, Notification, NotificationVariant,
    RemoteError, WeatherRequest,
};
use crate::validation::{validate_draft, ValidationResult};

pub const LEAD_NOT_CONVERTED: &str = "Lead created but not converted.";
pub const CONVERTED_GENERIC: &str = "Lead converted to Opportunity successfully!";
pub const TRANSPORT_ERROR_PREFIX: &str = "Error: ";
pub const LEAD_REJECTED_FALLBACK: &str = "Lead could not be created.";
pub const CONVERSION_REJECTED_FALLBACK: &str = "Lead could not be converted.";
pub const MISSING_LEAD_ID: &str = "Lead service reported success without a lead id.";
pub const MISSING_OPPORTUNITY_ID: &str =
    "Conversion service reported success without an opportunity id.";

const AUDIT_ACTOR: &str = "signup-controller";

pub fn converted_with_temperature(city: &str, temperature_celsius: f64) -> String {
    format!("Lead converted. Temperature in {city}: {temperature_celsius}°C")
}

fn transport_message(error: &RemoteError) -> String {
    format!("{TRANSPORT_ERROR_PREFIX}{}", error.diagnostic())
}

fn business_message(message: Option<String>, fallback: &str) -> String {
    message.filter(|message| !message.trim().is_empty()).unwrap_or_else(|| fallback.to_string())
}

enum ConversionOutcome {
    Converted(ConversionResult),
    Rejected(String),
    TransportFailed(String),
}

pub struct SignupController {
    engine: FlowEngine<SignupFlow>,
    collaborators: Collaborators,
    audit_sink: Arc<dyn AuditSink>,
    opportunity_name_suffix: Option<String>,
    state: WorkflowState,
    /// Set across each remote await. A caller that drops the driving future
    /// mid-call leaves it set, and every later operation reports `Busy`.
    in_flight: bool,
    draft: SubmissionDraft,
    errors: ValidationResult,
    server_message: String,
    correlation_id: String,
    lead: Option<LeadRecord>,
    conversion: Option<ConversionResult>,
    weather: Option<WeatherSnapshot>,
    last_notification: Option<Notification>,
}

impl SignupController {
    pub fn new(collaborators: Collaborators) -> Self {
        let engine = FlowEngine::default();
        let state = engine.initial_state();
        Self {
            engine,
            collaborators,
            audit_sink: Arc::new(NoopAuditSink),
            opportunity_name_suffix: None,
            state,
            in_flight: false,
            draft: SubmissionDraft::default(),
            errors: ValidationResult::default(),
            server_message: String::new(),
            correlation_id: Uuid::new_v4().to_string(),
            lead: None,
            conversion: None,
            weather: None,
            last_notification: None,
        }
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = sink;
        self
    }

    pub fn with_opportunity_name_suffix(mut self, suffix: Option<String>) -> Self {
        self.opportunity_name_suffix = suffix.filter(|suffix| !suffix.trim().is_empty());
        self
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn view_flags(&self) -> ViewFlags {
        self.state.view_flags()
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn server_message(&self) -> &str {
        &self.server_message
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn lead(&self) -> Option<&LeadRecord> {
        self.lead.as_ref()
    }

    pub fn lead_id(&self) -> Option<&LeadId> {
        self.lead.as_ref().map(|lead| &lead.lead_id)
    }

    pub fn conversion(&self) -> Option<&ConversionResult> {
        self.conversion.as_ref()
    }

    pub fn opportunity_id(&self) -> Option<&OpportunityId> {
        self.conversion.as_ref().map(|conversion| &conversion.opportunity_id)
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.last_notification.as_ref()
    }

    /// Writes one draft field and clears all inline errors and the server
    /// message. Only the form accepts edits.
    pub fn update_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        if self.state != WorkflowState::Form {
            return Err(WorkflowError::NotEditable { state: self.state });
        }

        self.draft.set(field, value);
        self.errors = ValidationResult::default();
        self.server_message.clear();
        Ok(())
    }

    /// Validates the draft and, when it passes, asks the lead service to
    /// create a lead. Ends in `ConfirmConversion` on success and back in
    /// `Form` on any remote failure.
    pub async fn submit(&mut self) -> Result<WorkflowState, WorkflowError> {
        self.ensure_idle()?;

        self.errors = ValidationResult::default();
        let result = validate_draft(&self.draft);
        let context = FlowContext { invalid_fields: result.fields().collect() };
        if !result.is_valid() {
            self.errors = result.clone();
            // the engine rejects the submit; this only records it in the audit trail
            let _ = self.transition(WorkflowEvent::SubmitRequested, &context);
            let fields: Vec<&str> = context.invalid_fields.iter().map(DraftField::as_str).collect();
            self.record(
                AuditEvent::new(
                    &self.audit_context(),
                    "validation.draft_rejected",
                    AuditCategory::Validation,
                    AuditOutcome::Rejected,
                )
                .with_metadata("invalid_fields", fields.join(",")),
            );
            debug!(
                event_name = "workflow.validation.rejected",
                invalid_fields = ?context.invalid_fields,
                "draft failed validation"
            );
            return Err(WorkflowError::Validation(result));
        }
        let region =
            self.draft.region().map_err(|_| WorkflowError::Validation(result.clone()))?;

        // a rejected submit must not replace the running attempt's id
        let accepted = self.engine.apply(&self.state, &WorkflowEvent::SubmitRequested, &context);
        if let Err(error) = accepted {
            let _ = self.transition(WorkflowEvent::SubmitRequested, &context);
            return Err(error.into());
        }
        self.correlation_id = Uuid::new_v4().to_string();
        self.transition(WorkflowEvent::SubmitRequested, &context)?;

        let request = CreateLeadRequest {
            name: self.draft.full_name.clone(),
            email: self.draft.email.clone(),
            phone: self.draft.phone.clone(),
            region,
        };
        info!(
            event_name = "workflow.create.started",
            correlation_id = %self.correlation_id,
            region = %region,
            "creating lead"
        );

        self.in_flight = true;
        let response = self.collaborators.leads.create_lead(&request).await;
        self.in_flight = false;

        let (outcome, failure) = match response {
            Ok(response) if response.success => match response.lead_id {
                Some(lead_id) if !lead_id.trim().is_empty() => {
                    self.lead = Some(LeadRecord {
                        lead_id: LeadId(lead_id),
                        opportunity_name: self.opportunity_name(),
                    });
                    self.server_message.clear();
                    self.record_remote("remote.create_lead", AuditOutcome::Success, None);
                    self.transition(WorkflowEvent::LeadCreated, &FlowContext::default())?;
                    info!(
                        event_name = "workflow.create.succeeded",
                        correlation_id = %self.correlation_id,
                        lead_id = %self.lead_id().map(ToString::to_string).unwrap_or_default(),
                        "lead created, awaiting conversion decision"
                    );
                    return Ok(self.state);
                }
                _ => (AuditOutcome::Rejected, MISSING_LEAD_ID.to_string()),
            },
            Ok(response) => {
                let message = business_message(response.message, LEAD_REJECTED_FALLBACK);
                info!(
                    event_name = "workflow.create.rejected",
                    correlation_id = %self.correlation_id,
                    message = %message,
                    "lead service rejected the submission"
                );
                (AuditOutcome::Rejected, message)
            }
            Err(error) => {
                warn!(
                    event_name = "workflow.create.transport_failed",
                    correlation_id = %self.correlation_id,
                    error = %error,
                    "lead creation call failed"
                );
                (AuditOutcome::Failed, transport_message(&error))
            }
        };

        self.record_remote("remote.create_lead", outcome, Some(&failure));
        self.server_message = failure;
        self.transition(WorkflowEvent::LeadCreationFailed, &FlowContext::default())?;
        Ok(self.state)
    }

    /// Converts the pending lead, then looks up weather for the returned city.
    /// Weather never decides the outcome; a failed conversion returns to
    /// `Form` rather than re-offering confirmation.
    pub async fn confirm_conversion(&mut self) -> Result<WorkflowState, WorkflowError> {
        self.ensure_idle()?;
        self.transition(WorkflowEvent::ConversionConfirmed, &FlowContext::default())?;

        let outcome = match self.lead.clone() {
            Some(lead) => self.convert(lead).await,
            None => ConversionOutcome::Rejected(MISSING_LEAD_ID.to_string()),
        };

        let conversion = match outcome {
            ConversionOutcome::Converted(conversion) => {
                self.record_remote("remote.convert_lead", AuditOutcome::Success, None);
                conversion
            }
            ConversionOutcome::Rejected(message) => {
                self.record_remote("remote.convert_lead", AuditOutcome::Rejected, Some(&message));
                self.server_message.clear();
                self.notify(Notification::failure(message));
                self.transition(WorkflowEvent::ConversionFailed, &FlowContext::default())?;
                return Ok(self.state);
            }
            ConversionOutcome::TransportFailed(message) => {
                self.record_remote("remote.convert_lead", AuditOutcome::Failed, Some(&message));
                self.server_message = message.clone();
                self.notify(Notification::failure(message));
                self.transition(WorkflowEvent::ConversionFailed, &FlowContext::default())?;
                return Ok(self.state);
            }
        };

        self.transition(WorkflowEvent::ConversionSucceeded, &FlowContext::default())?;
        let snapshot = self.enrich(&conversion).await;

        let message = match (snapshot.available, snapshot.temperature_celsius) {
            (true, Some(temperature)) => {
                converted_with_temperature(&snapshot.city_name, temperature)
            }
            _ => CONVERTED_GENERIC.to_string(),
        };
        info!(
            event_name = "workflow.convert.completed",
            correlation_id = %self.correlation_id,
            opportunity_id = %conversion.opportunity_id,
            weather_available = snapshot.available,
            "lead converted"
        );

        self.conversion = Some(conversion);
        self.weather = Some(snapshot);
        self.server_message.clear();
        self.notify(Notification::success(message));
        self.transition(WorkflowEvent::EnrichmentCompleted, &FlowContext::default())?;
        Ok(self.state)
    }

    /// Leaves the lead unconverted. No retraction call is made; the lead id
    /// stays readable.
    pub fn cancel_conversion(&mut self) -> Result<WorkflowState, WorkflowError> {
        self.ensure_idle()?;
        self.transition(WorkflowEvent::ConversionCancelled, &FlowContext::default())?;
        self.server_message = LEAD_NOT_CONVERTED.to_string();
        info!(
            event_name = "workflow.convert.cancelled",
            correlation_id = %self.correlation_id,
            "lead left unconverted"
        );
        Ok(self.state)
    }

    /// Summary → Form with a blank draft. Last-known identifiers survive for
    /// read-only display; the next submit still creates a new lead.
    pub fn back_to_form(&mut self) -> Result<WorkflowState, WorkflowError> {
        self.ensure_idle()?;
        self.transition(WorkflowEvent::BackRequested, &FlowContext::default())?;
        self.draft.clear();
        self.errors = ValidationResult::default();
        self.server_message.clear();
        Ok(self.state)
    }

    async fn convert(&mut self, lead: LeadRecord) -> ConversionOutcome {
        let request = ConvertLeadRequest {
            lead_id: lead.lead_id.0.clone(),
            opportunity_name: lead.opportunity_name.clone(),
        };
        info!(
            event_name = "workflow.convert.started",
            correlation_id = %self.correlation_id,
            lead_id = %lead.lead_id,
            "converting lead"
        );

        self.in_flight = true;
        let response = self.collaborators.conversions.convert_lead(&request).await;
        self.in_flight = false;

        match response {
            Ok(response) if response.success => match response.opportunity_id {
                Some(opportunity_id) if !opportunity_id.trim().is_empty() => {
                    let emirate_city = response
                        .emirate_city
                        .filter(|city| !city.trim().is_empty())
                        .unwrap_or_else(|| self.draft.region.clone());
                    ConversionOutcome::Converted(ConversionResult {
                        opportunity_id: OpportunityId(opportunity_id),
                        emirate_city,
                    })
                }
                _ => ConversionOutcome::Rejected(MISSING_OPPORTUNITY_ID.to_string()),
            },
            Ok(response) => {
                let message = business_message(response.message, CONVERSION_REJECTED_FALLBACK);
                info!(
                    event_name = "workflow.convert.rejected",
                    correlation_id = %self.correlation_id,
                    message = %message,
                    "conversion service rejected the lead"
                );
                ConversionOutcome::Rejected(message)
            }
            Err(error) => {
                warn!(
                    event_name = "workflow.convert.transport_failed",
                    correlation_id = %self.correlation_id,
                    error = %error,
                    "lead conversion call failed"
                );
                ConversionOutcome::TransportFailed(transport_message(&error))
            }
        }
    }

    async fn enrich(&mut self, conversion: &ConversionResult) -> WeatherSnapshot {
        let request = WeatherRequest {
            city: conversion.emirate_city.clone(),
            opportunity_id: conversion.opportunity_id.0.clone(),
        };

        self.in_flight = true;
        let response = self.collaborators.weather.weather_by_city(&request).await;
        self.in_flight = false;

        match response {
            Ok(response) => {
                let snapshot = response.snapshot(&request.city);
                let outcome =
                    if snapshot.available { AuditOutcome::Success } else { AuditOutcome::Rejected };
                self.record_remote("remote.weather_lookup", outcome, None);
                snapshot
            }
            Err(error) => {
                self.record_remote(
                    "remote.weather_lookup",
                    AuditOutcome::Failed,
                    Some(&error.to_string()),
                );
                warn!(
                    event_name = "workflow.enrich.failed",
                    correlation_id = %self.correlation_id,
                    city = %request.city,
                    error = %error,
                    "weather lookup failed, continuing without enrichment"
                );
                WeatherSnapshot::unavailable(request.city)
            }
        }
    }

    fn opportunity_name(&self) -> String {
        let name = self.draft.full_name.trim();
        match &self.opportunity_name_suffix {
            Some(suffix) => format!("{name} {}", suffix.trim()),
            None => name.to_string(),
        }
    }

    fn ensure_idle(&self) -> Result<(), WorkflowError> {
        if self.in_flight || self.state.is_transient() {
            return Err(WorkflowError::Busy { state: self.state });
        }
        Ok(())
    }

    fn audit_context(&self) -> AuditContext {
        AuditContext::new(self.lead_id().cloned(), self.correlation_id.clone(), AUDIT_ACTOR)
    }

    fn record(&self, event: AuditEvent) {
        self.audit_sink.emit(event);
    }

    fn record_remote(&self, event_type: &str, outcome: AuditOutcome, message: Option<&str>) {
        let mut event =
            AuditEvent::new(&self.audit_context(), event_type, AuditCategory::Remote, outcome);
        if let Some(message) = message {
            event = event.with_metadata("message", message);
        }
        self.record(event);
    }

    fn notify(&mut self, notification: Notification) {
        let variant = match notification.variant {
            NotificationVariant::Success => "success",
            NotificationVariant::Error => "error",
        };
        self.record(
            AuditEvent::new(
                &self.audit_context(),
                "notification.sent",
                AuditCategory::Notification,
                AuditOutcome::Success,
            )
            .with_metadata("variant", variant)
            .with_metadata("title", notification.title.as_str()),
        );
        self.collaborators.notifications.notify(notification.clone());
        self.last_notification = Some(notification);
    }

    fn transition(
        &mut self,
        event: WorkflowEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        let audit = self.audit_context();
        let outcome = self.engine.apply_with_audit(
            &self.state,
            &event,
            context,
            self.audit_sink.as_ref(),
            &audit,
        )?;
        debug!(
            event_name = "workflow.transition",
            correlation_id = %self.correlation_id,
            from = ?outcome.from,
            to = ?outcome.to,
            event = ?outcome.event,
            actions = ?outcome.actions,
            "workflow transition applied"
        );
        self.state = outcome.to;
        Ok(outcome)
    }
}
