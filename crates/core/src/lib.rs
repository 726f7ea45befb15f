pub mod audit;
pub mod config;
pub mod controller;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod remote;
pub mod validation;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink};
pub use controller::SignupController;
pub use domain::draft::{DraftField, Region, SubmissionDraft};
pub use domain::records::{
    ConversionResult, LeadId, LeadRecord, OpportunityId, WeatherSnapshot,
};
pub use errors::{DomainError, WorkflowError};
pub use flows::{FlowEngine, SignupFlow, ViewFlags, WorkflowState};
pub use remote::{
    Collaborators, ConversionService, LeadService, Notification, NotificationSink,
    NotificationVariant, RemoteError, WeatherService,
};
pub use validation::{validate_draft, ValidationResult};
