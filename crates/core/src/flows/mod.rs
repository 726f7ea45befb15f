pub mod engine;
pub mod states;

pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, SignupFlow};
pub use states::{
    FlowContext, TransitionOutcome, ViewFlags, WorkflowAction, WorkflowEvent, WorkflowState,
};
