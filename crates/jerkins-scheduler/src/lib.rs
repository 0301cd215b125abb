//! Build orchestration for jerkins.
//!
//! Fills in job parameters from the working copy, submits the build to a
//! remote job queue, waits for it to finish and reports the outcome.
//! Progress is emitted as [`BuildEvent`]s into an injected [`EventSink`].

pub mod events;
pub mod orchestrator;
pub mod reporter;
pub mod resolver;

pub use events::{BuildEvent, EventSink, TracingSink};
pub use orchestrator::{BuildOrchestrator, DEFAULT_POLL_INTERVAL};
pub use reporter::OutcomeReporter;
pub use resolver::ParameterResolver;
