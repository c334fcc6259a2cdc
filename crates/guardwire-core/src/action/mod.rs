//! Action pipeline: authenticated operator request -> isolation.

pub mod executor;
pub mod pipeline;

pub use executor::{AcknowledgmentSender, IsolationExecutor};
pub use pipeline::{ActionPipeline, ActionStage};
