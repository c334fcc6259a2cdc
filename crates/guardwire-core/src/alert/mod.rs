//! Alert pipeline: finding -> enrichment -> formatted notification -> sinks.

pub mod blocks;
pub mod enrichment;
pub mod formatter;
pub mod pipeline;
pub mod sink;

pub use blocks::chat_message;
pub use enrichment::{Enrichment, ResourceMetadataSource};
pub use formatter::{console_link, render_message, sanitize_subject, subject};
pub use pipeline::{AlertPipeline, AlertReport};
pub use sink::{ChatNotifier, NotificationBus};
