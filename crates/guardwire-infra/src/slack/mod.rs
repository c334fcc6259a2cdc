//! Slack adapters: channel posts via the Web API and interaction
//! acknowledgments via `response_url`.

pub mod client;
pub mod response_url;

pub use client::SlackClient;
pub use response_url::ResponseUrlAcknowledger;
