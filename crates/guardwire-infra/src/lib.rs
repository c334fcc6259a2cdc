//! Infrastructure adapters for guardwire.
//!
//! Implements the collaborator traits defined in `guardwire-core`:
//! EC2 isolation and instance lookup, SNS publishing, Slack chat posting and
//! `response_url` acknowledgments. Also owns startup configuration loading.

pub mod aws;
pub mod config;
pub mod http;
pub mod slack;
