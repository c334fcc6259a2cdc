//! Shared domain types for guardwire.
//!
//! This crate contains the data model shared by both request pipelines:
//! threat-detection findings, instance metadata, the inbound interactive
//! request and its derived payload, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod action;
pub mod config;
pub mod delivery;
pub mod error;
pub mod finding;
pub mod resource;
pub mod webhook;
