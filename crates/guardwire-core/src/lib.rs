//! Request verification, quarantine dispatch and alert shaping for guardwire.
//!
//! Collaborators (cloud APIs, chat provider) are expressed as traits here and
//! implemented in `guardwire-infra`. This crate depends only on
//! `guardwire-types` and performs no I/O of its own.

pub mod action;
pub mod alert;
pub mod webhook;
