//! HTTP request handlers.

pub mod action;
pub mod finding;
pub mod gateway;
pub mod health;
