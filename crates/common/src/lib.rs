//! Common utilities and types shared across the jwt-generator workspace.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for compact JWT constants and segment decoding
pub mod jwt;

/// Module for tracing subscriber setup
pub mod observability;
