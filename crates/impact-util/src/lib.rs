//! Shared utilities for impact.
//!
//! This crate holds the cross-cutting error type used by the binary and any
//! front end that embeds the resolver.

pub mod errors;
