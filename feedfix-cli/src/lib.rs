//! Command-line interface and HTTP server for `feedfix`.
//!
//! The binary wires the `feedfix` validation engine to its collaborators:
//! feed retrieval ([`fetch`], [`pipeline`]), the HTTP route layer
//! ([`server`]) and request logging ([`logging`]).

pub mod cli;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod server;
