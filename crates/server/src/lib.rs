//! HTTP surface for cachescout.
//!
//! The binary in `main.rs` wires configuration and logging; everything the
//! router needs lives here so tests can build it in-process.

pub mod api;
pub mod metrics;
pub mod state;
