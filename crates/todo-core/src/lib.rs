//! # todo-core
//!
//! Shared plumbing for the to-do crates.
//!
//! - **Logging**: [`logging::init_from_settings`] installs the process-wide
//!   `tracing` subscriber; [`logging::capture_logs`] records events in memory
//!   so tests can assert on what a component reported.

#![deny(unsafe_code)]

pub mod logging;
