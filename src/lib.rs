//! Core library for the `aismoke` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration parsing, the fixed smoke scenario, request
//! execution, and console reporting. The primary user-facing interface is
//! the `aismoke` command-line application; library APIs may evolve as the
//! CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod report;
pub mod run;
pub mod scenario;
