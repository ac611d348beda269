// ABOUTME: Library root for edgesite - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod provider;
pub mod provision;
pub mod publish;
pub mod types;
