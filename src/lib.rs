//! Weather Agent Server Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod registry;
pub mod server;
/// Application state shared with handlers
pub mod state;
pub mod weather;
pub mod workflow;
