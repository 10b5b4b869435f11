//! API module
//!
//! Contains HTTP request handlers for the weather endpoints and the framework API

pub mod framework;
pub mod validation;
pub mod weather;
