//! Integration test utilities for the NGO API
//!
//! Helpers for starting the real server against PostgreSQL and Redis and
//! driving it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
