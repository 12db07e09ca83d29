//! HTTP request handlers
//!
//! Each module handles one area of the API. Role checks happen here, per route.

pub mod admin;
pub mod auth;
pub mod donations;
pub mod health;
pub mod schools;
pub mod volunteers;
