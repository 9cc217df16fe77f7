//! Middleware components for the HTTP intake

pub mod logging;
