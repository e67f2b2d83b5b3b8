//! # Quadrant API Server Library
//!
//! Read-only HTTP API over a task collection organized by the Eisenhower
//! decision matrix.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
