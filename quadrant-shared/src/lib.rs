//! # Quadrant Shared Library
//!
//! This crate contains the types, storage abstractions, and database layer
//! used by the Quadrant API server and migration command.
//!
//! ## Module Organization
//!
//! - `models`: Task and user models, Eisenhower quadrant math
//! - `repo`: The `TaskRepository` trait plus PostgreSQL and in-memory stores
//! - `db`: Connection pool and the schema migration runner

pub mod db;
pub mod models;
pub mod repo;

/// Current version of the quadrant shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
