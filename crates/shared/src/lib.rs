//! Shared types, errors, and configuration for the OpenBank ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money in integer minor currency units, with rounding policies
//! - Typed IDs for type-safe record references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;


pub use config::AppConfig;
pub use error::AppError;
