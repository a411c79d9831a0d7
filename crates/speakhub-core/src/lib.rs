//! # speakhub-core
//!
//! Core crate for the SpeakHub client engine. Contains configuration
//! schemas, typed identifiers, user roles, the domain event model
//! delivered over the course channel, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SpeakHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
