//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply the storage retry policy in one place.

pub mod car_service;
pub mod retry;
