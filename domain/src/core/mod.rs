//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — text-generation models the agents can be bound to
//! - [`question::Question`] — a clarifying question issued to the user
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;
