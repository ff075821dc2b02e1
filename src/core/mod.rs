//! Core business logic - framework-agnostic invoice operations.
//!
//! Nothing in here knows about HTTP; handlers call these functions and translate
//! the returned [`crate::errors::Error`] into responses.

/// Invoice CRUD operations against the store
pub mod invoice;
/// Payload validation into typed drafts
pub mod validation;
