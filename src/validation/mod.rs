//! Draft Validation Module
//!
//! This module checks drafts before they enter the batch and checks the
//! batch as a whole before it is submitted.

mod validator;
pub use validator::DraftValidator;
