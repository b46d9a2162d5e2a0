//! This crate implements the client side of a certificate management portal.
//! It stages a student's certificates as validated drafts, submits them to the
//! external certificate API, and provides the search views used by the admin
//! dashboard and the public lookup pages.

pub mod types; // Certificate, student and API payload types.
pub mod error; // Typed failures for drafts, submission and API calls.
pub mod validation; // Draft acceptance rules and submission preconditions.
pub mod batch; // Draft batch builder and sequential submission.
pub mod api; // HTTP client, session and session-expiry handling.
pub mod search; // Filters and stats over fetched lists.
pub mod config; // Defines and loads configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use batch::DraftBatchBuilder;
