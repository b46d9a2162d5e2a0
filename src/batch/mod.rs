//! Certificate Batch Module
//!
//! This module stages and submits certificates for one student:
//! - DraftBatchBuilder: compose, edit and remove drafts under the multiplicity policy
//! - submit: sequential creation of every accepted draft

mod builder;
mod submit;


pub use builder::{BuilderState, DraftBatchBuilder, DraftField};
pub use submit::submit_sequentially;
