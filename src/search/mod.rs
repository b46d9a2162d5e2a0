//! Search Module
//!
//! Derived views over lists already fetched from the certificate API:
//! - CertificateFilter: dashboard search by text and status
//! - filter_students: public directory search
//! - CertificateStats: active/revoked counts for a student
//!
//! Filters never mutate their input and keep the original order.

mod filter;

pub use filter::{CertificateFilter, CertificateStats, StatusFilter, filter_students, split_skills};
