//! API Module
//!
//! This module talks to the external certificate API:
//! - `CertificateApi`: REST client for certificates, students, uploads and verification
//! - `CertificateCreator`: the create capability consumed by batch submission
//! - `Session` and `SessionInterceptor`: explicit credentials and session-expiry handling

mod client;
pub mod session;

pub use client::{CertificateApi, CertificateCreator};
pub use session::{LogNavigator, Navigator, RedirectToLogin, Session, SessionInterceptor};
