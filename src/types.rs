use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    #[default]
    Active,
    Revoked,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Active => "active",
            CertificateStatus::Revoked => "revoked",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CertificateStatus::Active),
            "revoked" => Ok(CertificateStatus::Revoked),
            other => Err(format!("unknown certificate status: {}", other)),
        }
    }
}

/// Status as reported on an issued record
///
/// Records keep statuses this client does not know (for example legacy
/// values) instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordStatus {
    Known(CertificateStatus),
    Other(String),
}

impl RecordStatus {
    pub fn is(&self, status: CertificateStatus) -> bool {
        matches!(self, RecordStatus::Known(known) if *known == status)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Known(status) => status.as_str(),
            RecordStatus::Other(raw) => raw,
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Known(CertificateStatus::Active)
    }
}

impl From<CertificateStatus> for RecordStatus {
    fn from(status: CertificateStatus) -> Self {
        RecordStatus::Known(status)
    }
}

/// Whether a student may hold one certificate or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiplicityMode {
    Single,
    #[default]
    Multiple,
}

impl MultiplicityMode {
    pub fn from_allow_multiple(allow_multiple: bool) -> Self {
        if allow_multiple {
            MultiplicityMode::Multiple
        } else {
            MultiplicityMode::Single
        }
    }

    pub fn allows_multiple(&self) -> bool {
        matches!(self, MultiplicityMode::Multiple)
    }
}

/// Unsaved certificate record held by the builder
///
/// `certificate_url` and `handover_url` are references to assets that were
/// already uploaded; the draft never holds file contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateDraft {
    pub course_name: String,
    pub skills_learned: String,
    pub comments: String,
    pub issue_date: String,
    pub status: CertificateStatus,
    pub certificate_url: String,
    pub handover_url: String,
}

impl CertificateDraft {
    /// Fields as sent to the API; empty optionals are omitted
    pub fn to_fields(&self) -> CertificateFields {
        CertificateFields {
            course_name: self.course_name.clone(),
            skills_learned: self.skills_learned.clone(),
            comments: non_empty(&self.comments),
            issue_date: non_empty(&self.issue_date),
            status: self.status,
            certificate_url: self.certificate_url.clone(),
            handover_url: non_empty(&self.handover_url),
        }
    }
}

/// Student details shared by every certificate in a batch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentIdentity {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple_certificates: Option<bool>,
}

impl StudentIdentity {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_profile_image(mut self, url: impl Into<String>) -> Self {
        self.profile_image = Some(url.into());
        self
    }

    /// Trimmed copy with blank optionals dropped and the mode flag applied
    pub fn normalized(&self, mode: MultiplicityMode) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.as_deref().and_then(non_empty_trimmed),
            profile_image: self.profile_image.as_deref().and_then(non_empty_trimmed),
            allow_multiple_certificates: Some(mode.allows_multiple()),
        }
    }
}

/// Certificate payload of a create/update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFields {
    pub course_name: String,
    pub skills_learned: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    pub status: CertificateStatus,
    pub certificate_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover_url: Option<String>,
}

/// Body of `POST /api/admin/certificates`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCertificateRequest {
    pub student: StudentIdentity,
    pub certificate: CertificateFields,
}

/// Record returned by the API after a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: serde_json::Value,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub student_id: Option<serde_json::Value>,
}

/// Student as embedded in certificate listings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRef {
    pub id: Option<serde_json::Value>,
    pub full_name: Option<String>,
    /// Older records carry `name` instead of `fullName`
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

impl StudentRef {
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// Issued certificate as listed by the admin API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub id: serde_json::Value,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub student: Option<StudentRef>,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub skills_learned: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub certificate_url: Option<String>,
    #[serde(default)]
    pub handover_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Entry of the public student directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: serde_json::Value,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Student with all issued certificates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: serde_json::Value,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub allow_multiple_certificates: Option<bool>,
    #[serde(default)]
    pub certificates: Vec<CertificateRecord>,
}

impl StudentProfile {
    /// ID as used in API paths
    pub fn id_text(&self) -> String {
        id_text(&self.id)
    }

    /// Unset flags are treated as "multiple allowed"
    pub fn multiplicity_mode(&self) -> MultiplicityMode {
        MultiplicityMode::from_allow_multiple(self.allow_multiple_certificates.unwrap_or(true))
    }
}

/// Result of `GET /api/verify/{certificateId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub status: Option<RecordStatus>,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.is(CertificateStatus::Active))
    }

    /// Verified state, using the certificate's own status when the
    /// verification carries none
    pub fn is_verified_with(&self, certificate: &CertificateRecord) -> bool {
        self.status
            .as_ref()
            .unwrap_or(&certificate.status)
            .is(CertificateStatus::Active)
    }
}

/// Upload form context sent alongside an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContext {
    pub student_name: String,
    pub course_name: String,
    pub asset_type: AssetType,
}

/// Which draft field an uploaded asset is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Certificate,
    Handover,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Certificate => "certificateUrl",
            AssetType::Handover => "handoverUrl",
        }
    }
}

/// Render a JSON ID (number or string) as plain text
pub fn id_text(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty_trimmed(value: &str) -> Option<String> {
    non_empty(value.trim())
}
