//! Certificate API Client Module
//!
//! This module implements the HTTP client for the external certificate API.
//! The API owns persistence, authentication, certificate IDs and file storage;
//! this client only issues the REST calls and maps failures to `ApiError`.
//!
//! Every request carries the bearer token held by the shared `Session`.
//! A 401 whose structured error code names the auth token is reported as
//! `ApiError::SessionExpired` and handed to the configured interceptor.
//!
//! IDs are appended as percent-encoded path segments, so a typed ID can
//! never change which endpoint is called.

use crate::{
    CertificateDraft, CertificateRecord, CreateCertificateRequest, CreatedRecord,
    MultiplicityMode, StudentIdentity, StudentProfile, StudentSummary, UploadContext, Verification,
    api::session::{Session, SessionInterceptor},
    config::ApiConfig,
    error::{ApiError, ErrorCode},
    validation::DraftValidator,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

const LOGIN_ENDPOINT: [&str; 3] = ["api", "auth", "login"];

/// Remote create-certificate capability used by batch submission
#[async_trait]
pub trait CertificateCreator: Send + Sync {
    async fn create_certificate(
        &self,
        request: &CreateCertificateRequest,
    ) -> Result<CreatedRecord, ApiError>;
}

/// Error body returned by the API
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<ErrorCode>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// HTTP client for the certificate API
pub struct CertificateApi {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    interceptor: Option<Arc<dyn SessionInterceptor>>,
    /// Portal location the caller is on, used for the post-login redirect
    location: RwLock<String>,
}

impl CertificateApi {
    /// Creates a client for the configured API
    ///
    /// # Arguments
    /// * `config` - Base URL and request timeout
    /// * `session` - Credential context shared with the caller
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            ApiError::InvalidRequest(format!("invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL {} cannot hold paths",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
            interceptor: None,
            location: RwLock::new(String::from("/")),
        })
    }

    /// Install the hook run when the session token is rejected
    pub fn with_interceptor(mut self, interceptor: Arc<dyn SessionInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Record the portal location the caller is currently on
    pub fn set_location(&self, location: impl Into<String>) {
        *self
            .location
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = location.into();
    }

    fn location(&self) -> String {
        self.location
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Exchange the admin password for a token and store it in the session
    pub async fn login(&self, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&LOGIN_ENDPOINT)?;
        let builder = self
            .request(Method::POST, &url)
            .json(&LoginRequest { password });
        let response: LoginResponse = self.send_json(&url, builder).await?;

        self.session.set_token(response.token);
        info!("Logged in to certificate API");
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "auth", "reset-password"])?;
        let builder = self
            .request(Method::POST, &url)
            .json(&ResetPasswordRequest {
                token,
                new_password,
            });
        self.send(&url, builder).await?;
        Ok(())
    }

    pub async fn list_certificates(&self) -> Result<Vec<CertificateRecord>, ApiError> {
        self.get_json(&["api", "admin", "certificates"]).await
    }

    pub async fn get_certificate(&self, id: &str) -> Result<CertificateRecord, ApiError> {
        self.get_json(&["api", "admin", "certificates", id]).await
    }

    pub async fn update_certificate(
        &self,
        id: &str,
        request: &CreateCertificateRequest,
    ) -> Result<CertificateRecord, ApiError> {
        let url = self.endpoint(&["api", "admin", "certificates", id])?;
        let builder = self.request(Method::PUT, &url).json(request);
        self.send_json(&url, builder).await
    }

    pub async fn delete_certificate(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "admin", "certificates", id])?;
        let builder = self.request(Method::DELETE, &url);
        self.send(&url, builder).await?;
        info!("Deleted certificate {}", id);
        Ok(())
    }

    pub async fn get_student(&self, id: &str) -> Result<StudentProfile, ApiError> {
        self.get_json(&["api", "admin", "students", id]).await
    }

    /// Update a student's profile and multiplicity flag
    pub async fn update_student(
        &self,
        id: &str,
        identity: &StudentIdentity,
    ) -> Result<(), ApiError> {
        if identity.full_name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "Student full name cannot be empty.".to_string(),
            ));
        }

        let url = self.endpoint(&["api", "admin", "students", id])?;
        let body = StudentIdentity {
            full_name: identity.full_name.trim().to_string(),
            email: trimmed(identity.email.as_deref()),
            profile_image: trimmed(identity.profile_image.as_deref()),
            allow_multiple_certificates: identity.allow_multiple_certificates,
        };
        let builder = self.request(Method::PUT, &url).json(&body);
        self.send(&url, builder).await?;
        Ok(())
    }

    /// Issue one more certificate to an existing student
    ///
    /// `selected_mode` is the mode the operator currently has selected for
    /// the student. Nothing is sent while it differs from the saved mode,
    /// when a single-mode student already holds a certificate, or when the
    /// draft fails the batch builder's acceptance checks.
    pub async fn add_student_certificate(
        &self,
        student: &StudentProfile,
        selected_mode: MultiplicityMode,
        draft: &CertificateDraft,
    ) -> Result<CertificateRecord, ApiError> {
        DraftValidator::new().validate_addition(student, selected_mode, draft)?;

        let student_id = student.id_text();
        let url = self.endpoint(&["api", "admin", "students", &student_id, "certificates"])?;
        let builder = self.request(Method::POST, &url).json(&draft.to_fields());
        let record = self.send_json(&url, builder).await?;
        info!("Added certificate for student {}", student_id);
        Ok(record)
    }

    /// Public student directory
    pub async fn list_students(&self) -> Result<Vec<StudentSummary>, ApiError> {
        self.get_json(&["api", "students"]).await
    }

    /// Public lookup of a student and their certificates
    pub async fn student_certificates(&self, student_id: &str) -> Result<StudentProfile, ApiError> {
        self.get_json(&["api", "students", student_id, "certificates"])
            .await
    }

    pub async fn public_certificate(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateRecord, ApiError> {
        self.get_json(&["api", "certificates", certificate_id]).await
    }

    pub async fn verify(&self, certificate_id: &str) -> Result<Verification, ApiError> {
        self.get_json(&["api", "verify", certificate_id]).await
    }

    /// Upload an asset and return the URL to place in a draft
    pub async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        context: &UploadContext,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "uploads"])?;
        let student_name = match context.student_name.trim() {
            "" => "student",
            name => name,
        };

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("studentName", student_name.to_string())
            .text("courseName", context.course_name.clone())
            .text("assetType", context.asset_type.as_str());

        let builder = self.request(Method::POST, &url).multipart(form);
        let response: UploadResponse = self.send_json(&url, builder).await?;
        debug!("Uploaded {} as {}", file_name, response.url);
        Ok(response.url)
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidRequest(format!("base URL {} cannot hold paths", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let builder = self.request(Method::GET, &url);
        self.send_json(&url, builder).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(url, builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn is_login(&self, url: &Url) -> bool {
        self.endpoint(&LOGIN_ENDPOINT)
            .is_ok_and(|login| login.path() == url.path())
    }

    /// Send a request and turn non-success responses into `ApiError`
    async fn send(&self, url: &Url, builder: RequestBuilder) -> Result<Response, ApiError> {
        let path = url.path();
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let token_rejected = status == StatusCode::UNAUTHORIZED
            && body
                .code
                .as_ref()
                .is_some_and(|code| code.is_auth_token_error());

        if token_rejected && !self.is_login(url) {
            warn!("Certificate API rejected the session token on {}", path);
            if let Some(interceptor) = &self.interceptor {
                interceptor.on_session_expired(&self.session, &self.location());
            }
            return Err(ApiError::SessionExpired);
        }

        warn!("Certificate API returned {} on {}", status, path);
        Err(ApiError::Status {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
        })
    }
}

#[async_trait]
impl CertificateCreator for CertificateApi {
    async fn create_certificate(
        &self,
        request: &CreateCertificateRequest,
    ) -> Result<CreatedRecord, ApiError> {
        let url = self.endpoint(&["api", "admin", "certificates"])?;
        let builder = self.request(Method::POST, &url).json(request);
        self.send_json(&url, builder).await
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
