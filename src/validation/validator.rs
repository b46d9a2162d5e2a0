use crate::{
    CertificateDraft, MultiplicityMode, StudentIdentity, StudentProfile,
    error::{DraftError, RequiredField, SubmitError},
};
use tracing::{debug, warn};

pub struct DraftValidator;

impl DraftValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a draft before it is accepted into the batch
    /// Checks run in a fixed order and the first failure wins
    pub fn validate(&self, draft: &CertificateDraft) -> Result<(), DraftError> {
        debug!("Validating draft for course {:?}", draft.course_name);

        // 1. Course name
        Self::require(
            &draft.course_name,
            RequiredField::CourseName,
            "Course name is required.",
        )?;

        // 2. Skills learned
        Self::require(
            &draft.skills_learned,
            RequiredField::SkillsLearned,
            "Skills learned are required.",
        )?;

        // 3. Uploaded certificate image
        Self::require(
            &draft.certificate_url,
            RequiredField::CertificateUrl,
            "Please upload the certificate image.",
        )?;

        Ok(())
    }

    /// Check a certificate being added to an existing student
    ///
    /// `selected_mode` is the mode currently chosen for the student; the
    /// saved profile must already carry it.
    pub fn validate_addition(
        &self,
        student: &StudentProfile,
        selected_mode: MultiplicityMode,
        draft: &CertificateDraft,
    ) -> Result<(), DraftError> {
        let saved_mode = student.multiplicity_mode();

        // 1. Unsaved mode change
        if selected_mode != saved_mode {
            warn!(
                "Addition rejected for student {}: mode change not saved",
                student.id_text()
            );
            return Err(DraftError::ModeChangePending);
        }

        // 2. Single-certificate limit
        if saved_mode == MultiplicityMode::Single && !student.certificates.is_empty() {
            warn!(
                "Addition rejected for student {}: already holds a certificate",
                student.id_text()
            );
            return Err(DraftError::CapacityExceeded);
        }

        // 3. Draft fields
        self.validate(draft)
    }

    /// Check the preconditions of a batch submission
    pub fn validate_submission(
        &self,
        student: &StudentIdentity,
        drafts: &[CertificateDraft],
    ) -> Result<(), SubmitError> {
        if student.full_name.trim().is_empty() {
            warn!("Submission rejected: missing student name");
            return Err(SubmitError::MissingStudentName);
        }

        if drafts.is_empty() {
            warn!("Submission rejected: batch is empty");
            return Err(SubmitError::EmptyBatch);
        }

        if let Some(index) = drafts.iter().position(|d| d.certificate_url.is_empty()) {
            warn!("Submission rejected: certificate {} has no image", index + 1);
            return Err(SubmitError::IncompleteDraft { index });
        }

        Ok(())
    }

    fn require(value: &str, field: RequiredField, reason: &'static str) -> Result<(), DraftError> {
        if value.trim().is_empty() {
            warn!("Draft validation failed on {}", field);
            return Err(DraftError::ValidationFailed { field, reason });
        }
        Ok(())
    }
}

impl Default for DraftValidator {
    fn default() -> Self {
        Self::new()
    }
}
