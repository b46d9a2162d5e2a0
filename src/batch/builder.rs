//! Draft Batch Builder Module
//!
//! This module implements the staging area for one student's certificates.
//! Drafts are composed one at a time in a scratch copy, validated, and only
//! then accepted into an ordered batch. The batch is submitted as a whole.
//!
//! # States
//! - **Compose**: the scratch draft is new and not yet in the batch
//! - **Edit(i)**: the scratch draft is a copy of `drafts[i]`
//!
//! Accepting or cancelling always returns to Compose with a blank scratch.

use crate::{
    CertificateDraft, CertificateStatus, CreatedRecord, MultiplicityMode, StudentIdentity,
    api::CertificateCreator,
    batch::submit::submit_sequentially,
    error::{DraftError, SubmitError},
    validation::DraftValidator,
};
use tracing::{debug, info, warn};

/// Single-field update to the scratch draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    CourseName(String),
    SkillsLearned(String),
    Comments(String),
    IssueDate(String),
    Status(CertificateStatus),
    CertificateUrl(String),
    HandoverUrl(String),
}

/// Which draft the scratch copy belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Compose,
    Edit(usize),
}

/// Builder for a batch of certificate drafts
///
/// Invariants:
/// - in single mode the batch never holds more than one draft
/// - `active_index`, when set, points inside `drafts`
/// - every entry of `drafts` passed validation when it was accepted
pub struct DraftBatchBuilder {
    /// Accepted drafts, in display and submission order
    drafts: Vec<CertificateDraft>,
    /// Draft being edited, `None` while composing a new one
    active_index: Option<usize>,
    /// Working copy shown to the operator
    scratch: CertificateDraft,
    multiplicity_mode: MultiplicityMode,
    validator: DraftValidator,
}

impl DraftBatchBuilder {
    /// Creates an empty builder in Compose state allowing multiple certificates
    pub fn new() -> Self {
        Self {
            drafts: Vec::new(),
            active_index: None,
            scratch: CertificateDraft::default(),
            multiplicity_mode: MultiplicityMode::Multiple,
            validator: DraftValidator::new(),
        }
    }

    /// Creates an empty builder starting in the given mode
    pub fn with_mode(mode: MultiplicityMode) -> Self {
        let mut builder = Self::new();
        builder.multiplicity_mode = mode;
        builder
    }

    pub fn drafts(&self) -> &[CertificateDraft] {
        &self.drafts
    }

    pub fn scratch(&self) -> &CertificateDraft {
        &self.scratch
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn multiplicity_mode(&self) -> MultiplicityMode {
        self.multiplicity_mode
    }

    pub fn state(&self) -> BuilderState {
        match self.active_index {
            Some(index) => BuilderState::Edit(index),
            None => BuilderState::Compose,
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Whether accepting the scratch would be allowed by the multiplicity policy
    pub fn can_add(&self) -> bool {
        !self.single_limit_reached()
    }

    /// Switch between single and multiple certificates
    ///
    /// Switching to single keeps only the earliest draft. An edit pointing
    /// past the kept draft is cancelled.
    pub fn set_multiplicity_mode(&mut self, mode: MultiplicityMode) {
        self.multiplicity_mode = mode;

        if mode == MultiplicityMode::Single && self.drafts.len() > 1 {
            let discarded = self.drafts.len() - 1;
            self.drafts.truncate(1);
            info!("Single certificate mode: discarded {} later drafts", discarded);

            if self.active_index.is_some_and(|i| i >= self.drafts.len()) {
                self.reset_scratch();
            }
        }
    }

    /// Apply one field update to the scratch draft
    pub fn update_scratch(&mut self, field: DraftField) {
        let scratch = &mut self.scratch;
        match field {
            DraftField::CourseName(value) => scratch.course_name = value,
            DraftField::SkillsLearned(value) => scratch.skills_learned = value,
            DraftField::Comments(value) => scratch.comments = value,
            DraftField::IssueDate(value) => scratch.issue_date = value,
            DraftField::Status(status) => scratch.status = status,
            DraftField::CertificateUrl(value) => scratch.certificate_url = value,
            DraftField::HandoverUrl(value) => scratch.handover_url = value,
        }
    }

    /// Validate the scratch draft and put it into the batch
    ///
    /// Appends while composing, replaces `drafts[i]` while editing, then
    /// returns to Compose with a blank scratch. Nothing changes on error.
    pub fn accept_draft(&mut self) -> Result<(), DraftError> {
        if self.single_limit_reached() {
            warn!("Rejected draft: single certificate mode already holds one");
            return Err(DraftError::CapacityExceeded);
        }

        self.validator.validate(&self.scratch)?;

        let draft = std::mem::take(&mut self.scratch);
        match self.active_index.take() {
            None => {
                self.drafts.push(draft);
                debug!("Added certificate {}", self.drafts.len());
            }
            Some(index) => {
                self.drafts[index] = draft;
                debug!("Updated certificate {}", index + 1);
            }
        }

        Ok(())
    }

    /// Start editing `drafts[index]`
    pub fn edit_draft(&mut self, index: usize) -> Result<(), DraftError> {
        let draft = self.drafts.get(index).ok_or(DraftError::IndexOutOfRange {
            index,
            len: self.drafts.len(),
        })?;

        self.scratch = draft.clone();
        self.active_index = Some(index);
        debug!("Editing certificate {}", index + 1);
        Ok(())
    }

    /// Remove `drafts[index]` and return it
    ///
    /// Removing the draft under edit cancels the edit. An edit of a later
    /// draft keeps pointing at the same draft.
    pub fn remove_draft(&mut self, index: usize) -> Result<CertificateDraft, DraftError> {
        if index >= self.drafts.len() {
            return Err(DraftError::IndexOutOfRange {
                index,
                len: self.drafts.len(),
            });
        }

        let removed = self.drafts.remove(index);
        match self.active_index {
            Some(active) if active == index => self.reset_scratch(),
            Some(active) if active > index => self.active_index = Some(active - 1),
            _ => {}
        }

        debug!("Removed certificate {}", index + 1);
        Ok(removed)
    }

    /// Drop the edit in progress; no effect while composing
    pub fn cancel_edit(&mut self) {
        if self.active_index.is_some() {
            self.reset_scratch();
        }
    }

    /// Submit every draft for `student`, one create call at a time
    ///
    /// On success the builder is reset for the next student, keeping its
    /// multiplicity mode. On failure the builder is left untouched, so a
    /// retry resubmits the whole batch, including drafts already created.
    pub async fn submit_batch<C>(
        &mut self,
        student: &StudentIdentity,
        creator: &C,
    ) -> Result<Vec<CreatedRecord>, SubmitError>
    where
        C: CertificateCreator + ?Sized,
    {
        self.validator.validate_submission(student, &self.drafts)?;

        let identity = student.normalized(self.multiplicity_mode);
        let created = submit_sequentially(&identity, &self.drafts, creator).await?;

        info!(
            "Saved {} certificates for {}",
            created.len(),
            identity.full_name
        );
        self.reset();
        Ok(created)
    }

    /// Return to the initial state, keeping the multiplicity mode
    pub fn reset(&mut self) {
        self.drafts.clear();
        self.reset_scratch();
    }

    fn reset_scratch(&mut self) {
        self.scratch = CertificateDraft::default();
        self.active_index = None;
    }

    fn single_limit_reached(&self) -> bool {
        self.multiplicity_mode == MultiplicityMode::Single
            && !self.drafts.is_empty()
            && self.active_index.is_none()
    }
}

impl Default for DraftBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
