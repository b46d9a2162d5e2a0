//! Batch Submission Module
//!
//! Sends the drafts of a batch to the certificate API strictly in order.
//! Each create call is awaited before the next one starts, so the first
//! failure identifies exactly which draft was not saved.
//!
//! Submission is not transactional: drafts created before a failure stay
//! created and are returned inside the error.

use crate::{
    CertificateDraft, CreateCertificateRequest, CreatedRecord, StudentIdentity,
    api::CertificateCreator, error::SubmitError,
};
use tracing::{debug, info, warn};

/// Create one certificate per draft, stopping at the first failure
///
/// # Arguments
/// * `student` - Normalized identity shared by every certificate
/// * `drafts` - Accepted drafts in submission order
/// * `creator` - Remote create capability
///
/// # Returns
/// * `Ok(records)` with one record per draft, in order
/// * `Err(SubmitError::ExternalCallFailed)` with the failing index and the records created before it
pub async fn submit_sequentially<C>(
    student: &StudentIdentity,
    drafts: &[CertificateDraft],
    creator: &C,
) -> Result<Vec<CreatedRecord>, SubmitError>
where
    C: CertificateCreator + ?Sized,
{
    info!(
        "Submitting {} certificates for {}",
        drafts.len(),
        student.full_name
    );

    let mut created = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        let request = CreateCertificateRequest {
            student: student.clone(),
            certificate: draft.to_fields(),
        };

        match creator.create_certificate(&request).await {
            Ok(record) => {
                debug!("Certificate {} created: {:?}", index + 1, record.certificate_id);
                created.push(record);
            }
            Err(source) => {
                warn!(
                    "Certificate {} of {} failed after {} succeeded: {}",
                    index + 1,
                    drafts.len(),
                    created.len(),
                    source
                );
                return Err(SubmitError::ExternalCallFailed {
                    index,
                    created,
                    source,
                });
            }
        }
    }

    Ok(created)
}
