use anyhow::{Context, bail};
use certdesk::{
    CertificateDraft, DraftBatchBuilder, MultiplicityMode, StudentIdentity,
    api::{CertificateApi, LogNavigator, RedirectToLogin, Session},
    batch::DraftField,
    config::Config,
    error::SubmitError,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Intake manifest: one student and the certificates to issue
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntakeManifest {
    student: StudentIdentity,
    #[serde(default)]
    allow_multiple: Option<bool>,
    certificates: Vec<CertificateDraft>,
}

/// Entry point of the `certdesk` intake tool.
///
/// Usage: `certdesk <manifest.json> [config.toml]`
///
/// Stages every certificate of the manifest through the draft builder,
/// then submits the batch to the certificate API. The bearer token is
/// read from `CERTDESK_TOKEN`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(manifest_path) = args.next() else {
        bail!("usage: certdesk <manifest.json> [config.toml]");
    };
    let config_path = args
        .next()
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path))?;
    info!("certdesk starting with config: {:?}", config);

    let manifest: IntakeManifest = serde_json::from_str(
        &std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("reading manifest {}", manifest_path))?,
    )
    .context("parsing intake manifest")?;

    let mode = MultiplicityMode::from_allow_multiple(
        manifest
            .allow_multiple
            .unwrap_or(config.intake.allow_multiple),
    );
    let mut builder = DraftBatchBuilder::with_mode(mode);
    for (index, draft) in manifest.certificates.into_iter().enumerate() {
        stage(&mut builder, draft);
        if let Err(e) = builder.accept_draft() {
            bail!("certificate {}: {}", index + 1, e);
        }
    }
    info!("Staged {} certificates", builder.len());

    let session = Arc::new(match std::env::var("CERTDESK_TOKEN") {
        Ok(token) => Session::with_token(token),
        Err(_) => {
            warn!("CERTDESK_TOKEN is not set, calling the API without a token");
            Session::new()
        }
    });
    let api = CertificateApi::new(&config.api, session)?
        .with_interceptor(Arc::new(RedirectToLogin::new(LogNavigator)));
    api.set_location("/admin/create");

    match builder.submit_batch(&manifest.student, &api).await {
        Ok(created) => {
            for record in &created {
                info!(
                    "Created certificate {}",
                    record.certificate_id.as_deref().unwrap_or("(no id)")
                );
            }
            Ok(())
        }
        Err(e @ SubmitError::ExternalCallFailed { .. }) => {
            error!(
                "{} certificates were saved before the failure; a retry resubmits all of them",
                e.succeeded()
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Copy a manifest draft into the builder's scratch field by field
fn stage(builder: &mut DraftBatchBuilder, draft: CertificateDraft) {
    builder.update_scratch(DraftField::CourseName(draft.course_name));
    builder.update_scratch(DraftField::SkillsLearned(draft.skills_learned));
    builder.update_scratch(DraftField::Comments(draft.comments));
    builder.update_scratch(DraftField::IssueDate(draft.issue_date));
    builder.update_scratch(DraftField::Status(draft.status));
    builder.update_scratch(DraftField::CertificateUrl(draft.certificate_url));
    builder.update_scratch(DraftField::HandoverUrl(draft.handover_url));
}
