use thiserror::Error;

/// User-facing failures of the prompt workflow.
///
/// Network errors, bad statuses and malformed payloads all fold into
/// `RequestFailed`: the user sees one message, the cause goes to the log.
/// Clipboard trouble is deliberately not represented here; copying is
/// best-effort and never blocks the review flow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No session identifier was supplied. No request was attempted.
    #[error("missing sipId")]
    MissingIdentifier,

    /// The generate request failed or returned an unusable payload.
    #[error("failed to generate prompts")]
    RequestFailed(#[source] anyhow::Error),
}
