//! Migration errors.

use crate::store::StoreError;

/// Why a migration attempt failed.
///
/// Every variant renders a non-empty message, which is what gets logged
/// and shown to the caller.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("store access failed: {0}")]
    Store(#[from] StoreError),

    #[error("namespace `{0}` has no persisted state")]
    MissingNamespace(String),

    #[error("persisted state in `{namespace}` is not valid: {source}")]
    InvalidState {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize state for `{namespace}`: {source}")]
    Serialize {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("migration verification failed")]
    VerificationFailed {
        connections: bool,
        user_data: bool,
        apps: bool,
    },
}
