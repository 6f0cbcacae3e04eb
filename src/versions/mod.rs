//! Store schema detection and one-time upgrade.
//!
//! On startup the store's keys are snapshotted once and classified by the
//! marker keys present:
//!
//! | marker present | version | path                          |
//! |----------------|---------|-------------------------------|
//! | `store@v4`     | V4      | bootstrap from `store@v4`     |
//! | `store@v1`     | V1      | bootstrap from `store@v1`     |
//! | neither        | V0      | legacy load, upgrade, verify  |
//!
//! Exactly one path runs per call. Every failure is caught at the top of
//! [`VersionMigrator::migrate`], logged, and returned as
//! [`MigrationOutcome::Failed`].

mod error;
pub mod v0;
pub mod v4;

pub use error::MigrationError;

use std::fmt;

use crate::state::{Action, AppState, Dispatch};
use crate::store::{KeyValueStore, StoreKeySet};

pub const STORE_V1: &str = "store@v1";
pub const STORE_V4: &str = "store@v4";
/// Reserved for a v4 revision. Recognised, but does not select a path.
pub const STORE_V4_1: &str = "store@v4-1";

/// Every marker key, none of which is ever a data record.
pub const MARKER_KEYS: &[&str] = &[STORE_V1, STORE_V4, STORE_V4_1];

/// Default text of the alert shown when the legacy upgrade cannot be verified.
pub const DEFAULT_ALERT_MESSAGE: &str = "Error: Please Backup Data and reinstall BrightId";

/// Schema version of a store, derived from its marker keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V0,
    V1,
    V4,
}

impl SchemaVersion {
    /// The snapshot namespace this version bootstraps from, if any.
    pub fn namespace(self) -> Option<&'static str> {
        match self {
            SchemaVersion::V0 => None,
            SchemaVersion::V1 => Some(STORE_V1),
            SchemaVersion::V4 => Some(STORE_V4),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaVersion::V0 => "v0",
            SchemaVersion::V1 => "v1",
            SchemaVersion::V4 => "v4",
        };
        f.write_str(name)
    }
}

/// Marker precedence. The first marker found wins, so a store carrying
/// both `store@v4` and `store@v1` is V4.
const MARKER_PRECEDENCE: &[(&str, SchemaVersion)] = &[
    (STORE_V4, SchemaVersion::V4),
    (STORE_V1, SchemaVersion::V1),
];

/// Classify a key snapshot.
pub fn classify(keys: &StoreKeySet) -> SchemaVersion {
    MARKER_PRECEDENCE
        .iter()
        .find(|(marker, _)| keys.contains(marker))
        .map(|&(_, version)| version)
        .unwrap_or(SchemaVersion::V0)
}

/// Result of a migration attempt.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// The upgrade path for this version ran to completion.
    Upgraded(SchemaVersion),
    /// Nothing to migrate (empty store).
    Skipped,
    Failed(MigrationError),
}

impl MigrationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, MigrationOutcome::Failed(_))
    }
}

/// Receives the blocking, user-visible alert raised on unrecoverable failure.
pub trait Alert {
    fn alert(&mut self, message: &str);
}

/// Collects alert messages.
impl Alert for Vec<String> {
    fn alert(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Runs the one-time upgrade for whichever schema version a store is in.
#[derive(Debug, Clone)]
pub struct VersionMigrator {
    alert_message: String,
}

impl Default for VersionMigrator {
    fn default() -> Self {
        Self {
            alert_message: DEFAULT_ALERT_MESSAGE.to_string(),
        }
    }
}

impl VersionMigrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the text of the verification-failure alert.
    pub fn with_alert_message(mut self, message: impl Into<String>) -> Self {
        self.alert_message = message.into();
        self
    }

    /// Classify `store` and run its upgrade path.
    ///
    /// Never returns an error: every failure is logged at warn level and
    /// reported as [`MigrationOutcome::Failed`].
    pub fn migrate<S, D, A>(&self, store: &S, dispatch: &mut D, alert: &mut A) -> MigrationOutcome
    where
        S: KeyValueStore + ?Sized,
        D: Dispatch + ?Sized,
        A: Alert + ?Sized,
    {
        match self.run(store, dispatch, alert) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("{}", err);
                MigrationOutcome::Failed(err)
            }
        }
    }

    fn run<S, D, A>(
        &self,
        store: &S,
        dispatch: &mut D,
        alert: &mut A,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        S: KeyValueStore + ?Sized,
        D: Dispatch + ?Sized,
        A: Alert + ?Sized,
    {
        let keys = StoreKeySet::read(store)?;
        tracing::debug!(keys = keys.len(), "store keys read");

        if keys.is_empty() {
            tracing::info!("store is empty, nothing to migrate");
            return Ok(MigrationOutcome::Skipped);
        }
        if keys.contains(STORE_V4_1) {
            tracing::debug!("{} marker present", STORE_V4_1);
        }

        let version = classify(&keys);
        tracing::info!(version = %version, "store version detected");

        if version == SchemaVersion::V4 && keys.contains(STORE_V1) {
            tracing::debug!("ignoring {} shadowed by {}", STORE_V1, STORE_V4);
        }

        match version.namespace() {
            Some(namespace) => {
                v4::bootstrap(store, namespace, dispatch)?;
                Ok(MigrationOutcome::Upgraded(version))
            }
            None => self.upgrade_legacy(store, &keys, dispatch, alert),
        }
    }

    /// Legacy path. Group and invite state is reset and ids are rewritten
    /// before verification, so a failed verification leaves those changes
    /// in place.
    fn upgrade_legacy<S, D, A>(
        &self,
        store: &S,
        keys: &StoreKeySet,
        dispatch: &mut D,
        alert: &mut A,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        S: KeyValueStore + ?Sized,
        D: Dispatch + ?Sized,
        A: Alert + ?Sized,
    {
        let user = v0::bootstrap_v0(store, dispatch)?;
        let connections = v0::load_connections(store, keys, dispatch)?;
        let apps = v0::load_apps(store, keys, dispatch)?;

        dispatch.dispatch(Action::SetGroups(Vec::new()));
        dispatch.dispatch(Action::SetInvites(Vec::new()));

        v0::upgrade_connections_and_ids(user.as_ref(), &connections.records, dispatch);

        let check = v0::verify(user.as_ref(), &connections, &apps);
        if check.passed() {
            tracing::info!(
                connections = connections.records.len(),
                apps = apps.records.len(),
                "legacy store upgraded"
            );
            return Ok(MigrationOutcome::Upgraded(SchemaVersion::V0));
        }

        tracing::warn!(
            connections = check.connections,
            user_data = check.user_data,
            apps = check.apps,
            "legacy store verification failed"
        );
        alert.alert(&self.alert_message);
        Ok(MigrationOutcome::Failed(MigrationError::VerificationFailed {
            connections: check.connections,
            user_data: check.user_data,
            apps: check.apps,
        }))
    }
}

/// Write `state` as the current snapshot, which also sets the `store@v4`
/// marker so the next run bootstraps from it.
pub fn persist_state<S>(store: &mut S, state: &AppState) -> Result<(), MigrationError>
where
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(state).map_err(|source| MigrationError::Serialize {
        namespace: STORE_V4.to_string(),
        source,
    })?;
    store.set(STORE_V4, json)?;
    tracing::debug!("state persisted to {}", STORE_V4);
    Ok(())
}
