//! Bootstrap from a persisted state snapshot (`store@v1`, `store@v4`).
//!
//! Both namespaces hold the same JSON shape. Top-level slices that are not
//! modelled here (including v1-only fields) are hydrated as opaque JSON so
//! they are written back unchanged.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::MigrationError;
use crate::state::{
    Action, App, ConnectionsSnapshot, Dispatch, Group, Invite, UserState,
};
use crate::store::KeyValueStore;

/// Wire shape of a persisted snapshot. Slices are optional so a partial
/// snapshot only hydrates what it has.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    user: Option<UserState>,
    #[serde(default)]
    connections: ConnectionsSnapshot,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    invites: Vec<Invite>,
    #[serde(default)]
    apps: Vec<App>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Hydrate application state from the snapshot stored under `namespace`.
pub fn bootstrap<S, D>(store: &S, namespace: &str, dispatch: &mut D) -> Result<(), MigrationError>
where
    S: KeyValueStore + ?Sized,
    D: Dispatch + ?Sized,
{
    let raw = store
        .get(namespace)?
        .ok_or_else(|| MigrationError::MissingNamespace(namespace.to_string()))?;

    let persisted: PersistedState =
        serde_json::from_str(&raw).map_err(|source| MigrationError::InvalidState {
            namespace: namespace.to_string(),
            source,
        })?;

    tracing::debug!(
        namespace,
        groups = persisted.groups.len(),
        apps = persisted.apps.len(),
        unmodelled = persisted.extra.len(),
        "bootstrapping from snapshot"
    );

    if let Some(user) = persisted.user {
        dispatch.dispatch(Action::HydrateUser(user));
    }
    dispatch.dispatch(Action::HydrateConnections(persisted.connections));
    dispatch.dispatch(Action::SetGroups(persisted.groups));
    dispatch.dispatch(Action::SetInvites(persisted.invites));
    dispatch.dispatch(Action::SetApps(persisted.apps));
    if !persisted.extra.is_empty() {
        dispatch.dispatch(Action::HydrateExtra(persisted.extra));
    }
    Ok(())
}
