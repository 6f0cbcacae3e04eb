//! Legacy (unversioned) store layout.
//!
//! Before snapshots existed every record had its own key:
//! - `userData` holds the local user
//! - `App:<name>` holds one linked app each
//! - every other non-marker key is a connection, keyed by its public key
//!
//! Loading is lenient: a record that fails to parse is logged and skipped,
//! and the resulting count mismatch is caught by [`verify`].

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{MigrationError, MARKER_KEYS};
use crate::state::{Action, App, Connection, ConnectionStatus, Dispatch, Photo, UserState};
use crate::store::{KeyValueStore, StoreKeySet};

pub const USER_DATA_KEY: &str = "userData";
pub const APP_KEY_PREFIX: &str = "App:";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUser {
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    secret_key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    photo: Option<Photo>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<LegacyUser> for UserState {
    fn from(legacy: LegacyUser) -> Self {
        Self {
            id: String::new(),
            name: legacy.name.unwrap_or_default(),
            public_key: legacy.public_key,
            secret_key: legacy.secret_key,
            photo: legacy.photo,
            score: legacy.score,
            extra: legacy.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyConnection {
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    connection_date: Option<i64>,
    #[serde(default)]
    photo: Option<Photo>,
    #[serde(default)]
    status: Option<ConnectionStatus>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl LegacyConnection {
    fn into_connection(self, key: &str) -> Connection {
        Connection {
            id: self.public_key.unwrap_or_else(|| key.to_string()),
            name: self.name,
            score: self.score,
            connection_date: self.connection_date,
            photo: self.photo,
            // Legacy connections were only stored once confirmed
            status: Some(self.status.unwrap_or(ConnectionStatus::Verified)),
            level: None,
            extra: self.extra,
        }
    }
}

/// Records read from legacy keys along with how many keys were expected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub expected: usize,
}

/// Result of the three post-upgrade checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub connections: bool,
    pub user_data: bool,
    pub apps: bool,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.connections && self.user_data && self.apps
    }
}

fn is_app_key(key: &str) -> bool {
    key.starts_with(APP_KEY_PREFIX)
}

fn is_connection_key(key: &str) -> bool {
    key != USER_DATA_KEY && !is_app_key(key) && !MARKER_KEYS.contains(&key)
}

/// Read `userData` and load it into state.
///
/// Returns the user, or `None` if the key is absent or unreadable.
pub fn bootstrap_v0<S, D>(store: &S, dispatch: &mut D) -> Result<Option<UserState>, MigrationError>
where
    S: KeyValueStore + ?Sized,
    D: Dispatch + ?Sized,
{
    let Some(raw) = store.get(USER_DATA_KEY)? else {
        tracing::warn!("legacy store has no {} record", USER_DATA_KEY);
        return Ok(None);
    };

    match serde_json::from_str::<LegacyUser>(&raw) {
        Ok(legacy) => {
            let user = UserState::from(legacy);
            dispatch.dispatch(Action::SetUserData(user.clone()));
            Ok(Some(user))
        }
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable {} record", USER_DATA_KEY);
            Ok(None)
        }
    }
}

/// Load every legacy connection record into state.
pub fn load_connections<S, D>(
    store: &S,
    keys: &StoreKeySet,
    dispatch: &mut D,
) -> Result<Loaded<Connection>, MigrationError>
where
    S: KeyValueStore + ?Sized,
    D: Dispatch + ?Sized,
{
    let conn_keys: Vec<String> = keys
        .iter()
        .filter(|k| is_connection_key(k))
        .map(str::to_string)
        .collect();

    let mut records = Vec::with_capacity(conn_keys.len());
    for (key, value) in store.multi_get(&conn_keys)? {
        let Some(value) = value else { continue };
        match serde_json::from_str::<LegacyConnection>(&value) {
            Ok(legacy) => records.push(legacy.into_connection(&key)),
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable connection"),
        }
    }

    tracing::debug!(loaded = records.len(), expected = conn_keys.len(), "legacy connections");
    dispatch.dispatch(Action::SetConnections(records.clone()));
    Ok(Loaded {
        records,
        expected: conn_keys.len(),
    })
}

/// Load every legacy `App:` record into state.
pub fn load_apps<S, D>(
    store: &S,
    keys: &StoreKeySet,
    dispatch: &mut D,
) -> Result<Loaded<App>, MigrationError>
where
    S: KeyValueStore + ?Sized,
    D: Dispatch + ?Sized,
{
    let app_keys: Vec<String> = keys
        .iter()
        .filter(|k| is_app_key(k))
        .map(str::to_string)
        .collect();

    let mut records = Vec::with_capacity(app_keys.len());
    for (key, value) in store.multi_get(&app_keys)? {
        let Some(value) = value else { continue };
        match serde_json::from_str::<App>(&value) {
            Ok(app) => records.push(app),
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable app"),
        }
    }

    dispatch.dispatch(Action::SetApps(records.clone()));
    Ok(Loaded {
        records,
        expected: app_keys.len(),
    })
}

/// Convert a standard base64 string to the URL-safe alphabet, unpadded.
pub fn to_url_safe_b64(s: &str) -> String {
    s.chars()
        .filter(|&c| c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Rewrite connection ids and the user id from raw public keys to the
/// URL-safe ids the current API expects.
pub fn upgrade_connections_and_ids<D>(
    user: Option<&UserState>,
    connections: &[Connection],
    dispatch: &mut D,
) -> Vec<Connection>
where
    D: Dispatch + ?Sized,
{
    let upgraded: Vec<Connection> = connections
        .iter()
        .map(|conn| Connection {
            id: to_url_safe_b64(&conn.id),
            ..conn.clone()
        })
        .collect();
    dispatch.dispatch(Action::SetConnections(upgraded.clone()));

    if let Some(public_key) = user.and_then(|u| u.public_key.as_deref()) {
        dispatch.dispatch(Action::SetUserId(to_url_safe_b64(public_key)));
    }
    upgraded
}

/// Check that everything the legacy store held made it into state.
pub fn verify(
    user: Option<&UserState>,
    connections: &Loaded<Connection>,
    apps: &Loaded<App>,
) -> Verification {
    let non_empty = |v: Option<&String>| v.map_or(false, |s| !s.is_empty());

    Verification {
        connections: connections.records.len() == connections.expected
            && connections.records.iter().all(|c| !c.id.is_empty()),
        user_data: user.map_or(false, |u| {
            non_empty(u.public_key.as_ref()) && non_empty(u.secret_key.as_ref())
        }),
        apps: apps.records.len() == apps.expected
            && apps.records.iter().all(|a| !a.name.is_empty()),
    }
}
