//! Domain records held in application state and persisted snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle of a connection as tracked by the client.
///
/// Stored as a free string. Values other than the three known ones are kept
/// verbatim so they survive a load and save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionStatus {
    Initiated,
    Verified,
    /// Removed on the server side but kept locally.
    Deleted,
    Other(String),
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionStatus::Initiated => "initiated",
            ConnectionStatus::Verified => "verified",
            ConnectionStatus::Deleted => "Deleted",
            ConnectionStatus::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ConnectionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "initiated" => ConnectionStatus::Initiated,
            "verified" => ConnectionStatus::Verified,
            "Deleted" => ConnectionStatus::Deleted,
            _ => ConnectionStatus::Other(raw),
        }
    }
}

impl From<ConnectionStatus> for String {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Reference to a photo stored under the app's `photos/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub filename: String,
}

/// A connection to another user.
///
/// Everything except `id` is optional so partial updates from the server
/// can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConnectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Fields this crate does not model, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Connection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Overlay every field that is set in `update`, keeping the rest.
    pub fn merge(&mut self, update: &Connection) {
        self.id = update.id.clone();
        if update.name.is_some() {
            self.name = update.name.clone();
        }
        if update.score.is_some() {
            self.score = update.score;
        }
        if update.connection_date.is_some() {
            self.connection_date = update.connection_date;
        }
        if update.photo.is_some() {
            self.photo = update.photo.clone();
        }
        if update.status.is_some() {
            self.status = update.status.clone();
        }
        if update.level.is_some() {
            self.level = update.level.clone();
        }
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// The local user's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub group: String,
    #[serde(default)]
    pub inviter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// An application the user has linked their identity to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
}
