//! Summary shown before confirming a new connection.
//!
//! The remote profile comes from the identity node (fetched elsewhere);
//! this module only combines it with the local connection list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::{from_millis, relative_time};
use crate::state::Connection;

/// Label used when the node does not know the user yet.
pub const NEW_USER_LABEL: &str = "New user";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConnection {
    pub id: String,
}

/// Public profile of another user as reported by the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProfile {
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub groups: Vec<serde_json::Value>,
    #[serde(default)]
    pub connections: Vec<ProfileConnection>,
    #[serde(default)]
    pub flaggers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPreview {
    pub connections: usize,
    pub groups: usize,
    pub mutual_connections: usize,
    pub connection_date: String,
    pub flagged: bool,
}

impl ConnectionPreview {
    /// Build the preview. `profile` is `None` when the node reported the
    /// user as not found.
    pub fn build(
        profile: Option<&RemoteProfile>,
        my_connections: &[Connection],
        now: DateTime<Utc>,
    ) -> Self {
        let Some(profile) = profile else {
            return Self {
                connections: 0,
                groups: 0,
                mutual_connections: 0,
                connection_date: NEW_USER_LABEL.to_string(),
                flagged: false,
            };
        };

        let mutual_connections = profile
            .connections
            .iter()
            .filter(|c| my_connections.iter().any(|mine| mine.id == c.id))
            .count();

        let connection_date = match from_millis(profile.created_at) {
            Some(created) => format!("Created {}", relative_time(created, now)),
            None => "Created at an unknown time".to_string(),
        };

        Self {
            connections: profile.connections.len(),
            groups: profile.groups.len(),
            mutual_connections,
            connection_date,
            flagged: profile.flaggers.as_ref().map_or(false, |f| !f.is_empty()),
        }
    }
}
