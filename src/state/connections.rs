//! Connections slice: the list of connections, trusted connection ids and
//! the user's chosen sort order.

use serde::{Deserialize, Serialize};

use super::types::{Connection, ConnectionStatus};
use super::Action;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsState {
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub trusted_connections: Vec<String>,
    #[serde(default)]
    pub connections_sort: String,
}

/// A persisted connections slice as read back from storage.
///
/// Fields are optional because older snapshots may lack them; hydration
/// only happens when both lists are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsSnapshot {
    #[serde(default)]
    pub connections: Option<Vec<Connection>>,
    #[serde(default)]
    pub trusted_connections: Option<Vec<String>>,
    #[serde(default)]
    pub connections_sort: Option<String>,
}

impl ConnectionsState {
    /// Apply `action` to this slice. Actions owned by other slices are ignored.
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::SetConnections(connections) => {
                self.connections = connections.clone();
            }
            Action::UpdateConnections(updates) => self.update(updates),
            Action::AddConnection(connection) => {
                if connection.id.is_empty() {
                    return;
                }
                tracing::debug!(id = %connection.id, "adding connection");
                self.connections.retain(|c| c.id != connection.id);
                self.connections.insert(0, connection.clone());
            }
            Action::DeleteConnection(id) => {
                self.connections.retain(|c| &c.id != id);
            }
            Action::ConnectionsSort(sort) => {
                self.connections_sort = sort.clone();
            }
            Action::AddTrustedConnection(id) => {
                self.trusted_connections.push(id.clone());
            }
            Action::RemoveTrustedConnection(id) => {
                self.trusted_connections.retain(|t| t != id);
            }
            Action::HydrateConnections(snapshot) => {
                if let (Some(connections), Some(trusted)) =
                    (&snapshot.connections, &snapshot.trusted_connections)
                {
                    *self = ConnectionsState {
                        connections: connections.clone(),
                        trusted_connections: trusted.clone(),
                        connections_sort: snapshot.connections_sort.clone().unwrap_or_default(),
                    };
                }
            }
            _ => {}
        }
    }

    /// Reconcile local connections against the server's list.
    ///
    /// Connections the server no longer reports are marked `Deleted` if they
    /// were verified. Connections it does report are promoted to `Verified`
    /// when still pending, then overlaid with the server's fields. Entries
    /// that only exist in `updates` are not added.
    fn update(&mut self, updates: &[Connection]) {
        for conn in &mut self.connections {
            match updates.iter().find(|u| u.id == conn.id) {
                None => {
                    if conn.status == Some(ConnectionStatus::Verified) {
                        conn.status = Some(ConnectionStatus::Deleted);
                    }
                }
                Some(updated) => {
                    if matches!(conn.status, None | Some(ConnectionStatus::Initiated)) {
                        conn.status = Some(ConnectionStatus::Verified);
                    }
                    conn.merge(updated);
                }
            }
        }
    }
}
