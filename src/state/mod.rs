//! Application state and the typed messages that update it.
//!
//! The migrator never touches state directly. It sends [`Action`]s to a
//! [`Dispatch`] sink, which is either a live [`AppState`] (reducing each
//! action) or a plain `Vec<Action>` recording them for inspection.

mod connections;
mod types;

pub use connections::{ConnectionsSnapshot, ConnectionsState};
pub use types::{App, Connection, ConnectionStatus, Group, Invite, Photo, UserState};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A state-update message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetConnections(Vec<Connection>),
    UpdateConnections(Vec<Connection>),
    AddConnection(Connection),
    DeleteConnection(String),
    ConnectionsSort(String),
    AddTrustedConnection(String),
    RemoveTrustedConnection(String),
    HydrateConnections(ConnectionsSnapshot),
    SetUserData(UserState),
    SetUserId(String),
    HydrateUser(UserState),
    SetGroups(Vec<Group>),
    SetInvites(Vec<Invite>),
    SetApps(Vec<App>),
    /// Snapshot slices this crate does not model, carried through as-is.
    HydrateExtra(Map<String, Value>),
}

/// Sink for state-update messages.
pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

/// Records every action in order.
impl Dispatch for Vec<Action> {
    fn dispatch(&mut self, action: Action) {
        self.push(action);
    }
}

/// The complete client state, also the shape persisted under `store@v4`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub user: UserState,
    #[serde(default)]
    pub connections: ConnectionsState,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub invites: Vec<Invite>,
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` through every slice reducer.
    pub fn apply(&mut self, action: &Action) {
        self.connections.reduce(action);
        match action {
            Action::SetUserData(user) => {
                // Keep an id that was already assigned
                let id = std::mem::take(&mut self.user.id);
                self.user = user.clone();
                if self.user.id.is_empty() {
                    self.user.id = id;
                }
            }
            Action::SetUserId(id) => self.user.id = id.clone(),
            Action::HydrateUser(user) => self.user = user.clone(),
            Action::SetGroups(groups) => self.groups = groups.clone(),
            Action::SetInvites(invites) => self.invites = invites.clone(),
            Action::SetApps(apps) => self.apps = apps.clone(),
            Action::HydrateExtra(extra) => self.extra = extra.clone(),
            _ => {}
        }
    }
}

impl Dispatch for AppState {
    fn dispatch(&mut self, action: Action) {
        self.apply(&action);
    }
}
