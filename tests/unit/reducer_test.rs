//! Application state driven through dispatched actions

use idstore::state::{Action, AppState, Connection, ConnectionStatus, ConnectionsSnapshot};
use idstore::Dispatch;

fn conn(id: &str, status: Option<ConnectionStatus>) -> Connection {
    Connection {
        id: id.to_string(),
        status,
        ..Default::default()
    }
}

#[test]
fn server_sync_after_hydration() {
    let mut state = AppState::new();
    state.dispatch(Action::HydrateConnections(ConnectionsSnapshot {
        connections: Some(vec![
            conn("kept", Some(ConnectionStatus::Verified)),
            conn("removed", Some(ConnectionStatus::Verified)),
            conn("pending", Some(ConnectionStatus::Initiated)),
        ]),
        trusted_connections: Some(vec!["kept".to_string()]),
        connections_sort: Some("byNameAscending".to_string()),
    }));

    let mut server_kept = conn("kept", None);
    server_kept.score = Some(88);
    state.dispatch(Action::UpdateConnections(vec![
        server_kept,
        conn("pending", None),
    ]));

    let by_id = |id: &str| {
        state
            .connections
            .connections
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap()
    };
    assert_eq!(by_id("kept").score, Some(88));
    assert_eq!(by_id("kept").status, Some(ConnectionStatus::Verified));
    assert_eq!(by_id("removed").status, Some(ConnectionStatus::Deleted));
    assert_eq!(by_id("pending").status, Some(ConnectionStatus::Verified));
    assert_eq!(state.connections.connections_sort, "byNameAscending");
}

#[test]
fn new_connection_then_delete() {
    let mut state = AppState::new();
    state.dispatch(Action::AddConnection(conn("a", Some(ConnectionStatus::Initiated))));
    state.dispatch(Action::AddConnection(conn("b", Some(ConnectionStatus::Initiated))));
    state.dispatch(Action::AddTrustedConnection("b".to_string()));

    assert_eq!(state.connections.connections[0].id, "b");

    state.dispatch(Action::DeleteConnection("b".to_string()));
    state.dispatch(Action::RemoveTrustedConnection("b".to_string()));

    assert_eq!(state.connections.connections.len(), 1);
    assert!(state.connections.trusted_connections.is_empty());
}

#[test]
fn partial_hydration_keeps_existing_state() {
    let mut state = AppState::new();
    state.dispatch(Action::SetConnections(vec![conn("a", None)]));
    state.dispatch(Action::HydrateConnections(ConnectionsSnapshot::default()));
    assert_eq!(state.connections.connections.len(), 1);
}

#[test]
fn state_roundtrips_through_snapshot_json() {
    let mut state = AppState::new();
    state.dispatch(Action::SetConnections(vec![conn("a", Some(ConnectionStatus::Deleted))]));
    state.dispatch(Action::ConnectionsSort("byScoreDescending".to_string()));

    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"trustedConnections\""));
    assert!(json.contains("\"Deleted\""));

    let parsed: AppState = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, state);
}
