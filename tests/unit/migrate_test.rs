//! End-to-end behaviour of VersionMigrator over in-memory stores

use idstore::state::{Action, AppState, Connection, ConnectionStatus, Group, Invite};
use idstore::versions::{STORE_V1, STORE_V4};
use idstore::{
    persist_state, KeyValueStore, MemoryStore, MigrationError, MigrationOutcome, SchemaVersion,
    VersionMigrator,
};

use crate::helpers::{capture_logs, legacy_store, v4_store, FailingStore};

fn sample_state() -> AppState {
    let mut state = AppState::new();
    state.user.id = "me".to_string();
    state.user.name = "Ann".to_string();
    state.connections.connections = vec![Connection {
        id: "c1".to_string(),
        name: Some("Bob".to_string()),
        status: Some(ConnectionStatus::Verified),
        ..Default::default()
    }];
    state.connections.trusted_connections = vec!["c1".to_string()];
    state.groups = vec![Group {
        id: "g1".to_string(),
        ..Default::default()
    }];
    state
}

fn stale_state() -> AppState {
    let mut state = AppState::new();
    state.groups = vec![Group {
        id: "stale".to_string(),
        ..Default::default()
    }];
    state.invites = vec![Invite {
        id: "i1".to_string(),
        group: "stale".to_string(),
        ..Default::default()
    }];
    state
}

// ---------------------------------------------------------------------------
// Legacy (V0) path
// ---------------------------------------------------------------------------

#[test]
fn legacy_upgrade_succeeds_without_alert() {
    let store = legacy_store();
    let mut state = stale_state();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V0)));
    assert!(alerts.is_empty());

    assert_eq!(state.user.name, "Ann");
    assert_eq!(state.user.id, "dXNlcg-_");
    let ids: Vec<_> = state
        .connections
        .connections
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["Y29ubjE-_", "Y29ubjI"]);
    assert_eq!(state.apps.len(), 1);
    assert!(state.groups.is_empty());
    assert!(state.invites.is_empty());
}

#[test]
fn legacy_steps_run_in_order() {
    let store = legacy_store();
    let mut actions: Vec<Action> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();

    VersionMigrator::new().migrate(&store, &mut actions, &mut alerts);

    let kinds: Vec<&str> = actions
        .iter()
        .map(|a| match a {
            Action::SetUserData(_) => "user",
            Action::SetConnections(_) => "connections",
            Action::SetApps(_) => "apps",
            Action::SetGroups(_) => "groups",
            Action::SetInvites(_) => "invites",
            Action::SetUserId(_) => "user-id",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["user", "connections", "apps", "groups", "invites", "connections", "user-id"]
    );
}

#[test]
fn failed_verification_alerts_after_state_was_reset() {
    let mut store = legacy_store();
    store.set("App:broken", "{not json".to_string()).unwrap();
    let mut state = stale_state();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    match outcome {
        MigrationOutcome::Failed(MigrationError::VerificationFailed {
            connections,
            user_data,
            apps,
        }) => {
            assert!(connections);
            assert!(user_data);
            assert!(!apps);
        }
        other => panic!("expected verification failure, got {:?}", other),
    }
    assert_eq!(
        alerts,
        vec!["Error: Please Backup Data and reinstall BrightId".to_string()]
    );
    // Resets are not rolled back
    assert!(state.groups.is_empty());
    assert!(state.invites.is_empty());
    assert_eq!(state.user.id, "dXNlcg-_");
}

#[test]
fn missing_user_data_fails_verification() {
    let mut store = legacy_store();
    store.remove("userData").unwrap();
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(matches!(
        outcome,
        MigrationOutcome::Failed(MigrationError::VerificationFailed {
            user_data: false,
            ..
        })
    ));
    assert_eq!(alerts.len(), 1);
}

#[test]
fn alert_message_is_configurable() {
    let store = MemoryStore::from_entries([("junk", "???")]);
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new()
        .with_alert_message("back up and reinstall")
        .migrate(&store, &mut state, &mut alerts);

    assert!(outcome.is_failed());
    assert_eq!(alerts, vec!["back up and reinstall".to_string()]);
}

// ---------------------------------------------------------------------------
// Snapshot (V1 / V4) paths
// ---------------------------------------------------------------------------

#[test]
fn v4_store_bootstraps_snapshot() {
    let expected = sample_state();
    let store = v4_store(&expected);
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V4)));
    assert_eq!(state, expected);
    assert!(alerts.is_empty());
}

#[test]
fn v1_store_bootstraps_from_v1_namespace() {
    let mut store = MemoryStore::new();
    store
        .set(STORE_V1, serde_json::to_string(&sample_state()).unwrap())
        .unwrap();
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V1)));
    assert_eq!(state.user.id, "me");
}

#[test]
fn v4_wins_over_v1_when_both_present() {
    let mut v1_state = sample_state();
    v1_state.user.name = "old".to_string();

    let mut store = v4_store(&sample_state());
    store
        .set(STORE_V1, serde_json::to_string(&v1_state).unwrap())
        .unwrap();
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V4)));
    assert_eq!(state.user.name, "Ann");
}

#[test]
fn rerun_on_v4_store_never_touches_legacy_path() {
    let store = v4_store(&sample_state());
    let mut alerts: Vec<String> = Vec::new();

    for _ in 0..2 {
        let mut actions: Vec<Action> = Vec::new();
        let outcome = VersionMigrator::new().migrate(&store, &mut actions, &mut alerts);
        assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V4)));
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::SetUserData(_) | Action::SetUserId(_))));
    }
    assert!(alerts.is_empty());
}

#[test]
fn persisted_legacy_upgrade_routes_to_v4_next_time() {
    let mut store = legacy_store();
    let mut first = AppState::new();
    let mut alerts: Vec<String> = Vec::new();
    let migrator = VersionMigrator::new();

    let outcome = migrator.migrate(&store, &mut first, &mut alerts);
    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V0)));
    persist_state(&mut store, &first).unwrap();
    assert!(store.get(STORE_V4).unwrap().is_some());

    let mut second = AppState::new();
    let outcome = migrator.migrate(&store, &mut second, &mut alerts);
    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V4)));
    assert_eq!(second, first);
}

#[test]
fn snapshot_with_unmodelled_data_persists_unchanged() {
    let original = serde_json::json!({
        "user": {"id": "me", "name": "Ann", "signingKey": "U1"},
        "connections": {
            "connections": [{"id": "c1", "status": "pending", "signingKey": "SK1"}],
            "trustedConnections": [],
            "connectionsSort": ""
        },
        "groups": [],
        "invites": [],
        "apps": [],
        "recoveryData": {"y": 2},
        "notifications": [{"id": "n1"}]
    });
    let mut store = MemoryStore::from_entries([(STORE_V4, original.to_string())]);
    let mut state = AppState::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);
    assert!(matches!(outcome, MigrationOutcome::Upgraded(SchemaVersion::V4)));

    persist_state(&mut store, &state).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&store.get(STORE_V4).unwrap().unwrap()).unwrap();
    assert_eq!(written, original);
}

// ---------------------------------------------------------------------------
// Failures and edge cases
// ---------------------------------------------------------------------------

#[test]
fn empty_store_is_skipped() {
    let store = MemoryStore::new();
    let mut actions: Vec<Action> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut actions, &mut alerts);

    assert!(matches!(outcome, MigrationOutcome::Skipped));
    assert!(actions.is_empty());
    assert!(alerts.is_empty());
}

#[test]
fn bootstrap_error_is_logged_and_returned() {
    let (logs, _guard) = capture_logs();
    let store = FailingStore::new(&["store@v4"], "disk read timed out");
    let mut actions: Vec<Action> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut actions, &mut alerts);

    match outcome {
        MigrationOutcome::Failed(err) => {
            assert!(matches!(err, MigrationError::Store(_)));
            assert!(err.to_string().contains("disk read timed out"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    let output = logs.contents();
    let warning = output
        .lines()
        .find(|l| l.contains("WARN"))
        .expect("a warning was logged");
    assert!(warning.contains("disk read timed out"), "log was: {}", output);
    assert!(actions.is_empty());
    // Bootstrap failures are not user alerts
    assert!(alerts.is_empty());
}

#[test]
fn corrupt_snapshot_fails_without_dispatch() {
    let store = MemoryStore::from_entries([(STORE_V4, "[1, 2")]);
    let mut actions: Vec<Action> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut actions, &mut alerts);

    assert!(matches!(
        outcome,
        MigrationOutcome::Failed(MigrationError::InvalidState { .. })
    ));
    assert!(actions.is_empty());
}

#[test]
fn legacy_store_read_failure_is_caught() {
    let store = FailingStore::new(&["userData", "Y29ubjE="], "permission denied");
    let mut state = stale_state();
    let mut alerts: Vec<String> = Vec::new();

    let outcome = VersionMigrator::new().migrate(&store, &mut state, &mut alerts);

    assert!(outcome.is_failed());
    assert!(alerts.is_empty());
    // Failure happened before the reset step
    assert_eq!(state.groups.len(), 1);
}
