//! End-to-end pipeline scenarios against stubbed ports.
//!
//! Two-host fleet throughout: an NX-OS spine (checkpoint backups, byte
//! payloads) and an EOS leaf (running-config backups, text payloads).

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use confleet_common::{CheckOutcome, PipelineStage};
use serde_json::json;

use confleet_cli::application::services::pipeline::{self, PipelineConfig, PipelineOutcome};
use confleet_cli::domain::{Bucket, ConfigPayload, Engine, Platform};

use crate::mocks::{MemoryStore, NullReporter, StubChecks, StubGateway, StubRenderer, host};

fn fast() -> PipelineConfig {
    PipelineConfig {
        convergence_delay: Duration::ZERO,
        stop_after_dry_run: false,
    }
}

fn fleet() -> Vec<confleet_cli::domain::Host> {
    vec![host("spine1", Platform::Nxos), host("leaf1", Platform::Eos)]
}

fn eos_neighbor_body(state: &str) -> String {
    json!({"vrfs": {"default": {"instList": {"1": {"ospfNeighborEntries": [
        {"routerId": "2.2.2.2", "interfaceAddress": "10.1.1.2", "adjacencyState": state}
    ]}}}}})
    .to_string()
}

fn peer_check(expected_state: &str) -> serde_json::Value {
    json!([{"ospf_peer": {
        "_kwargs": {
            "interface": "Ethernet1",
            "peer_address": "10.1.1.2",
            "peer_id": "2.2.2.2"
        },
        "success": {"state": expected_state}
    }}])
}

fn passing_checks(gateway_state: &serde_json::Value, peer_state: &str) -> StubChecks {
    StubChecks::default()
        .with(
            "spine1",
            Engine::Declarative,
            json!([{"get_facts": gateway_state}]),
        )
        .with(
            "leaf1",
            Engine::Declarative,
            json!([{"get_facts": gateway_state}]),
        )
        .with("leaf1", Engine::Imperative, peer_check(peer_state))
}

#[tokio::test]
async fn two_host_fleet_deploys_and_validates_clean() {
    let state = json!({"os_version": "9.3(5)"});
    let mut gateway = StubGateway::new(state.clone());
    gateway.checkpoint = "interface Eth1/1\n      ip address 10.0.0.1/31\nline vty\n".into();
    gateway
        .command_output
        .insert("leaf1".into(), eos_neighbor_body("full"));

    let store = MemoryStore::default();
    let renderer = StubRenderer { fail_for: None };
    let checks = passing_checks(&state, "FULL");

    let (outcome, report) = pipeline::run(
        &gateway,
        &renderer,
        &store,
        &checks,
        &NullReporter,
        fleet(),
        &fast(),
    )
    .await
    .expect("run");

    assert!(matches!(outcome, PipelineOutcome::Done));
    assert!(!report.decision.rollback_required());

    // Every artifact bucket was populated for both hosts.
    for hostname in ["spine1", "leaf1"] {
        assert!(store.blob(hostname, Bucket::Configs).is_some());
        assert!(store.blob(hostname, Bucket::Backup).is_some());
        assert!(store.blob(hostname, Bucket::Diffs).is_some());
    }

    // The NX-OS checkpoint was repaired before storage: the six-space clause
    // gets a terminator line inserted after it.
    let backup = String::from_utf8(store.blob("spine1", Bucket::Backup).unwrap()).unwrap();
    assert_eq!(
        backup,
        "interface Eth1/1\n      ip address 10.0.0.1/31\n   !\nline vty\n"
    );
    // The EOS backup came from the generic getter, unmodified.
    let leaf_backup = String::from_utf8(store.blob("leaf1", Bucket::Backup).unwrap()).unwrap();
    assert_eq!(leaf_backup, "running config\n");

    // One dry-run push and one real push per host, nothing more.
    let pushes = gateway.pushes.borrow();
    assert_eq!(pushes.len(), 4);
    assert_eq!(pushes.iter().filter(|p| p.dry_run).count(), 2);

    // Per-platform encoding held on every push.
    for push in pushes.iter() {
        match push.hostname.as_str() {
            "spine1" => assert!(matches!(push.payload, ConfigPayload::Bytes(_))),
            "leaf1" => assert!(matches!(push.payload, ConfigPayload::Text(_))),
            other => panic!("unexpected push to {other}"),
        }
    }

    // The imperative verdict surfaced as a passing check.
    assert!(matches!(
        report.imperative["leaf1"]["ospf_peer"],
        CheckOutcome::Verdict { complies: true, .. }
    ));
    // No imperative checks were defined for the spine.
    assert!(report.imperative["spine1"].is_empty());
}

#[tokio::test]
async fn failed_peer_check_rolls_back_both_hosts_with_stored_backups() {
    let state = json!({"os_version": "9.3(5)"});
    let mut gateway = StubGateway::new(state.clone());
    gateway.checkpoint = "interface Eth1/1\n      ip address 10.0.0.1/31\nline vty\n".into();
    // Adjacency stuck in INIT; the check expects FULL.
    gateway
        .command_output
        .insert("leaf1".into(), eos_neighbor_body("init"));

    let store = MemoryStore::default();
    let renderer = StubRenderer { fail_for: None };
    let checks = passing_checks(&state, "FULL");

    let (outcome, report) = pipeline::run(
        &gateway,
        &renderer,
        &store,
        &checks,
        &NullReporter,
        fleet(),
        &fast(),
    )
    .await
    .expect("run");

    match outcome {
        PipelineOutcome::RolledBack { push_failures } => assert!(push_failures.is_empty()),
        other => panic!("expected rollback, got {other:?}"),
    }

    // Exactly the one non-compliant pair; the spine's passing declarative
    // checks did not drag it into the failed set.
    assert_eq!(
        report.decision.failed,
        vec![("leaf1".to_string(), "ospf_peer".to_string())]
    );

    // Rollback is fleet-wide: per host, dry-run + real + rollback.
    let pushes = gateway.pushes.borrow();
    assert_eq!(pushes.len(), 6);
    let rollback_pushes: Vec<_> = pushes.iter().skip(4).collect();
    assert!(rollback_pushes.iter().all(|p| !p.dry_run));

    // The rollback payload is the stored backup, re-encoded per platform.
    for push in rollback_pushes {
        let expected = store.blob(&push.hostname, Bucket::Backup).unwrap();
        assert_eq!(push.payload.as_bytes(), expected.as_slice());
        if push.hostname == "spine1" {
            assert!(matches!(push.payload, ConfigPayload::Bytes(_)));
        }
    }
}

#[tokio::test]
async fn render_failure_on_one_host_aborts_the_whole_fleet() {
    let gateway = StubGateway::new(json!({}));
    let store = MemoryStore::default();
    let renderer = StubRenderer {
        fail_for: Some("leaf1".into()),
    };
    let checks = StubChecks::default();

    let (outcome, report) = pipeline::run(
        &gateway,
        &renderer,
        &store,
        &checks,
        &NullReporter,
        fleet(),
        &fast(),
    )
    .await
    .expect("run");

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            stage: PipelineStage::Render
        }
    ));
    // No device was touched and no artifact written.
    assert!(gateway.pushes.borrow().is_empty());
    assert!(store.blob("spine1", Bucket::Configs).is_none());

    // The healthy host still ran (and passed) the barrier stage.
    assert!(report.hosts["spine1"].stages[0].is_ok());
    assert!(!report.hosts["leaf1"].stages[0].is_ok());
}

#[tokio::test]
async fn dry_run_stops_after_the_diff_and_touches_nothing() {
    let gateway = StubGateway::new(json!({}));
    let store = MemoryStore::default();
    let renderer = StubRenderer { fail_for: None };
    let checks = StubChecks::default();

    let config = PipelineConfig {
        convergence_delay: Duration::ZERO,
        stop_after_dry_run: true,
    };
    let (outcome, report) = pipeline::run(
        &gateway,
        &renderer,
        &store,
        &checks,
        &NullReporter,
        fleet(),
        &config,
    )
    .await
    .expect("run");

    assert!(matches!(outcome, PipelineOutcome::DryRun));
    assert!(gateway.real_pushes().is_empty());
    // Diffs were kept for inspection and surfaced on the outcome.
    assert!(store.blob("leaf1", Bucket::Diffs).is_some());
    assert_eq!(
        report.hosts["leaf1"].last_diff.as_deref(),
        Some("+hostname leaf1")
    );
    // Backups exist even on a dry run: they are taken before any push.
    assert!(store.blob("spine1", Bucket::Backup).is_some());
}
