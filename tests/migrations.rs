//! Integration tests applying the repository's migration files.

#![cfg(feature = "yaml")]

use std::path::Path;

use hawwa::migrations::{self, Executor, JsonLedgerRecorder, MigrationGraph, MigrationKey, MigrationRecorder};

fn graph() -> MigrationGraph {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    MigrationGraph::build(migrations::load_dir(&dir).unwrap()).unwrap()
}

fn ledger_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hawwa-{name}-{}.json", uuid::Uuid::new_v4()))
}

#[test]
fn repository_migrations_apply_once() {
    let graph = graph();
    let path = ledger_path("ledger");

    let report = Executor::new(&graph, JsonLedgerRecorder::new(path.clone()))
        .migrate()
        .unwrap();
    assert_eq!(report.applied.len(), graph.len());
    assert!(report.state.model("services", "Service").is_some());
    let rate = report.state.model("financial", "CurrencyRate").unwrap();
    assert!(rate.indexes.contains_key("financial_curr_from_to_idx"));

    let again = Executor::new(&graph, JsonLedgerRecorder::new(path.clone()))
        .migrate()
        .unwrap();
    assert!(again.applied.is_empty());
    assert_eq!(again.already_applied, graph.len());
    assert_eq!(again.state.model_count(), report.state.model_count());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn merge_migration_orders_after_both_branches() {
    let graph = graph();
    let order: Vec<String> = graph.ordered().map(|m| m.key.to_string()).collect();
    let pos = |k: &str| order.iter().position(|o| o == k).unwrap();
    assert!(pos("services:0002_add_cost_field") < pos("services:0003_merge"));
    assert!(pos("services:0002_add_vendor_to_service") < pos("services:0003_merge"));
    assert_eq!(graph.leaf_nodes().len(), 2);
}

#[test]
fn partial_ledger_applies_the_rest() {
    let graph = graph();
    let path = ledger_path("partial");
    let mut recorder = JsonLedgerRecorder::new(path.clone());
    recorder
        .record_applied(&MigrationKey::new("financial", "0001_initial"))
        .unwrap();

    let report = Executor::new(&graph, recorder).migrate().unwrap();
    assert_eq!(report.already_applied, 1);
    assert_eq!(report.applied.len(), graph.len() - 1);
    assert!(!report
        .applied
        .contains(&MigrationKey::new("financial", "0001_initial")));

    let _ = std::fs::remove_file(&path);
}
