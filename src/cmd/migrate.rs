//! `hawwa migrate` — apply pending schema migrations.
//!
//! Loads the migration files, orders them by dependency, and applies the
//! ones the ledger has not recorded. `--plan` prints what would run and
//! `--show` lists every migration with its status; neither writes.

use std::fmt::Write as _;

use crate::cli::MigrateArgs;
use crate::error::HawwaError;
use crate::migrations::{self, Executor, JsonLedgerRecorder, MigrationGraph, MigrationRecorder};

pub fn execute(args: &MigrateArgs) -> Result<(), HawwaError> {
    let graph = MigrationGraph::build(migrations::load_dir(&args.dir)?)?;
    let recorder = JsonLedgerRecorder::new(args.ledger.clone());

    if args.show {
        print!("{}", show(&graph, &recorder)?);
        return Ok(());
    }

    let mut executor = Executor::new(&graph, recorder);

    if args.plan {
        print!("{}", plan(&executor)?);
        return Ok(());
    }

    let report = executor.migrate()?;
    if report.applied.is_empty() {
        println!("No migrations to apply.");
    } else {
        for key in &report.applied {
            println!("  Applying {key}... OK");
        }
    }
    println!(
        "{} applied, {} already applied, {} models",
        report.applied.len(),
        report.already_applied,
        report.state.model_count()
    );
    Ok(())
}

fn plan<R: MigrationRecorder>(executor: &Executor<'_, R>) -> Result<String, HawwaError> {
    let pending = executor.plan()?;
    let mut out = String::new();
    if pending.is_empty() {
        out.push_str("No planned migration operations.\n");
        return Ok(out);
    }
    out.push_str("Planned operations:\n");
    for migration in pending {
        let _ = writeln!(out, "{}", migration.key);
        if migration.operations.is_empty() {
            out.push_str("    (merge, no operations)\n");
        }
        for op in &migration.operations {
            let _ = writeln!(out, "    {}", op.describe());
        }
    }
    Ok(out)
}

fn show(graph: &MigrationGraph, recorder: &impl MigrationRecorder) -> Result<String, HawwaError> {
    let applied = recorder.applied()?;
    let mut out = String::new();
    let mut current_app = "";
    for migration in graph.ordered() {
        if migration.key.app != current_app {
            current_app = &migration.key.app;
            let _ = writeln!(out, "{current_app}");
        }
        let mark = if applied.contains(&migration.key) { "X" } else { " " };
        let _ = writeln!(out, " [{mark}] {}", migration.key.name);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::{InMemoryRecorder, Migration, MigrationKey};

    fn graph() -> MigrationGraph {
        MigrationGraph::build(vec![
            Migration {
                key: MigrationKey::new("services", "0001_initial"),
                dependencies: vec![],
                operations: vec![],
            },
            Migration {
                key: MigrationKey::new("services", "0002_add_cost_field"),
                dependencies: vec![MigrationKey::new("services", "0001_initial")],
                operations: vec![],
            },
        ])
        .unwrap()
    }

    #[test]
    fn show_marks_applied() {
        let graph = graph();
        let recorder =
            InMemoryRecorder::with_applied([MigrationKey::new("services", "0001_initial")]);
        assert_eq!(
            show(&graph, &recorder).unwrap(),
            "services\n [X] 0001_initial\n [ ] 0002_add_cost_field\n"
        );
    }

    #[test]
    fn plan_lists_pending_only() {
        let graph = graph();
        let recorder =
            InMemoryRecorder::with_applied([MigrationKey::new("services", "0001_initial")]);
        let executor = Executor::new(&graph, recorder);
        assert_eq!(
            plan(&executor).unwrap(),
            "Planned operations:\nservices:0002_add_cost_field\n    (merge, no operations)\n"
        );
    }
}
