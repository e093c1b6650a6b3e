//! Applies unapplied migrations in dependency order.

use std::collections::BTreeSet;

use super::{Migration, MigrationError, MigrationGraph, MigrationKey, MigrationRecorder, ProjectState};

#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Migrations applied by this run, in order.
    pub applied: Vec<MigrationKey>,
    /// Migrations that were already recorded.
    pub already_applied: usize,
    /// Schema after every migration in the graph.
    pub state: ProjectState,
}

pub struct Executor<'g, R> {
    graph: &'g MigrationGraph,
    recorder: R,
}

impl<'g, R: MigrationRecorder> Executor<'g, R> {
    pub const fn new(graph: &'g MigrationGraph, recorder: R) -> Self {
        Self { graph, recorder }
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Migrations still to apply, in the order [`migrate`](Self::migrate)
    /// would apply them.
    pub fn plan(&self) -> Result<Vec<&'g Migration>, MigrationError> {
        let graph: &'g MigrationGraph = self.graph;
        let applied = self.checked_history()?;
        Ok(graph
            .ordered()
            .filter(|m| !applied.contains(&m.key))
            .collect())
    }

    /// Replay recorded migrations to rebuild the schema, then apply and
    /// record the rest. Running it again applies nothing.
    pub fn migrate(&mut self) -> Result<MigrationReport, MigrationError> {
        let graph: &'g MigrationGraph = self.graph;
        let applied = self.checked_history()?;
        let mut report = MigrationReport::default();

        for migration in graph.ordered() {
            let mut next = report.state.clone();
            for op in &migration.operations {
                next.apply(&migration.key.app, op)
                    .map_err(|source| MigrationError::Schema {
                        migration: migration.key.clone(),
                        source,
                    })?;
            }
            report.state = next;

            if applied.contains(&migration.key) {
                report.already_applied += 1;
                continue;
            }
            self.recorder.record_applied(&migration.key)?;
            tracing::info!(
                migration = %migration.key,
                operations = migration.operations.len(),
                "migration applied"
            );
            report.applied.push(migration.key.clone());
        }

        if report.applied.is_empty() {
            tracing::info!("no migrations to apply");
        }
        Ok(report)
    }

    /// Recorded history, checked against the graph. Unknown entries are
    /// ignored; an applied migration with an unapplied dependency is an
    /// error.
    fn checked_history(&self) -> Result<BTreeSet<MigrationKey>, MigrationError> {
        let applied = self.recorder.applied()?;
        for key in &applied {
            let Some(migration) = self.graph.get(key) else {
                tracing::warn!(migration = %key, "ledger records a migration that is not on disk");
                continue;
            };
            if let Some(dep) = migration.dependencies.iter().find(|d| !applied.contains(*d)) {
                return Err(MigrationError::InconsistentHistory {
                    migration: key.clone(),
                    dependency: dep.clone(),
                });
            }
        }
        Ok(applied)
    }
}
