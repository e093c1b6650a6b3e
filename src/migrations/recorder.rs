//! Persistence of which migrations have been applied.
//!
//! [`JsonLedgerRecorder`] keeps the record in a JSON file next to the
//! deployment; [`InMemoryRecorder`] is used by tests and `--plan`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::{MigrationError, MigrationKey};

pub trait MigrationRecorder {
    fn applied(&self) -> Result<BTreeSet<MigrationKey>, MigrationError>;
    fn record_applied(&mut self, key: &MigrationKey) -> Result<(), MigrationError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecorder {
    applied: BTreeSet<MigrationKey>,
}

impl InMemoryRecorder {
    pub fn with_applied<I: IntoIterator<Item = MigrationKey>>(keys: I) -> Self {
        Self {
            applied: keys.into_iter().collect(),
        }
    }
}

impl MigrationRecorder for InMemoryRecorder {
    fn applied(&self) -> Result<BTreeSet<MigrationKey>, MigrationError> {
        Ok(self.applied.clone())
    }

    fn record_applied(&mut self, key: &MigrationKey) -> Result<(), MigrationError> {
        self.applied.insert(key.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Ledger {
    applied: Vec<LedgerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerEntry {
    migration: MigrationKey,
    /// Seconds since the Unix epoch.
    applied_at: u64,
}

#[derive(Debug, Clone)]
pub struct JsonLedgerRecorder {
    path: PathBuf,
}

impl JsonLedgerRecorder {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ledger_error(&self, message: impl ToString) -> MigrationError {
        MigrationError::Ledger {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn read(&self) -> Result<Ledger, MigrationError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| self.ledger_error(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Ledger::default()),
            Err(e) => Err(self.ledger_error(e)),
        }
    }

    fn write(&self, ledger: &Ledger) -> Result<(), MigrationError> {
        let body = serde_json::to_string_pretty(ledger).map_err(|e| self.ledger_error(e))?;
        // Write-then-rename so a crash never leaves a truncated ledger.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| self.ledger_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.ledger_error(e))
    }
}

impl MigrationRecorder for JsonLedgerRecorder {
    fn applied(&self) -> Result<BTreeSet<MigrationKey>, MigrationError> {
        Ok(self.read()?.applied.into_iter().map(|e| e.migration).collect())
    }

    fn record_applied(&mut self, key: &MigrationKey) -> Result<(), MigrationError> {
        let mut ledger = self.read()?;
        if ledger.applied.iter().any(|e| &e.migration == key) {
            return Ok(());
        }
        let applied_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        ledger.applied.push(LedgerEntry {
            migration: key.clone(),
            applied_at,
        });
        self.write(&ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ledger() -> PathBuf {
        std::env::temp_dir().join(format!("hawwa-ledger-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_ledger_is_empty() {
        let recorder = JsonLedgerRecorder::new(temp_ledger());
        assert!(recorder.applied().unwrap().is_empty());
    }

    #[test]
    fn records_persist_across_instances() {
        let path = temp_ledger();
        let key = MigrationKey::new("services", "0001_initial");

        let mut recorder = JsonLedgerRecorder::new(path.clone());
        recorder.record_applied(&key).unwrap();
        recorder.record_applied(&key).unwrap();

        let reopened = JsonLedgerRecorder::new(path.clone());
        let applied = reopened.applied().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(applied.len(), 1);
        assert!(applied.contains(&key));
    }

    #[test]
    fn corrupt_ledger_is_an_error() {
        let path = temp_ledger();
        std::fs::write(&path, "not json").unwrap();
        let err = JsonLedgerRecorder::new(path.clone()).applied().unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, MigrationError::Ledger { .. }));
    }

    #[test]
    fn in_memory_recorder() {
        let key = MigrationKey::new("financial", "0001_initial");
        let mut recorder = InMemoryRecorder::default();
        recorder.record_applied(&key).unwrap();
        assert!(recorder.applied().unwrap().contains(&key));
    }
}
