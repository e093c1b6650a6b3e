//! Declarative schema migrations.
//!
//! Migration files live under `<dir>/<app>/<name>.yaml` (or `.json`,
//! `.toml`) and declare their `dependencies` plus a list of additive
//! `operations`. [`load_dir`] reads them, [`MigrationGraph`] orders them,
//! and [`Executor`] applies the ones a [`MigrationRecorder`] has not seen
//! yet, rebuilding the in-memory [`ProjectState`] as it goes.
//!
//! ```yaml
//! dependencies: ["services:0001_initial"]
//! operations:
//!   - op: add_field
//!     model: service
//!     field: { name: cost, kind: decimal, max_digits: 10, decimal_places: 2, default: 0 }
//! ```

mod executor;
mod graph;
mod recorder;
mod state;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use executor::{Executor, MigrationReport};
pub use graph::MigrationGraph;
pub use recorder::{InMemoryRecorder, JsonLedgerRecorder, MigrationRecorder};
pub use state::{Model, ProjectState, SchemaError};

use crate::config::sources::parse_document;

/// `app:name` identifier of one migration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationKey {
    pub app: String,
    pub name: String,
}

impl MigrationKey {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MigrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.app, self.name)
    }
}

impl TryFrom<String> for MigrationKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.split_once(':') {
            Some((app, name)) if !app.is_empty() && !name.is_empty() && !name.contains(':') => {
                Ok(Self::new(app, name))
            }
            _ => Err(format!("'{value}' is not an 'app:name' migration reference")),
        }
    }
}

impl From<MigrationKey> for String {
    fn from(key: MigrationKey) -> Self {
        key.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    BigAuto,
    Char,
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    ForeignKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,

    #[serde(default)]
    pub null: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Target model of a foreign key, as `app.model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateModel { name: String, fields: Vec<Field> },
    AddField { model: String, field: Field },
    AddIndex {
        model: String,
        name: String,
        fields: Vec<String>,
    },
}

impl Operation {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateModel { name, fields } => {
                format!("Create model {name} ({} fields)", fields.len())
            }
            Self::AddField { model, field } => format!("Add field {} to {model}", field.name),
            Self::AddIndex { model, name, .. } => format!("Create index {name} on {model}"),
        }
    }
}

/// On-disk body of a migration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MigrationFile {
    #[serde(default)]
    dependencies: Vec<MigrationKey>,
    #[serde(default)]
    operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub key: MigrationKey,
    pub dependencies: Vec<MigrationKey>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MigrationError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid migration file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("migration {0} is defined twice")]
    Duplicate(MigrationKey),

    #[error("migration {migration} depends on unknown migration {dependency}")]
    MissingDependency {
        migration: MigrationKey,
        dependency: MigrationKey,
    },

    #[error("dependency cycle between migrations: {}", join_keys(.0))]
    Cycle(Vec<MigrationKey>),

    #[error("migration {migration} is applied but its dependency {dependency} is not")]
    InconsistentHistory {
        migration: MigrationKey,
        dependency: MigrationKey,
    },

    #[error("migration {migration} failed: {source}")]
    Schema {
        migration: MigrationKey,
        #[source]
        source: SchemaError,
    },

    #[error("migration ledger {}: {message}", path.display())]
    Ledger { path: PathBuf, message: String },
}

fn join_keys(keys: &[MigrationKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> MigrationError {
    let path = path.to_path_buf();
    move |source| MigrationError::Io { path, source }
}

/// Load every migration under `dir`, one sub-directory per app.
///
/// Files with an unrecognised extension are skipped. A missing `dir` yields
/// no migrations.
pub fn load_dir(dir: &Path) -> Result<Vec<Migration>, MigrationError> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "no migrations directory");
        return Ok(Vec::new());
    }

    let mut app_dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    app_dirs.sort();

    let mut migrations = Vec::new();
    for app_dir in app_dirs {
        let Some(app) = app_dir.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };
        let mut files: Vec<PathBuf> = std::fs::read_dir(&app_dir)
            .map_err(io_err(&app_dir))?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        for path in files {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(ext, "yaml" | "yml" | "json" | "toml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|n| n.to_str()).map(String::from) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(io_err(&path))?;
            let file: MigrationFile = parse_document(ext, &content, &path.display().to_string())
                .map_err(|e| MigrationError::Parse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            migrations.push(Migration {
                key: MigrationKey::new(app.clone(), name),
                dependencies: file.dependencies,
                operations: file.operations,
            });
        }
    }
    Ok(migrations)
}
