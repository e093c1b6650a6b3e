//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health, migrate), and their associated
//! argument structs. Every flag has an environment variable equivalent
//! for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "hawwa",
    version,
    about = "Web backend core for the Hawwa booking, financial and HR platform",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        hawwa init                      Create a starter settings file\n  \
        hawwa migrate                   Apply pending schema migrations\n  \
        hawwa run                       Start with ./hawwa.yaml\n  \
        hawwa run -c settings.yaml      Start with a specific settings file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Run(Box<RunArgs>),

    /// Generate a starter settings file
    Init(InitArgs),

    /// Validate a settings file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),

    /// Apply pending schema migrations
    Migrate(MigrateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        hawwa run                                     Auto-detect settings\n  \
        hawwa run -c settings.yaml                    Specific settings file\n  \
        hawwa run -c settings.yaml -p 8080 --pretty   Local dev mode")]
pub struct RunArgs {
    /// Settings file path (.yaml, .json, .toml)
    #[arg(short, long, env = "SETTINGS_FILE")]
    pub config: Option<PathBuf>,

    /// Settings file used when the primary one fails to load
    #[arg(long, env = "FALLBACK_SETTINGS_FILE")]
    pub fallback_config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Observability --
    /// Sentry DSN (enables error tracking)
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_DSN", help_heading = "Observability")]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_ENVIRONMENT", help_heading = "Observability")]
    pub sentry_environment: Option<String>,

    // -- Tuning --
    /// Request timeout in milliseconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 2_621_440,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Settings refresh interval in seconds
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 30,
        help_heading = "Tuning"
    )]
    pub poll_interval: u64,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        hawwa init                              Starter settings (yaml)\n  \
        hawwa init --full                       With sidebar, URLs and API\n  \
        hawwa init -f json -o settings.json     JSON format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include a full example with sidebar, URL namespaces and API resources
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Settings file to validate
    #[arg(default_value = "hawwa.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        hawwa migrate                   Apply everything pending\n  \
        hawwa migrate --plan            Show what would be applied\n  \
        hawwa migrate --show            List every migration and its status")]
pub struct MigrateArgs {
    /// Directory holding one sub-directory of migrations per app
    #[arg(short, long, env = "MIGRATIONS_DIR", default_value = "migrations")]
    pub dir: PathBuf,

    /// JSON ledger recording applied migrations
    #[arg(long, env = "MIGRATION_LEDGER", default_value = "hawwa-migrations.json")]
    pub ledger: PathBuf,

    /// Print the pending migrations and their operations without applying
    #[arg(long, conflicts_with = "show")]
    pub plan: bool,

    /// List every migration with its applied status
    #[arg(long)]
    pub show: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
