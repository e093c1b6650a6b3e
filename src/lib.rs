//! Hawwa is the web backend core for a booking, financial and HR platform.
//!
//! It serves the versioned API root, stamps every request with a
//! correlation id, exposes site settings and the permission-filtered
//! sidebar to templates, provides the template helper library, and applies
//! declarative schema migrations.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch (run, init, validate, health, migrate).
//! - [`config`] -- Settings loading, validation, and hot-reloading via the
//!   [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`middleware`] -- Request id correlation and response counters.
//! - [`logging`] -- Structured tracing setup and the per-request span.
//! - [`urls`] -- Named URL patterns: reverse, resolve and safe URLs.
//! - [`context`] -- Template context: settings and the sidebar.
//! - [`templatetags`] -- Currency, numeric, text, lookup, widget, user and
//!   analytics helpers.
//! - [`api`] -- The versioned API root and auth stubs.
//! - [`apps`] -- App registry and one-time bootstrap with signal receivers.
//! - [`migrations`] -- Migration files, dependency graph, schema state,
//!   ledger and executor.
//! - [`health`] -- `GET /health` endpoint handler.
//! - [`server`] -- Axum router, shared state and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML settings and migration files _(enabled by default)_ |
//! | `toml` | TOML settings and migration files |
//! | `sentry-integration` | Sentry error tracking |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod apps;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod context;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod migrations;
pub mod server;
pub mod templatetags;
pub mod urls;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
