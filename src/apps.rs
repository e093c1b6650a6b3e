//! App registry and start-up bootstrap.
//!
//! Each business module is an [`AppConfig`]. At start-up
//! [`AppRegistry::populate`] calls every app's `ready` hook once, in
//! registration order, handing it the shared [`SignalBus`] so it can
//! connect receivers. An app whose optional signal module is absent reports
//! [`ReadyError::ModuleMissing`]; that is logged and skipped. Any other
//! error aborts start-up.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::HawwaError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadyError {
    #[error("optional module '{0}' is not available")]
    ModuleMissing(String),

    #[error("{0}")]
    Failed(String),
}

type Handler = Box<dyn Fn(&Value) -> Result<bool, String> + Send + Sync>;

struct Receiver {
    name: String,
    handler: Handler,
}

/// Outcome of one receiver for one [`SignalBus::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalResponse {
    pub receiver: String,
    /// `Ok(true)` when the receiver acted on the payload.
    pub result: Result<bool, String>,
}

/// Named signals dispatched synchronously to connected receivers.
#[derive(Default)]
pub struct SignalBus {
    receivers: BTreeMap<String, Vec<Receiver>>,
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .receivers
            .iter()
            .map(|(signal, r)| (signal.as_str(), r.len()))
            .collect();
        f.debug_struct("SignalBus").field("receivers", &counts).finish()
    }
}

impl SignalBus {
    /// Connect `handler` to `signal`. Connecting the same receiver name to
    /// the same signal twice keeps the first connection.
    pub fn connect<F>(&mut self, signal: &str, receiver: &str, handler: F)
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        let list = self.receivers.entry(signal.to_string()).or_default();
        if list.iter().any(|r| r.name == receiver) {
            tracing::debug!(signal, receiver, "receiver already connected");
            return;
        }
        list.push(Receiver {
            name: receiver.to_string(),
            handler: Box::new(handler),
        });
    }

    /// Deliver `payload` to every receiver of `signal`. A failing receiver
    /// does not stop the others.
    pub fn send(&self, signal: &str, payload: &Value) -> Vec<SignalResponse> {
        let Some(list) = self.receivers.get(signal) else {
            return Vec::new();
        };
        list.iter()
            .map(|r| {
                let result = (r.handler)(payload);
                if let Err(ref e) = result {
                    tracing::warn!(signal, receiver = %r.name, error = %e, "signal receiver failed");
                }
                SignalResponse {
                    receiver: r.name.clone(),
                    result,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn receivers(&self, signal: &str) -> Vec<&str> {
        self.receivers
            .get(signal)
            .map(|list| list.iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default()
    }
}

pub trait AppConfig: Send + Sync {
    fn name(&self) -> &'static str;

    fn verbose_name(&self) -> String {
        let name = self.name().replace('_', " ");
        let mut chars = name.chars();
        chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    }

    /// One-time initialisation, run by [`AppRegistry::populate`].
    fn ready(&self, _bus: &mut SignalBus) -> Result<(), ReadyError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct AppRegistry {
    apps: Vec<Box<dyn AppConfig>>,
    bus: SignalBus,
    ready: bool,
}

impl AppRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform's built-in apps in their start-up order.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CoreApp));
        registry.register(Box::new(AccountsApp));
        registry.register(Box::new(ServicesApp));
        registry.register(Box::new(BookingsApp));
        registry.register(Box::new(FinancialApp));
        registry.register(Box::new(HrmsApp));
        registry
    }

    pub fn register(&mut self, app: Box<dyn AppConfig>) {
        self.apps.push(app);
    }

    /// Run every app's `ready` hook. Later calls are no-ops.
    pub fn populate(&mut self) -> Result<(), HawwaError> {
        if self.ready {
            return Ok(());
        }
        for app in &self.apps {
            match app.ready(&mut self.bus) {
                Ok(()) => tracing::debug!(app = app.name(), "app ready"),
                Err(ReadyError::ModuleMissing(module)) => {
                    tracing::debug!(app = app.name(), module = %module, "optional app module absent, skipping");
                }
                Err(source) => {
                    return Err(HawwaError::Bootstrap {
                        app: app.name().to_string(),
                        source,
                    });
                }
            }
        }
        self.ready = true;
        tracing::info!(apps = self.apps.len(), "apps ready");
        Ok(())
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn app_names(&self) -> Vec<String> {
        self.apps.iter().map(|a| a.name().to_string()).collect()
    }

    #[must_use]
    pub const fn bus(&self) -> &SignalBus {
        &self.bus
    }
}

pub const PAYMENT_SAVED: &str = "post_save:financial.payment";
pub const EXPENSE_SAVED: &str = "post_save:financial.expense";

struct CoreApp;
struct AccountsApp;
struct ServicesApp;
struct BookingsApp;
struct FinancialApp;
struct HrmsApp;

impl AppConfig for CoreApp {
    fn name(&self) -> &'static str {
        "core"
    }
}

impl AppConfig for AccountsApp {
    fn name(&self) -> &'static str {
        "accounts"
    }
}

impl AppConfig for ServicesApp {
    fn name(&self) -> &'static str {
        "services"
    }
}

impl AppConfig for BookingsApp {
    fn name(&self) -> &'static str {
        "bookings"
    }
}

impl AppConfig for FinancialApp {
    fn name(&self) -> &'static str {
        "financial"
    }

    fn ready(&self, bus: &mut SignalBus) -> Result<(), ReadyError> {
        bus.connect(PAYMENT_SAVED, "payment_post_save", post_payment_journal);
        bus.connect(EXPENSE_SAVED, "expense_post_save", post_expense_journal);
        Ok(())
    }
}

impl AppConfig for HrmsApp {
    fn name(&self) -> &'static str {
        "hrms"
    }

    fn verbose_name(&self) -> String {
        "Human Resource Management System".to_string()
    }

    fn ready(&self, _bus: &mut SignalBus) -> Result<(), ReadyError> {
        Err(ReadyError::ModuleMissing("hrms.signals".into()))
    }
}

/// Completed payments get a journal entry.
fn post_payment_journal(payment: &Value) -> Result<bool, String> {
    if payment.get("payment_status").and_then(Value::as_str) != Some("completed") {
        return Ok(false);
    }
    let id = payment
        .get("id")
        .ok_or_else(|| "payment payload has no id".to_string())?;
    tracing::info!(payment = %id, "journal entry posted for payment");
    Ok(true)
}

/// Paid expenses with a payment date get a journal entry.
fn post_expense_journal(expense: &Value) -> Result<bool, String> {
    let paid = expense.get("is_paid").and_then(Value::as_bool) == Some(true);
    let dated = expense
        .get("payment_date")
        .is_some_and(|d| !d.is_null() && d.as_str() != Some(""));
    if !(paid && dated) {
        return Ok(false);
    }
    let id = expense
        .get("id")
        .ok_or_else(|| "expense payload has no id".to_string())?;
    tracing::info!(expense = %id, "journal entry posted for expense");
    Ok(true)
}
