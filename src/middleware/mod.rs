//! Tower middleware layers.
//!
//! [`request_id`] assigns or propagates the `X-Request-ID` correlation
//! identifier. [`stats`] counts served and failed responses for `/health`.
//! Layer ordering is decided in [`server::apply_layers`](crate::server::apply_layers).

pub mod request_id;
pub mod stats;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
