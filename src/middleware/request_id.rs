//! Request correlation: assign or propagate `X-Request-ID`.
//!
//! [`request_id_middleware`] is the outer-most layer of the router. On
//! arrival it adopts a non-empty inbound `X-Request-ID` verbatim or
//! generates a UUID v4, and stores it as a [`RequestId`] in the request
//! extensions. On departure it copies the identifier onto the response,
//! whatever produced that response (handler, fallback, panic recovery,
//! timeout, body limit).
//!
//! The identifier only ever lives in per-request extensions; nothing here
//! touches process-wide state.

use std::convert::Infallible;
use std::fmt;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation identifier for one request/response pair.
///
/// Not a security token: callers may choose it, and it is never
/// deduplicated or persisted. An adopted inbound value keeps its exact
/// bytes for the response header; [`as_str`](Self::as_str) is a lossy
/// UTF-8 rendering for logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId {
    text: String,
    inbound: Option<HeaderValue>,
}

impl RequestId {
    /// Fresh identifier in canonical hyphenated UUID v4 form.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            text: uuid::Uuid::new_v4().to_string(),
            inbound: None,
        }
    }

    /// The inbound `X-Request-ID` value, if present and non-empty.
    ///
    /// Only the first value of a repeated header is adopted.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let mut values = headers.get_all(&X_REQUEST_ID).iter();
        let first = values.next().filter(|v| !v.is_empty())?;
        let ignored = values.count();
        if ignored > 0 {
            tracing::debug!(ignored, "repeated X-Request-ID, adopting the first value");
        }
        Some(Self {
            text: String::from_utf8_lossy(first.as_bytes()).into_owned(),
            inbound: Some(first.clone()),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Value for the response header: the inbound bytes when adopted.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        self.inbound
            .clone()
            .or_else(|| HeaderValue::from_str(&self.text).ok())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Arrival step: resolve the identifier and attach it to the request.
pub fn on_request<B>(req: &mut http::Request<B>) -> RequestId {
    let request_id = RequestId::from_headers(req.headers()).unwrap_or_else(RequestId::generate);
    req.extensions_mut().insert(request_id.clone());
    request_id
}

/// Departure step: stamp the identifier onto the response, if there is one.
///
/// A missing identifier leaves the response untouched.
pub fn on_response<B>(request_id: Option<&RequestId>, res: &mut http::Response<B>) {
    let Some(request_id) = request_id else {
        tracing::debug!("no request id in context, response sent without X-Request-ID");
        return;
    };

    match request_id.header_value() {
        Some(value) => {
            res.headers_mut().insert(X_REQUEST_ID.clone(), value);
        }
        None => {
            tracing::warn!(request_id = %request_id, "request id is not a valid header value");
        }
    }
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = on_request(&mut req);
    let mut response = next.run(req).await;
    on_response(Some(&request_id), &mut response);
    response
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!("RequestId extractor used on a route without request_id_middleware");
            ApiError::Internal
        })
    }
}

impl<S> OptionalFromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> RequestId {
        RequestId {
            text: text.into(),
            inbound: None,
        }
    }

    fn request_with(header: Option<&str>) -> http::Request<()> {
        let mut builder = http::Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("X-Request-ID", value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn adopts_inbound_header_verbatim() {
        let mut req = request_with(Some("abc-123"));
        let id = on_request(&mut req);
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(req.extensions().get::<RequestId>(), Some(&id));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = http::Request::builder()
            .header("x-REQUEST-id", "Mixed-Case")
            .body(())
            .unwrap();
        assert_eq!(
            RequestId::from_headers(req.headers()).unwrap().as_str(),
            "Mixed-Case"
        );
    }

    #[test]
    fn generates_uuid_when_header_missing() {
        let mut req = request_with(None);
        let id = on_request(&mut req);
        let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.as_str(), parsed.hyphenated().to_string());
    }

    #[test]
    fn generates_uuid_when_header_empty() {
        let mut req = request_with(Some(""));
        let id = on_request(&mut req);
        assert!(!id.as_str().is_empty());
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn on_response_sets_header() {
        let mut res = http::Response::new(());
        on_response(Some(&id("abc-123")), &mut res);
        assert_eq!(res.headers().get(&X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[test]
    fn on_response_replaces_handler_value() {
        let mut res = http::Response::builder()
            .header("x-request-id", "stale")
            .header("x-request-id", "stale-2")
            .body(())
            .unwrap();
        on_response(Some(&id("fresh")), &mut res);
        let values: Vec<_> = res.headers().get_all(&X_REQUEST_ID).iter().collect();
        assert_eq!(values, vec!["fresh"]);
    }

    #[test]
    fn on_response_without_id_leaves_header_unset() {
        let mut res = http::Response::new(());
        on_response(None, &mut res);
        assert!(res.headers().get(&X_REQUEST_ID).is_none());
    }

    #[test]
    fn non_ascii_inbound_value_is_echoed_byte_for_byte() {
        let raw = HeaderValue::from_bytes(b"caf\xe9-1").unwrap();
        let mut req = http::Request::builder()
            .header(&X_REQUEST_ID, raw.clone())
            .body(())
            .unwrap();
        let request_id = on_request(&mut req);
        assert_eq!(request_id.as_str(), "caf\u{fffd}-1");

        let mut res = http::Response::new(());
        on_response(Some(&request_id), &mut res);
        assert_eq!(res.headers().get(&X_REQUEST_ID), Some(&raw));
    }

    #[test]
    fn repeated_header_adopts_first_value() {
        let req = http::Request::builder()
            .header("x-request-id", "first")
            .header("x-request-id", "second")
            .body(())
            .unwrap();
        assert_eq!(
            RequestId::from_headers(req.headers()).unwrap().as_str(),
            "first"
        );
    }
}
