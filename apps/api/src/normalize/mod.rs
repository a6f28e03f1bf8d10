//! Response normalizer. Turns an unreliable completion into a fixed-shape record.
//!
//! Every call site declares:
//! - a *draft* type: all fields optional, decoded leniently (`fields::lenient`)
//! - a *shape* function: draft → response record, applying per-field defaults
//! - a *fallback*: the static record used when no draft can be decoded
//!
//! Callers never see a normalization error. They get a `Normalized<T>` whose
//! `degraded` flag records whether the fallback was used; the HTTP layer turns
//! that flag into an `x-degraded: true` header and leaves the body shape alone.
//!
//! Two fallback policies exist:
//! - `normalize`: only parse failures are absorbed. The caller has already
//!   propagated upstream errors with `?`.
//! - `normalize_absorbing`: upstream failures are absorbed as well, with their
//!   own fallback.

pub mod extract;
pub mod fields;

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::llm_client::LlmError;

pub use extract::decode;

pub const DEGRADED_HEADER: &str = "x-degraded";

/// A response record plus whether it came from a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Normalized<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn degraded(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Normalized<U> {
        Normalized {
            value: f(self.value),
            degraded: self.degraded,
        }
    }
}

impl<T: Serialize> IntoResponse for Normalized<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.value).into_response();
        if self.degraded {
            response
                .headers_mut()
                .insert(DEGRADED_HEADER, HeaderValue::from_static("true"));
        }
        response
    }
}

/// Decodes `completion` as draft `D` and shapes it; falls back on parse failure.
pub fn normalize<D, T, S, F>(call_site: &'static str, completion: &str, shape: S, fallback: F) -> Normalized<T>
where
    D: DeserializeOwned,
    S: FnOnce(D) -> T,
    F: FnOnce() -> T,
{
    match decode::<D>(completion) {
        Ok(draft) => Normalized::fresh(shape(draft)),
        Err(err) => {
            warn!(
                call_site,
                error = %err,
                preview = %preview(completion),
                "completion could not be decoded, using fallback record"
            );
            Normalized::degraded(fallback())
        }
    }
}

/// Like `normalize`, but an upstream failure also degrades to a fallback
/// instead of failing the request.
pub fn normalize_absorbing<D, T, S, F, U>(
    call_site: &'static str,
    completion: Result<String, LlmError>,
    shape: S,
    on_parse_failure: F,
    on_upstream_failure: U,
) -> Normalized<T>
where
    D: DeserializeOwned,
    S: FnOnce(D) -> T,
    F: FnOnce() -> T,
    U: FnOnce() -> T,
{
    match completion {
        Ok(text) => normalize(call_site, &text, shape, on_parse_failure),
        Err(err) => {
            warn!(call_site, error = %err, "upstream call failed, using fallback record");
            Normalized::degraded(on_upstream_failure())
        }
    }
}

/// First 100 characters, for logs.
pub(crate) fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        out.push_str("...");
    }
    out
}
