//! Sentry integration for quickbooks-rs errors.
//!
//! Only available when the `sentry` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! quickbooks-rs = { version = "0.1.0-alpha.1", features = ["sentry"] }
//! ```
//!
//! Set up tracing with `ErrorLayer` so that transport and decode errors carry
//! a span trace:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

/// Records a quickbooks-rs error as a breadcrumb, so failed creates show up
/// in the trail leading to a Sentry event.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let mut data = BTreeMap::new();
        let (category, message) = match error {
            Error::Sdk(e) => {
                data.insert("error_type".to_string(), Value::from(e.error_type.as_str()));
                data.insert("code".to_string(), Value::from(e.code.clone()));
                ("quickbooks.sdk", e.to_string())
            }

            Error::Transport { source, .. } => {
                data.insert("kind".to_string(), Value::from(format!("{:?}", source.kind)));
                ("http.request", format!("HTTP request error: {source}"))
            }

            Error::Decode {
                status_code,
                reason,
                ..
            } => {
                data.insert("status_code".to_string(), Value::from(status_code.as_u16()));
                ("http.response", format!("Failed to decode response: {reason}"))
            }

            Error::RemoteFault(response) => {
                data.insert(
                    "fault_type".to_string(),
                    Value::from(response.fault_type().to_string()),
                );
                if let Some(code) = response.code() {
                    data.insert("code".to_string(), Value::from(code));
                }
                data.insert("entries".to_string(), Value::from(response.errors().len()));
                ("quickbooks.fault", format!("QuickBooks fault: {response}"))
            }
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(message),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Extracts extra context for a Sentry event from an error.
///
/// ```ignore
/// use sentry::configure_scope;
/// use quickbooks_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.accounts().create(&account).await {
///     configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "quickbooks.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(status) = error.status_code() {
        context.insert(
            "quickbooks.status_code".to_string(),
            Value::from(status.as_u16()),
        );
    }

    // Already truncated when the error was built
    if let Some(excerpt) = error.body_excerpt() {
        context.insert(
            "quickbooks.response_body".to_string(),
            Value::from(excerpt.to_string()),
        );
    }

    if let Some(response) = error.fault() {
        let entries: Vec<Value> = response
            .errors()
            .iter()
            .map(|entry| Value::from(format!("{}: {}", entry.code, entry.detail)))
            .collect();
        context.insert(
            "quickbooks.fault_type".to_string(),
            Value::from(response.fault_type().to_string()),
        );
        context.insert("quickbooks.fault_errors".to_string(), Value::from(entries));
    }

    context
}
