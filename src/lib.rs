//! # quickbooks-rs
//!
//! A Rust client library for creating entities through the QuickBooks Online
//! accounting API.
//!
//! ```ignore
//! use quickbooks_rs::{Account, AccountType, Client, ClientConfig, Credentials};
//!
//! let credentials = Credentials::new("4620816365", "Bearer eyJ...");
//! let client = Client::new(credentials, &ClientConfig::sandbox())?;
//!
//! let created = client
//!     .accounts()
//!     .create(&Account::new("Office Supplies", AccountType::Expense))
//!     .await?;
//! println!("created account {:?} at {:?}", created.id, created.time);
//! ```
//!
//! Every create ends in exactly one of three outcomes: the created entity,
//! a [`Error::RemoteFault`] carrying the service's fault entries, or a local
//! error ([`Error::Sdk`], [`Error::Transport`], [`Error::Decode`]).
//!
//! ## Tracing and Sentry
//!
//! Transport and decode errors capture a span trace. Install `ErrorLayer`
//! for it to be populated:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .init();
//! ```
//!
//! With the `sentry` feature enabled, errors convert into Sentry breadcrumbs;
//! see [`sentry_integration`].

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod classify;
pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod request;
pub mod transport;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use classify::classify;
pub use client::Client;
pub use config::{ClientConfig, RequestOptions};
pub use credentials::Credentials;
pub use endpoints::{Environment, QuickbooksEndpoint};
pub use entities::*;
pub use error::{
    Error, ErrorKind, FaultError, FaultResponse, FaultType, SdkError, SdkErrorType,
    TransportError, TransportErrorKind,
};
pub use request::{PreparedRequest, RequestBuilder};
pub use transport::{Executor, HttpTransport, RawResponse, ReqwestTransport};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;

// Re-export entity types for convenience
pub use entities::account::{Account, AccountClassification, AccountType};
pub use entities::journal_entry::{JournalEntry, Line, PostingType};
pub use entities::reference::Reference;
