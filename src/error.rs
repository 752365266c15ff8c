use std::fmt;

use miette::Diagnostic;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing_error::SpanTrace;

use crate::utils::{date_format::lenient_response_time, serde_helpers::empty_string_as_none};

/// Number of characters of an unrecognised body kept on a decode error.
pub const BODY_EXCERPT_LEN: usize = 256;

/// Category of a fault reported by QuickBooks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FaultType {
    Validation,
    Authentication,
    Authorization,
    System,
    Other(String),
}

impl FaultType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Validation => "ValidationFault",
            Self::Authentication => "AuthenticationFault",
            Self::Authorization => "AuthorizationFault",
            Self::System => "SystemFault",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for FaultType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ValidationFault" => Self::Validation,
            "AuthenticationFault" => Self::Authentication,
            "AuthorizationFault" => Self::Authorization,
            "SystemFault" => Self::System,
            _ => Self::Other(s),
        }
    }
}

impl From<FaultType> for String {
    fn from(fault_type: FaultType) -> Self {
        fault_type.as_str().to_string()
    }
}

impl fmt::Display for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a QuickBooks fault.
///
/// The service is inconsistent about key casing (authentication faults come
/// back all lowercase), so both spellings are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultError {
    #[serde(rename = "Message", alias = "message", default)]
    pub message: String,
    #[serde(rename = "Detail", alias = "detail", default)]
    pub detail: String,
    #[serde(alias = "Code", default)]
    pub code: String,
    /// The request element the service objected to, when it names one
    #[serde(
        alias = "Element",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub element: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    #[serde(rename = "Error", alias = "error")]
    pub errors: Vec<FaultError>,
    #[serde(rename = "type", alias = "Type")]
    pub fault_type: FaultType,
}

/// The body QuickBooks returns when it rejects a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultResponse {
    #[serde(rename = "Fault", alias = "fault")]
    pub fault: Fault,
    /// `None` when the service sent no timestamp or one that does not parse
    #[serde(
        default,
        with = "lenient_response_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<OffsetDateTime>,
}

impl FaultResponse {
    #[must_use]
    pub fn fault_type(&self) -> &FaultType {
        &self.fault.fault_type
    }

    /// The first entry, which is what the service considers the primary cause.
    #[must_use]
    pub fn primary(&self) -> Option<&FaultError> {
        self.fault.errors.first()
    }

    #[must_use]
    pub fn errors(&self) -> &[FaultError] {
        &self.fault.errors
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.primary().map(|e| e.code.as_str())
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.primary().map(|e| e.detail.as_str())
    }
}

impl fmt::Display for FaultResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {} Code: {} Detail: {}",
            self.fault_type(),
            self.code().unwrap_or_default(),
            self.detail().unwrap_or_default()
        )
    }
}

/// What kind of local contract the client refused to violate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdkErrorType {
    /// The payload could not be turned into a request body.
    InvalidPayload,
    /// Realm, credentials or endpoint were unusable.
    InvalidRequest,
    /// Configuration could not be loaded.
    Configuration,
}

impl SdkErrorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayload => "InvalidPayload",
            Self::InvalidRequest => "InvalidRequest",
            Self::Configuration => "Configuration",
        }
    }

    #[must_use]
    pub fn default_code(self) -> &'static str {
        match self {
            Self::InvalidPayload => "SDK-1001",
            Self::InvalidRequest => "SDK-1002",
            Self::Configuration => "SDK-1003",
        }
    }
}

impl fmt::Display for SdkErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised by the client itself, independent of any server response.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Type: {error_type} Code: {code} Message: {message}")]
pub struct SdkError {
    pub error_type: SdkErrorType,
    pub code: String,
    pub message: String,
}

impl SdkError {
    #[must_use]
    pub fn new(error_type: SdkErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type,
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        let error_type = SdkErrorType::InvalidPayload;
        Self::new(error_type, error_type.default_code(), message)
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        let error_type = SdkErrorType::InvalidRequest;
        Self::new(error_type, error_type.default_code(), message)
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        let error_type = SdkErrorType::Configuration;
        Self::new(error_type, error_type.default_code(), message)
    }
}

/// How the HTTP capability failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Send,
    Body,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connection failed",
            Self::Timeout => "request timed out",
            Self::Send => "request could not be sent",
            Self::Body => "response body could not be read",
        })
    }
}

/// Failure reported by an [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else if e.is_body() || e.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Send
        };
        Self::new(kind, e.to_string()).with_source(e)
    }
}

/// Flat classification of [`Error`] for callers that only need to branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPayload,
    InvalidRequest,
    Configuration,
    Transport,
    Decode,
    RemoteFault,
}

/// Errors that can occur when interacting with the QuickBooks API.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Raised locally before anything is sent.
    #[error("{0}")]
    #[diagnostic(
        code(quickbooks::sdk_error),
        help("The request was rejected by the client before it was sent; check the payload and credentials")
    )]
    Sdk(SdkError),

    #[error("transport error: {source}")]
    #[diagnostic(
        code(quickbooks::transport_error),
        help("Check your network connection and QuickBooks API availability")
    )]
    Transport {
        #[source]
        source: TransportError,
        span_trace: SpanTrace,
    },

    /// The body was empty, malformed or matched neither known shape.
    #[error("error decoding response (status {status_code}): {reason}")]
    #[diagnostic(
        code(quickbooks::decode_error),
        help("The API returned data in an unexpected format")
    )]
    Decode {
        status_code: StatusCode,
        reason: String,
        excerpt: String,
        #[source]
        source: Option<serde_json::Error>,
        span_trace: SpanTrace,
    },

    /// A business-level rejection reported by QuickBooks.
    #[error("{0}")]
    #[diagnostic(
        code(quickbooks::remote_fault),
        help("Review the fault entries returned by the QuickBooks API")
    )]
    RemoteFault(Box<FaultResponse>),
}

impl Error {
    pub(crate) fn decode(
        status_code: StatusCode,
        reason: impl Into<String>,
        body: &[u8],
        source: Option<serde_json::Error>,
    ) -> Self {
        Self::Decode {
            status_code,
            reason: reason.into(),
            excerpt: body_excerpt(body),
            source,
            span_trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sdk(e) => match e.error_type {
                SdkErrorType::InvalidPayload => ErrorKind::InvalidPayload,
                SdkErrorType::InvalidRequest => ErrorKind::InvalidRequest,
                SdkErrorType::Configuration => ErrorKind::Configuration,
            },
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::RemoteFault(_) => ErrorKind::RemoteFault,
        }
    }

    #[must_use]
    pub fn fault(&self) -> Option<&FaultResponse> {
        match self {
            Self::RemoteFault(response) => Some(response),
            _ => None,
        }
    }

    #[must_use]
    pub fn sdk_error(&self) -> Option<&SdkError> {
        match self {
            Self::Sdk(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }

    /// HTTP status of the response, when one was received.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Start of the unrecognised body attached to a decode error.
    #[must_use]
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            Self::Decode { excerpt, .. } => Some(excerpt),
            _ => None,
        }
    }

    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Transport { span_trace, .. } | Self::Decode { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }
}

impl From<SdkError> for Error {
    fn from(e: SdkError) -> Self {
        Self::Sdk(e)
    }
}

impl From<TransportError> for Error {
    fn from(source: TransportError) -> Self {
        Self::Transport {
            source,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<FaultResponse> for Error {
    fn from(response: FaultResponse) -> Self {
        Self::RemoteFault(Box::new(response))
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.chars();
    let mut excerpt: String = chars.by_ref().take(BODY_EXCERPT_LEN).collect();
    if chars.next().is_some() {
        excerpt.push_str("...");
    }
    excerpt
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
