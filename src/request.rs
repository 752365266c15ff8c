//! Turns an entity payload into a fully specified HTTP request.

use reqwest::{
    Method,
    header::{self, HeaderMap, HeaderValue},
};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::{
    config::{ClientConfig, RequestOptions},
    credentials::Credentials,
    endpoints::QuickbooksEndpoint,
    entities::Entity,
    error::{Result, SdkError},
};

const JSON: &str = "application/json";

/// An outbound request, ready to be handed to a transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl PreparedRequest {
    /// Decodes the body back into JSON, mostly useful for inspection.
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.body)
    }
}

/// Builds create requests for any [`Entity`].
///
/// Holds no per-call state, so one builder can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    minor_version: Option<u32>,
    request_ids: bool,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            minor_version: None,
            request_ids: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.environment.base_url()?,
            minor_version: config.minor_version,
            request_ids: config.request_ids,
        })
    }

    #[must_use]
    pub fn with_minor_version(mut self, minor_version: Option<u32>) -> Self {
        self.minor_version = minor_version;
        self
    }

    #[must_use]
    pub fn with_request_ids(mut self, enabled: bool) -> Self {
        self.request_ids = enabled;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn options(&self) -> RequestOptions {
        RequestOptions {
            minor_version: self.minor_version,
            request_id: self.request_ids.then(Uuid::new_v4),
        }
    }

    /// Builds `POST company/{realm_id}/{kind}` carrying `payload` as JSON.
    ///
    /// Fields the service assigns are left out of the body even if the
    /// payload has them set.
    #[instrument(skip(self, credentials, payload), fields(kind = %E::KIND))]
    pub fn build<E: Entity>(&self, credentials: &Credentials, payload: &E) -> Result<PreparedRequest> {
        credentials.validate()?;

        let mut url =
            QuickbooksEndpoint::entity(credentials.realm_id(), E::KIND).to_url(&self.base_url)?;
        self.options().apply_to_url(&mut url);

        let body = serialize_for_create(payload)?;

        let mut authorization = HeaderValue::from_str(credentials.authorization())
            .map_err(|_| SdkError::invalid_request("authorization is not a valid header value"))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON));

        debug!(%url, bytes = body.len(), "prepared create request");
        Ok(PreparedRequest {
            method: Method::POST,
            url,
            headers,
            body,
        })
    }
}

/// Serializes `payload` and strips its kind's server-assigned fields.
pub fn serialize_for_create<E: Entity>(payload: &E) -> Result<Vec<u8>> {
    let value = serde_json::to_value(payload).map_err(|e| {
        SdkError::invalid_payload(format!("failed to serialize {}: {e}", E::KIND))
    })?;
    let Value::Object(mut fields) = value else {
        return Err(SdkError::invalid_payload(format!(
            "{} must serialize to a JSON object",
            E::KIND
        ))
        .into());
    };

    for key in E::SERVER_ASSIGNED {
        if fields.remove(*key).is_some() {
            trace!(field = *key, "dropped server-assigned field");
        }
    }
    for (array, key) in E::SERVER_ASSIGNED_NESTED {
        let Some(Value::Array(elements)) = fields.get_mut(*array) else {
            continue;
        };
        for element in elements.iter_mut().filter_map(Value::as_object_mut) {
            if element.remove(*key).is_some() {
                trace!(field = *key, array = *array, "dropped server-assigned field");
            }
        }
    }

    let body = serde_json::to_vec(&fields).map_err(|e| {
        SdkError::invalid_payload(format!("failed to encode {}: {e}", E::KIND))
    })?;
    trace!(json = %String::from_utf8_lossy(&body), "request body");
    Ok(body)
}
