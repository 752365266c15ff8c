//! Decides what a QuickBooks response body means.
//!
//! QuickBooks reports some rejections inside a `200` body and has been seen
//! to send error statuses with perfectly good entities, so the decision is
//! driven by the body's shape. The status code only ends up in diagnostics.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    entities::{Entity, Envelope},
    error::{Error, FaultResponse, Result},
    utils::date_format::response_time,
};

/// Classifies a response as a created entity, a service fault, or an
/// undecodable body, in that order of preference.
///
/// Pure: the same status and body always yield the same outcome.
#[instrument(skip(body), fields(kind = %E::KIND, status = %status, bytes = body.len()))]
pub fn classify<E: Entity>(status: StatusCode, body: &[u8]) -> Result<Envelope<E>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        warn!("empty response body");
        return Err(Error::decode(status, "empty response body", body, None));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        error!("response body is not valid JSON: {}", e);
        Error::decode(status, "response body is not well-formed JSON", body, Some(e))
    })?;

    if !status.is_success() {
        debug!("non-success status, classifying by content");
    }

    let entity_error = match decode_envelope::<E>(&value) {
        Ok(Some(envelope)) => return Ok(envelope),
        Ok(None) => None,
        Err(e) => {
            warn!("{} envelope did not decode: {}", E::KIND, e);
            Some(e)
        }
    };

    if let Some(fault) = decode_fault(&value) {
        warn!(
            fault_type = %fault.fault_type(),
            entries = fault.errors().len(),
            "request rejected: {}",
            fault
        );
        return Err(fault.into());
    }

    error!("response matched neither the {} envelope nor a fault", E::KIND);
    Err(Error::decode(
        status,
        format!("response matched neither the {} envelope nor a fault", E::KIND),
        body,
        entity_error,
    ))
}

/// `Ok(None)` when the body has no usable entity under the kind's key.
fn decode_envelope<E: Entity>(value: &Value) -> serde_json::Result<Option<Envelope<E>>> {
    let Some(raw) = value.get(E::KIND.name()) else {
        return Ok(None);
    };

    let entity = E::deserialize(raw)?;
    if !entity.has_required_fields() {
        warn!("{} is missing required fields", E::KIND);
        return Ok(None);
    }

    let time = match value.get("time") {
        None | Some(Value::Null) => None,
        Some(time) => Some(response_time::deserialize(time)?),
    };

    Ok(Some(Envelope { entity, time }))
}

/// Fault keys are matched in either casing; a missing or unreadable `time`
/// does not stop the entries from being reported.
fn decode_fault(value: &Value) -> Option<FaultResponse> {
    value.get("Fault").or_else(|| value.get("fault"))?;
    match FaultResponse::deserialize(value) {
        Ok(fault) if !fault.errors().is_empty() => Some(fault),
        Ok(_) => {
            warn!("fault without error entries");
            None
        }
        Err(e) => {
            warn!("fault did not decode: {}", e);
            None
        }
    }
}
