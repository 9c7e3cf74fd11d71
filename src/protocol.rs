//! Report payload encoding and authorization response decoding

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::types::{AuthorizationOutcome, CardUid, HttpResponse, TerminalError, TransportErrorReason};

/// Content type of the outbound report
pub const CONTENT_TYPE_JSON: &str = "application/json";

const STATUS_OK: u16 = 200;

/// Body sent to the backend for every scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentificationReport {
    #[serde(rename = "rfidTag")]
    pub card_uid_hex: String,
    #[serde(rename = "lectorId")]
    pub reader_id: i64,
}

impl IdentificationReport {
    pub fn new(uid: &CardUid, reader_id: i64) -> Self {
        Self {
            card_uid_hex: uid.to_hex(),
            reader_id,
        }
    }
}

/// Encode the JSON report for a scanned card
pub fn build_report_payload(uid: &CardUid, reader_id: i64) -> Vec<u8> {
    let report = IdentificationReport::new(uid, reader_id);
    // A struct of one string and one integer always serializes
    let payload = serde_json::to_vec(&report).unwrap_or_default();
    debug!("Report payload: {}", String::from_utf8_lossy(&payload));
    payload
}

/// Decode a 200 body into a granted outcome.
///
/// Missing fields, wrong types and malformed JSON all yield empty strings
/// instead of an error, so a granted scan always renders.
pub fn parse_outcome(response_body: &[u8]) -> AuthorizationOutcome {
    let doc = match serde_json::from_slice::<Value>(response_body) {
        Ok(doc) => doc,
        Err(e) => {
            let err = TerminalError::MalformedResponse(e.to_string());
            warn!("{}", err);
            Value::Null
        }
    };

    let holder_name = string_at(&doc, "/usuario/nombre");
    let movement = string_at(&doc, "/tipoMovimiento");

    AuthorizationOutcome::Granted {
        holder_name,
        movement,
    }
}

/// Map a POST result onto the outcome shown to the user
pub fn classify_response<E: std::fmt::Debug>(result: Result<HttpResponse, E>) -> AuthorizationOutcome {
    match result {
        Ok(response) if response.status == STATUS_OK => parse_outcome(&response.body),
        Ok(response) if response.status > 0 => AuthorizationOutcome::Denied {
            status_code: response.status,
        },
        Ok(_) => AuthorizationOutcome::TransportError {
            reason: TransportErrorReason::NoResponse,
        },
        Err(e) => {
            warn!("{}", TerminalError::TransportFailure(format!("{:?}", e)));
            AuthorizationOutcome::TransportError {
                reason: TransportErrorReason::NoResponse,
            }
        }
    }
}

fn string_at(doc: &Value, pointer: &str) -> String {
    match doc.pointer(pointer).and_then(Value::as_str) {
        Some(value) => value.to_owned(),
        None => {
            if !doc.is_null() {
                warn!("{}", TerminalError::MalformedResponse(format!("missing {}", pointer)));
            }
            String::new()
        }
    }
}
