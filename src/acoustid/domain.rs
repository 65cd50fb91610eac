//! Domain types for AcoustID lookups.
//!
//! The lookup service accepts three distinct query forms and answers every
//! request, success or failure, through the same resolution channel. These
//! types make both facts explicit: [`LookupQuery`] is a tagged union so a
//! call can never mix fields from two forms, and [`LookupOutcome`] is a sum
//! type so callers are forced to handle the service-error arm instead of
//! probing a response for missing fields.

use serde::{Deserialize, Serialize};

/// Errors raised by the lookup client.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No usable API key was supplied at construction time.
    #[error("AcoustID API key required: https://acoustid.org/new-application")]
    ApiKeyMissing,

    /// A lookup was attempted with required fields missing or empty.
    /// Raised synchronously, before any request is issued.
    #[error("{0}")]
    InvalidQuery(&'static str),

    /// The request never produced an HTTP response (DNS, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The service's error response did not follow the
    /// `"<status line> - <json body>"` contract.
    #[error("lookup service violated its error contract: {0}")]
    ProtocolViolation(String),
}

/// One lookup request. Exactly one variant's fields are sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// Chromaprint fingerprint plus track duration. Both are required
    /// together; the service cannot resolve one without the other.
    Fingerprint {
        fingerprint: String,
        duration_secs: u32,
    },
    /// AcoustID track identifier (a UUID naming a cluster of fingerprints).
    TrackId { track_id: String },
    /// One or more MusicBrainz recording identifiers, treated as a set and
    /// sent as repeated `mbid` parameters.
    RecordingIds { recording_ids: Vec<String> },
}

impl LookupQuery {
    /// Check that the variant's required fields are actually present.
    ///
    /// The type system rules out mixing variants, but empty strings and
    /// empty lists still have to be rejected before any I/O happens.
    pub fn validate(&self) -> Result<(), LookupError> {
        match self {
            LookupQuery::Fingerprint {
                fingerprint,
                duration_secs,
            } => {
                if fingerprint.is_empty() || *duration_secs == 0 {
                    return Err(LookupError::InvalidQuery(
                        "fingerprint and duration are required",
                    ));
                }
            }
            LookupQuery::TrackId { track_id } => {
                if track_id.is_empty() {
                    return Err(LookupError::InvalidQuery("trackid is required"));
                }
            }
            LookupQuery::RecordingIds { recording_ids } => {
                if recording_ids.is_empty() || recording_ids.iter().any(|id| id.is_empty()) {
                    return Err(LookupError::InvalidQuery("mbid is required"));
                }
            }
        }
        Ok(())
    }
}

/// What a lookup resolves to once a request has been answered.
///
/// Non-2xx responses are NOT errors at this level: the service reports
/// application failures (bad key, rate limit, unknown fingerprint) through
/// the same channel as successes, so both arms arrive as `Ok`. Only
/// validation problems, unreachable hosts, and contract violations surface
/// as [`LookupError`].
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The decoded JSON body, passed through verbatim. The structure
    /// (recordings, releases, release groups, scored match candidates)
    /// belongs to the service; we do not re-shape it.
    Success(serde_json::Value),
    /// A non-2xx response, normalized.
    ServiceError(RemoteServiceError),
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }
}

/// A non-2xx response from the lookup service.
///
/// Serializes to the same shape the upstream protocol uses: the service's
/// own error fields with the status line attached as `httpStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteServiceError {
    /// Status line of the failed response, e.g. `400 Bad Request`.
    #[serde(rename = "httpStatus")]
    pub http_status: String,
    /// Whatever error fields the service supplied, untouched.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl RemoteServiceError {
    /// The service's human-readable error message, when it sent one in the
    /// conventional `{"error": {"message": ...}}` shape.
    pub fn message(&self) -> Option<&str> {
        self.details.get("error")?.get("message")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_query_requires_both_fields() {
        let missing_duration = LookupQuery::Fingerprint {
            fingerprint: "AQADtNIyRUkkZUqS".to_string(),
            duration_secs: 0,
        };
        let missing_fingerprint = LookupQuery::Fingerprint {
            fingerprint: String::new(),
            duration_secs: 180,
        };

        for query in [missing_duration, missing_fingerprint] {
            let err = query.validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "fingerprint and duration are required",
                "query {query:?} should fail validation"
            );
        }
    }

    #[test]
    fn test_complete_fingerprint_query_validates() {
        let query = LookupQuery::Fingerprint {
            fingerprint: "AQADtNIyRUkkZUqS".to_string(),
            duration_secs: 180,
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_track_id_query_rejects_empty_id() {
        let query = LookupQuery::TrackId {
            track_id: String::new(),
        };
        let err = query.validate().unwrap_err();
        assert_eq!(err.to_string(), "trackid is required");
    }

    #[test]
    fn test_recording_ids_query_rejects_empty_set() {
        let empty = LookupQuery::RecordingIds {
            recording_ids: vec![],
        };
        assert!(matches!(
            empty.validate(),
            Err(LookupError::InvalidQuery("mbid is required"))
        ));

        // An empty element is as useless as no element at all
        let blank_element = LookupQuery::RecordingIds {
            recording_ids: vec!["b1a9c0e9-d987-4042-ae91-78d6a3267d69".to_string(), String::new()],
        };
        assert!(blank_element.validate().is_err());
    }

    #[test]
    fn test_service_error_serializes_with_http_status_field() {
        let body: serde_json::Value =
            serde_json::from_str(r#"{"error":{"message":"invalid API key","code":4}}"#).unwrap();
        let serde_json::Value::Object(details) = body else {
            panic!("fixture must be an object");
        };

        let err = RemoteServiceError {
            http_status: "400 Bad Request".to_string(),
            details,
        };

        let serialized = serde_json::to_value(&err).unwrap();
        assert_eq!(serialized["httpStatus"], "400 Bad Request");
        assert_eq!(serialized["error"]["message"], "invalid API key");
        assert_eq!(err.message(), Some("invalid API key"));
    }

    #[test]
    fn test_service_error_message_absent_on_unconventional_body() {
        let err = RemoteServiceError {
            http_status: "503 Service Unavailable".to_string(),
            details: serde_json::Map::new(),
        };
        assert!(err.message().is_none());
    }
}
