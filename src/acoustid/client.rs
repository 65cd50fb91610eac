//! AcoustID HTTP client
//!
//! Handles communication with the AcoustID web service.
//! See: https://acoustid.org/webservice
//!
//! ## Rate limit
//!
//! The service allows at most **3 requests per second** and forbids
//! commercial use of the results. The client does NOT throttle locally:
//! every call maps to exactly one request, and callers orchestrating bulk
//! lookups must pace themselves (e.g. with a token-bucket limiter) to stay
//! under the ceiling.
//!
//! ## Error normalization
//!
//! The transport reports a non-2xx response as one combined message,
//! `"<status line> - <json body>"`. The client splits that message on the
//! FIRST `" - "` only (the body may itself contain the delimiter inside a
//! message string), parses the body as a JSON object, and attaches the
//! status line as `httpStatus`. The normalized error comes back as an `Ok`
//! resolution - callers branch on [`LookupOutcome`], not on `Err`. Messages
//! that do not fit that shape at all are contract violations and surface as
//! a distinct [`LookupError::ProtocolViolation`] instead of being coerced
//! into a fake service error.

use super::domain::{LookupError, LookupOutcome, LookupQuery, RemoteServiceError};
use super::transport::{HttpTransport, LookupTransport, TransportError};

/// Lookup endpoint. Fixed; the service has a single public base URL.
const ENDPOINT: &str = "https://api.acoustid.org/v2/lookup";

/// Metadata groups requested with every lookup. Always sent in full;
/// there is no partial-metadata mode.
const META: &str = "recordings recordingids releases releaseids releasegroups releasegroupids tracks compress usermeta sources";

/// AcoustID API client.
///
/// Holds only immutable configuration, so a single instance can be shared
/// and invoked from any number of concurrent call sites.
pub struct AcoustIdClient {
    api_key: String,
    transport: Box<dyn LookupTransport>,
}

impl AcoustIdClient {
    /// Create a client over the production HTTP transport.
    ///
    /// Fails if `api_key` is empty or blank - the service rejects
    /// unauthenticated lookups, so an unkeyed client is unusable.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LookupError> {
        Self::with_transport(api_key, Box::new(HttpTransport::new()))
    }

    /// Create a client over a custom transport. Tests use this to inject
    /// scripted fakes; production code should prefer [`AcoustIdClient::new`].
    pub fn with_transport(
        api_key: impl Into<String>,
        transport: Box<dyn LookupTransport>,
    ) -> Result<Self, LookupError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LookupError::ApiKeyMissing);
        }
        Ok(Self { api_key, transport })
    }

    /// Look up the MusicBrainz metadata associated with a Chromaprint
    /// fingerprint. Both the fingerprint and the track duration are
    /// required; the service cannot resolve one without the other.
    pub async fn lookup_by_fingerprint(
        &self,
        fingerprint: impl Into<String>,
        duration_secs: u32,
    ) -> Result<LookupOutcome, LookupError> {
        self.lookup(&LookupQuery::Fingerprint {
            fingerprint: fingerprint.into(),
            duration_secs,
        })
        .await
    }

    /// Look up data connected to an AcoustID track ID, which names a
    /// cluster of fingerprints.
    pub async fn lookup_by_track_id(
        &self,
        track_id: impl Into<String>,
    ) -> Result<LookupOutcome, LookupError> {
        self.lookup(&LookupQuery::TrackId {
            track_id: track_id.into(),
        })
        .await
    }

    /// List AcoustIDs by MusicBrainz recording ID. More than one ID may be
    /// supplied; they are sent as repeated `mbid` parameters.
    pub async fn list_ids_by_recording_id<I, S>(
        &self,
        recording_ids: I,
    ) -> Result<LookupOutcome, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookup(&LookupQuery::RecordingIds {
            recording_ids: recording_ids.into_iter().map(Into::into).collect(),
        })
        .await
    }

    /// The single funnel every lookup goes through: validate, build the
    /// request, send it, normalize the answer.
    pub async fn lookup(&self, query: &LookupQuery) -> Result<LookupOutcome, LookupError> {
        query.validate()?;
        let url = self.build_url(query);

        match self.transport.get(&url).await {
            Ok(body) => {
                let decoded = serde_json::from_str(&body).map_err(|e| {
                    LookupError::ProtocolViolation(format!("unparsable success body: {e}"))
                })?;
                Ok(LookupOutcome::Success(decoded))
            }
            Err(TransportError::Status(combined)) => Ok(LookupOutcome::ServiceError(
                normalize_service_error(&combined)?,
            )),
            Err(TransportError::Unreachable(message)) => Err(LookupError::Network(message)),
        }
    }

    /// Build the request URL for a validated query.
    ///
    /// Parameters: `format=json`, `client=<key>`, the variant's fields,
    /// then the fixed `meta` list.
    fn build_url(&self, query: &LookupQuery) -> String {
        let mut url = format!(
            "{}?format=json&client={}",
            ENDPOINT,
            urlencoding::encode(&self.api_key)
        );

        match query {
            LookupQuery::Fingerprint {
                fingerprint,
                duration_secs,
            } => {
                url.push_str(&format!(
                    "&duration={}&fingerprint={}",
                    duration_secs,
                    urlencoding::encode(fingerprint)
                ));
            }
            LookupQuery::TrackId { track_id } => {
                url.push_str(&format!("&trackid={}", urlencoding::encode(track_id)));
            }
            LookupQuery::RecordingIds { recording_ids } => {
                for id in recording_ids {
                    url.push_str(&format!("&mbid={}", urlencoding::encode(id)));
                }
            }
        }

        url.push_str(&format!("&meta={}", urlencoding::encode(META)));
        url
    }
}

/// Split a combined `"<status line> - <json body>"` message and attach the
/// status line to the parsed body.
///
/// The split must take the FIRST occurrence of the delimiter: the JSON body
/// regularly carries `" - "` inside message strings, and a split-all would
/// truncate it mid-document.
fn normalize_service_error(combined: &str) -> Result<RemoteServiceError, LookupError> {
    let Some((status_line, body)) = combined.split_once(" - ") else {
        return Err(LookupError::ProtocolViolation(format!(
            "missing \" - \" delimiter in {combined:?}"
        )));
    };

    let details = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map,
        // Valid JSON but not an object: there is nothing to attach the
        // status line to, which means the service broke its contract.
        Ok(other) => {
            return Err(LookupError::ProtocolViolation(format!(
                "error body is not a JSON object: {other}"
            )));
        }
        Err(e) => {
            return Err(LookupError::ProtocolViolation(format!(
                "error body is not valid JSON: {e}"
            )));
        }
    };

    Ok(RemoteServiceError {
        http_status: status_line.to_string(),
        details,
    })
}
