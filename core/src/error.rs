//! Error types for the fax client.
//!
//! # Design
//! Two families, never mixed. `ValidationError` is produced synchronously by
//! the form before any request exists. `ApiError` covers everything that can
//! go wrong once a request has been built: transport failures reported by the
//! host, non-2xx statuses, GraphQL `errors` payloads and malformed bodies.
//! The UI treats every `ApiError` variant identically; the variants exist for
//! logs and tests.

use thiserror::Error;

use crate::types::DraftField;

/// Errors surfaced by the GraphQL transport. Fatal to one attempt only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The host could not complete the HTTP round-trip.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server answered with a top-level `errors` array.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response carried neither `errors` nor `data`.
    #[error("response contained no data")]
    MissingData,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Draft rejected before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required fields are empty: {}", join_fields(.0))]
    EmptyFields(Vec<DraftField>),

    #[error("unknown form field `{0}`")]
    UnknownField(String),
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_joins_messages() {
        let err = ApiError::GraphQl(vec!["bad number".to_string(), "no media".to_string()]);
        assert_eq!(err.to_string(), "GraphQL errors: bad number; no media");
    }

    #[test]
    fn empty_fields_lists_input_names() {
        let err = ValidationError::EmptyFields(vec![DraftField::To, DraftField::MediaUrl]);
        assert_eq!(err.to_string(), "required fields are empty: to, media_url");
    }
}
