//! GraphQL documents and the JSON envelope around them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Lists every fax the service knows about.
pub const GET_FAXES: &str = r#"
query {
    getFaxes {
        sid
        from
        to
        media_url
    }
}
"#;

/// Sends one fax. Variables: `from`, `to`, `media_url`.
pub const SEND_FAX: &str = r#"
mutation($from: String, $to: String, $media_url: String) {
    sendFax(from: $from, to: $to, media_url: $media_url) {
        sid
        from
        to
        media_url
    }
}
"#;

/// Request body: `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest<V> {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
}

/// One entry of a top-level `errors` array. Extra keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphQlError {
    pub message: String,
}

/// Response body. `data` and `errors` may both be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<D> {
    pub data: Option<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,
}

/// Decode the `data` member of a GraphQL response.
///
/// A non-2xx status wins over the body. A non-empty `errors` array wins over
/// any partial `data`, so callers never see a data/error mix.
pub fn parse_data<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }
    let envelope: GraphQlResponse<D> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    match envelope.errors {
        Some(errors) if !errors.is_empty() => {
            return Err(ApiError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        _ => {}
    }
    envelope.data.ok_or(ApiError::MissingData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GetFaxesData;

    #[test]
    fn request_without_variables_omits_key() {
        let req: GraphQlRequest<()> = GraphQlRequest {
            query: GET_FAXES.to_string(),
            variables: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("variables").is_none());
        assert_eq!(json["query"], GET_FAXES);
    }

    #[test]
    fn errors_take_precedence_over_data() {
        let response = HttpResponse::new(
            200,
            r#"{"data":{"getFaxes":[]},"errors":[{"message":"boom","path":["getFaxes"]}]}"#,
        );
        let err = parse_data::<GetFaxesData>(&response).unwrap_err();
        assert_eq!(err, ApiError::GraphQl(vec!["boom".to_string()]));
    }

    #[test]
    fn empty_errors_array_is_ignored() {
        let response = HttpResponse::new(200, r#"{"data":{"getFaxes":[]},"errors":[]}"#);
        let data = parse_data::<GetFaxesData>(&response).unwrap();
        assert!(data.get_faxes.is_empty());
    }

    #[test]
    fn null_data_is_missing() {
        let response = HttpResponse::new(200, r#"{"data":null}"#);
        let err = parse_data::<GetFaxesData>(&response).unwrap_err();
        assert_eq!(err, ApiError::MissingData);
    }

    #[test]
    fn non_2xx_is_http_error() {
        let response = HttpResponse::new(401, r#"{"errors":[{"message":"unauthorized"}]}"#);
        let err = parse_data::<GetFaxesData>(&response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 401, .. }));
    }

    #[test]
    fn garbage_body_is_deserialization_error() {
        let response = HttpResponse::new(200, "<html>");
        let err = parse_data::<GetFaxesData>(&response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
