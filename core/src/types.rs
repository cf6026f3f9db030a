//! Domain DTOs for the fax API.
//!
//! # Design
//! These types mirror the GraphQL schema exposed by the fax service but are
//! defined independently of the mock-server crate. Integration tests catch
//! any schema drift between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A fax transmission as confirmed by the server. Read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaxRecord {
    pub sid: String,
    pub from: String,
    pub to: String,
    pub media_url: String,
}

/// The not-yet-submitted fax fields held by the form. Also serves as the
/// `sendFax` variables object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaxDraft {
    pub from: String,
    pub to: String,
    pub media_url: String,
}

impl FaxDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::From => &self.from,
            DraftField::To => &self.to,
            DraftField::MediaUrl => &self.media_url,
        }
    }

    /// Replace exactly one field, leaving the others untouched.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::From => &mut self.from,
            DraftField::To => &mut self.to,
            DraftField::MediaUrl => &mut self.media_url,
        };
        *slot = value.into();
    }
}

/// One of the three editable draft fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    From,
    To,
    MediaUrl,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [DraftField::From, DraftField::To, DraftField::MediaUrl];

    /// The form input name, which is also the GraphQL variable name.
    pub fn name(self) -> &'static str {
        match self {
            DraftField::From => "from",
            DraftField::To => "to",
            DraftField::MediaUrl => "media_url",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftField::From => "from",
            DraftField::To => "to",
            DraftField::MediaUrl => "media url",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DraftField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// `data` payload of the `getFaxes` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFaxesData {
    #[serde(rename = "getFaxes")]
    pub get_faxes: Vec<FaxRecord>,
}

/// `data` payload of the `sendFax` mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFaxData {
    #[serde(rename = "sendFax")]
    pub send_fax: FaxRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_to_empty_strings() {
        let draft = FaxDraft::default();
        assert!(DraftField::ALL.iter().all(|f| draft.get(*f).is_empty()));
    }

    #[test]
    fn set_replaces_only_named_field() {
        let mut draft = FaxDraft {
            from: "+15551234567".to_string(),
            to: "+15557654321".to_string(),
            media_url: "https://x/y.pdf".to_string(),
        };
        draft.set(DraftField::To, "+15550000000");
        assert_eq!(draft.from, "+15551234567");
        assert_eq!(draft.to, "+15550000000");
        assert_eq!(draft.media_url, "https://x/y.pdf");
    }

    #[test]
    fn field_parses_from_input_name() {
        assert_eq!("media_url".parse::<DraftField>().unwrap(), DraftField::MediaUrl);
        let err = "subject".parse::<DraftField>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("subject".to_string()));
    }

    #[test]
    fn get_faxes_data_uses_graphql_field_name() {
        let data: GetFaxesData = serde_json::from_str(
            r#"{"getFaxes":[{"sid":"FX1","from":"a","to":"b","media_url":"https://x/y.pdf"}]}"#,
        )
        .unwrap();
        assert_eq!(data.get_faxes[0].sid, "FX1");
    }
}
