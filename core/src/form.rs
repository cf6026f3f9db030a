//! The fax form: local draft state plus the submit gate.

use crate::error::ValidationError;
use crate::types::{DraftField, FaxDraft};

/// Accept a draft only when every field is non-empty.
///
/// The error names every empty field, in form order. Whitespace counts as
/// content; phone number and URL syntax are the server's business.
pub fn validate(draft: &FaxDraft) -> Result<FaxDraft, ValidationError> {
    let empty: Vec<DraftField> = DraftField::ALL
        .into_iter()
        .filter(|f| draft.get(*f).is_empty())
        .collect();
    if empty.is_empty() {
        Ok(draft.clone())
    } else {
        Err(ValidationError::EmptyFields(empty))
    }
}

/// Editable form state. Lives as long as the form is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaxForm {
    draft: FaxDraft,
}

impl FaxForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FaxDraft {
        &self.draft
    }

    pub fn handle_change(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Change handler keyed by the input's `name` attribute.
    pub fn handle_named_change(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let field = name.parse()?;
        self.handle_change(field, value);
        Ok(())
    }

    /// Validate, then hand the draft to `submit` exactly once.
    ///
    /// On failure `submit` is never called and the caller is expected to show
    /// a blocking prompt. The form keeps its contents either way.
    pub fn on_submit<R>(
        &self,
        submit: impl FnOnce(FaxDraft) -> R,
    ) -> Result<R, ValidationError> {
        let draft = validate(&self.draft)?;
        Ok(submit(draft))
    }
}
