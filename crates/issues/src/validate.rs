use db::models::issue::{CreateIssue, IssuePatch};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    COULD_NOT_DELETE, COULD_NOT_UPDATE, CreateIssueRequest, DeleteIssueRequest, FieldValue,
    MISSING_ID, NO_UPDATE_FIELDS, REQUIRED_FIELDS_MISSING, UpdateIssueRequest, parse_open_flag,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRejection {
    #[error("{}", REQUIRED_FIELDS_MISSING)]
    MissingRequiredFields,
}

/// Every variant after `MissingId` echoes the `_id` exactly as it was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateRejection {
    #[error("{}", MISSING_ID)]
    MissingId,
    #[error("{}", NO_UPDATE_FIELDS)]
    NoUpdateFields { id: Value },
    #[error("{}", COULD_NOT_UPDATE)]
    MalformedId { id: Value },
    /// A field carried an array or object, which no text column can hold.
    #[error("{}", COULD_NOT_UPDATE)]
    UnstorableValue { id: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteRejection {
    #[error("{}", MISSING_ID)]
    MissingId,
    #[error("{}", COULD_NOT_DELETE)]
    MalformedId { id: Value },
}

impl UpdateRejection {
    /// The `_id` to echo back next to the error, when the client sent one.
    pub fn echoed_id(&self) -> Option<&Value> {
        match self {
            UpdateRejection::MissingId => None,
            UpdateRejection::NoUpdateFields { id }
            | UpdateRejection::MalformedId { id }
            | UpdateRejection::UnstorableValue { id } => Some(id),
        }
    }
}

impl DeleteRejection {
    pub fn echoed_id(&self) -> Option<&Value> {
        match self {
            DeleteRejection::MissingId => None,
            DeleteRejection::MalformedId { id } => Some(id),
        }
    }
}

/// A parsed issue id together with the text the client sent for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub id: Uuid,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub target: IssueRef,
    pub patch: IssuePatch,
}

/// Create fields count only when truthy and scalar; `false`, `0` and `""`
/// are treated as never sent.
fn truthy_text(field: Option<FieldValue>) -> Option<String> {
    field
        .filter(FieldValue::is_truthy)
        .and_then(FieldValue::into_text)
}

/// Update fields count when present and not the empty string.
fn update_field(field: Option<FieldValue>) -> Option<FieldValue> {
    field.filter(|value| !value.is_empty_text())
}

fn submitted_id(field: Option<FieldValue>) -> Option<Value> {
    field
        .filter(FieldValue::is_truthy)
        .map(FieldValue::into_value)
}

/// Only a string can name an issue.
fn parse_issue_ref(raw: &Value) -> Option<IssueRef> {
    let text = raw.as_str()?;
    let id = Uuid::parse_str(text).ok()?;
    Some(IssueRef {
        id,
        raw: text.to_string(),
    })
}

pub fn validate_create(
    project: &str,
    request: CreateIssueRequest,
) -> Result<CreateIssue, CreateRejection> {
    let (Some(issue_title), Some(issue_text), Some(created_by)) = (
        truthy_text(request.issue_title),
        truthy_text(request.issue_text),
        truthy_text(request.created_by),
    ) else {
        return Err(CreateRejection::MissingRequiredFields);
    };

    Ok(CreateIssue {
        project: project.to_string(),
        issue_title,
        issue_text,
        created_by,
        assigned_to: truthy_text(request.assigned_to).unwrap_or_default(),
        status_text: truthy_text(request.status_text).unwrap_or_default(),
    })
}

/// Checks run in a fixed order: a missing `_id` wins over an empty update,
/// which wins over a malformed `_id`, which wins over an unstorable value.
pub fn validate_update(request: UpdateIssueRequest) -> Result<ValidatedUpdate, UpdateRejection> {
    let Some(raw_id) = submitted_id(request.id) else {
        return Err(UpdateRejection::MissingId);
    };

    let text_fields = [
        update_field(request.issue_title),
        update_field(request.issue_text),
        update_field(request.created_by),
        update_field(request.assigned_to),
        update_field(request.status_text),
    ];
    let open = update_field(request.open);
    if open.is_none() && text_fields.iter().all(Option::is_none) {
        return Err(UpdateRejection::NoUpdateFields { id: raw_id });
    }

    let Some(target) = parse_issue_ref(&raw_id) else {
        return Err(UpdateRejection::MalformedId { id: raw_id });
    };

    let texts = text_fields.map(|field| field.map(FieldValue::into_text));
    if texts.iter().any(|text| matches!(text, Some(None))) {
        return Err(UpdateRejection::UnstorableValue { id: raw_id });
    }
    let [issue_title, issue_text, created_by, assigned_to, status_text] =
        texts.map(Option::flatten);

    let patch = IssuePatch {
        issue_title,
        issue_text,
        created_by,
        assigned_to,
        status_text,
        open: open.map(|value| value.into_text().is_some_and(|text| parse_open_flag(&text))),
    };

    Ok(ValidatedUpdate { target, patch })
}

pub fn validate_delete(request: DeleteIssueRequest) -> Result<IssueRef, DeleteRejection> {
    let Some(raw_id) = submitted_id(request.id) else {
        return Err(DeleteRejection::MissingId);
    };
    parse_issue_ref(&raw_id).ok_or(DeleteRejection::MalformedId { id: raw_id })
}
