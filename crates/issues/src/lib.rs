//! Field rules for issue requests: which submitted values count, how absent
//! ones are defaulted, and how query parameters become store filters. Nothing
//! here touches the store.

mod filter;
mod payload;
mod validate;

pub use payload::{
    CreateIssueRequest, DeleteIssueRequest, FieldValue, ListIssuesQuery, UpdateIssueRequest,
};
pub use validate::{
    CreateRejection, DeleteRejection, IssueRef, UpdateRejection, ValidatedUpdate, validate_create,
    validate_delete, validate_update,
};

pub const REQUIRED_FIELDS_MISSING: &str = "required field(s) missing";
pub const MISSING_ID: &str = "missing _id";
pub const NO_UPDATE_FIELDS: &str = "no update field(s) sent";
pub const COULD_NOT_UPDATE: &str = "could not update";
pub const COULD_NOT_DELETE: &str = "could not delete";
pub const SUCCESSFULLY_UPDATED: &str = "successfully updated";
pub const SUCCESSFULLY_DELETED: &str = "successfully deleted";

/// Reads the `open` flag the way existing clients send it: only the exact
/// text `true` is truthy. `"false"`, `"TRUE"`, `"1"` and anything else are false.
pub fn parse_open_flag(text: &str) -> bool {
    text == "true"
}

#[cfg(test)]
mod tests {
    use super::parse_open_flag;

    #[test]
    fn only_literal_true_is_open() {
        assert!(parse_open_flag("true"));
        for text in ["false", "True", "TRUE", "1", "yes", " true", "open"] {
            assert!(!parse_open_flag(text), "{text:?} should read as closed");
        }
    }
}
