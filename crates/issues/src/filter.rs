use chrono::{DateTime, Utc};
use db::models::issue::IssueFilter;
use uuid::Uuid;

use crate::{ListIssuesQuery, parse_open_flag};

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

impl ListIssuesQuery {
    /// Turns the query into store filters. Returns `None` when some parameter
    /// can never match a stored issue (an `_id` that is not a UUID, a timestamp
    /// that does not parse), in which case the result set is empty.
    ///
    /// An empty parameter is still a constraint: `?assigned_to=` matches
    /// unassigned issues.
    pub fn into_filter(self) -> Option<IssueFilter> {
        let id = match self.id {
            Some(raw) => Some(Uuid::parse_str(&raw).ok()?),
            None => None,
        };
        let created_on = match self.created_on {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };
        let updated_on = match self.updated_on {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };

        Some(IssueFilter {
            id,
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            open: self.open.as_deref().map(parse_open_flag),
            created_on,
            updated_on,
        })
    }
}
