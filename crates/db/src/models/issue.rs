use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionSession, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::issue;

/// A stored issue as it is shown to clients. `project` scopes every query but
/// is never part of a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssue {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

/// Fields to overwrite on an existing issue. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssuePatch {
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

/// Equality constraints ANDed with the project scope on reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub id: Option<Uuid>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
}

// Millisecond resolution so a timestamp echoed to a client can be sent back as a filter.
fn store_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Strictly later than `previous`, even for two updates in the same millisecond.
fn next_updated_on(previous: DateTime<Utc>) -> DateTime<Utc> {
    store_timestamp().max(previous + TimeDelta::milliseconds(1))
}

impl Issue {
    fn from_model(model: issue::Model) -> Self {
        Self {
            id: model.uuid,
            project: model.project,
            issue_title: model.issue_title,
            issue_text: model.issue_text,
            created_by: model.created_by,
            assigned_to: model.assigned_to,
            status_text: model.status_text,
            created_on: model.created_on,
            updated_on: model.updated_on,
            open: model.open,
        }
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateIssue) -> Result<Self, DbErr> {
        let now = store_timestamp();
        let active = issue::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            project: Set(data.project.clone()),
            issue_title: Set(data.issue_title.clone()),
            issue_text: Set(data.issue_text.clone()),
            created_by: Set(data.created_by.clone()),
            assigned_to: Set(data.assigned_to.clone()),
            status_text: Set(data.status_text.clone()),
            open: Set(true),
            created_on: Set(now),
            updated_on: Set(now),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn find_filtered<C: ConnectionTrait>(
        db: &C,
        project: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = issue::Entity::find().filter(issue::Column::Project.eq(project));

        if let Some(id) = filter.id {
            query = query.filter(issue::Column::Uuid.eq(id));
        }
        let text_filters = [
            (issue::Column::IssueTitle, filter.issue_title.as_deref()),
            (issue::Column::IssueText, filter.issue_text.as_deref()),
            (issue::Column::CreatedBy, filter.created_by.as_deref()),
            (issue::Column::AssignedTo, filter.assigned_to.as_deref()),
            (issue::Column::StatusText, filter.status_text.as_deref()),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                query = query.filter(column.eq(value));
            }
        }
        if let Some(open) = filter.open {
            query = query.filter(issue::Column::Open.eq(open));
        }
        if let Some(created_on) = filter.created_on {
            query = query.filter(issue::Column::CreatedOn.eq(created_on));
        }
        if let Some(updated_on) = filter.updated_on {
            query = query.filter(issue::Column::UpdatedOn.eq(updated_on));
        }

        let records = query
            .order_by_asc(issue::Column::CreatedOn)
            .order_by_asc(issue::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Writes every supplied field of `patch` plus a fresh `updated_on`. The
    /// row is read under an exclusive lock first so `updated_on` always moves
    /// forward. Returns the number of rows touched, so `0` means no issue with
    /// that id lives under that project.
    pub async fn apply_patch<C: TransactionTrait>(
        db: &C,
        project: &str,
        id: Uuid,
        patch: &IssuePatch,
    ) -> Result<u64, DbErr> {
        let txn = db.begin().await?;
        let Some(current) = issue::Entity::find()
            .filter(issue::Column::Project.eq(project))
            .filter(issue::Column::Uuid.eq(id))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(0);
        };

        let mut update = issue::Entity::update_many()
            .col_expr(
                issue::Column::UpdatedOn,
                Expr::value(next_updated_on(current.updated_on)),
            )
            .filter(issue::Column::Id.eq(current.id));

        let text_fields = [
            (issue::Column::IssueTitle, &patch.issue_title),
            (issue::Column::IssueText, &patch.issue_text),
            (issue::Column::CreatedBy, &patch.created_by),
            (issue::Column::AssignedTo, &patch.assigned_to),
            (issue::Column::StatusText, &patch.status_text),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                update = update.col_expr(column, Expr::value(value.clone()));
            }
        }
        if let Some(open) = patch.open {
            update = update.col_expr(issue::Column::Open, Expr::value(open));
        }

        let result = update.exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, project: &str, id: Uuid) -> Result<u64, DbErr> {
        let result = issue::Entity::delete_many()
            .filter(issue::Column::Project.eq(project))
            .filter(issue::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
