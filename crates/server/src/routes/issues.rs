use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::issue::Issue;
use issues::{
    COULD_NOT_DELETE, COULD_NOT_UPDATE, CreateIssueRequest, DeleteIssueRequest,
    SUCCESSFULLY_DELETED, SUCCESSFULLY_UPDATED, UpdateIssueRequest, validate_create,
    validate_delete, validate_update,
};
use serde_json::Value;
use utils::response::{Acknowledgement, ApiResponse};

use crate::{
    DeploymentImpl,
    deployment::Deployment,
    error::ApiError,
    extract::{IssueBody, IssueQuery},
};

fn rejected(message: &str, id: Option<&Value>) -> ApiResponse<Acknowledgement> {
    match id {
        Some(id) => ApiResponse::error_for(message, id.clone()),
        None => ApiResponse::error(message),
    }
}

pub async fn create_issue(
    State(deployment): State<DeploymentImpl>,
    Path(project): Path<String>,
    IssueBody(payload): IssueBody<CreateIssueRequest>,
) -> Result<ResponseJson<ApiResponse<Issue>>, ApiError> {
    let data = match validate_create(&project, payload) {
        Ok(data) => data,
        Err(rejection) => {
            tracing::debug!(project, "Rejected issue creation: {}", rejection);
            return Ok(ResponseJson(ApiResponse::error(&rejection.to_string())));
        }
    };

    let issue = Issue::create(&deployment.db().pool, &data).await?;
    tracing::info!(project, issue_id = %issue.id, "Created issue");
    Ok(ResponseJson(ApiResponse::success(issue)))
}

pub async fn list_issues(
    State(deployment): State<DeploymentImpl>,
    Path(project): Path<String>,
    IssueQuery(query): IssueQuery,
) -> Result<ResponseJson<ApiResponse<Vec<Issue>>>, ApiError> {
    let Some(filter) = query.into_filter() else {
        tracing::debug!(project, "Issue filter can never match; returning no issues");
        return Ok(ResponseJson(ApiResponse::success(Vec::new())));
    };

    let issues = Issue::find_filtered(&deployment.db().pool, &project, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(issues)))
}

/// Store failures fold into the same `could not update` body as a missing
/// issue.
pub async fn update_issue(
    State(deployment): State<DeploymentImpl>,
    Path(project): Path<String>,
    IssueBody(payload): IssueBody<UpdateIssueRequest>,
) -> ResponseJson<ApiResponse<Acknowledgement>> {
    let update = match validate_update(payload) {
        Ok(update) => update,
        Err(rejection) => {
            tracing::debug!(project, "Rejected issue update: {}", rejection);
            return ResponseJson(rejected(&rejection.to_string(), rejection.echoed_id()));
        }
    };
    let target = update.target;

    let response =
        match Issue::apply_patch(&deployment.db().pool, &project, target.id, &update.patch).await {
            Ok(0) => {
                tracing::debug!(project, issue_id = %target.id, "No issue to update");
                ApiResponse::error_for(COULD_NOT_UPDATE, target.raw)
            }
            Ok(_) => {
                tracing::info!(project, issue_id = %target.id, "Updated issue");
                ApiResponse::acknowledged(SUCCESSFULLY_UPDATED, target.raw)
            }
            Err(err) => {
                tracing::warn!(project, issue_id = %target.id, error = %err, "Failed to update issue");
                ApiResponse::error_for(COULD_NOT_UPDATE, target.raw)
            }
        };
    ResponseJson(response)
}

pub async fn delete_issue(
    State(deployment): State<DeploymentImpl>,
    Path(project): Path<String>,
    IssueBody(payload): IssueBody<DeleteIssueRequest>,
) -> ResponseJson<ApiResponse<Acknowledgement>> {
    let target = match validate_delete(payload) {
        Ok(target) => target,
        Err(rejection) => {
            tracing::debug!(project, "Rejected issue deletion: {}", rejection);
            return ResponseJson(rejected(&rejection.to_string(), rejection.echoed_id()));
        }
    };

    let response = match Issue::delete(&deployment.db().pool, &project, target.id).await {
        Ok(0) => {
            tracing::debug!(project, issue_id = %target.id, "No issue to delete");
            ApiResponse::error_for(COULD_NOT_DELETE, target.raw)
        }
        Ok(_) => {
            tracing::info!(project, issue_id = %target.id, "Deleted issue");
            ApiResponse::acknowledged(SUCCESSFULLY_DELETED, target.raw)
        }
        Err(err) => {
            tracing::warn!(project, issue_id = %target.id, error = %err, "Failed to delete issue");
            ApiResponse::error_for(COULD_NOT_DELETE, target.raw)
        }
    };
    ResponseJson(response)
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route(
        "/issues/{project}",
        get(list_issues)
            .post(create_issue)
            .put(update_issue)
            .delete(delete_issue),
    )
}
