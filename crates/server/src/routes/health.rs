use axum::{extract::State, http::StatusCode, response::Json as ResponseJson};
use serde_json::{Value, json};

use crate::{DeploymentImpl, deployment::Deployment};

pub async fn health_check(
    State(deployment): State<DeploymentImpl>,
) -> (StatusCode, ResponseJson<Value>) {
    match deployment.db().pool.ping().await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "status": "ok" }))),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the issue store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ResponseJson(json!({ "status": "unavailable" })),
            )
        }
    }
}
