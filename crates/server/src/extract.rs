use axum::{
    body::Bytes,
    extract::{Form, FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, header, request::Parts},
};
use issues::ListIssuesQuery;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body accepted either as JSON or as an urlencoded form, the two
/// encodings clients of the issue API send. An empty body reads as the
/// payload's default (every field absent).
pub struct IssueBody<T>(pub T);

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for IssueBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(payload) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            return Ok(IssueBody(payload));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(IssueBody(T::default()));
        }

        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        serde_path_to_error::deserialize(deserializer)
            .map(IssueBody)
            .map_err(|err| {
                ApiError::BadRequest(format!(
                    "Invalid request body at {}: {}",
                    err.path(),
                    err.inner()
                ))
            })
    }
}

/// List filters read from the query string. Repeated parameters are
/// accepted; the last occurrence wins.
pub struct IssueQuery(pub ListIssuesQuery);

impl<S> FromRequestParts<S> for IssueQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(IssueQuery(ListIssuesQuery::from_pairs(pairs)))
    }
}
