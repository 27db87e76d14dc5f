use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

const VIEW_CACHE_CONTROL: &str = "no-cache";

#[derive(RustEmbed)]
#[folder = "views"]
pub struct Views;

pub async fn home_view() -> Response {
    serve_view("index.html")
}

/// Every single-segment path that no other route claims lands here, so the
/// project name is only read client side.
pub async fn project_view(Path(_project): Path<String>) -> Response {
    serve_view("issue.html")
}

fn serve_view(name: &str) -> Response {
    let Some(content) = Views::get(name) else {
        tracing::error!(view = name, "Embedded view is missing");
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };

    let mime = mime_guess::from_path(name).first_or_octet_stream();
    let content_type = HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response = Response::new(Body::from(content.data.into_owned()));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(VIEW_CACHE_CONTROL),
    );
    response
}
