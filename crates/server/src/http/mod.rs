use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{DeploymentImpl, deployment::Deployment, routes};

mod frontend;

pub fn router(deployment: DeploymentImpl) -> Router {
    let api_routes = Router::new().merge(routes::issues::router());
    let public_dir = ServeDir::new(&deployment.config().public_dir);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/_api/get-tests", get(routes::test_report::get_tests))
        .route("/", get(frontend::home_view))
        .route("/{project}", get(frontend::project_view))
        .nest("/api", api_routes)
        .nest_service("/public", public_dir)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(deployment)
}
