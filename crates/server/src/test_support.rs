use config::Config;
use test_support::TempDir;

use crate::{DeploymentImpl, deployment::Deployment};

/// Deployment backed by an in-memory store, with `/public` pointed at a fresh
/// temp dir the caller keeps alive.
pub async fn setup_deployment() -> (TempDir, DeploymentImpl) {
    let public_dir = test_support::temp_dir();
    let config = Config {
        database_url: Some("sqlite::memory:".to_string()),
        public_dir: public_dir.path().to_path_buf(),
        ..Config::default()
    };
    let deployment = DeploymentImpl::new(config).await.unwrap();
    (public_dir, deployment)
}
