use std::sync::Arc;

use async_trait::async_trait;
use config::{Config, ConfigError};
use db::{DBService, DbErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Process-wide services shared by every request. The store connection is
/// opened once here and reused.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new(config: Config) -> Result<Self, DeploymentError>;

    fn config(&self) -> &Config;

    fn db(&self) -> &DBService;
}

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<Config>,
    db: DBService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new(config: Config) -> Result<Self, DeploymentError> {
        let database_url = config.database_url()?;
        let db = DBService::new(&database_url).await?;
        Ok(Self {
            config: Arc::new(config),
            db,
        })
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }
}
