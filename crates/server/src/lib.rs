pub mod deployment;
pub mod error;
mod extract;
pub mod http;
pub mod routes;
#[cfg(test)]
mod test_support;

pub type DeploymentImpl = deployment::LocalDeployment;
