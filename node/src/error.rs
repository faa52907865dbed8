use thiserror::Error;
use vertex_validators::RegistryError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("validator registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("node is not running")]
    NotRunning,
}
