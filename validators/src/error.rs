use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("validator {0} is already registered")]
    DuplicateValidator(String),

    #[error("validator {0} not found")]
    ValidatorNotFound(String),

    #[error("validator stake must be non-zero")]
    ZeroStake,
}
