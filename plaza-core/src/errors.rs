use thiserror::Error;

/// Result type for Plaza core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes surfaced by the persistence and auth cores.
///
/// Nothing panics across a crate boundary: every public operation returns
/// this typed error so callers can branch on the failure class (a missing
/// row is `NotFound`, an I/O fault is `Store`, an unresolvable tenant is
/// `TenantUnresolved`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(&'static str),

    #[error("Tenant could not be resolved from the request context")]
    TenantUnresolved,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Stored credential is not a parseable hash")]
    MalformedHash,

    #[error("Token error: {0}")]
    Token(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
