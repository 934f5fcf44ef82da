use thiserror::Error;

/// Failure taxonomy of the data layer.
///
/// `Configuration` is raised once, when a schema is first built or a
/// generated-key rewrite turns out to be impossible for the entity's key
/// type. `Validation` aborts a single operation with no partial effect.
/// `Execution` wraps a driver or connection failure. `Consistency` signals a
/// single-row query that matched more than one row.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("consistency error: {0}")]
    Consistency(String),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
