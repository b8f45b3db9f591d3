use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the transcript services.
#[derive(Debug, Error)]
pub enum Error {
    /// A required ingestion field is missing or malformed. Nothing was written.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The transcript id is already taken. The caller has to generate a new
    /// one, retrying verbatim fails again.
    #[error("transcript {0} already exists")]
    ConstraintViolation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("transcript {0} not found")]
    NotFound(String),

    #[error("storage failure: {0:#}")]
    StorageFailure(eyre::Report),
}

impl Error {
    /// Recovers a typed error carried inside a report, anything else is a
    /// storage failure.
    pub fn from_report(report: eyre::Report) -> Self {
        match report.downcast::<Error>() {
            Ok(err) => err,
            Err(report) => Error::StorageFailure(report),
        }
    }
}
