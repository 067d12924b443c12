use thiserror::Error;

/// Terminal failures of engine operations. Capacity exhaustion is NOT an
/// error: a fully booked schedule yields a `BookingOutcome` with
/// `success: false` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Unknown doctor or slot identifier.
    #[error("not found: {0}")]
    NotFound(String),
    /// Input outside the accepted range, e.g. a delay above the ceiling.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
