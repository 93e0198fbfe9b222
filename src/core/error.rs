use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeSimError {
    /// The event or summary generator could not be reached or returned a
    /// non-success status. Recoverable; the caller may retry.
    #[error("Generator unavailable: {0}")]
    GeneratorUnavailable(String),

    /// The generator answered, but its payload does not satisfy the event
    /// contract. Fatal for that request only; nothing was persisted.
    #[error("Malformed generator payload: {0}")]
    MalformedEvent(String),

    /// A caller attempted an operation the state machine forbids, such as
    /// submitting a choice with no pending event or advancing a dead life.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A generator call is already in flight for this simulation.
    #[error("Simulation is busy with a generator request")]
    Busy,

    /// No alive simulation exists for the owner.
    #[error("No active life for owner: {0}")]
    NoActiveLife(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl LifeSimError {
    /// Whether the caller may simply try the same operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::GeneratorUnavailable(_) | Self::Busy)
    }
}

pub type Result<T> = std::result::Result<T, LifeSimError>;
