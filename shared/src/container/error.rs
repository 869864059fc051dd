use thiserror::Error;

/// Errors that can occur while reading or writing a StateContainer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Slot index outside of the container's bounds. The offending message
    /// should be rejected, the session continues.
    #[error("Slot index {index} is out of range for a container of {len} slots")]
    IndexOutOfRange { index: usize, len: usize },

    /// A snapshot did not have exactly one value per slot. Nothing was applied.
    #[error("Snapshot holds {actual} slots but the container has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
