use thiserror::Error;

/// Errors raised by partial lenses, and by the stores derived through them.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LensError {
    /// An `index` lens was used on a sequence too short to contain the index.
    #[error("index {index} out of range for a sequence of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// An `at` lens was read on a map that doesn't contain the key.
    #[error("key not present in map")]
    MissingKey,
}
