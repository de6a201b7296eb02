//! Error types for the `pbaesa-lca` crate.

use pbaesa_types::MethodKey;

use crate::backend::ActivityKey;

/// Errors raised by an [`LcaBackend`](crate::LcaBackend) or the method and
/// flow helpers built on it.
#[derive(Debug, thiserror::Error)]
pub enum LcaError {
    /// The process is not in the backend.
    #[error("unknown process {0}")]
    UnknownProcess(ActivityKey),

    /// A flow with this key already exists.
    #[error("flow {0} already exists")]
    DuplicateFlow(ActivityKey),

    /// An exchange or characterisation factor references a missing flow.
    #[error("unknown flow {0}")]
    UnknownFlow(ActivityKey),

    /// A method with this key is already registered.
    #[error("method {0} is already registered")]
    DuplicateMethod(MethodKey),

    /// A calculation asked for an unregistered method.
    #[error("method {0} is not registered")]
    UnknownMethod(MethodKey),

    /// The characterisation table could not be read.
    #[error("characterisation table: {0}")]
    Table(#[from] serde_json::Error),

    /// A file-system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
