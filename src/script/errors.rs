//! Load-script errors.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to read or write a load script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script could not be read.
    #[error("failed to read load script {path}")]
    Read {
        /// Script path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// An example script could not be written.
    #[error("failed to write {path}")]
    Write {
        /// Target path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}
