use std::io;

use thiserror::Error;

/// Errors raised while opening, reading or seeking a bundled resource.
///
/// End-of-data is never an error: reads past the end return `Ok(0)`.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No asset manager has been installed for this loader.
    #[error("asset manager has not been initialized yet")]
    NotInitialized,
    /// The backend could not open the named resource.
    #[error("unable to open asset '{0}'")]
    NotFound(String),
    /// The backend reported a read failure.
    #[error("error reading asset '{name}'")]
    Io { name: String },
    /// The backend reported a seek failure.
    #[error("seek failed in asset '{name}'")]
    Seek { name: String },
    /// An argument was outside the set the backend understands.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The resource name is empty or escapes the asset root.
    #[error("invalid asset name: {0}")]
    InvalidName(String),
    /// The resource content is not valid UTF-8.
    #[error("asset '{0}' is not valid UTF-8")]
    InvalidUtf8(String),
}

pub type ResourceResult<T> = Result<T, ResourceError>;

impl ResourceError {
    /// Recover a [`ResourceError`] carried inside an [`io::Error`].
    ///
    /// Errors that did not originate in this crate are reported as
    /// [`ResourceError::Io`] against `name`.
    pub fn from_io(err: io::Error, name: &str) -> Self {
        let kind = err.kind();
        match err.into_inner() {
            Some(inner) => match inner.downcast::<ResourceError>() {
                Ok(resource_err) => *resource_err,
                Err(_) => ResourceError::Io {
                    name: name.to_owned(),
                },
            },
            None if kind == io::ErrorKind::InvalidData => {
                ResourceError::InvalidUtf8(name.to_owned())
            }
            None => ResourceError::Io {
                name: name.to_owned(),
            },
        }
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            ResourceError::NotFound(_) => io::ErrorKind::NotFound,
            ResourceError::InvalidArgument(_) | ResourceError::InvalidName(_) => {
                io::ErrorKind::InvalidInput
            }
            ResourceError::InvalidUtf8(_) => io::ErrorKind::InvalidData,
            ResourceError::NotInitialized
            | ResourceError::Io { .. }
            | ResourceError::Seek { .. } => io::ErrorKind::Other,
        }
    }
}

impl From<ResourceError> for io::Error {
    fn from(err: ResourceError) -> Self {
        io::Error::new(err.io_kind(), err)
    }
}
