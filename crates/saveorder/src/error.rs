use derive_more::Display;
use saveorder_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match (err.origin, err.class) {
            _ if err.is_cyclic_dependency() => {
                ErrorKind::Resolve(ResolveErrorKind::CyclicDependency)
            }
            (CoreErrorOrigin::Model, ErrorClass::NotFound) => {
                ErrorKind::Model(ModelErrorKind::NotFound)
            }
            (CoreErrorOrigin::Model, _) => ErrorKind::Model(ModelErrorKind::Conflict),
            (CoreErrorOrigin::Plan, ErrorClass::InvariantViolation) => {
                ErrorKind::Resolve(ResolveErrorKind::InvariantViolation)
            }
            _ => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Model(ModelErrorKind),
    Resolve(ResolveErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// ModelErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ModelErrorKind {
    /// No model is registered under the requested path.
    NotFound,

    /// Registration clashed with an existing model or relation.
    Conflict,
}

///
/// ResolveErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ResolveErrorKind {
    /// Strict cycle handling found a dependency cycle.
    CyclicDependency,

    /// A produced plan failed its ordering check.
    InvariantViolation,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Model,
    Resolver,
    Plan,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Model => Self::Model,
            CoreErrorOrigin::Resolver => Self::Resolver,
            CoreErrorOrigin::Plan => Self::Plan,
        }
    }
}

///
/// TESTS
///
