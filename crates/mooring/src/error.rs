use crate::plan::PlanError;
use derive_more::Display;
use mooring_config::ConfigError;
use mooring_core::{integrate::IntegrateError, join::JoinError, populate::PopulateError};
use mooring_schema::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{origin}: {message}")]
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

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Logging(_) => ErrorKind::Internal,
            ConfigError::InvalidValue { .. } | ConfigError::Parse(_) | ConfigError::ReadFile { .. } => {
                ErrorKind::Configuration
            }
        };

        Self::new(kind, ErrorOrigin::Config, err.to_string())
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::new(ErrorKind::Configuration, ErrorOrigin::Schema, err.to_string())
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        Self::new(ErrorKind::Invocation, ErrorOrigin::Join, err.to_string())
    }
}

impl From<PopulateError> for Error {
    fn from(err: PopulateError) -> Self {
        Self::new(ErrorKind::Invocation, ErrorOrigin::Populate, err.to_string())
    }
}

impl From<IntegrateError> for Error {
    fn from(err: IntegrateError) -> Self {
        match err {
            IntegrateError::Join(err) => err.into(),
            IntegrateError::Populate(err) => err.into(),
            IntegrateError::MissingRows { .. }
            | IntegrateError::NoInstructions
            | IntegrateError::UnsupportedInstructionCount { .. } => {
                Self::new(ErrorKind::Invocation, ErrorOrigin::Integrate, err.to_string())
            }
        }
    }
}

impl From<PlanError> for Error {
    fn from(err: PlanError) -> Self {
        Self::new(ErrorKind::Invocation, ErrorOrigin::Plan, err.to_string())
    }
}

impl From<mooring_core::Error> for Error {
    fn from(err: mooring_core::Error) -> Self {
        match err {
            mooring_core::Error::IntegrateError(err) => err.into(),
            mooring_core::Error::JoinError(err) => err.into(),
            mooring_core::Error::PopulateError(err) => err.into(),
        }
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Schema definitions or config files are wrong. Fatal at boot.
    Configuration,

    /// A single join, populate or integrate call was malformed.
    Invocation,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Integrate,
    Join,
    Plan,
    Populate,
    Schema,
}
