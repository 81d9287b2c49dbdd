//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading a YAML document or reading its shape.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("expected {expected} for {context}, found {found}")]
    Shape {
        context: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl DocumentError {
    /// Returns an error code suitable for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            DocumentError::Io { .. } => "IO_ERROR",
            DocumentError::Parse { .. } => "PARSE_ERROR",
            DocumentError::Shape { .. } => "SHAPE_MISMATCH",
        }
    }
}

/// Structural and referential failures of a protocol document.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Missing key: {key}")]
    MissingKey { key: &'static str },

    #[error("States should be a non-empty list")]
    EmptyStates,

    #[error("State labels must be scalars, found: {state}")]
    NonScalarState { state: String },

    #[error("Transitions should be a non-empty list")]
    EmptyTransitions,

    #[error("Duplicate states found")]
    DuplicateStates,

    #[error("States with no transitions: {}", states.join(", "))]
    StatesWithoutTransitions { states: Vec<String> },

    #[error("Each transition must contain 'from', 'to', and 'event'")]
    IncompleteTransition { transition: String },

    #[error("Invalid state in transition: {transition}")]
    UnknownState { transition: String },

    #[error("Event must be a non-empty string in transition: {transition}")]
    InvalidEvent { transition: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ProtocolError {
    /// Returns whether the document itself could not be read, as opposed to
    /// failing a validation check.
    pub fn is_document_error(&self) -> bool {
        matches!(self, ProtocolError::Document(_))
    }

    /// Returns an error code suitable for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProtocolError::MissingKey { .. } => "MISSING_KEY",
            ProtocolError::EmptyStates => "EMPTY_STATES",
            ProtocolError::NonScalarState { .. } => "NON_SCALAR_STATE",
            ProtocolError::EmptyTransitions => "EMPTY_TRANSITIONS",
            ProtocolError::DuplicateStates => "DUPLICATE_STATES",
            ProtocolError::StatesWithoutTransitions { .. } => "DEAD_END_STATES",
            ProtocolError::IncompleteTransition { .. } => "INCOMPLETE_TRANSITION",
            ProtocolError::UnknownState { .. } => "UNKNOWN_STATE",
            ProtocolError::InvalidEvent { .. } => "INVALID_EVENT",
            ProtocolError::Document(e) => e.error_code(),
        }
    }
}

/// Failures of a settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("There must be at least two machines in the settings file.")]
    TooFewMachines,

    #[error("Machine '{machine}' is missing an 'Initial_state'.")]
    MissingInitialState { machine: String },

    #[error("Machine '{machine}' has no initial state defined.")]
    EmptyInitialState { machine: String },

    #[error("Machine '{machine}' must list its 'Initial_state' as a sequence of labels.")]
    MalformedInitialState { machine: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl SettingsError {
    /// Returns whether the document itself could not be read.
    pub fn is_document_error(&self) -> bool {
        matches!(self, SettingsError::Document(_))
    }

    /// Returns an error code suitable for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            SettingsError::TooFewMachines => "TOO_FEW_MACHINES",
            SettingsError::MissingInitialState { .. } => "MISSING_INITIAL_STATE",
            SettingsError::EmptyInitialState { .. } => "EMPTY_INITIAL_STATE",
            SettingsError::MalformedInitialState { .. } => "MALFORMED_INITIAL_STATE",
            SettingsError::Document(e) => e.error_code(),
        }
    }
}
