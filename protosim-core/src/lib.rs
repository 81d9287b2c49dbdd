//! # protosim-core
//!
//! Protocol description tooling for protosim.
//!
//! This crate provides:
//! - YAML document loading into a tagged [`Node`] tree
//! - Protocol and settings document validation
//! - Table projection of validated documents
//! - An output sink abstraction for rendering diagnostics and tables

pub mod document;
pub mod error;
pub mod output;
pub mod protocol;
pub mod settings;
pub mod table;

pub use document::Node;
pub use error::{DocumentError, ProtocolError, SettingsError};
pub use output::{CapturedOutput, ConsoleOutput, Emitted, Output};
pub use protocol::{ProtocolDocument, Transition};
pub use settings::{MachineConfig, SettingsDocument};
pub use table::{Column, Table};
