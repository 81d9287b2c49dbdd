//! Command driver: preconditions, validation, then projection.

use crate::config::Config;
use protosim_core::protocol::{check_protocol_file, print_protocol};
use protosim_core::settings::{check_settings_file, print_settings};
use protosim_core::{DocumentError, Node, Output};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted document file suffixes.
pub const YAML_SUFFIXES: [&str; 2] = [".yaml", ".yml"];

/// Argument checks that run before any file is opened.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("Protocol file and settings file cannot be the same.")]
    SamePath,

    #[error(
        "The file '{}' is not a valid YAML file (must have .yaml or .yml extension).",
        .path.display()
    )]
    NotYaml { path: PathBuf },
}

/// Errors that escape the driver's own reporting.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PreconditionFailed,
    ValidationFailed,
    Projected,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Projected)
    }

    /// Returns the process exit status for this outcome.
    pub fn exit_status(&self, fail_on_error: bool) -> u8 {
        if self.is_success() || !fail_on_error {
            0
        } else {
            1
        }
    }
}

/// Checks the document paths without touching the filesystem.
pub fn check_preconditions(protocol: &Path, settings: &Path) -> Result<(), PreconditionError> {
    if protocol.as_os_str() == settings.as_os_str() {
        return Err(PreconditionError::SamePath);
    }
    for path in [protocol, settings] {
        let name = path.to_string_lossy();
        if !YAML_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            return Err(PreconditionError::NotYaml {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Runs one invocation against `protocol` and `settings`.
///
/// Settings are only validated once the protocol passes. Tables are printed
/// only when both documents pass.
pub fn run(
    protocol: &Path,
    settings: &Path,
    config: &Config,
    out: &mut dyn Output,
) -> Result<Outcome, DriverError> {
    if let Err(e) = check_preconditions(protocol, settings) {
        tracing::debug!(error = %e, "precondition failed");
        out.error("Error", &e.to_string());
        return Ok(Outcome::PreconditionFailed);
    }

    let Some(protocol_doc) = check_protocol_file(protocol, out) else {
        tracing::info!(path = %protocol.display(), "protocol file rejected");
        return Ok(Outcome::ValidationFailed);
    };
    let Some(settings_doc) = check_settings_file(settings, out) else {
        tracing::info!(path = %settings.display(), "settings file rejected");
        return Ok(Outcome::ValidationFailed);
    };
    tracing::info!(
        protocol = %protocol_doc.name,
        machines = settings_doc.machines.len(),
        "documents validated"
    );

    print_protocol(&protocol_doc, out);
    print_settings(&settings_doc, out);

    if config.output.show_raw {
        for path in [protocol, settings] {
            let node = Node::load(path)?;
            out.heading("Content of the file:");
            out.text(&node.to_string());
        }
    }

    Ok(Outcome::Projected)
}
