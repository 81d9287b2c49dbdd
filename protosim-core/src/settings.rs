//! Settings documents.
//!
//! A settings document maps each machine name to its initial state(s):
//!
//! ```yaml
//! client:
//!   Initial_state: [idle]
//! server:
//!   Initial_state: [listening]
//! ```
//!
//! Multiple initial states are kept as a list of labels and displayed as-is.

use crate::document::Node;
use crate::error::SettingsError;
use crate::output::Output;
use crate::table::{Column, Table};
use std::path::Path;

/// Key holding a machine's initial states.
pub const INITIAL_STATE_KEY: &str = "Initial_state";

/// Minimum number of machines a settings document must declare.
pub const MIN_MACHINES: usize = 2;

/// A machine entry of a settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub name: String,
    /// Never empty once validated.
    pub initial_state: Vec<String>,
}

/// A validated settings document. Machines keep document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDocument {
    pub machines: Vec<MachineConfig>,
}

impl SettingsDocument {
    /// Loads and validates the settings document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let root = Node::load(path)?;
        Self::from_node(&root)
    }

    /// Validates a parsed settings document.
    pub fn from_node(root: &Node) -> Result<Self, SettingsError> {
        let entries = root.expect_mapping("settings document")?;
        if entries.len() < MIN_MACHINES {
            return Err(SettingsError::TooFewMachines);
        }

        let mut machines = Vec::with_capacity(entries.len());
        for (key, data) in entries {
            let name = key.label().unwrap_or_else(|| key.to_string());

            let Some(initial) = data.get(INITIAL_STATE_KEY) else {
                return Err(SettingsError::MissingInitialState { machine: name });
            };

            let initial_state = match initial {
                Node::Null => return Err(SettingsError::EmptyInitialState { machine: name }),
                Node::String(s) if s.is_empty() => {
                    return Err(SettingsError::EmptyInitialState { machine: name })
                }
                Node::Sequence(items) if items.is_empty() => {
                    return Err(SettingsError::EmptyInitialState { machine: name })
                }
                Node::Sequence(items) => {
                    match items.iter().map(Node::label).collect::<Option<Vec<_>>>() {
                        Some(labels) => labels,
                        None => {
                            return Err(SettingsError::MalformedInitialState { machine: name })
                        }
                    }
                }
                // a bare scalar is a single initial state
                scalar => match scalar.label() {
                    Some(label) => vec![label],
                    None => return Err(SettingsError::MalformedInitialState { machine: name }),
                },
            };

            machines.push(MachineConfig {
                name,
                initial_state,
            });
        }

        Ok(Self { machines })
    }

    /// Projects the document into a `Machine name | Initial state` table.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(vec![
            Column::new("Machine name").dim(),
            Column::new("Initial state"),
        ]);
        for machine in &self.machines {
            table.add_row(vec![machine.name.clone(), machine.initial_state.join(", ")]);
        }
        table
    }
}

/// Loads and validates a settings file, reporting any failure to `out`.
pub fn check_settings_file(path: &Path, out: &mut dyn Output) -> Option<SettingsDocument> {
    match SettingsDocument::load(path) {
        Ok(doc) => {
            tracing::debug!(
                path = %path.display(),
                machines = doc.machines.len(),
                "Settings file is valid."
            );
            Some(doc)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), code = e.error_code(), "settings validation failed");
            let label = if e.is_document_error() {
                "Error reading settings file"
            } else {
                "Error in settings files"
            };
            out.error(label, &e.to_string());
            None
        }
    }
}

/// Prints the settings heading and machine table.
pub fn print_settings(doc: &SettingsDocument, out: &mut dyn Output) {
    out.heading("Imported Settings:");
    out.table(&doc.to_table());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{CapturedOutput, Emitted};

    fn parse(yaml: &str) -> Node {
        Node::parse(yaml).unwrap()
    }

    #[test]
    fn test_two_machines_validate() {
        let doc = SettingsDocument::from_node(&parse(
            "client:\n  Initial_state: [idle]\nserver:\n  Initial_state: [listening]\n",
        ))
        .unwrap();

        assert_eq!(doc.machines.len(), 2);
        assert_eq!(doc.machines[0].name, "client");
        assert_eq!(doc.machines[1].initial_state, vec!["listening"]);
    }

    #[test]
    fn test_single_machine_rejected() {
        let err = SettingsDocument::from_node(&parse("client:\n  Initial_state: [idle]\n"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::TooFewMachines));
        assert_eq!(
            err.to_string(),
            "There must be at least two machines in the settings file."
        );
    }

    #[test]
    fn test_missing_initial_state_names_machine() {
        let err = SettingsDocument::from_node(&parse(
            "client:\n  Initial_state: [idle]\nserver:\n  role: passive\n",
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "Machine 'server' is missing an 'Initial_state'.");
    }

    #[test]
    fn test_empty_initial_state() {
        for empty in ["[]", "''", "null"] {
            let yaml = format!("a:\n  Initial_state: [x]\nb:\n  Initial_state: {}\n", empty);
            let err = SettingsDocument::from_node(&parse(&yaml)).unwrap_err();
            assert_eq!(err.to_string(), "Machine 'b' has no initial state defined.");
        }
    }

    #[test]
    fn test_malformed_initial_state() {
        for bad in ["[[x]]", "[a, {x: 1}]", "{x: 1}"] {
            let yaml = format!("a:\n  Initial_state: [x]\nb:\n  Initial_state: {}\n", bad);
            let err = SettingsDocument::from_node(&parse(&yaml)).unwrap_err();
            assert!(matches!(err, SettingsError::MalformedInitialState { .. }));
        }
    }

    #[test]
    fn test_scalar_initial_state_is_single_label() {
        let doc = SettingsDocument::from_node(&parse(
            "a:\n  Initial_state: idle\nb:\n  Initial_state: 3\nc:\n  Initial_state: [x]\n",
        ))
        .unwrap();

        assert_eq!(doc.machines[0].initial_state, vec!["idle"]);
        assert_eq!(doc.machines[1].initial_state, vec!["3"]);
        assert_eq!(doc.to_table().cell(0, 1), Some("idle"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = SettingsDocument::from_node(&parse("- a\n- b\n")).unwrap_err();
        assert!(err.is_document_error());
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }

    #[test]
    fn test_table_joins_initial_states_in_order() {
        let doc = SettingsDocument::from_node(&parse(
            "m1:\n  Initial_state: [c, a, b]\nm2:\n  Initial_state: [z]\n",
        ))
        .unwrap();
        let table = doc.to_table();

        assert_eq!(table.cell(0, 0), Some("m1"));
        assert_eq!(table.cell(0, 1), Some("c, a, b"));
        assert_eq!(table.cell(1, 1), Some("z"));
    }

    #[test]
    fn test_check_settings_file_reports_failure() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"only:\n  Initial_state: [x]\n").unwrap();

        let mut out = CapturedOutput::new();
        assert!(check_settings_file(file.path(), &mut out).is_none());
        assert_eq!(
            out.items(),
            &[Emitted::Error {
                label: "Error in settings files".into(),
                detail: "There must be at least two machines in the settings file.".into(),
            }]
        );
    }

    #[test]
    fn test_check_settings_file_malformed_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"a:\n  Initial_state: [x\n").unwrap();

        let mut out = CapturedOutput::new();
        assert!(check_settings_file(file.path(), &mut out).is_none());
        assert_eq!(out.items().len(), 1);
        match &out.items()[0] {
            Emitted::Error { label, .. } => assert_eq!(label, "Error reading settings file"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_print_settings() {
        let doc = SettingsDocument {
            machines: vec![
                MachineConfig {
                    name: "alice".into(),
                    initial_state: vec!["idle".into()],
                },
                MachineConfig {
                    name: "bob".into(),
                    initial_state: vec!["idle".into(), "busy".into()],
                },
            ],
        };
        let mut out = CapturedOutput::new();
        print_settings(&doc, &mut out);

        assert_eq!(out.headings(), vec!["Imported Settings:"]);
        assert_eq!(out.tables()[0].row_by_key("bob").unwrap()[1], "idle, busy");
    }
}
