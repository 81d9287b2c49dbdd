//! Protocol documents.
//!
//! A protocol document names a state machine and lists its states and
//! labelled transitions:
//!
//! ```yaml
//! protocol_name: handshake
//! states: [idle, waiting, done]
//! transitions:
//!   - {from: idle, to: waiting, event: hello}
//!   - {from: waiting, to: done, event: ack}
//!   - {from: done, to: idle, event: reset}
//! ```

use crate::document::Node;
use crate::error::ProtocolError;
use crate::output::Output;
use crate::table::{Column, Table};
use std::collections::HashMap;
use std::path::Path;

/// Top-level keys every protocol document must carry, checked in this order.
pub const REQUIRED_KEYS: [&str; 3] = ["protocol_name", "states", "transitions"];

/// Cell text for a state without outgoing transitions.
pub const NO_EVENT: &str = "No event";
pub const NO_TRANSITIONS: &str = "No transitions";

const SEPARATOR: &str = " | ";

/// A labelled edge between two declared states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub event: String,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            event: event.into(),
        }
    }
}

/// A validated protocol document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolDocument {
    pub name: String,
    /// Declared states, in document order.
    pub states: Vec<String>,
    /// Transitions, in document order.
    pub transitions: Vec<Transition>,
}

impl ProtocolDocument {
    /// Loads and validates the protocol document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let root = Node::load(path)?;
        Self::from_node(&root)
    }

    /// Validates a parsed protocol document.
    ///
    /// Checks run in a fixed order and stop at the first failure. The
    /// dead-end check reports every offending state at once.
    pub fn from_node(root: &Node) -> Result<Self, ProtocolError> {
        root.expect_mapping("protocol document")?;

        if let Some(key) = REQUIRED_KEYS.into_iter().find(|key| !root.contains_key(key)) {
            return Err(ProtocolError::MissingKey { key });
        }
        let name = required(root, "protocol_name")?;
        let states = required(root, "states")?;
        let transitions = required(root, "transitions")?;

        let states = match states.as_sequence() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(ProtocolError::EmptyStates),
        };

        let transitions = match transitions.as_sequence() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(ProtocolError::EmptyTransitions),
        };

        // Node -> label, for membership checks
        let mut index: HashMap<&Node, String> = HashMap::with_capacity(states.len());
        for state in states {
            let label = state.label().ok_or_else(|| ProtocolError::NonScalarState {
                state: state.to_string(),
            })?;
            index.insert(state, label);
        }
        if index.len() != states.len() {
            return Err(ProtocolError::DuplicateStates);
        }

        let dead_ends: Vec<String> = states
            .iter()
            .filter(|state| !transitions.iter().any(|t| t.get("from") == Some(*state)))
            .filter_map(|state| index.get(state).cloned())
            .collect();
        if !dead_ends.is_empty() {
            return Err(ProtocolError::StatesWithoutTransitions { states: dead_ends });
        }

        let mut typed = Vec::with_capacity(transitions.len());
        for t in transitions {
            let (Some(from), Some(to), Some(event)) = (t.get("from"), t.get("to"), t.get("event"))
            else {
                return Err(ProtocolError::IncompleteTransition {
                    transition: t.to_string(),
                });
            };

            let (Some(from), Some(to)) = (index.get(from), index.get(to)) else {
                return Err(ProtocolError::UnknownState {
                    transition: t.to_string(),
                });
            };

            let event = match event.as_str() {
                Some(e) if !e.is_empty() => e,
                _ => {
                    return Err(ProtocolError::InvalidEvent {
                        transition: t.to_string(),
                    })
                }
            };

            typed.push(Transition::new(from.as_str(), to.as_str(), event));
        }

        let states = states
            .iter()
            .filter_map(|state| index.get(state).cloned())
            .collect();

        Ok(Self {
            name: name.label().unwrap_or_else(|| name.to_string()),
            states,
            transitions: typed,
        })
    }

    /// Returns the transitions leaving `state`, in document order.
    pub fn outgoing<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// Projects the document into a `State | Event(s) | Transition(s)` table,
    /// one row per declared state.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(vec![
            Column::new("State").dim(),
            Column::new("Event(s)"),
            Column::new("Transition(s)"),
        ]);

        for state in &self.states {
            let outgoing: Vec<&Transition> = self.outgoing(state).collect();
            if outgoing.is_empty() {
                table.add_row(vec![
                    state.clone(),
                    NO_EVENT.to_string(),
                    NO_TRANSITIONS.to_string(),
                ]);
                continue;
            }

            let events = outgoing
                .iter()
                .map(|t| t.event.as_str())
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            let edges = outgoing
                .iter()
                .map(|t| format!("({} -> {})", t.from, t.to))
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            table.add_row(vec![state.clone(), events, edges]);
        }

        table
    }
}

fn required<'a>(root: &'a Node, key: &'static str) -> Result<&'a Node, ProtocolError> {
    root.get(key).ok_or(ProtocolError::MissingKey { key })
}

/// Loads and validates a protocol file, reporting any failure to `out`.
///
/// Returns `None` on failure; errors never propagate past this point.
pub fn check_protocol_file(path: &Path, out: &mut dyn Output) -> Option<ProtocolDocument> {
    match ProtocolDocument::load(path) {
        Ok(doc) => {
            tracing::debug!(
                path = %path.display(),
                states = doc.states.len(),
                transitions = doc.transitions.len(),
                "protocol file is valid"
            );
            Some(doc)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), code = e.error_code(), "protocol validation failed");
            let label = if e.is_document_error() {
                "Error reading protocol file"
            } else {
                "Error"
            };
            out.error(label, &e.to_string());
            None
        }
    }
}

/// Prints the protocol heading and transition table.
pub fn print_protocol(doc: &ProtocolDocument, out: &mut dyn Output) {
    out.heading(&format!("Protocol: {}", doc.name));
    out.table(&doc.to_table());
}
