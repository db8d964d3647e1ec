//! Mutation candidate types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mutator::MutatorKind;
use crate::bytecode::Location;

/// Identity of a mutation: where it is and which mutator made it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MutationId {
    /// Method containing the mutated instruction.
    pub location: Location,
    /// Index of the mutated instruction in the method's instruction list.
    pub index: usize,
    /// Mutator that produced the mutation.
    pub mutator: MutatorKind,
}

impl MutationId {
    pub fn new(location: Location, index: usize, mutator: MutatorKind) -> Self {
        Self {
            location,
            index,
            mutator,
        }
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} [{}]", self.location, self.index, self.mutator)
    }
}

/// A mutation candidate produced by the mutant generator.
///
/// Filters only ever accept or reject these; they are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationDetails {
    #[serde(flatten)]
    pub id: MutationId,
    /// Human-readable description of the mutation.
    #[serde(default)]
    pub description: String,
    /// Source file the mutated class was compiled from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Source line of the mutated instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl MutationDetails {
    /// Create a new mutation candidate.
    pub fn new(
        location: Location,
        index: usize,
        mutator: MutatorKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: MutationId::new(location, index, mutator),
            description: description.into(),
            filename: None,
            line: None,
        }
    }

    /// Attach source position information.
    pub fn with_source(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.filename = Some(filename.into());
        self.line = Some(line);
        self
    }

    pub fn mutator(&self) -> &MutatorKind {
        &self.id.mutator
    }

    pub fn location(&self) -> &Location {
        &self.id.location
    }

    /// Index of the instruction the mutation alters.
    pub fn instruction_index(&self) -> usize {
        self.id.index
    }
}
