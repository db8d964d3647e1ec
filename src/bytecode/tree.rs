//! Method and class trees: the per-class instruction model filters read.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::descriptor::MethodDescriptor;
use super::instruction::Instruction;
use crate::core::{Error, Result};

/// Identifies a method: declaring class, method name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Internal name of the declaring class, e.g. `com/example/Shop`.
    pub class: String,
    pub method: String,
    pub descriptor: String,
}

impl Location {
    pub fn new(
        class: impl Into<String>,
        method: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.class, self.method, self.descriptor)
    }
}

/// A method body as an instruction arena.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodTree {
    location: Location,
    instructions: Vec<Instruction>,
}

impl MethodTree {
    pub fn new(location: Location, instructions: Vec<Instruction>) -> Self {
        Self {
            location,
            instructions,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Instructions in original control-flow order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// The methods of one class, indexed by location.
///
/// Built once per class and read by every filter evaluating that class's
/// mutations. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ClassTreeData", into = "ClassTreeData")]
pub struct ClassTree {
    name: String,
    methods: Vec<MethodTree>,
    index: HashMap<Location, usize>,
}

impl ClassTree {
    /// Build a class tree, validating that every method belongs to `name`,
    /// that locations are unique and that every instruction is well formed.
    pub fn new(name: impl Into<String>, methods: Vec<MethodTree>) -> Result<Self> {
        let name = name.into();
        let mut index = HashMap::with_capacity(methods.len());

        for (position, method) in methods.iter().enumerate() {
            if method.location.class != name {
                return Err(Error::InvalidArgument(format!(
                    "method {} is not declared by class {name}",
                    method.location
                )));
            }
            MethodDescriptor::parse(&method.location.descriptor)?;
            for instruction in &method.instructions {
                instruction.validate()?;
            }
            if index.insert(method.location.clone(), position).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "duplicate method {}",
                    method.location
                )));
            }
        }

        Ok(Self {
            name,
            methods,
            index,
        })
    }

    /// Internal class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodTree] {
        &self.methods
    }

    /// Method declared at `location`, if this class has it.
    pub fn method(&self, location: &Location) -> Option<&MethodTree> {
        self.index.get(location).map(|&i| &self.methods[i])
    }

    /// Method declared at `location`.
    ///
    /// Errors when the class does not declare it: the caller paired this
    /// class with mutations from somewhere else.
    pub fn resolve(&self, location: &Location) -> Result<&MethodTree> {
        self.method(location)
            .ok_or_else(|| Error::unresolved(location))
    }
}

/// Serialized shape of a class tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassTreeData {
    name: String,
    #[serde(default)]
    methods: Vec<MethodData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MethodData {
    name: String,
    descriptor: String,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl TryFrom<ClassTreeData> for ClassTree {
    type Error = Error;

    fn try_from(data: ClassTreeData) -> Result<Self> {
        let methods = data
            .methods
            .into_iter()
            .map(|m| {
                MethodTree::new(
                    Location::new(data.name.as_str(), m.name, m.descriptor),
                    m.instructions,
                )
            })
            .collect();
        ClassTree::new(data.name, methods)
    }
}

impl From<ClassTree> for ClassTreeData {
    fn from(tree: ClassTree) -> Self {
        Self {
            name: tree.name,
            methods: tree
                .methods
                .into_iter()
                .map(|m| MethodData {
                    name: m.location.method,
                    descriptor: m.location.descriptor,
                    instructions: m.instructions,
                })
                .collect(),
        }
    }
}
