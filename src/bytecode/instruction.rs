//! Instruction nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::descriptor::argument_count;
use super::opcode::Opcode;
use crate::core::{Error, Result};

/// Literal loaded by an `LDC` instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Class literal by internal name.
    Class(String),
}

impl Constant {
    /// Whether this is the empty string literal `""`.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Constant::String(s) if s.is_empty())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::Float(v) => write!(f, "{v}F"),
            Constant::Double(v) => write!(f, "{v}D"),
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Class(name) => write!(f, "{name}.class"),
        }
    }
}

/// A method invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInsn {
    pub opcode: Opcode,
    /// Internal name of the owning type, e.g. `java/util/Collections`.
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    /// Whether the owner is an interface.
    #[serde(default)]
    pub interface: bool,
}

impl MethodInsn {
    /// Number of declared arguments, derived from the descriptor.
    pub fn arity(&self) -> Result<usize> {
        argument_count(&self.descriptor)
    }

    /// Whether this invokes `owner.name` with no arguments.
    ///
    /// A malformed descriptor never matches.
    pub fn is_niladic_call_to(&self, owner: &str, name: &str) -> bool {
        self.owner == owner && self.name == name && matches!(self.arity(), Ok(0))
    }
}

/// A single instruction node.
///
/// `Label` and `Line` are pseudo nodes without an opcode. They occupy an
/// index like any other node, so a label between two instructions separates
/// them for window matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    /// Instruction without operands (`ICONST_0`, `ARETURN`, `DUP`, ...).
    Insn { opcode: Opcode },
    /// `BIPUSH` / `SIPUSH` with an immediate.
    Int { opcode: Opcode, operand: i32 },
    /// `LDC` of a literal.
    Ldc { constant: Constant },
    /// Local variable load or store.
    Var { opcode: Opcode, var: u16 },
    /// Jump to a label.
    Jump { opcode: Opcode, label: u32 },
    /// Field access.
    Field {
        opcode: Opcode,
        owner: String,
        name: String,
        descriptor: String,
    },
    /// Method invocation.
    Method(MethodInsn),
    /// Instruction with a class operand (`NEW`, `CHECKCAST`, `INSTANCEOF`).
    Type { opcode: Opcode, class: String },
    /// Jump target.
    Label { id: u32 },
    /// Source line marker.
    Line { line: u32, start: u32 },
}

impl Instruction {
    /// Operand-free instruction.
    pub fn insn(opcode: Opcode) -> Self {
        Instruction::Insn { opcode }
    }

    /// `LDC` of a literal.
    pub fn ldc(constant: Constant) -> Self {
        Instruction::Ldc { constant }
    }

    /// `INVOKESTATIC owner.name descriptor`.
    pub fn invoke_static(owner: &str, name: &str, descriptor: &str) -> Self {
        Self::invoke(Opcode::Invokestatic, owner, name, descriptor, false)
    }

    /// `INVOKEVIRTUAL owner.name descriptor`.
    pub fn invoke_virtual(owner: &str, name: &str, descriptor: &str) -> Self {
        Self::invoke(Opcode::Invokevirtual, owner, name, descriptor, false)
    }

    /// `INVOKEINTERFACE owner.name descriptor`.
    pub fn invoke_interface(owner: &str, name: &str, descriptor: &str) -> Self {
        Self::invoke(Opcode::Invokeinterface, owner, name, descriptor, true)
    }

    fn invoke(opcode: Opcode, owner: &str, name: &str, descriptor: &str, interface: bool) -> Self {
        Instruction::Method(MethodInsn {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            interface,
        })
    }

    /// Local variable access.
    pub fn var(opcode: Opcode, var: u16) -> Self {
        Instruction::Var { opcode, var }
    }

    /// Label pseudo node.
    pub fn label(id: u32) -> Self {
        Instruction::Label { id }
    }

    /// Operation code, or `None` for pseudo nodes.
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Instruction::Insn { opcode }
            | Instruction::Int { opcode, .. }
            | Instruction::Var { opcode, .. }
            | Instruction::Jump { opcode, .. }
            | Instruction::Field { opcode, .. }
            | Instruction::Type { opcode, .. } => Some(*opcode),
            Instruction::Method(call) => Some(call.opcode),
            Instruction::Ldc { .. } => Some(Opcode::Ldc),
            Instruction::Label { .. } | Instruction::Line { .. } => None,
        }
    }

    /// Whether this node carries the given opcode.
    pub fn is(&self, opcode: Opcode) -> bool {
        self.opcode() == Some(opcode)
    }

    /// The method call, if this is one.
    pub fn as_method_call(&self) -> Option<&MethodInsn> {
        match self {
            Instruction::Method(call) => Some(call),
            _ => None,
        }
    }

    /// The `LDC` literal, if this is one.
    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Instruction::Ldc { constant } => Some(constant),
            _ => None,
        }
    }

    /// Check that the opcode fits the node kind.
    ///
    /// Deserialized input can pair any opcode with any shape; reject
    /// combinations the JVM cannot express, such as an `Insn` carrying
    /// `INVOKESTATIC`.
    pub fn validate(&self) -> Result<()> {
        let fits = match self {
            Instruction::Insn { opcode } => {
                !(opcode.is_invoke()
                    || opcode.is_var()
                    || opcode.is_jump()
                    || opcode.is_field()
                    || opcode.is_type()
                    || matches!(opcode, Opcode::Bipush | Opcode::Sipush | Opcode::Ldc))
            }
            Instruction::Int { opcode, operand } => match opcode {
                Opcode::Bipush => i8::try_from(*operand).is_ok(),
                Opcode::Sipush => i16::try_from(*operand).is_ok(),
                _ => false,
            },
            Instruction::Var { opcode, .. } => opcode.is_var(),
            Instruction::Jump { opcode, .. } => opcode.is_jump(),
            Instruction::Field { opcode, .. } => opcode.is_field(),
            Instruction::Method(call) => call.opcode.is_invoke(),
            Instruction::Type { opcode, .. } => opcode.is_type(),
            Instruction::Ldc { .. } | Instruction::Label { .. } | Instruction::Line { .. } => true,
        };

        if fits {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "instruction {self} has an opcode that does not fit its kind"
            )))
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Insn { opcode } => write!(f, "{opcode}"),
            Instruction::Int { opcode, operand } => write!(f, "{opcode} {operand}"),
            Instruction::Ldc { constant } => write!(f, "LDC {constant}"),
            Instruction::Var { opcode, var } => write!(f, "{opcode} {var}"),
            Instruction::Jump { opcode, label } => write!(f, "{opcode} L{label}"),
            Instruction::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => write!(f, "{opcode} {owner}.{name} : {descriptor}"),
            Instruction::Method(call) => write!(
                f,
                "{} {}.{} {}",
                call.opcode, call.owner, call.name, call.descriptor
            ),
            Instruction::Type { opcode, class } => write!(f, "{opcode} {class}"),
            Instruction::Label { id } => write!(f, "L{id}"),
            Instruction::Line { line, start } => write!(f, "LINENUMBER {line} L{start}"),
        }
    }
}
