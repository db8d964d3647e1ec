//! Bytecode instruction model.
//!
//! A class is a set of methods, each an ordered arena of instruction nodes
//! addressed by zero-based index. Filters never modify the model.

mod descriptor;
mod instruction;
mod opcode;
mod tree;

pub use descriptor::{argument_count, FieldType, MethodDescriptor};
pub use instruction::{Constant, Instruction, MethodInsn};
pub use opcode::Opcode;
pub use tree::{ClassTree, Location, MethodTree};
