//! Look-back windows over a method's instructions.
//!
//! Every lookup is bounds checked. Looking before the start of the method,
//! or from a mutation point that does not exist, finds nothing, and finding
//! nothing never matches.

use crate::bytecode::{Instruction, MethodTree, Opcode};

/// Position of a mutation inside a method, with look-back helpers.
#[derive(Debug, Clone, Copy)]
pub struct InstructionWindow<'a> {
    instructions: &'a [Instruction],
    point: usize,
}

impl<'a> InstructionWindow<'a> {
    pub fn new(instructions: &'a [Instruction], point: usize) -> Self {
        Self {
            instructions,
            point,
        }
    }

    /// Window at instruction `point` of `method`.
    pub fn at(method: &'a MethodTree, point: usize) -> Self {
        Self::new(method.instructions(), point)
    }

    /// The mutated instruction itself.
    pub fn current(&self) -> Option<&'a Instruction> {
        self.instructions.get(self.point)
    }

    /// The instruction `distance` positions before the mutation point.
    pub fn back(&self, distance: usize) -> Option<&'a Instruction> {
        self.current()?;
        self.point
            .checked_sub(distance)
            .and_then(|i| self.instructions.get(i))
    }

    /// Whether the instruction `distance` back carries `opcode`.
    pub fn is_back(&self, distance: usize, opcode: Opcode) -> bool {
        self.back(distance).is_some_and(|insn| insn.is(opcode))
    }

    /// Whether the instruction `distance` back pushes a zero constant.
    pub fn zero_constant_back(&self, distance: usize) -> bool {
        self.back(distance).is_some_and(is_zero_constant)
    }

    /// Whether the instruction `distance` back is a call named `valueOf`.
    pub fn value_of_back(&self, distance: usize) -> bool {
        self.back(distance).is_some_and(is_value_of_call)
    }

    /// Whether the instruction `distance` back loads `""`.
    pub fn empty_string_back(&self, distance: usize) -> bool {
        self.back(distance).is_some_and(is_empty_string)
    }

    /// Whether the instruction `distance` back calls `owner.name` with no arguments.
    pub fn niladic_call_back(&self, distance: usize, owner: &str, name: &str) -> bool {
        self.back(distance)
            .and_then(Instruction::as_method_call)
            .is_some_and(|call| call.is_niladic_call_to(owner, name))
    }
}

/// `ICONST_0`, `LCONST_0`, `FCONST_0` or `DCONST_0`.
pub fn is_zero_constant(insn: &Instruction) -> bool {
    insn.opcode().is_some_and(Opcode::is_zero_constant)
}

/// A call to any method named `valueOf`, the boxing conversion.
pub fn is_value_of_call(insn: &Instruction) -> bool {
    insn.as_method_call()
        .is_some_and(|call| call.name == "valueOf")
}

/// `LDC ""`.
pub fn is_empty_string(insn: &Instruction) -> bool {
    insn.as_constant().is_some_and(|c| c.is_empty_string())
}
