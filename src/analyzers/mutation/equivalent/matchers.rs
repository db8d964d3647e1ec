//! Instruction patterns that make return-value mutants equivalent.
//!
//! Each return mutator replaces the value about to be returned with a fixed
//! one. When the instructions right before the return already produce that
//! value, the mutant changes nothing.

use super::window::InstructionWindow;
use crate::analyzers::mutation::MutatorKind;

/// Factory methods whose niladic form returns a known empty value.
pub const EMPTY_FACTORIES: &[(&str, &str)] = &[
    ("java/util/Optional", "empty"),
    ("java/util/Collections", "emptyList"),
    ("java/util/Collections", "emptySet"),
    ("java/util/List", "of"),
    ("java/util/Set", "of"),
];

/// Recognizes one family of trivially equivalent return mutants.
pub trait EquivalenceMatcher: Send + Sync {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Whether mutants from `mutator` belong to this family.
    fn accepts(&self, mutator: &MutatorKind) -> bool;

    /// Whether the instructions around the mutation point make the mutant a no-op.
    fn matches(&self, window: &InstructionWindow<'_>) -> bool;
}

/// Returning a zero constant where the mutant would return zero (or false).
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveZeroMatcher;

impl EquivalenceMatcher for PrimitiveZeroMatcher {
    fn name(&self) -> &'static str {
        "primitive_zero"
    }

    fn accepts(&self, mutator: &MutatorKind) -> bool {
        matches!(
            mutator,
            MutatorKind::PrimitiveReturns | MutatorKind::BooleanFalseReturn
        )
    }

    fn matches(&self, window: &InstructionWindow<'_>) -> bool {
        window.zero_constant_back(1)
    }
}

/// Returning hard-coded `true`, primitive or boxed through `valueOf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HardCodedTrueMatcher;

impl EquivalenceMatcher for HardCodedTrueMatcher {
    fn name(&self) -> &'static str {
        "hardcoded_true"
    }

    fn accepts(&self, mutator: &MutatorKind) -> bool {
        matches!(mutator, MutatorKind::BooleanTrueReturn)
    }

    fn matches(&self, window: &InstructionWindow<'_>) -> bool {
        use crate::bytecode::Opcode::Iconst1;

        let primitive = window.is_back(1, Iconst1);
        let boxed = window.is_back(2, Iconst1) && window.value_of_back(1);
        primitive || boxed
    }
}

/// Returning `null` where the mutant would return `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReturnMatcher;

impl EquivalenceMatcher for NullReturnMatcher {
    fn name(&self) -> &'static str {
        "null_return"
    }

    fn accepts(&self, mutator: &MutatorKind) -> bool {
        matches!(mutator, MutatorKind::NullReturn)
    }

    fn matches(&self, window: &InstructionWindow<'_>) -> bool {
        window.is_back(1, crate::bytecode::Opcode::AconstNull)
    }
}

/// Returning an empty value where the mutant would return the same empty value.
///
/// Covers boxed zeros, `""` and the niladic empty-collection factories. Shares
/// `BooleanFalseReturn` with [`PrimitiveZeroMatcher`]; `Boolean.valueOf(false)`
/// is a boxed zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyReturnMatcher;

impl EmptyReturnMatcher {
    fn boxed_zero(window: &InstructionWindow<'_>) -> bool {
        window.value_of_back(1) && window.zero_constant_back(2)
    }

    fn empty_factory(window: &InstructionWindow<'_>) -> bool {
        EMPTY_FACTORIES
            .iter()
            .any(|(owner, name)| window.niladic_call_back(1, owner, name))
    }
}

impl EquivalenceMatcher for EmptyReturnMatcher {
    fn name(&self) -> &'static str {
        "empty_return"
    }

    fn accepts(&self, mutator: &MutatorKind) -> bool {
        matches!(
            mutator,
            MutatorKind::EmptyReturn | MutatorKind::BooleanFalseReturn
        )
    }

    fn matches(&self, window: &InstructionWindow<'_>) -> bool {
        Self::boxed_zero(window) || window.empty_string_back(1) || Self::empty_factory(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Constant, Instruction, Opcode};

    fn window(insns: &[Instruction]) -> InstructionWindow<'_> {
        // The mutation point is the last instruction, the return.
        InstructionWindow::new(insns, insns.len() - 1)
    }

    fn ret(op: Opcode) -> Instruction {
        Instruction::insn(op)
    }

    fn boxing(owner: &str, arg: &str) -> Instruction {
        Instruction::invoke_static(owner, "valueOf", &format!("({arg})L{owner};"))
    }

    #[test]
    fn test_primitive_zero_matches_each_zero_constant() {
        let matcher = PrimitiveZeroMatcher;
        for (zero, ret_op) in [
            (Opcode::Iconst0, Opcode::Ireturn),
            (Opcode::Lconst0, Opcode::Lreturn),
            (Opcode::Fconst0, Opcode::Freturn),
            (Opcode::Dconst0, Opcode::Dreturn),
        ] {
            let insns = [Instruction::insn(zero), ret(ret_op)];
            assert!(matcher.matches(&window(&insns)), "{zero} should match");
        }
    }

    #[test]
    fn test_primitive_zero_ignores_other_values() {
        let matcher = PrimitiveZeroMatcher;
        let insns = [Instruction::insn(Opcode::Iconst1), ret(Opcode::Ireturn)];
        assert!(!matcher.matches(&window(&insns)));

        let insns = [Instruction::var(Opcode::Iload, 1), ret(Opcode::Ireturn)];
        assert!(!matcher.matches(&window(&insns)));

        let insns = [Instruction::ldc(Constant::Long(0)), ret(Opcode::Lreturn)];
        assert!(!matcher.matches(&window(&insns)));
    }

    #[test]
    fn test_primitive_zero_family() {
        let matcher = PrimitiveZeroMatcher;
        assert!(matcher.accepts(&MutatorKind::PrimitiveReturns));
        assert!(matcher.accepts(&MutatorKind::BooleanFalseReturn));
        assert!(!matcher.accepts(&MutatorKind::EmptyReturn));
        assert!(!matcher.accepts(&MutatorKind::BooleanTrueReturn));
        assert!(!matcher.accepts(&MutatorKind::Other("x".to_string())));
    }

    #[test]
    fn test_hardcoded_true_primitive() {
        let matcher = HardCodedTrueMatcher;
        let insns = [Instruction::insn(Opcode::Iconst1), ret(Opcode::Ireturn)];
        assert!(matcher.matches(&window(&insns)));
    }

    #[test]
    fn test_hardcoded_true_boxed() {
        let matcher = HardCodedTrueMatcher;
        let insns = [
            Instruction::insn(Opcode::Iconst1),
            boxing("java/lang/Boolean", "Z"),
            ret(Opcode::Areturn),
        ];
        assert!(matcher.matches(&window(&insns)));
    }

    #[test]
    fn test_hardcoded_true_requires_value_of() {
        let matcher = HardCodedTrueMatcher;
        let insns = [
            Instruction::insn(Opcode::Iconst1),
            Instruction::invoke_static("com/example/Flags", "wrap", "(Z)Ljava/lang/Boolean;"),
            ret(Opcode::Areturn),
        ];
        assert!(!matcher.matches(&window(&insns)));

        let insns = [
            Instruction::insn(Opcode::Iconst0),
            boxing("java/lang/Boolean", "Z"),
            ret(Opcode::Areturn),
        ];
        assert!(!matcher.matches(&window(&insns)));
    }

    #[test]
    fn test_hardcoded_true_family() {
        let matcher = HardCodedTrueMatcher;
        assert!(matcher.accepts(&MutatorKind::BooleanTrueReturn));
        assert!(!matcher.accepts(&MutatorKind::PrimitiveReturns));
        assert!(!matcher.accepts(&MutatorKind::BooleanFalseReturn));
    }

    #[test]
    fn test_null_return() {
        let matcher = NullReturnMatcher;
        let insns = [Instruction::insn(Opcode::AconstNull), ret(Opcode::Areturn)];
        assert!(matcher.matches(&window(&insns)));

        let insns = [Instruction::var(Opcode::Aload, 0), ret(Opcode::Areturn)];
        assert!(!matcher.matches(&window(&insns)));

        assert!(matcher.accepts(&MutatorKind::NullReturn));
        assert!(!matcher.accepts(&MutatorKind::EmptyReturn));
    }

    #[test]
    fn test_empty_return_boxed_zero() {
        let matcher = EmptyReturnMatcher;
        for (zero, owner, arg) in [
            (Opcode::Iconst0, "java/lang/Integer", "I"),
            (Opcode::Lconst0, "java/lang/Long", "J"),
            (Opcode::Fconst0, "java/lang/Float", "F"),
            (Opcode::Dconst0, "java/lang/Double", "D"),
            (Opcode::Iconst0, "java/lang/Boolean", "Z"),
        ] {
            let insns = [Instruction::insn(zero), boxing(owner, arg), ret(Opcode::Areturn)];
            assert!(matcher.matches(&window(&insns)), "{owner} zero should match");
        }
    }

    #[test]
    fn test_empty_return_empty_string() {
        let matcher = EmptyReturnMatcher;
        let insns = [
            Instruction::ldc(Constant::String(String::new())),
            ret(Opcode::Areturn),
        ];
        assert!(matcher.matches(&window(&insns)));

        let insns = [
            Instruction::ldc(Constant::String("x".to_string())),
            ret(Opcode::Areturn),
        ];
        assert!(!matcher.matches(&window(&insns)));
    }

    #[test]
    fn test_empty_return_factories() {
        let matcher = EmptyReturnMatcher;
        let cases = [
            Instruction::invoke_static("java/util/Optional", "empty", "()Ljava/util/Optional;"),
            Instruction::invoke_static("java/util/Collections", "emptyList", "()Ljava/util/List;"),
            Instruction::invoke_static("java/util/Collections", "emptySet", "()Ljava/util/Set;"),
            Instruction::invoke_interface("java/util/List", "of", "()Ljava/util/List;"),
            Instruction::invoke_interface("java/util/Set", "of", "()Ljava/util/Set;"),
        ];
        for call in cases {
            let label = call.to_string();
            let insns = [call, ret(Opcode::Areturn)];
            assert!(matcher.matches(&window(&insns)), "{label} should match");
        }
    }

    #[test]
    fn test_empty_return_rejects_non_empty_factories() {
        let matcher = EmptyReturnMatcher;
        let cases = [
            Instruction::invoke_interface(
                "java/util/List",
                "of",
                "(Ljava/lang/Object;)Ljava/util/List;",
            ),
            Instruction::invoke_interface(
                "java/util/Set",
                "of",
                "([Ljava/lang/Object;)Ljava/util/Set;",
            ),
            Instruction::invoke_static("java/util/Collections", "emptyMap", "()Ljava/util/Map;"),
            Instruction::invoke_static("com/example/Optional", "empty", "()Lcom/example/Optional;"),
        ];
        for call in cases {
            let label = call.to_string();
            let insns = [call, ret(Opcode::Areturn)];
            assert!(!matcher.matches(&window(&insns)), "{label} should not match");
        }
    }

    #[test]
    fn test_empty_return_family_shares_false() {
        let matcher = EmptyReturnMatcher;
        assert!(matcher.accepts(&MutatorKind::EmptyReturn));
        assert!(matcher.accepts(&MutatorKind::BooleanFalseReturn));
        assert!(!matcher.accepts(&MutatorKind::NullReturn));
        assert!(!matcher.accepts(&MutatorKind::PrimitiveReturns));
    }

    #[test]
    fn test_short_methods_never_match() {
        let matchers: [&dyn EquivalenceMatcher; 4] = [
            &PrimitiveZeroMatcher,
            &HardCodedTrueMatcher,
            &NullReturnMatcher,
            &EmptyReturnMatcher,
        ];
        let lone_return = [ret(Opcode::Areturn)];
        for matcher in matchers {
            assert!(!matcher.matches(&InstructionWindow::new(&lone_return, 0)));
            assert!(!matcher.matches(&InstructionWindow::new(&[], 0)));
        }
    }

    #[test]
    fn test_label_breaks_pattern() {
        let insns = [
            Instruction::insn(Opcode::AconstNull),
            Instruction::label(1),
            ret(Opcode::Areturn),
        ];
        assert!(!NullReturnMatcher.matches(&window(&insns)));
    }

    #[test]
    fn test_family_and_pattern_are_independent() {
        let insns = [Instruction::insn(Opcode::AconstNull), ret(Opcode::Areturn)];
        let w = window(&insns);
        assert!(NullReturnMatcher.accepts(&MutatorKind::NullReturn));
        assert!(NullReturnMatcher.matches(&w));
        assert!(!NullReturnMatcher.accepts(&MutatorKind::EmptyReturn));
        assert!(PrimitiveZeroMatcher.accepts(&MutatorKind::PrimitiveReturns));
        assert!(!PrimitiveZeroMatcher.matches(&w));
    }
}
