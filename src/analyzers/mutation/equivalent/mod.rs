//! Equivalent mutant filtering for return-value mutators.
//!
//! A return-value mutant replaces the value a method returns with a fixed
//! constant. When the method already returns that constant, the mutant is
//! equivalent to the original code: no test can kill it, and running it only
//! lowers the mutation score. This module spots the common cases by looking
//! at the one or two instructions before the mutated return.
//!
//! # Families
//!
//! | Filter           | Mutators                                  | Recognized pattern                           |
//! |------------------|-------------------------------------------|----------------------------------------------|
//! | `primitive_zero` | `PRIMITIVE_RETURNS`, `FALSE_RETURNS`      | `xCONST_0` then return                       |
//! | `hardcoded_true` | `TRUE_RETURNS`                            | `ICONST_1`, optionally boxed via `valueOf`   |
//! | `null_return`    | `NULL_RETURNS`                            | `ACONST_NULL` then return                    |
//! | `empty_return`   | `EMPTY_RETURNS`, `FALSE_RETURNS`          | boxed zero, `""`, or a niladic empty factory |
//!
//! Detection is shallow. A mutant is only filtered when the
//! pattern proves equivalence; anything else is kept.
//!
//! # Usage
//!
//! ```ignore
//! use retfilter::analyzers::mutation::equivalent::equivalent_returns;
//! use retfilter::analyzers::mutation::intercept::ClassScope;
//!
//! let mut filter = equivalent_returns();
//! let scope = ClassScope::begin(&mut filter, &class);
//! let result = scope.partition(mutations)?;
//! println!("Kept: {}, Filtered: {}", result.kept_count(), result.filtered_count());
//! ```

mod filter;
mod matchers;
mod window;

pub use filter::ReturnValueFilter;
pub use matchers::{
    EmptyReturnMatcher, EquivalenceMatcher, HardCodedTrueMatcher, NullReturnMatcher,
    PrimitiveZeroMatcher, EMPTY_FACTORIES,
};
pub use window::{is_empty_string, is_value_of_call, is_zero_constant, InstructionWindow};

use super::intercept::{CompoundInterceptor, Feature, InterceptorFactory, MutationInterceptor};

/// Feature name of the equivalent return-value filter.
pub const FEATURE_NAME: &str = "FRETEQUIV";

/// The four return-value filters composed into one interceptor.
pub fn equivalent_returns() -> CompoundInterceptor {
    CompoundInterceptor::named(
        "equivalent_returns",
        vec![
            Box::new(ReturnValueFilter::new(PrimitiveZeroMatcher)),
            Box::new(ReturnValueFilter::new(HardCodedTrueMatcher)),
            Box::new(ReturnValueFilter::new(NullReturnMatcher)),
            Box::new(ReturnValueFilter::new(EmptyReturnMatcher)),
        ],
    )
}

/// Provides [`equivalent_returns`] under the `FRETEQUIV` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct EquivalentReturnsFactory;

impl InterceptorFactory for EquivalentReturnsFactory {
    fn description(&self) -> &'static str {
        "Trivial return vals equivalence filter"
    }

    fn provides(&self) -> Feature {
        Feature::named(FEATURE_NAME)
            .with_on_by_default(true)
            .with_description("Filters return vals mutants with bytecode equivalent to the unmutated class")
    }

    fn create_interceptor(&self) -> Box<dyn MutationInterceptor> {
        Box::new(equivalent_returns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::mutation::intercept::{ClassScope, InterceptorType};
    use crate::analyzers::mutation::{MutationDetails, MutatorKind};
    use crate::bytecode::{ClassTree, Constant, Instruction, Location, MethodTree, Opcode};
    use crate::core::Error;

    const CLASS: &str = "com/example/Inventory";

    struct Method {
        name: &'static str,
        descriptor: &'static str,
        body: Vec<Instruction>,
    }

    impl Method {
        fn new(name: &'static str, descriptor: &'static str, body: Vec<Instruction>) -> Self {
            Self {
                name,
                descriptor,
                body,
            }
        }

        fn location(&self) -> Location {
            Location::new(CLASS, self.name, self.descriptor)
        }

        /// Mutation at the method's final instruction, the return.
        fn mutant(&self, mutator: MutatorKind) -> MutationDetails {
            MutationDetails::new(self.location(), self.body.len() - 1, mutator, "mutated return")
        }
    }

    fn class(methods: &[&Method]) -> ClassTree {
        ClassTree::new(
            CLASS,
            methods
                .iter()
                .map(|m| MethodTree::new(m.location(), m.body.clone()))
                .collect(),
        )
        .unwrap()
    }

    fn run(class: &ClassTree, mutations: Vec<MutationDetails>) -> Vec<MutationDetails> {
        let mut filter = equivalent_returns();
        let scope = ClassScope::begin(&mut filter, class);
        scope.intercept(mutations).unwrap()
    }

    fn returns_zero() -> Method {
        Method::new(
            "count",
            "()I",
            vec![Instruction::insn(Opcode::Iconst0), Instruction::insn(Opcode::Ireturn)],
        )
    }

    fn returns_boxed_true() -> Method {
        Method::new(
            "enabled",
            "()Ljava/lang/Boolean;",
            vec![
                Instruction::insn(Opcode::Iconst1),
                Instruction::invoke_static(
                    "java/lang/Boolean",
                    "valueOf",
                    "(Z)Ljava/lang/Boolean;",
                ),
                Instruction::insn(Opcode::Areturn),
            ],
        )
    }

    fn returns_empty_list() -> Method {
        Method::new(
            "items",
            "()Ljava/util/List;",
            vec![
                Instruction::invoke_static(
                    "java/util/Collections",
                    "emptyList",
                    "()Ljava/util/List;",
                ),
                Instruction::insn(Opcode::Areturn),
            ],
        )
    }

    fn returns_first() -> Method {
        Method::new(
            "first",
            "(Ljava/util/List;)Ljava/lang/Object;",
            vec![
                Instruction::var(Opcode::Aload, 1),
                Instruction::insn(Opcode::Iconst0),
                Instruction::invoke_interface("java/util/List", "get", "(I)Ljava/lang/Object;"),
                Instruction::insn(Opcode::Areturn),
            ],
        )
    }

    fn returns_empty_string() -> Method {
        Method::new(
            "label",
            "()Ljava/lang/String;",
            vec![
                Instruction::ldc(Constant::String(String::new())),
                Instruction::insn(Opcode::Areturn),
            ],
        )
    }

    #[test]
    fn test_zero_constant_return_is_filtered() {
        let method = returns_zero();
        let kept = run(
            &class(&[&method]),
            vec![method.mutant(MutatorKind::PrimitiveReturns)],
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_boxed_true_return_is_filtered_only_for_true_mutator() {
        let method = returns_boxed_true();
        let kept = run(
            &class(&[&method]),
            vec![
                method.mutant(MutatorKind::BooleanTrueReturn),
                method.mutant(MutatorKind::PrimitiveReturns),
            ],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mutator(), &MutatorKind::PrimitiveReturns);
    }

    #[test]
    fn test_empty_list_return_is_filtered() {
        let method = returns_empty_list();
        let kept = run(
            &class(&[&method]),
            vec![method.mutant(MutatorKind::EmptyReturn)],
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_computed_return_survives_null_mutator() {
        let method = returns_first();
        let kept = run(
            &class(&[&method]),
            vec![method.mutant(MutatorKind::NullReturn)],
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_empty_string_return_is_filtered() {
        let method = returns_empty_string();
        let kept = run(
            &class(&[&method]),
            vec![method.mutant(MutatorKind::EmptyReturn)],
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_false_return_matched_by_either_family() {
        let primitive = Method::new(
            "ready",
            "()Z",
            vec![Instruction::insn(Opcode::Iconst0), Instruction::insn(Opcode::Ireturn)],
        );
        let boxed = Method::new(
            "done",
            "()Ljava/lang/Boolean;",
            vec![
                Instruction::insn(Opcode::Iconst0),
                Instruction::invoke_static(
                    "java/lang/Boolean",
                    "valueOf",
                    "(Z)Ljava/lang/Boolean;",
                ),
                Instruction::insn(Opcode::Areturn),
            ],
        );
        let class = class(&[&primitive, &boxed]);
        let mut filter = equivalent_returns();
        let scope = ClassScope::begin(&mut filter, &class);
        let result = scope
            .partition(vec![
                primitive.mutant(MutatorKind::BooleanFalseReturn),
                boxed.mutant(MutatorKind::BooleanFalseReturn),
            ])
            .unwrap();

        assert_eq!(result.kept_count(), 0);
        assert_eq!(result.filtered[0].filter, "primitive_zero");
        assert_eq!(result.filtered[1].filter, "empty_return");
    }

    #[test]
    fn test_unrelated_mutators_are_kept() {
        let method = returns_zero();
        let class = class(&[&method]);
        let mutations = vec![
            method.mutant(MutatorKind::Math),
            method.mutant(MutatorKind::ReturnVals),
            method.mutant(MutatorKind::Other("com.example.Custom".to_string())),
            MutationDetails::new(
                Location::new(CLASS, "nowhere", "()V"),
                0,
                MutatorKind::Other("com.example.Custom".to_string()),
                "unknown mutator elsewhere",
            ),
        ];
        assert_eq!(run(&class, mutations.clone()), mutations);
    }

    #[test]
    fn test_boundary_indexes_never_error() {
        let method = returns_zero();
        let class = class(&[&method]);
        let mutations: Vec<MutationDetails> = [0, 1, 2, 50]
            .into_iter()
            .flat_map(|index| {
                MutatorKind::known().into_iter().map(move |mutator| {
                    MutationDetails::new(method_location(), index, mutator, "boundary")
                })
            })
            .collect();
        let mut filter = equivalent_returns();
        let scope = ClassScope::begin(&mut filter, &class);
        let result = scope.partition(mutations).unwrap();
        // Only the two zero-return mutators at the return instruction match.
        assert_eq!(result.filtered_count(), 2);
        assert!(result
            .filtered
            .iter()
            .all(|f| f.mutation.instruction_index() == 1));
    }

    fn method_location() -> Location {
        returns_zero().location()
    }

    #[test]
    fn test_unresolved_return_mutation_aborts() {
        let method = returns_zero();
        let class = class(&[&method]);
        let stray = MutationDetails::new(
            Location::new(CLASS, "gone", "()I"),
            1,
            MutatorKind::PrimitiveReturns,
            "stray",
        );
        let mut filter = equivalent_returns();
        let scope = ClassScope::begin(&mut filter, &class);
        let result = scope.intercept(vec![method.mutant(MutatorKind::Math), stray]);
        assert!(matches!(result, Err(Error::UnresolvedLocation { .. })));
    }

    #[test]
    fn test_idempotent() {
        let methods = [
            returns_zero(),
            returns_boxed_true(),
            returns_empty_list(),
            returns_first(),
            returns_empty_string(),
        ];
        let refs: Vec<&Method> = methods.iter().collect();
        let class = class(&refs);
        let mutations: Vec<MutationDetails> = methods
            .iter()
            .flat_map(|m| MutatorKind::known().map(|k| m.mutant(k)))
            .collect();

        let once = run(&class, mutations);
        let twice = run(&class, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_factory_feature() {
        let factory = EquivalentReturnsFactory;
        let feature = factory.provides();
        assert_eq!(feature.name, "FRETEQUIV");
        assert!(feature.on_by_default);
        assert_eq!(
            feature.description,
            "Filters return vals mutants with bytecode equivalent to the unmutated class"
        );
        assert_eq!(factory.description(), "Trivial return vals equivalence filter");
        assert_eq!(factory.interceptor_type(), InterceptorType::Filter);
    }

    #[test]
    fn test_factory_creates_fresh_compound() {
        let interceptor = EquivalentReturnsFactory.create_interceptor();
        assert_eq!(interceptor.name(), "equivalent_returns");
        assert_eq!(
            equivalent_returns().child_names(),
            vec!["primitive_zero", "hardcoded_true", "null_return", "empty_return"]
        );
    }
}
