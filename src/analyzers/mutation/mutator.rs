//! Mutator identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Package the built-in mutators' globally unique ids live under.
pub const MUTATOR_PACKAGE: &str = "org.pitest.mutationtest.engine.gregor.mutators";

/// The mutator that produced a mutation.
///
/// Upstream identifies mutators by globally unique string ids. The known ones
/// are lifted into variants so filters can match on them exhaustively;
/// anything else lands in `Other` and no filter claims it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MutatorKind {
    /// Replaces primitive return values with 0.
    PrimitiveReturns,
    /// Replaces boolean (and `Boolean`) return values with true.
    BooleanTrueReturn,
    /// Replaces boolean (and `Boolean`) return values with false.
    BooleanFalseReturn,
    /// Replaces object return values with null.
    NullReturn,
    /// Replaces object return values with an empty value ("", empty collection, 0).
    EmptyReturn,
    /// Legacy catch-all return value mutator.
    ReturnVals,
    ConditionalsBoundary,
    Increments,
    InvertNegatives,
    Math,
    NegateConditionals,
    VoidMethodCall,
    NonVoidMethodCall,
    /// A mutator this crate does not know.
    Other(String),
}

impl MutatorKind {
    /// Every known mutator.
    pub fn known() -> [MutatorKind; 13] {
        [
            MutatorKind::PrimitiveReturns,
            MutatorKind::BooleanTrueReturn,
            MutatorKind::BooleanFalseReturn,
            MutatorKind::NullReturn,
            MutatorKind::EmptyReturn,
            MutatorKind::ReturnVals,
            MutatorKind::ConditionalsBoundary,
            MutatorKind::Increments,
            MutatorKind::InvertNegatives,
            MutatorKind::Math,
            MutatorKind::NegateConditionals,
            MutatorKind::VoidMethodCall,
            MutatorKind::NonVoidMethodCall,
        ]
    }

    /// Simple class name of the implementing mutator.
    fn class_name(&self) -> Option<&'static str> {
        let name = match self {
            MutatorKind::PrimitiveReturns => "PrimitiveReturnsMutator",
            MutatorKind::BooleanTrueReturn => "BooleanTrueReturnValsMutator",
            MutatorKind::BooleanFalseReturn => "BooleanFalseReturnValsMutator",
            MutatorKind::NullReturn => "NullReturnValsMutator",
            MutatorKind::EmptyReturn => "EmptyObjectReturnValsMutator",
            MutatorKind::ReturnVals => "ReturnValsMutator",
            MutatorKind::ConditionalsBoundary => "ConditionalsBoundaryMutator",
            MutatorKind::Increments => "IncrementsMutator",
            MutatorKind::InvertNegatives => "InvertNegsMutator",
            MutatorKind::Math => "MathMutator",
            MutatorKind::NegateConditionals => "NegateConditionalsMutator",
            MutatorKind::VoidMethodCall => "VoidMethodCallMutator",
            MutatorKind::NonVoidMethodCall => "NonVoidMethodCallMutator",
            MutatorKind::Other(_) => return None,
        };
        Some(name)
    }

    /// Configuration name, e.g. `PRIMITIVE_RETURNS`.
    pub fn short_name(&self) -> Option<&'static str> {
        let name = match self {
            MutatorKind::PrimitiveReturns => "PRIMITIVE_RETURNS",
            MutatorKind::BooleanTrueReturn => "TRUE_RETURNS",
            MutatorKind::BooleanFalseReturn => "FALSE_RETURNS",
            MutatorKind::NullReturn => "NULL_RETURNS",
            MutatorKind::EmptyReturn => "EMPTY_RETURNS",
            MutatorKind::ReturnVals => "RETURN_VALS",
            MutatorKind::ConditionalsBoundary => "CONDITIONALS_BOUNDARY",
            MutatorKind::Increments => "INCREMENTS",
            MutatorKind::InvertNegatives => "INVERT_NEGS",
            MutatorKind::Math => "MATH",
            MutatorKind::NegateConditionals => "NEGATE_CONDITIONALS",
            MutatorKind::VoidMethodCall => "VOID_METHOD_CALLS",
            MutatorKind::NonVoidMethodCall => "NON_VOID_METHOD_CALLS",
            MutatorKind::Other(_) => return None,
        };
        Some(name)
    }

    /// Short name when known, otherwise the unique id.
    pub fn label(&self) -> String {
        self.short_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.unique_id())
    }

    /// Globally unique id, e.g.
    /// `org.pitest.mutationtest.engine.gregor.mutators.NullReturnValsMutator`.
    pub fn unique_id(&self) -> String {
        if let MutatorKind::Other(id) = self {
            return id.clone();
        }
        format!(
            "{MUTATOR_PACKAGE}.{}",
            self.class_name().unwrap_or_default()
        )
    }

    /// Resolve an id or a short name. Never fails: unknown ids become `Other`.
    pub fn parse_id(id: &str) -> Self {
        let trimmed = id.trim();
        Self::known()
            .into_iter()
            .find(|kind| {
                kind.short_name()
                    .is_some_and(|short| short.eq_ignore_ascii_case(trimmed))
                    || kind.unique_id() == trimmed
            })
            .unwrap_or_else(|| MutatorKind::Other(trimmed.to_string()))
    }
}

impl fmt::Display for MutatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_id())
    }
}

impl FromStr for MutatorKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_id(s))
    }
}

impl From<String> for MutatorKind {
    fn from(id: String) -> Self {
        Self::parse_id(&id)
    }
}

impl From<MutatorKind> for String {
    fn from(kind: MutatorKind) -> Self {
        kind.unique_id()
    }
}
