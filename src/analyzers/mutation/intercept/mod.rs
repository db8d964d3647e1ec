//! Mutation interceptors: stages that see a class's mutations before they
//! are run and may remove some of them.
//!
//! The class under analysis is passed explicitly to every evaluation, so an
//! interceptor never holds a stale class between runs. `begin` and `end`
//! remain as hooks for interceptors that want per-class preparation;
//! [`ClassScope`] brackets a class so `end` always runs.

mod compound;
mod feature;
mod scope;

pub use compound::CompoundInterceptor;
pub use feature::{Feature, FeatureRegistry, FeatureSetting, FeatureStatus, InterceptorFactory};
pub use scope::{ClassScope, FilterResult, FilteredMutation};

use serde::Serialize;

use super::MutationDetails;
use crate::bytecode::ClassTree;
use crate::core::Result;

/// What an interceptor does to the mutations it sees.
///
/// Reported by `retfilter features`. Every interceptor here removes
/// mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptorType {
    /// Removes mutations.
    Filter,
}

/// A stage that decides, per class, which mutations to drop.
pub trait MutationInterceptor: Send + Sync {
    /// Short name used in reports and logs.
    fn name(&self) -> &'static str;

    fn interceptor_type(&self) -> InterceptorType {
        InterceptorType::Filter
    }

    /// Called before the first evaluation for `class`.
    fn begin(&mut self, _class: &ClassTree) {}

    /// Whether `mutation` should be removed.
    ///
    /// Errors abort the whole batch.
    fn is_filtered(&self, class: &ClassTree, mutation: &MutationDetails) -> Result<bool>;

    /// Name of the interceptor that removes `mutation`, if any.
    fn filtered_by(
        &self,
        class: &ClassTree,
        mutation: &MutationDetails,
    ) -> Result<Option<&'static str>> {
        Ok(self.is_filtered(class, mutation)?.then(|| self.name()))
    }

    /// Remove every filtered mutation from the batch.
    fn intercept(
        &self,
        class: &ClassTree,
        mutations: Vec<MutationDetails>,
    ) -> Result<Vec<MutationDetails>> {
        let mut kept = Vec::with_capacity(mutations.len());
        for mutation in mutations {
            if !self.is_filtered(class, &mutation)? {
                kept.push(mutation);
            }
        }
        Ok(kept)
    }

    /// Called once the class is finished.
    fn end(&mut self) {}
}
