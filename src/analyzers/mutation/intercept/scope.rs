//! Per-class bracket around an interceptor.

use serde::Serialize;

use super::MutationInterceptor;
use crate::analyzers::mutation::MutationDetails;
use crate::bytecode::ClassTree;
use crate::core::Result;

/// RAII guard for one class's analysis.
///
/// Calls `begin` when created and `end` when dropped, whether the scope ends
/// normally, through `?`, or by panic. Holding the interceptor mutably keeps
/// it from being used for another class meanwhile.
pub struct ClassScope<'a, I: MutationInterceptor + ?Sized> {
    interceptor: &'a mut I,
    class: &'a ClassTree,
}

impl<'a, I: MutationInterceptor + ?Sized> ClassScope<'a, I> {
    /// Begin analysis of `class`.
    pub fn begin(interceptor: &'a mut I, class: &'a ClassTree) -> Self {
        interceptor.begin(class);
        Self { interceptor, class }
    }

    /// Mutations that survive the interceptor.
    pub fn intercept(&self, mutations: Vec<MutationDetails>) -> Result<Vec<MutationDetails>> {
        self.interceptor.intercept(self.class, mutations)
    }

    /// Split the batch into kept and filtered mutations.
    pub fn partition(&self, mutations: Vec<MutationDetails>) -> Result<FilterResult> {
        let mut kept = Vec::new();
        let mut filtered = Vec::new();

        for mutation in mutations {
            match self.interceptor.filtered_by(self.class, &mutation)? {
                Some(filter) => {
                    tracing::debug!("{} filtered {}", filter, mutation.id);
                    filtered.push(FilteredMutation {
                        mutation,
                        filter: filter.to_string(),
                    });
                }
                None => kept.push(mutation),
            }
        }

        Ok(FilterResult { kept, filtered })
    }
}

impl<I: MutationInterceptor + ?Sized> Drop for ClassScope<'_, I> {
    fn drop(&mut self) {
        self.interceptor.end();
    }
}

/// A mutation removed by a filter.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredMutation {
    /// The removed mutation.
    pub mutation: MutationDetails,
    /// Name of the filter that removed it.
    pub filter: String,
}

/// Result of filtering one batch.
#[derive(Debug, Default, Serialize)]
pub struct FilterResult {
    /// Mutations that passed every filter.
    pub kept: Vec<MutationDetails>,
    /// Mutations that were filtered out.
    pub filtered: Vec<FilteredMutation>,
}

impl FilterResult {
    /// Get the number of kept mutations.
    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }

    /// Get the number of filtered mutations.
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Fraction of mutations filtered.
    pub fn filter_rate(&self) -> f64 {
        let total = self.kept.len() + self.filtered.len();
        if total == 0 {
            return 0.0;
        }
        self.filtered.len() as f64 / total as f64
    }
}
