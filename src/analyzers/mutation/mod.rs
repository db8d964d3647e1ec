//! Mutation filtering analyzer.
//!
//! Takes the mutations a mutant generator produced for each class and removes
//! the ones that cannot change behavior before anybody spends time running
//! tests against them.
//!
//! # Overview
//!
//! Filtering is organized as a chain of interceptors built from the
//! [`FeatureRegistry`](intercept::FeatureRegistry). Each feature is switched
//! on or off by name (`+FRETEQUIV`, `-FRETEQUIV`); the chain holds one fresh
//! interceptor per enabled feature and is rebuilt for every class.
//!
//! **Filter rate** = Filtered / (Kept + Filtered)
//!
//! # Lifecycle
//!
//! Every class is bracketed by a [`ClassScope`](intercept::ClassScope), which
//! calls the chain's `end` hook on every exit path, errors included.

pub mod equivalent;
pub mod intercept;
mod mutant;
mod mutator;

pub use equivalent::EquivalentReturnsFactory;
pub use mutant::{MutationDetails, MutationId};
pub use mutator::{MutatorKind, MUTATOR_PACKAGE};

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::{
    AnalysisContext, AnalysisUnit, Analyzer as AnalyzerTrait, Elapsed, Error, Result,
};
use intercept::{ClassScope, FeatureRegistry, FeatureSetting, FilterResult, FilteredMutation};

/// Registry holding every interceptor feature this crate provides.
pub fn default_registry() -> FeatureRegistry {
    let mut registry = FeatureRegistry::new();
    registry.register(Box::new(EquivalentReturnsFactory));
    registry
}

/// Mutation filtering analyzer.
pub struct Analyzer {
    /// Available interceptor features.
    registry: FeatureRegistry,
    /// Feature toggles, applied in order.
    settings: Vec<FeatureSetting>,
    /// Number of parallel workers (0 = auto-detect).
    jobs: usize,
    /// Whether retained mutations are listed in the report.
    show_kept: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer over the default registry.
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            settings: Vec::new(),
            jobs: 0,
            show_kept: true,
        }
    }

    /// Use a different feature registry.
    pub fn registry(mut self, registry: FeatureRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the feature toggles.
    pub fn settings(mut self, settings: Vec<FeatureSetting>) -> Self {
        self.settings = settings;
        self
    }

    /// Set number of parallel workers (0 = auto-detect CPU count).
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Whether to list retained mutations.
    pub fn show_kept(mut self, show: bool) -> Self {
        self.show_kept = show;
        self
    }

    fn filter_unit(&self, unit: &AnalysisUnit) -> Result<(String, FilterResult)> {
        let mut chain = self.registry.build_chain(&self.settings)?;
        tracing::debug!(
            "filtering {} mutations of {} through {:?}",
            unit.mutations.len(),
            unit.class.name(),
            chain.child_names()
        );
        let scope = ClassScope::begin(&mut chain, &unit.class);
        let result = scope.partition(unit.mutations.clone())?;
        Ok((unit.class.name().to_string(), result))
    }

    fn filter_all(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<(String, FilterResult)>> {
        let total = ctx.units.len();
        let counter = AtomicUsize::new(0);

        ctx.units
            .par_iter()
            .map(|unit| {
                let result = self.filter_unit(unit);
                let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
                ctx.report_progress(current, total);
                result
            })
            .collect()
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "mutation"
    }

    fn description(&self) -> &'static str {
        "Filter mutations that are equivalent to the unmutated class"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let start = Instant::now();

        let enabled: Vec<String> = self
            .registry
            .enabled(&self.settings)?
            .iter()
            .map(|factory| factory.provides().name.to_string())
            .collect();

        let results = if self.jobs == 0 {
            self.filter_all(ctx)?
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| Error::InvalidArgument(format!("cannot start workers: {e}")))?
                .install(|| self.filter_all(ctx))?
        };

        let summary = build_summary(&results, enabled, Elapsed(start.elapsed()));
        let classes = results
            .into_iter()
            .map(|(class, result)| ClassResult::new(class, result, self.show_kept))
            .collect();
        tracing::info!(
            "{} of {} mutations filtered across {} classes",
            summary.filtered,
            summary.total_mutations,
            summary.total_classes
        );

        Ok(Analysis { classes, summary })
    }

    fn configure(&mut self, config: &Config) -> Result<()> {
        self.settings = config.features.parsed()?;
        self.jobs = config.analysis.jobs;
        self.show_kept = config.output.show_kept;
        Ok(())
    }
}

/// Mutation filtering result.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Per-class results.
    pub classes: Vec<ClassResult>,
    /// Summary statistics.
    pub summary: Summary,
}

/// Per-class filtering result.
#[derive(Debug, Clone, Serialize)]
pub struct ClassResult {
    /// Internal class name.
    pub class: String,
    /// Number of mutations that survived filtering.
    pub kept_count: usize,
    /// Number of mutations filtered out.
    pub filtered_count: usize,
    /// Filtered / total for this class.
    pub filter_rate: f64,
    /// Mutations that survived filtering.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kept: Vec<MutationDetails>,
    /// Mutations filtered out, with the filter responsible.
    pub filtered: Vec<FilteredMutation>,
}

impl ClassResult {
    fn new(class: String, result: FilterResult, show_kept: bool) -> Self {
        Self {
            class,
            kept_count: result.kept_count(),
            filtered_count: result.filtered_count(),
            filter_rate: result.filter_rate(),
            kept: if show_kept { result.kept } else { Vec::new() },
            filtered: result.filtered,
        }
    }
}

/// Summary statistics for mutation filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Total classes analyzed.
    pub total_classes: usize,
    /// Total mutations seen.
    pub total_mutations: usize,
    /// Mutations that survived filtering.
    pub kept: usize,
    /// Mutations filtered out.
    pub filtered: usize,
    /// Filtered / total.
    pub filter_rate: f64,
    /// Features active for the run.
    pub features: Vec<String>,
    /// Filtered mutations by filter name.
    pub by_filter: BTreeMap<String, usize>,
    /// Mutations by mutator.
    pub by_mutator: BTreeMap<String, MutatorStats>,
    /// Analysis duration in seconds.
    pub duration: Elapsed,
}

/// Statistics for a single mutator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutatorStats {
    /// Mutations from this mutator.
    pub total: usize,
    /// Of those, filtered out.
    pub filtered: usize,
}

/// Build summary from per-class filter results.
fn build_summary(
    results: &[(String, FilterResult)],
    features: Vec<String>,
    duration: Elapsed,
) -> Summary {
    let mut summary = Summary {
        total_classes: results.len(),
        total_mutations: 0,
        kept: 0,
        filtered: 0,
        filter_rate: 0.0,
        features,
        by_filter: BTreeMap::new(),
        by_mutator: BTreeMap::new(),
        duration,
    };

    for (_, result) in results {
        summary.kept += result.kept_count();
        summary.filtered += result.filtered_count();

        for mutation in &result.kept {
            let entry = summary
                .by_mutator
                .entry(mutation.mutator().label())
                .or_default();
            entry.total += 1;
        }

        for filtered in &result.filtered {
            *summary.by_filter.entry(filtered.filter.clone()).or_insert(0) += 1;
            let entry = summary
                .by_mutator
                .entry(filtered.mutation.mutator().label())
                .or_default();
            entry.total += 1;
            entry.filtered += 1;
        }
    }

    summary.total_mutations = summary.kept + summary.filtered;
    if summary.total_mutations > 0 {
        summary.filter_rate = summary.filtered as f64 / summary.total_mutations as f64;
    }

    summary
}
