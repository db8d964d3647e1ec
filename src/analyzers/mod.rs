//! Analyzers over compiled classes and their mutations.

pub mod mutation;

// Re-export analyzer types for convenience
pub use mutation::Analyzer as MutationAnalyzer;
