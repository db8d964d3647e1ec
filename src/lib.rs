//! retfilter - Static equivalent-mutant filtering for mutation testing.
//!
//! A mutation testing engine creates many mutants that can never be killed
//! because they do not change what the program does. retfilter inspects the
//! instructions right before each mutated return and drops the mutants whose
//! replacement value is the value already being returned, before any test
//! runs against them.
//!
//! # Example
//!
//! ```no_run
//! use retfilter::analyzers::mutation::Analyzer as MutationAnalyzer;
//! use retfilter::config::Config;
//! use retfilter::core::{AnalysisContext, AnalysisUnit, Analyzer};
//!
//! let config = Config::default();
//! let units = AnalysisUnit::load("units.json").unwrap();
//! let ctx = AnalysisContext::new(&units, &config);
//! let analyzer = MutationAnalyzer::new();
//! let result = analyzer.analyze(&ctx).unwrap();
//! println!("Filtered {} mutations", result.summary.filtered);
//! ```

pub mod analyzers;
pub mod bytecode;
pub mod cli;
pub mod config;
pub mod core;
pub mod output;

pub use core::{AnalysisContext, Analyzer};
