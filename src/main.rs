//! retfilter CLI - Static equivalent-mutant filtering.

use std::fs;
use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use retfilter::analyzers::mutation::{default_registry, Analyzer};
use retfilter::cli::{Cli, Command, FilterArgs};
use retfilter::config::{Config, CONFIG_FILE};
use retfilter::core::{AnalysisContext, AnalysisUnit, Analyzer as _, Error, InputSet, Result};
use retfilter::output::{FeatureList, Format};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Init(args) = &cli.command {
        let target = cli.path.join(CONFIG_FILE);
        if target.exists() && !args.force {
            return Err(Error::InvalidArgument(format!(
                "{} already exists (use --force to overwrite)",
                target.display()
            )));
        }
        fs::write(&target, Config::default_toml())?;
        println!("Wrote {}", target.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(&cli.path)?,
    };
    if let Some(jobs) = cli.jobs {
        config.analysis.jobs = jobs;
    }

    let format = cli
        .format
        .map(Format::from)
        .unwrap_or_else(|| Format::from(config.output.format));

    match cli.command {
        Command::Filter(args) => run_filter(args, config, format),
        Command::Features(args) => {
            config.features.settings.extend(args.toggles.settings);
            let settings = config.features.parsed()?;
            let list = FeatureList(default_registry().describe(&settings)?);
            format.format(&list, &mut stdout())
        }
        Command::Init(_) => Ok(()),
    }
}

fn run_filter(args: FilterArgs, mut config: Config, format: Format) -> Result<()> {
    config.features.settings.extend(args.toggles.settings);
    config.exclude_patterns.extend(args.exclude);
    if args.hide_kept {
        config.output.show_kept = false;
    }

    let inputs = InputSet::from_paths(&args.inputs, &config)?;
    if inputs.is_empty() {
        tracing::warn!("no analysis unit files found");
    }
    let units = AnalysisUnit::load_all(&inputs)?;

    let mut analyzer = Analyzer::new();
    analyzer.configure(&config)?;
    let ctx = AnalysisContext::new(&units, &config).with_progress(|current, total| {
        tracing::debug!("filtered {current}/{total} classes");
    });
    let analysis = analyzer.analyze(&ctx)?;
    format.format(&analysis, &mut stdout())
}
