//! Output formatters for filtering reports.

use std::io::Write;

use serde::Serialize;

use crate::analyzers::mutation::intercept::{FeatureStatus, FilteredMutation};
use crate::analyzers::mutation::{Analysis, MutationDetails};
use crate::config::OutputFormat;
use crate::core::Result;

/// Output format enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}

impl Format {
    pub fn format<R: Report, W: Write>(&self, report: &R, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, report)?;
                writeln!(writer)?;
                Ok(())
            }
            Format::Markdown => report.write_markdown(writer),
            Format::Text => report.write_text(writer),
        }
    }
}

/// Something that can be rendered in every output format.
///
/// JSON comes straight from the `Serialize` impl.
pub trait Report: Serialize {
    fn write_markdown(&self, writer: &mut dyn Write) -> Result<()>;
    fn write_text(&self, writer: &mut dyn Write) -> Result<()>;
}

/// Registered features, as listed by `retfilter features`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FeatureList(pub Vec<FeatureStatus>);

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn line(mutation: &MutationDetails) -> String {
    mutation
        .line
        .map_or_else(|| "-".to_string(), |line| line.to_string())
}

/// Escape a value for use inside a markdown table cell.
fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn write_table(writer: &mut dyn Write, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    write!(writer, "|")?;
    for header in headers {
        write!(writer, " {header} |")?;
    }
    writeln!(writer)?;

    write!(writer, "|")?;
    for _ in headers {
        write!(writer, " --- |")?;
    }
    writeln!(writer)?;

    for row in rows {
        write!(writer, "|")?;
        for value in row {
            write!(writer, " {} |", cell(value))?;
        }
        writeln!(writer)?;
    }

    writeln!(writer)?;
    Ok(())
}

fn filtered_row(filtered: &FilteredMutation) -> Vec<String> {
    let mutation = &filtered.mutation;
    vec![
        mutation.location().to_string(),
        mutation.instruction_index().to_string(),
        mutation.mutator().label(),
        filtered.filter.clone(),
        line(mutation),
    ]
}

fn kept_row(mutation: &MutationDetails) -> Vec<String> {
    vec![
        mutation.location().to_string(),
        mutation.instruction_index().to_string(),
        mutation.mutator().label(),
        line(mutation),
    ]
}

impl Report for Analysis {
    fn write_markdown(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "# Mutation Filtering\n")?;

        if self.classes.is_empty() {
            writeln!(writer, "_No classes analyzed_\n")?;
        } else {
            let rows: Vec<Vec<String>> = self
                .classes
                .iter()
                .map(|c| {
                    vec![
                        c.class.clone(),
                        c.kept_count.to_string(),
                        c.filtered_count.to_string(),
                        percent(c.filter_rate),
                    ]
                })
                .collect();
            write_table(writer, &["Class", "Kept", "Filtered", "Rate"], &rows)?;
        }

        let filtered: Vec<Vec<String>> = self
            .classes
            .iter()
            .flat_map(|c| c.filtered.iter().map(filtered_row))
            .collect();
        writeln!(writer, "## Filtered\n")?;
        if filtered.is_empty() {
            writeln!(writer, "_No items_\n")?;
        } else {
            write_table(
                writer,
                &["Location", "Index", "Mutator", "Filter", "Line"],
                &filtered,
            )?;
        }

        let kept: Vec<Vec<String>> = self
            .classes
            .iter()
            .flat_map(|c| c.kept.iter().map(kept_row))
            .collect();
        if !kept.is_empty() {
            writeln!(writer, "## Kept\n")?;
            write_table(writer, &["Location", "Index", "Mutator", "Line"], &kept)?;
        }

        let s = &self.summary;
        writeln!(writer, "## Summary\n")?;
        writeln!(writer, "**Classes**: {}\n", s.total_classes)?;
        writeln!(writer, "**Mutations**: {}\n", s.total_mutations)?;
        writeln!(writer, "**Kept**: {}\n", s.kept)?;
        writeln!(writer, "**Filtered**: {} ({})\n", s.filtered, percent(s.filter_rate))?;
        let features = if s.features.is_empty() {
            "-".to_string()
        } else {
            s.features.join(", ")
        };
        writeln!(writer, "**Features**: {features}\n")?;

        if !s.by_filter.is_empty() {
            writeln!(writer, "### By Filter\n")?;
            let rows: Vec<Vec<String>> = s
                .by_filter
                .iter()
                .map(|(name, count)| vec![name.clone(), count.to_string()])
                .collect();
            write_table(writer, &["Filter", "Filtered"], &rows)?;
        }

        if !s.by_mutator.is_empty() {
            writeln!(writer, "### By Mutator\n")?;
            let rows: Vec<Vec<String>> = s
                .by_mutator
                .iter()
                .map(|(name, stats)| {
                    vec![
                        name.clone(),
                        stats.total.to_string(),
                        stats.filtered.to_string(),
                    ]
                })
                .collect();
            write_table(writer, &["Mutator", "Total", "Filtered"], &rows)?;
        }

        Ok(())
    }

    fn write_text(&self, writer: &mut dyn Write) -> Result<()> {
        for class in &self.classes {
            writeln!(
                writer,
                "{}: {} kept, {} filtered",
                class.class, class.kept_count, class.filtered_count
            )?;
            for filtered in &class.filtered {
                let m = &filtered.mutation;
                writeln!(
                    writer,
                    "  filtered  {}@{} [{}] by {}",
                    m.location(),
                    m.instruction_index(),
                    m.mutator().label(),
                    filtered.filter
                )?;
            }
            for m in &class.kept {
                writeln!(
                    writer,
                    "  kept      {}@{} [{}]",
                    m.location(),
                    m.instruction_index(),
                    m.mutator().label()
                )?;
            }
        }

        let s = &self.summary;
        writeln!(writer, "Summary:")?;
        writeln!(writer, "  Classes: {}", s.total_classes)?;
        writeln!(writer, "  Mutations: {}", s.total_mutations)?;
        writeln!(writer, "  Kept: {}", s.kept)?;
        writeln!(writer, "  Filtered: {} ({})", s.filtered, percent(s.filter_rate))?;
        writeln!(writer, "  Features: {}", s.features.join(", "))?;
        if !s.by_filter.is_empty() {
            writeln!(writer, "  By Filter:")?;
            for (name, count) in &s.by_filter {
                writeln!(writer, "    {name}: {count}")?;
            }
        }
        writeln!(writer, "  Duration: {:.3}s", s.duration.0.as_secs_f64())?;
        Ok(())
    }
}

impl Report for FeatureList {
    fn write_markdown(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "# Features\n")?;
        if self.0.is_empty() {
            writeln!(writer, "_No items_\n")?;
            return Ok(());
        }
        let rows: Vec<Vec<String>> = self
            .0
            .iter()
            .map(|status| {
                vec![
                    status.feature.name.to_string(),
                    on_off(status.enabled).to_string(),
                    on_off(status.feature.on_by_default).to_string(),
                    status.factory.to_string(),
                    status.feature.description.to_string(),
                ]
            })
            .collect();
        write_table(
            writer,
            &["Feature", "Enabled", "Default", "Factory", "Description"],
            &rows,
        )
    }

    fn write_text(&self, writer: &mut dyn Write) -> Result<()> {
        for status in &self.0 {
            writeln!(
                writer,
                "{} [{}] (default {}) {}",
                status.feature.name,
                on_off(status.enabled),
                on_off(status.feature.on_by_default),
                status.factory
            )?;
            if !status.feature.description.is_empty() {
                writeln!(writer, "  {}", status.feature.description)?;
            }
        }
        Ok(())
    }
}
