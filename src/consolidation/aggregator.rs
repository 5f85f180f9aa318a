use getset::Getters;
use log::info;

use super::amount::format_currency;
use super::loader::load;
use super::Warning;
use crate::config::Config;

pub const FILENAME_COLUMN: &str = "Filename";

/// An input file handed over by the surrounding application.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> SourceFile {
        SourceFile {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct OutputRow {
    source_filename: String,
    values: Vec<String>,
}

impl OutputRow {
    /// Filename followed by the formatted values.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source_filename.as_str()).chain(self.values.iter().map(String::as_str))
    }
}

/// Header plus one row per processed file. Every row has as many fields as
/// the header.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ConsolidatedTable {
    header: Vec<String>,
    rows: Vec<OutputRow>,
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Consolidation {
    table: ConsolidatedTable,
    warnings: Vec<Warning>,
}

/// Builds a consolidated table one file at a time.
pub struct Aggregator<'a> {
    config: &'a Config,
    table: ConsolidatedTable,
    warnings: Vec<Warning>,
    skipped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a Config) -> Aggregator<'a> {
        let header = std::iter::once(FILENAME_COLUMN)
            .chain(config.formulas().columns())
            .map(String::from)
            .collect();

        Aggregator {
            config,
            table: ConsolidatedTable { header, rows: Vec::new() },
            warnings: Vec::new(),
            skipped: 0,
        }
    }

    /// Loads, evaluates and formats one file, appending its row.
    pub fn add_file(&mut self, file: &SourceFile) {
        info!("processing file {}", file.name);

        let (keys, line_warnings) = load(&file.contents, self.config.delimiter(), self.config.currency_symbol());
        self.warnings.extend(line_warnings.into_iter().map(|warning| Warning::Line {
            file: file.name.clone(),
            warning,
        }));

        let values = self
            .config
            .formulas()
            .evaluate(&keys)
            .into_iter()
            .map(|value| format_currency(value, self.config.currency_symbol()))
            .collect();

        self.table.rows.push(OutputRow {
            source_filename: file.name.clone(),
            values,
        });
    }

    /// Records a file the surrounding application could not read. It gets no row.
    pub fn skip_file(&mut self, warning: Warning) {
        self.skipped += 1;
        self.warnings.push(warning);
    }

    pub fn finish(self) -> Consolidation {
        info!(
            "consolidated {} file(s), skipped {}, {} warning(s)",
            self.table.rows.len(),
            self.skipped,
            self.warnings.len()
        );

        Consolidation {
            table: self.table,
            warnings: self.warnings,
        }
    }
}

/// Consolidates `files` in the given order.
pub fn aggregate<'f, I>(files: I, config: &Config) -> Consolidation
where
    I: IntoIterator<Item = &'f SourceFile>,
{
    let mut aggregator = Aggregator::new(config);
    for file in files {
        aggregator.add_file(file);
    }

    aggregator.finish()
}
