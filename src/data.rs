use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Serialize;

use crate::consolidation::aggregator::{ConsolidatedTable, SourceFile};
use crate::consolidation::formulas::{Formula, FormulaSpec};
use crate::consolidation::{Evaluate, Warning};

const INPUT_EXTENSION: &str = "csv";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Serialize)]
pub struct FormulaRecord {
    pub column: String,
    pub kind: &'static str,
    pub source_keys: String,
    pub description: String,
}

impl From<&Formula> for FormulaRecord {
    fn from(formula: &Formula) -> Self {
        FormulaRecord {
            column: formula.column().to_string(),
            kind: formula.kind(),
            source_keys: formula.source_keys().join(" | "),
            description: formula.to_string(),
        }
    }
}

/// Appends `.csv` to an output path that lacks the extension.
pub fn output_path(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
    if has_extension {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(INPUT_EXTENSION);
    PathBuf::from(name)
}

/// Lists the `.csv` files of `dir`, sorted by file name. `exclude` keeps a
/// previous output file living in the same directory out of the batch.
pub fn discover_inputs(dir: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("input directory '{}' not found or is not a directory", dir.display());
    }

    let excluded = exclude.and_then(|path| path.canonicalize().ok());
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_input = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
        if !is_input {
            debug!("skipping non-csv file, path={}", path.display());
            continue;
        }

        if excluded.is_some() && path.canonicalize().ok() == excluded {
            debug!("skipping output file, path={}", path.display());
            continue;
        }

        paths.push(path);
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}

/// Reads every path. Files that cannot be read come back as warnings, in
/// place, so the caller keeps the discovery order.
pub fn read_sources(paths: &[PathBuf]) -> Vec<Result<SourceFile, Warning>> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

            match fs::read_to_string(path) {
                Ok(contents) => {
                    let contents = contents.strip_prefix(BYTE_ORDER_MARK).unwrap_or(contents.as_str()).to_string();
                    Ok(SourceFile::new(name, contents))
                },
                Err(err) => Err(Warning::FileUnreadable {
                    file: name,
                    reason: err.to_string(),
                }),
            }
        })
        .collect()
}

pub fn export_csv<W: Write>(table: &ConsolidatedTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(table.header())?;
    for row in table.rows() {
        csv_writer.write_record(row.fields())?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn export_formulas<W: Write>(formulas: &FormulaSpec, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for formula in formulas.iter() {
        let record: FormulaRecord = formula.into();
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;

    Ok(())
}
