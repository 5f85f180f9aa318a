use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use pretty_assertions::assert_eq;

use crate::config::Config;
use crate::consolidation::aggregator::{aggregate, SourceFile};
use crate::consolidation::formulas::{Difference, Direct, FormulaSpec};
use crate::data::*;

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_discover_inputs_sorted_csv_only() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("b.csv"), "Net Income,$1\n")?;
    fs::write(dir.path().join("a.CSV"), "Net Income,$2\n")?;
    fs::write(dir.path().join("notes.txt"), "ignored")?;
    fs::create_dir(dir.path().join("nested.csv"))?;

    let paths = discover_inputs(dir.path(), None)?;

    assert_eq!(file_names(&paths), vec!["a.CSV".to_string(), "b.csv".to_string()]);

    Ok(())
}

#[test]
fn test_discover_inputs_excludes_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("consolidated.csv");
    fs::write(dir.path().join("q1.csv"), "Net Income,$1\n")?;
    fs::write(&output, "Filename,Net Income\n")?;

    let paths = discover_inputs(dir.path(), Some(&output))?;

    assert_eq!(file_names(&paths), vec!["q1.csv".to_string()]);

    Ok(())
}

#[test]
fn test_discover_inputs_missing_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;

    if discover_inputs(&dir.path().join("missing"), None).is_ok() {
        bail!("a missing directory should be an error");
    }

    Ok(())
}

#[test]
fn test_read_sources_strips_bom_and_reports_unreadable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("good.csv");
    fs::write(&good, "\u{feff}Net Income,$5\n")?;
    let missing = dir.path().join("gone.csv");

    let sources = read_sources(&[good, missing]);

    assert_eq!(sources.len(), 2);
    match &sources[0] {
        Ok(file) => {
            assert_eq!(file.name, "good.csv");
            assert_eq!(file.contents, "Net Income,$5\n");
        },
        Err(warning) => bail!("good.csv should be readable, got {}", warning),
    }
    match &sources[1] {
        Err(warning) => assert_eq!(warning.to_string().starts_with("gone.csv: could not be read"), true),
        Ok(_) => bail!("gone.csv does not exist"),
    }

    Ok(())
}

#[test]
fn test_export_csv() -> Result<()> {
    let config = Config::new(FormulaSpec::new(vec![
        Direct::new("Net Income", "net income")?.into(),
        Difference::new("Total Current Liabilites", "total liabilities", "total security deposits")?.into(),
    ])?);
    let files = vec![
        SourceFile::new("first, quarter.csv", "Net Income,$500.00\nTotal Liabilities,\"$2,000\"\n"),
        SourceFile::new("second.csv", "Total Security Deposits,$250\n"),
    ];
    let consolidation = aggregate(&files, &config);

    let mut output = Vec::new();
    export_csv(consolidation.table(), &mut output)?;

    assert_eq!(
        String::from_utf8(output)?,
        "Filename,Net Income,Total Current Liabilites\n\
         \"first, quarter.csv\",$500.00,$2000.00\n\
         second.csv,$0.00,-$250.00\n"
    );

    Ok(())
}

#[test]
fn test_export_formulas() -> Result<()> {
    let mut output = Vec::new();
    export_formulas(&FormulaSpec::financial_statements()?, &mut output)?;
    let listing = String::from_utf8(output)?;
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(lines.len(), 14);
    assert_eq!(lines[0], "column,kind,source_keys,description");
    assert_eq!(
        lines[5],
        "Total Current Assets,sum,total cash | total other current assets,\
         Total Current Assets <- total cash + total other current assets (sum)"
    );
    assert_eq!(
        lines[8],
        "Total Current Liabilites,difference,total liabilities | total security deposits,\
         Total Current Liabilites <- total liabilities - total security deposits (difference)"
    );

    Ok(())
}

#[test]
fn test_output_path_gets_csv_extension() {
    assert_eq!(output_path(Path::new("out/consolidated")), PathBuf::from("out/consolidated.csv"));
    assert_eq!(output_path(Path::new("report.v2")), PathBuf::from("report.v2.csv"));
    assert_eq!(output_path(Path::new("summary.csv")), PathBuf::from("summary.csv"));
    assert_eq!(output_path(Path::new("SUMMARY.CSV")), PathBuf::from("SUMMARY.CSV"));
}
