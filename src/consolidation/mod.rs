use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod aggregator;
pub mod amount;
pub mod formulas;
pub mod keys;
pub mod loader;


use formulas::{Difference, Direct, Formula, Sum};
use keys::KeyMap;

/// A formula table that cannot be evaluated. Raised while the configuration
/// is being built, before any input file is touched.
#[derive(Debug, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula has an empty output column name")]
    BlankColumn,
    #[error("formula '{column}' references no source keys")]
    NoSourceKeys { column: String },
    #[error("formula '{column}' references a blank source key")]
    BlankSourceKey { column: String },
    #[error("output column '{column}' is defined more than once")]
    DuplicateColumn { column: String },
}

/// Problems found on a single line of an input file. None of them stop the
/// file from being processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineWarning {
    #[error("line {line}: expected 2 fields, found {fields}")]
    MalformedLine { line: u64, fields: usize },
    #[error("line {line}: key is empty")]
    EmptyKey { line: u64 },
    #[error("line {line}: value '{value}' for '{key}' is not a number, using 0.00")]
    UnparsableValue { line: u64, key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("{file}: {warning}")]
    Line { file: String, warning: LineWarning },
    #[error("{file}: could not be read, skipped ({reason})")]
    FileUnreadable { file: String, reason: String },
}

#[enum_dispatch]
pub trait Evaluate {
    /// Computes the column value. Keys missing from `keys` count as zero.
    fn evaluate(&self, keys: &KeyMap) -> Decimal;

    fn column(&self) -> &str;
    fn source_keys(&self) -> Vec<&str>;
}
