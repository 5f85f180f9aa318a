use std::collections::HashSet;
use std::fmt;
use std::slice::Iter;

use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;

use super::keys::{normalize, KeyMap};
use super::{Evaluate, FormulaError};

/// One output column definition.
#[enum_dispatch(Evaluate)]
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Direct,
    Sum,
    Difference,
}

impl Formula {
    pub fn kind(&self) -> &'static str {
        match self {
            Formula::Direct(_) => "direct",
            Formula::Sum(_) => "sum",
            Formula::Difference(_) => "difference",
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Formula::Difference(_) => " - ",
            _ => " + ",
        };
        write!(
            f,
            "{} <- {} ({})",
            self.column(),
            self.source_keys().join(operator),
            self.kind()
        )
    }
}

fn column_name(column: &str) -> Result<String, FormulaError> {
    let column = column.trim();
    if column.is_empty() {
        return Err(FormulaError::BlankColumn);
    }

    Ok(column.to_string())
}

fn source_key(column: &str, raw: &str) -> Result<String, FormulaError> {
    let key = normalize(raw);
    if key.is_empty() {
        return Err(FormulaError::BlankSourceKey {
            column: column.to_string(),
        });
    }

    Ok(key)
}

/// Copies a single input value.
#[derive(Debug, Clone, PartialEq)]
pub struct Direct {
    column: String,
    key: String,
}

impl Direct {
    pub fn new(column: &str, key: &str) -> Result<Direct, FormulaError> {
        let column = column_name(column)?;
        let key = source_key(&column, key)?;

        Ok(Direct { column, key })
    }
}

impl Evaluate for Direct {
    fn evaluate(&self, keys: &KeyMap) -> Decimal {
        keys.get_or_zero(&self.key)
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn source_keys(&self) -> Vec<&str> {
        vec![&self.key]
    }
}

/// Adds one or more input values, in listed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    column: String,
    keys: Vec<String>,
}

impl Sum {
    pub fn new(column: &str, keys: &[&str]) -> Result<Sum, FormulaError> {
        let column = column_name(column)?;
        if keys.is_empty() {
            return Err(FormulaError::NoSourceKeys { column });
        }

        let keys = keys
            .iter()
            .map(|key| source_key(&column, key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Sum { column, keys })
    }
}

impl Evaluate for Sum {
    fn evaluate(&self, keys: &KeyMap) -> Decimal {
        self.keys
            .iter()
            .fold(Decimal::ZERO, |total, key| total.saturating_add(keys.get_or_zero(key)))
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn source_keys(&self) -> Vec<&str> {
        self.keys.iter().map(String::as_str).collect()
    }
}

/// `minuend - subtrahend`.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    column: String,
    minuend: String,
    subtrahend: String,
}

impl Difference {
    pub fn new(column: &str, minuend: &str, subtrahend: &str) -> Result<Difference, FormulaError> {
        let column = column_name(column)?;
        let minuend = source_key(&column, minuend)?;
        let subtrahend = source_key(&column, subtrahend)?;

        Ok(Difference {
            column,
            minuend,
            subtrahend,
        })
    }
}

impl Evaluate for Difference {
    fn evaluate(&self, keys: &KeyMap) -> Decimal {
        keys.get_or_zero(&self.minuend)
            .saturating_sub(keys.get_or_zero(&self.subtrahend))
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn source_keys(&self) -> Vec<&str> {
        vec![&self.minuend, &self.subtrahend]
    }
}

/// Ordered output columns. The order here is the order of the consolidated
/// table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaSpec {
    formulas: Vec<Formula>,
}

impl FormulaSpec {
    pub fn new(formulas: Vec<Formula>) -> Result<FormulaSpec, FormulaError> {
        let mut seen = HashSet::new();
        for formula in &formulas {
            if !seen.insert(formula.column()) {
                return Err(FormulaError::DuplicateColumn {
                    column: formula.column().to_string(),
                });
            }
        }

        Ok(FormulaSpec { formulas })
    }

    /// Columns of the consolidated property financial statement report.
    pub fn financial_statements() -> Result<FormulaSpec, FormulaError> {
        FormulaSpec::new(vec![
            Direct::new("Total Operating Income", "total operating income")?.into(),
            Direct::new("Total Operating Expense", "total operating expense")?.into(),
            Direct::new("Net Operating Income", "noi - net operating income")?.into(),
            Direct::new("Net Income", "net income")?.into(),
            Sum::new("Total Current Assets", &["total cash", "total other current assets"])?.into(),
            Direct::new("Interest Expense", "mortgage interest")?.into(),
            Direct::new("Total Assets", "total assets")?.into(),
            Difference::new("Total Current Liabilites", "total liabilities", "total security deposits")?.into(),
            Direct::new("Total Long-Term Liabilites", "total security deposits")?.into(),
            Sum::new(
                "Capital Contributions",
                &[
                    "owner contribution",
                    "owner contribution - owner 1",
                    "owner contribution - owner 2",
                ],
            )?
            .into(),
            Sum::new(
                "Capital Distributions",
                &["owner distribution - owner 1", "owner distribution - owner 2"],
            )?
            .into(),
            Direct::new("Retained Earnings", "calculated retained earnings")?.into(),
            Direct::new("Total Owners' Equity", "total capital")?.into(),
        ])
    }

    /// One value per formula, in table order.
    pub fn evaluate(&self, keys: &KeyMap) -> Vec<Decimal> {
        self.formulas.iter().map(|formula| formula.evaluate(keys)).collect()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.formulas.iter().map(|formula| formula.column()).collect()
    }

    pub fn iter(&self) -> Iter<'_, Formula> {
        self.formulas.iter()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}
