use getset::{CopyGetters, Getters};

use crate::consolidation::formulas::FormulaSpec;

pub const DEFAULT_DELIMITER: u8 = b',';
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Settings shared by every file of a run. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Config {
    #[getset(get_copy = "pub")]
    delimiter: u8,
    #[getset(get = "pub")]
    currency_symbol: String,
    #[getset(get = "pub")]
    formulas: FormulaSpec,
}

impl Config {
    pub fn new(formulas: FormulaSpec) -> Config {
        Config {
            delimiter: DEFAULT_DELIMITER,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            formulas,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Config {
        self.delimiter = delimiter;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Config {
        self.currency_symbol = symbol.into();
        self
    }
}
