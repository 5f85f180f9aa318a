use log::debug;
use rust_decimal::Decimal;

use super::amount::parse_amount;
use super::keys::{normalize, KeyMap};
use super::LineWarning;

/// Reads the `key<delimiter>value` lines of one file.
///
/// Every line is split on its own, so a stray quote only costs its own line.
/// Lines that do not hold exactly two fields, or whose key is blank, are
/// skipped with a warning. Values that do not parse are stored as zero with
/// a warning. When a key repeats, the last value wins. Blank lines are ignored.
pub fn load(contents: &str, delimiter: u8, currency_symbol: &str) -> (KeyMap, Vec<LineWarning>) {
    let mut keys = KeyMap::new();
    let mut warnings = Vec::new();

    for (index, text) in contents.lines().enumerate() {
        let line = index as u64 + 1;
        if text.trim().is_empty() {
            continue;
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let record = match csv_reader.records().next() {
            Some(Ok(record)) => record,
            Some(Err(err)) => {
                debug!("failed to split line {}, err={}", line, err);
                warnings.push(LineWarning::MalformedLine { line, fields: 0 });
                continue;
            },
            None => continue,
        };

        if record.len() != 2 {
            warnings.push(LineWarning::MalformedLine {
                line,
                fields: record.len(),
            });
            continue;
        }

        let key = normalize(&record[0]);
        if key.is_empty() {
            warnings.push(LineWarning::EmptyKey { line });
            continue;
        }

        let value = match parse_amount(&record[1], currency_symbol) {
            Some(value) => value,
            None => {
                warnings.push(LineWarning::UnparsableValue {
                    line,
                    key: key.clone(),
                    value: record[1].trim().to_string(),
                });
                Decimal::ZERO
            },
        };

        if let Some(previous) = keys.insert(&key, value) {
            debug!("line {} overrides '{}', previous={}, new={}", line, key, previous, value);
        }
    }

    (keys, warnings)
}
