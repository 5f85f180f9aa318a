use std::collections::HashMap;

use rust_decimal::Decimal;

/// Canonical form of a line item label: trimmed, inner whitespace runs
/// collapsed to one space, lower-cased.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Values of one input file, indexed by normalized key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyMap {
    values: HashMap<String, Decimal>,
}

impl KeyMap {
    pub fn new() -> KeyMap {
        KeyMap { values: HashMap::new() }
    }

    /// Stores `value` under the normalized form of `key`. A repeated key
    /// replaces the earlier value, which is returned.
    pub fn insert(&mut self, key: &str, value: Decimal) -> Option<Decimal> {
        self.values.insert(normalize(key), value)
    }

    /// Total lookup: absent keys read as zero. `key` must already be normalized.
    pub fn get_or_zero(&self, key: &str) -> Decimal {
        self.values.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Decimal)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, Decimal)>>(iter: I) -> Self {
        let mut keys = KeyMap::new();
        for (key, value) in iter {
            keys.insert(key, value);
        }
        keys
    }
}
