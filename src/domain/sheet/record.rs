//! Header-keyed sheet rows

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One data row of a sheet, keyed by the sheet's header row.
///
/// Fields keep the header order. Lookups through [`Record::field`] ignore case,
/// whitespace, `_` and `-` in header names so that `State Code`, `state_code`
/// and `stateCode` all resolve to the same column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(header, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets a field, replacing an existing header with the same exact name
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(header, value);
        self
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((header, value)),
        }
    }

    /// Exact-header lookup
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value among the given header aliases, or `""`
    pub fn field(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .map(|alias| normalize_header(alias))
            .find_map(|alias| {
                self.fields
                    .iter()
                    .find(|(h, v)| normalize_header(h) == alias && !v.trim().is_empty())
                    .map(|(_, v)| v.trim())
            })
            .unwrap_or("")
    }

    /// Owned variant of [`Record::field`]
    pub fn field_string(&self, aliases: &[&str]) -> String {
        self.field(aliases).to_string()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every value is blank
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.trim().is_empty())
    }

    /// Builds a record from a JSON object, stringifying scalar values.
    ///
    /// Returns `None` for anything that isn't an object.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;

        let fields = object
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();

        Some(Self { fields })
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Canonical form of a header for alias matching
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Pairs the header row with each data row.
///
/// Short rows are padded with `""`; cells beyond the header width are dropped.
/// An empty table, or a table with only a header row, yields no records.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((headers, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|row| {
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = row.get(i).cloned().unwrap_or_default();
                    (header.clone(), value)
                })
                .collect();

            Record { fields }
        })
        .collect()
}
