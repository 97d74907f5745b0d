use std::collections::BTreeMap;

/// Delivery settings supplied by the caller and attached to every event read
/// with them. The reader never looks inside; it is carried through for
/// whatever later sends the report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    api_key: String,
    values: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            values: BTreeMap::new(),
        }
    }

    /// Adds an extra key/value setting, replacing any previous value for `key`.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Limits applied while parsing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum number of nested objects and arrays.
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}
