//! Component-local state: an ordered map from key to an optional string value.

/// How a state write treats a matching observed attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeSync {
    /// Mirror the value onto the element attribute (removing it for `None`).
    #[default]
    Propagate,
    /// Leave the element attribute untouched.
    Skip,
}

/// Key → value entries in first-insertion order.
///
/// A present key may hold `None` (an observed attribute that is not set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    entries: Vec<(String, Option<String>)>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `key`; `None` when absent or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).flatten()
    }

    /// The raw entry: `None` when absent, `Some(None)` when null.
    pub fn entry(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Set `key`, returning the previous value.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Option<String> {
        let value = value.map(str::to_owned);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => std::mem::replace(slot, value),
            None => {
                self.entries.push((key.to_owned(), value));
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(String, Option<String>)> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
