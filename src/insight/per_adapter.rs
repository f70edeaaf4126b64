use std::ops::Add;

use crate::{ops::strict_sum, quantity::Zero};

/// Per-adapter values keyed by adapter key, in registration order.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct PerAdapter<T>(Vec<(String, Option<T>)>);

impl<T: Copy> PerAdapter<T> {
    /// Value of the adapter, `None` if it is unknown or the adapter is not present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.0.iter().find(|(adapter_key, _)| adapter_key == key).and_then(|(_, value)| *value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(adapter_key, _)| adapter_key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<T>)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn values(&self) -> impl Iterator<Item = Option<T>> {
        self.0.iter().map(|(_, value)| *value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Strict total: unknown if any adapter value is unknown.
    #[must_use]
    pub fn total(&self) -> Option<T>
    where
        T: Zero + Add<Output = T>,
    {
        strict_sum(self.values())
    }
}

impl<T> FromIterator<(String, Option<T>)> for PerAdapter<T> {
    fn from_iter<I: IntoIterator<Item = (String, Option<T>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
