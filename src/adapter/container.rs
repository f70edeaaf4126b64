use itertools::Itertools;

use crate::adapter::{GeneratorAdapter, PowerAdapter};

/// Ordered collection of generator adapters sharing a role.
///
/// Iteration order is the registration order.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct AdapterContainer(Vec<GeneratorAdapter>);

impl AdapterContainer {
    pub fn push(&mut self, adapter: GeneratorAdapter) -> usize {
        self.0.push(adapter);
        self.0.len() - 1
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GeneratorAdapter> {
        self.0.iter().find(|adapter| adapter.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut GeneratorAdapter> {
        self.0.iter_mut().find(|adapter| adapter.key() == key)
    }

    /// Adapter at the position returned by [`AdapterContainer::push`].
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&GeneratorAdapter> {
        self.0.get(index)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut GeneratorAdapter> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratorAdapter> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(PowerAdapter::key)
    }

    #[must_use]
    pub fn source_entities_power(&self) -> Vec<&str> {
        self.0.iter().flat_map(PowerAdapter::source_entities_power).unique().collect()
    }

    #[must_use]
    pub fn source_entities_price(&self) -> Vec<&str> {
        self.0.iter().flat_map(PowerAdapter::source_entities_price).unique().collect()
    }

    #[must_use]
    pub fn source_entities_co2(&self) -> Vec<&str> {
        self.0.iter().flat_map(PowerAdapter::source_entities_co2).unique().collect()
    }
}

impl<'a> IntoIterator for &'a AdapterContainer {
    type Item = &'a GeneratorAdapter;
    type IntoIter = std::slice::Iter<'a, GeneratorAdapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
