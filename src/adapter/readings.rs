use std::collections::HashMap;

/// Latest raw value per owned entity, `None` while unknown.
///
/// The key set is fixed at construction: it is exactly the set of source entities of the adapter.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Readings(HashMap<String, Option<f64>>);

impl Readings {
    pub fn with_entities<'a>(entity_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self(entity_ids.into_iter().map(|entity_id| (entity_id.to_owned(), None)).collect())
    }

    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<f64> {
        self.0.get(entity_id).copied().flatten()
    }

    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.0.contains_key(entity_id)
    }

    /// Overwrite the value of an owned entity, returning `false` if the entity is not owned.
    pub fn set(&mut self, entity_id: &str, value: Option<f64>) -> bool {
        match self.0.get_mut(entity_id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
