use dashmap::DashMap;
use std::collections::HashMap;

/// Local view of which indexes exist on the engine.
///
/// Seeded from the engine's index listing at startup and afterwards only
/// changed by this process's own create and delete calls. It is never
/// re-verified, so indexes created or dropped elsewhere are not reflected.
#[derive(Debug, Default)]
pub struct IndexCatalog {
    entries: DashMap<String, bool>,
}

impl IndexCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = DashMap::new();
        for name in names {
            entries.insert(name.into(), true);
        }
        Self { entries }
    }

    pub fn contains(&self, index: &str) -> bool {
        self.entries.get(index).is_some_and(|e| *e)
    }

    pub fn mark_present(&self, index: &str) {
        self.entries.insert(index.to_string(), true);
    }

    pub fn remove(&self, index: &str) {
        self.entries.remove(index);
    }

    /// Known index names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|e| *e.value())
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| *e.value()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<HashMap<String, bool>> for IndexCatalog {
    fn from(map: HashMap<String, bool>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}
