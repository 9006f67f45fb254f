use std::collections::HashSet;

/// Listing ids already announced during this process lifetime.
/// Grows monotonically; there is no removal.
#[derive(Debug, Default)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id, returning `true` if it had not been seen before
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_first_sighting_only() {
        let mut seen = SeenSet::new();
        assert!(seen.is_empty());
        assert!(seen.insert("A"));
        assert!(!seen.insert("A"));
        assert!(seen.contains("A"));
        assert!(!seen.contains("B"));
        assert_eq!(seen.len(), 1);
    }
}
