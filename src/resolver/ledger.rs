/// Resolved and ignored dependency names, in the order they were first seen.
///
/// A name is recorded at most once and never in both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLedger {
    resolved: Vec<String>,
    ignored: Vec<String>,
}

impl DependencyLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names that were located and loaded.
    #[must_use]
    pub fn resolved(&self) -> &[String] {
        &self.resolved
    }

    /// Names that were skipped on purpose.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Whether `name` is in either list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.is_resolved(name) || self.is_ignored(name)
    }

    /// Whether `name` was resolved.
    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.iter().any(|entry| entry == name)
    }

    /// Whether `name` was ignored.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|entry| entry == name)
    }

    /// Records `name` as resolved. Returns `false` if the name was already recorded.
    pub fn record_resolved(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.resolved.push(name.to_string());
        true
    }

    /// Records `name` as ignored. Returns `false` if the name was already recorded.
    pub fn record_ignored(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.ignored.push(name.to_string());
        true
    }
}
