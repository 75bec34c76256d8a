//! Collected-team bookkeeping and the win rule.

use std::collections::{BTreeMap, BTreeSet};

use super::Category;

/// Pickups a team needs before it counts as complete.
pub const PICKUPS_PER_CATEGORY: usize = 2;

/// Multiset of collected teams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    collected: Vec<Category>,
}

impl ProgressTracker {
    /// Adds one pickup. Items without a team are not counted.
    pub fn record_pickup(&mut self, category: Option<&Category>) -> bool {
        match category {
            Some(category) => {
                self.collected.push(category.clone());
                true
            }
            None => false,
        }
    }

    pub fn counts(&self) -> BTreeMap<&Category, usize> {
        let mut counts = BTreeMap::new();
        for category in &self.collected {
            *counts.entry(category).or_insert(0) += 1;
        }
        counts
    }

    pub fn count(&self, category: &Category) -> usize {
        self.collected.iter().filter(|c| *c == category).count()
    }

    pub fn total(&self) -> usize {
        self.collected.len()
    }

    pub fn collected(&self) -> &[Category] {
        &self.collected
    }

    /// True when the collected teams are exactly `all` and each was picked
    /// up at least twice. An empty `all` can never be won.
    pub fn is_won(&self, all: &BTreeSet<Category>) -> bool {
        if all.is_empty() {
            return false;
        }
        let counts = self.counts();
        counts.len() == all.len()
            && counts.keys().all(|category| all.contains(*category))
            && counts
                .values()
                .all(|&count| count >= PICKUPS_PER_CATEGORY)
    }

    pub fn reset(&mut self) {
        self.collected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(names: &[&str]) -> BTreeSet<Category> {
        names.iter().map(|name| Category::new(*name)).collect()
    }

    fn collect(names: &[&str]) -> ProgressTracker {
        let mut tracker = ProgressTracker::default();
        for name in names {
            tracker.record_pickup(Some(&Category::new(*name)));
        }
        tracker
    }

    #[test]
    fn test_one_short_is_not_won() {
        assert!(!collect(&["A", "B", "A"]).is_won(&teams(&["A", "B"])));
    }

    #[test]
    fn test_two_each_is_won() {
        assert!(collect(&["A", "B", "A", "B"]).is_won(&teams(&["A", "B"])));
    }

    #[test]
    fn test_missing_category_is_not_won() {
        assert!(!collect(&["A", "A", "A"]).is_won(&teams(&["A", "B"])));
    }

    #[test]
    fn test_unknown_category_is_not_won() {
        let tracker = collect(&["A", "A", "B", "B", "C", "C"]);
        assert!(!tracker.is_won(&teams(&["A", "B"])));
    }

    #[test]
    fn test_empty_catalog_is_never_won() {
        assert!(!collect(&[]).is_won(&BTreeSet::new()));
    }

    #[test]
    fn test_pickup_without_category_is_ignored() {
        let mut tracker = collect(&["A"]);
        assert!(!tracker.record_pickup(None));
        assert_eq!(tracker.total(), 1);

        assert!(tracker.record_pickup(Some(&Category::new("B"))));
        assert_eq!(tracker.total(), 2);
        assert_eq!(tracker.collected().last(), Some(&Category::new("B")));
        assert_eq!(tracker.count(&Category::new("A")), 1);
    }

    #[test]
    fn test_reset() {
        let mut tracker = collect(&["A", "B"]);
        tracker.reset();
        assert_eq!(tracker.total(), 0);
        assert!(tracker.counts().is_empty());
    }
}
