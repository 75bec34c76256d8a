//! Driver to team lookup, loaded once at startup and injected into the session.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Deserialize;

use super::GameResult;

/// A team label. Collecting every team twice wins the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk layout of `drivers.json`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    drivers: Vec<DriverEntry>,
}

#[derive(Debug, Deserialize)]
struct DriverEntry {
    driver: String,
    team: String,
}

/// Immutable mapping from a normalized driver key to its team.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    teams: HashMap<String, Category>,
    categories: BTreeSet<Category>,
}

impl Catalog {
    pub fn from_entries<D, T>(entries: impl IntoIterator<Item = (D, T)>) -> Self
    where
        D: Into<String>,
        T: Into<String>,
    {
        let teams: HashMap<String, Category> = entries
            .into_iter()
            .map(|(driver, team)| (driver.into(), Category::new(team)))
            .collect();
        let categories = teams.values().cloned().collect();
        Self { teams, categories }
    }

    pub fn from_json(json: impl AsRef<[u8]>) -> GameResult<Self> {
        let file: CatalogFile = serde_json::from_slice(json.as_ref())?;
        Ok(Self::from_entries(
            file.drivers
                .into_iter()
                .map(|entry| (entry.driver, entry.team)),
        ))
    }

    /// Team of a normalized driver key, if the catalog knows it.
    pub fn category_for(&self, key: &str) -> Option<&Category> {
        self.teams.get(key)
    }

    /// Every distinct team in the catalog.
    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Catalog key for an asset token: the token with trailing ASCII digits removed.
///
/// `"verstappen3"` and `"verstappen"` share the key `"verstappen"`.
pub fn normalize(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameError;

    #[test]
    fn test_normalize_strips_trailing_digits() {
        assert_eq!(normalize("verstappen3"), "verstappen");
        assert_eq!(normalize("norris12"), "norris");
        assert_eq!(normalize("hamilton"), "hamilton");
        assert_eq!(normalize("car44x"), "car44x");
        assert_eq!(normalize("42"), "");
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"{"drivers": [
                {"driver": "verstappen", "team": "redbull"},
                {"driver": "perez", "team": "redbull"},
                {"driver": "norris", "team": "mclaren"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(
            catalog.category_for("perez"),
            Some(&Category::new("redbull"))
        );
        assert_eq!(catalog.category_for("toto"), None);
    }

    #[test]
    fn test_malformed_json() {
        let result = Catalog::from_json(r#"{"pilots": []}"#);
        assert!(matches!(result, Err(GameError::CatalogFormat(_))));
    }
}
