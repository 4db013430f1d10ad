//! Category vocabulary.
//!
//! A [`CategoryTable`] maps single-letter codes to human readable labels. The
//! table is built once at startup and never changes afterwards; different
//! deployments may configure different tables.

use crate::{EngineError, ResultEngine};

/// Code that introduces a recent-expenses query, so it can't name a category.
pub const QUERY_PREFIX: char = 'L';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub code: char,
    pub label: String,
}

/// Immutable, ordered code → label table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<Category>,
}

impl CategoryTable {
    /// Build a table from `(code, label)` pairs, keeping their order.
    ///
    /// Codes are normalized to uppercase. Fails when the table is empty, a
    /// code is not a single ASCII letter, a code is the reserved query
    /// prefix, or a code or label appears twice.
    pub fn new<I, C, S>(entries: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut table: Vec<Category> = Vec::new();
        for (code, label) in entries {
            let code = parse_code(code.as_ref())?;
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(EngineError::InvalidCategoryTable(format!(
                    "empty label for code '{code}'"
                )));
            }
            if table.iter().any(|c| c.code == code) {
                return Err(EngineError::InvalidCategoryTable(format!(
                    "duplicate code '{code}'"
                )));
            }
            if table.iter().any(|c| c.label == label) {
                return Err(EngineError::InvalidCategoryTable(format!(
                    "duplicate label '{label}'"
                )));
            }
            table.push(Category {
                code,
                label: label.to_string(),
            });
        }

        if table.is_empty() {
            return Err(EngineError::InvalidCategoryTable(
                "at least one category is required".to_string(),
            ));
        }

        Ok(Self { entries: table })
    }

    /// Look up a user supplied token. Only single letters can match; the
    /// comparison ignores case.
    pub fn label(&self, token: &str) -> Option<&str> {
        let mut chars = token.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let code = ch.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.label.as_str())
    }

    /// Resolve either a code or a full label (case-insensitive) to a label.
    pub fn resolve(&self, code_or_label: &str) -> Option<&str> {
        let needle = code_or_label.trim();
        self.label(needle).or_else(|| {
            self.entries
                .iter()
                .find(|c| c.label.eq_ignore_ascii_case(needle))
                .map(|c| c.label.as_str())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            entries: [
                ('F', "Food"),
                ('D', "Daily necessities"),
                ('C', "Clothing"),
                ('P', "Pet"),
                ('T', "Transportation"),
                ('U', "Utility"),
                ('I', "Internet"),
                ('O', "Others"),
            ]
            .into_iter()
            .map(|(code, label)| Category {
                code,
                label: label.to_string(),
            })
            .collect(),
        }
    }
}

fn parse_code(raw: &str) -> ResultEngine<char> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => ch.to_ascii_uppercase(),
        _ => {
            return Err(EngineError::InvalidCategoryTable(format!(
                "code '{raw}' must be a single letter"
            )));
        }
    };
    if code == QUERY_PREFIX {
        return Err(EngineError::InvalidCategoryTable(format!(
            "code '{QUERY_PREFIX}' is reserved for queries"
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_keeps_order() {
        let table = CategoryTable::default();
        let labels: Vec<_> = table.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"Food"));
        assert_eq!(labels.last(), Some(&"Others"));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn lookup_ignores_case() {
        let table = CategoryTable::default();
        assert_eq!(table.label("f"), Some("Food"));
        assert_eq!(table.label("F"), Some("Food"));
        assert_eq!(table.label("X"), None);
        assert_eq!(table.label("Fo"), None);
        assert_eq!(table.label(""), None);
    }

    #[test]
    fn resolve_accepts_labels() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve("pet"), Some("Pet"));
        assert_eq!(table.resolve("t"), Some("Transportation"));
        assert_eq!(table.resolve("Nope"), None);
    }

    #[test]
    fn codes_are_normalized() {
        let table = CategoryTable::new([("e", "Eating out")]).unwrap();
        assert_eq!(table.iter().next().map(|c| c.code), Some('E'));
    }

    #[test]
    fn rejects_invalid_tables() {
        let empty: [(&str, &str); 0] = [];
        assert!(CategoryTable::new(empty).is_err());
        assert!(CategoryTable::new([("FF", "Food")]).is_err());
        assert!(CategoryTable::new([("1", "Food")]).is_err());
        assert!(CategoryTable::new([("l", "Leisure")]).is_err());
        assert!(CategoryTable::new([("F", "Food"), ("f", "Fuel")]).is_err());
        assert!(CategoryTable::new([("F", "Food"), ("G", "Food")]).is_err());
        assert!(CategoryTable::new([("F", "  ")]).is_err());
    }
}
