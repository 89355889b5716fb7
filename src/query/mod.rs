//! Predicate building
//!
//! Turns a raw query string into one match predicate per collection. Each
//! predicate is an OR over the collection's matched fields, where a field
//! matches if it contains the query as a case-insensitive literal substring.
//!
//! - Accommodations: `hotel_name`, `chain_name`, `city`, `country`
//! - Cities: `name`
//! - Countries: `country`

use crate::store::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A searchable record collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Hotels,
    Cities,
    Countries,
}

impl Collection {
    /// All collections in dispatch order
    pub const ALL: [Collection; 3] = [Self::Hotels, Self::Cities, Self::Countries];

    /// Collection (and table) name
    pub fn name(self) -> &'static str {
        match self {
            Self::Hotels => "hotels",
            Self::Cities => "cities",
            Self::Countries => "countries",
        }
    }

    /// Document fields a query is matched against
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Hotels => &["hotel_name", "chain_name", "city", "country"],
            Self::Cities => &["name"],
            Self::Countries => &["country"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Match rule for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    collection: Collection,
    /// Literal query text; `None` matches nothing
    needle: Option<String>,
    /// Case-folded needle, matched in process and bound by backends
    folded: String,
}

impl Predicate {
    /// Predicate matching `needle` on every field of `collection`
    pub fn new(collection: Collection, needle: &str) -> Self {
        if needle.is_empty() {
            return Self::match_none(collection);
        }

        Self {
            collection,
            needle: Some(needle.to_string()),
            folded: needle.to_lowercase(),
        }
    }

    /// Sentinel predicate for a vacuous query
    pub fn match_none(collection: Collection) -> Self {
        Self {
            collection,
            needle: None,
            folded: String::new(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.collection.fields()
    }

    /// The needle after Unicode lowercasing; empty for match-none
    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_match_none(&self) -> bool {
        self.needle.is_none()
    }

    /// Evaluate the predicate against a stored document
    ///
    /// Missing fields and non-string values never match.
    pub fn matches(&self, document: &Document) -> bool {
        if self.is_match_none() {
            return false;
        }

        self.fields().iter().any(|field| {
            document
                .get(*field)
                .and_then(|value| value.as_str())
                .map(|value| value.to_lowercase().contains(&self.folded))
                .unwrap_or(false)
        })
    }
}

/// One predicate per collection, built once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicates {
    pub accommodations: Predicate,
    pub cities: Predicate,
    pub countries: Predicate,
}

/// Build the per-collection predicates for a raw query
///
/// The query is used verbatim; an empty string yields match-none predicates.
pub fn build_predicates(query: &str) -> Predicates {
    Predicates {
        accommodations: Predicate::new(Collection::Hotels, query),
        cities: Predicate::new(Collection::Cities, query),
        countries: Predicate::new(Collection::Countries, query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let predicates = build_predicates("");
        assert!(predicates.accommodations.is_match_none());
        assert!(predicates.cities.is_match_none());
        assert!(predicates.countries.is_match_none());

        let city = doc(json!({ "_id": "c1", "name": "Paris" }));
        assert!(!predicates.cities.matches(&city));
    }

    #[test]
    fn test_whitespace_is_literal() {
        let predicates = build_predicates(" ");
        assert!(!predicates.cities.is_match_none());

        let city = doc(json!({ "_id": "c1", "name": "New York" }));
        assert!(predicates.cities.matches(&city));
        let city = doc(json!({ "_id": "c2", "name": "Paris" }));
        assert!(!predicates.cities.matches(&city));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let city = doc(json!({ "_id": "c1", "name": "Paris" }));
        assert!(Predicate::new(Collection::Cities, "par").matches(&city));
        assert!(Predicate::new(Collection::Cities, "PARIS").matches(&city));
        assert!(Predicate::new(Collection::Cities, "ari").matches(&city));
        assert!(!Predicate::new(Collection::Cities, "parisian").matches(&city));
    }

    #[test]
    fn test_accommodation_fields_or() {
        let hotel = doc(json!({
            "_id": "h1",
            "chain_name": "Lumen Hotels",
            "hotel_name": "Grand Hotel",
            "city": "Paris",
            "country": "France"
        }));

        for needle in ["grand", "lumen", "paris", "france"] {
            assert!(
                Predicate::new(Collection::Hotels, needle).matches(&hotel),
                "expected {needle} to match"
            );
        }
        assert!(!Predicate::new(Collection::Hotels, "berlin").matches(&hotel));
    }

    #[test]
    fn test_unlisted_fields_are_ignored() {
        let country = doc(json!({ "_id": "fr", "country": "France", "countryisocode": "FR" }));
        assert!(!Predicate::new(Collection::Countries, "fr ").matches(&country));
        assert!(!Predicate::new(Collection::Countries, "_id").matches(&country));

        let with_iso_only = doc(json!({ "_id": "xx", "country": "Germany", "countryisocode": "DE" }));
        assert!(!Predicate::new(Collection::Countries, "de").matches(&with_iso_only));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let hotel = doc(json!({ "_id": "h1", "hotel_name": "Hotel (Old Town)" }));
        assert!(Predicate::new(Collection::Hotels, "(old").matches(&hotel));
        assert!(!Predicate::new(Collection::Hotels, "h.tel").matches(&hotel));
        assert!(!Predicate::new(Collection::Hotels, ".*").matches(&hotel));
    }

    #[test]
    fn test_missing_and_non_string_fields() {
        let city = doc(json!({ "_id": "c1", "name": 42 }));
        assert!(!Predicate::new(Collection::Cities, "4").matches(&city));

        let city = doc(json!({ "_id": "c2" }));
        assert!(!Predicate::new(Collection::Cities, "c").matches(&city));
    }

    #[test]
    fn test_collection_table() {
        assert_eq!(Collection::Hotels.name(), "hotels");
        assert_eq!(Collection::Hotels.fields().len(), 4);
        assert_eq!(Collection::Cities.fields(), &["name"]);
        assert_eq!(Collection::Countries.fields(), &["country"]);
        assert_eq!(Collection::ALL.len(), 3);
    }
}
