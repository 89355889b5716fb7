//! Record type definitions

use serde::{Deserialize, Serialize};

/// A bookable accommodation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    /// Opaque identifier, unique within the collection
    #[serde(rename = "_id")]
    pub id: String,
    /// Hotel chain the accommodation belongs to
    #[serde(default)]
    pub chain_name: String,
    /// Accommodation name
    #[serde(rename = "hotel_name", default)]
    pub name: String,
    /// City the accommodation is located in
    #[serde(default)]
    pub city: String,
    /// Country the accommodation is located in
    #[serde(default)]
    pub country: String,
}

/// A city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "_id")]
    pub id: String,
    /// Country name
    #[serde(rename = "country")]
    pub name: String,
    /// ISO 3166 country code
    #[serde(rename = "countryisocode", default)]
    pub iso_code: String,
}

/// Aggregated result of one search across all collections
///
/// The three sequences are always produced together; there is no partial
/// form of this payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "hotels", alias = "accommodations")]
    pub accommodations: Vec<Accommodation>,
    pub cities: Vec<City>,
    pub countries: Vec<Country>,
}

impl SearchResults {
    /// Payload for a vacuous query
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of records across all collections
    pub fn total(&self) -> usize {
        self.accommodations.len() + self.cities.len() + self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accommodation_wire_names() {
        let hotel: Accommodation = serde_json::from_value(json!({
            "_id": "h1",
            "chain_name": "Lumen",
            "hotel_name": "Grand Hotel",
            "city": "Paris",
            "country": "France"
        }))
        .unwrap();

        assert_eq!(hotel.id, "h1");
        assert_eq!(hotel.name, "Grand Hotel");
        assert_eq!(hotel.chain_name, "Lumen");
    }

    #[test]
    fn test_accommodation_optional_fields() {
        let hotel: Accommodation = serde_json::from_value(json!({
            "_id": "h2",
            "city": "Paris"
        }))
        .unwrap();

        assert_eq!(hotel.city, "Paris");
        assert_eq!(hotel.name, "");
        assert_eq!(hotel.chain_name, "");
        assert_eq!(hotel.country, "");
    }

    #[test]
    fn test_country_wire_names() {
        let country: Country = serde_json::from_value(json!({
            "_id": "fr",
            "country": "France",
            "countryisocode": "FR"
        }))
        .unwrap();

        assert_eq!(country.name, "France");
        assert_eq!(country.iso_code, "FR");
    }

    #[test]
    fn test_empty_payload_shape() {
        let payload = serde_json::to_value(SearchResults::empty()).unwrap();
        assert_eq!(
            payload,
            json!({ "hotels": [], "cities": [], "countries": [] })
        );
        assert!(SearchResults::empty().is_empty());
    }

    #[test]
    fn test_total() {
        let results = SearchResults {
            accommodations: vec![],
            cities: vec![City {
                id: "c1".to_string(),
                name: "Paris".to_string(),
            }],
            countries: vec![Country {
                id: "fr".to_string(),
                name: "France".to_string(),
                iso_code: "FR".to_string(),
            }],
        };
        assert_eq!(results.total(), 2);
        assert!(!results.is_empty());
    }
}
