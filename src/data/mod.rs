use crate::geo::CountryCode;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading the member payload. A failure here leaves the
/// map inert but must not take down the rest of the application.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to parse member payload: {0}")]
    Parse(#[from] simd_json::Error),
}

/// A single published member entry, immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MemberRecord {
    pub title: String,
    pub url: String,
}

/// Wire shape of the payload. Every field defaults to empty so a partial
/// payload degrades instead of failing.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPayload {
    active_countries: Vec<String>,
    members_by_country: HashMap<String, Vec<MemberRecord>>,
    country_names: HashMap<String, String>,
}

/// Member data grouped by country, read-only after construction.
#[derive(Default)]
pub struct MapDataset {
    active: Vec<CountryCode>,
    members: BTreeMap<CountryCode, Vec<MemberRecord>>,
    names: BTreeMap<CountryCode, String>,
}

impl MapDataset {
    /// Parse the serialized payload. Malformed JSON is a hard error;
    /// individual codes that are not two ASCII letters are dropped with a
    /// debug trace.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let mut bytes = raw.as_bytes().to_vec();
        let raw: RawPayload = simd_json::serde::from_slice(&mut bytes)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawPayload) -> Self {
        let mut dataset = Self::default();

        for entry in raw.active_countries {
            match CountryCode::parse(&entry) {
                Some(code) => dataset.active.push(code),
                None => debug!(code = %entry, "dropping malformed active country code"),
            }
        }

        for (entry, records) in raw.members_by_country {
            match CountryCode::parse(&entry) {
                // Case-insensitive keys can collide after normalization.
                Some(code) => dataset.members.entry(code).or_default().extend(records),
                None => debug!(code = %entry, "dropping malformed member country code"),
            }
        }

        for (entry, name) in raw.country_names {
            match CountryCode::parse(&entry) {
                Some(code) => {
                    dataset.names.insert(code, name);
                }
                None => debug!(code = %entry, "dropping malformed country name code"),
            }
        }

        dataset
    }

    /// Countries flagged active by the producer, in payload order.
    pub fn active_countries(&self) -> &[CountryCode] {
        &self.active
    }

    /// Member records for a country; empty when the country has none.
    pub fn members(&self, code: CountryCode) -> &[MemberRecord] {
        self.members.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn member_count(&self, code: CountryCode) -> usize {
        self.members(code).len()
    }

    /// Display name for a country, if the name table has one.
    pub fn name(&self, code: CountryCode) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Countries with at least one member, code-ordered, with their display
    /// name (falling back to the code) and records. Source of the card list.
    pub fn member_countries(&self) -> impl Iterator<Item = (CountryCode, String, &[MemberRecord])> {
        self.members
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(&code, records)| {
                let name = self
                    .name(code)
                    .map(str::to_string)
                    .unwrap_or_else(|| code.to_string());
                (code, name, records.as_slice())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CountryCode {
        CountryCode::parse(raw).expect("valid test code")
    }

    const PAYLOAD: &str = r#"{
        "activeCountries": ["FR", "DE"],
        "membersByCountry": {"FR": [{"title": "Org A", "url": "/a"}]},
        "countryNames": {"FR": "France", "DE": "Germany"}
    }"#;

    #[test]
    fn parses_the_reference_payload() {
        let dataset = MapDataset::parse(PAYLOAD).expect("payload is well-formed");
        assert_eq!(dataset.active_countries(), &[code("FR"), code("DE")]);
        assert_eq!(dataset.member_count(code("FR")), 1);
        assert_eq!(dataset.member_count(code("DE")), 0);
        assert_eq!(dataset.members(code("FR"))[0].title, "Org A");
        assert_eq!(dataset.name(code("DE")), Some("Germany"));
    }

    #[test]
    fn malformed_payload_is_a_hard_error() {
        assert!(MapDataset::parse("not json").is_err());
        assert!(MapDataset::parse(r#"{"activeCountries": 7}"#).is_err());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let dataset = MapDataset::parse("{}").expect("empty object is valid");
        assert!(dataset.active_countries().is_empty());
        assert_eq!(dataset.member_countries().count(), 0);
    }

    #[test]
    fn keys_are_case_insensitive_and_merged() {
        let raw = r#"{
            "membersByCountry": {
                "fr": [{"title": "A", "url": "/a"}],
                "FR": [{"title": "B", "url": "/b"}]
            }
        }"#;
        let dataset = MapDataset::parse(raw).expect("valid payload");
        assert_eq!(dataset.member_count(code("FR")), 2);
    }

    #[test]
    fn malformed_codes_are_dropped_not_fatal() {
        let raw = r#"{
            "activeCountries": ["FR", "FRA", ""],
            "membersByCountry": {"X1": [{"title": "A", "url": "/a"}]}
        }"#;
        let dataset = MapDataset::parse(raw).expect("valid payload");
        assert_eq!(dataset.active_countries(), &[code("FR")]);
        assert_eq!(dataset.member_countries().count(), 0);
    }

    #[test]
    fn member_countries_skip_empty_and_fall_back_to_code() {
        let raw = r#"{
            "membersByCountry": {
                "FR": [{"title": "A", "url": "/a"}],
                "DE": []
            }
        }"#;
        let dataset = MapDataset::parse(raw).expect("valid payload");
        let cards: Vec<_> = dataset.member_countries().collect();
        assert_eq!(cards.len(), 1);
        // No name table entry: the raw code stands in.
        assert_eq!(cards[0].1, "FR");
    }
}
