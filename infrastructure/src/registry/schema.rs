//! Registry response schemas
//!
//! The v2 API nests names, locations and links in typed arrays; the older
//! v1 shape is flat. A body carrying a `names` array is read as v2,
//! anything else as v1.

use ror_domain::{NOT_AVAILABLE, OrganisationRecord, RorId, or_unavailable};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Name type marking the preferred display name in v2
const ROR_DISPLAY: &str = "ror_display";

/// Link type marking the organisation website in v2
const WEBSITE: &str = "website";

/// Explicit `null` reads as the field's default, same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `types` entry: bare string (v1) or `{ "label": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeEntry {
    Label(String),
    Object { label: Option<String> },
}

impl TypeEntry {
    fn label(&self) -> &str {
        match self {
            TypeEntry::Label(label) => label,
            TypeEntry::Object { label } => label.as_deref().unwrap_or_default(),
        }
    }
}

/// A `links` entry: bare URL (v1) or `{ "type": ..., "value": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinkEntry {
    Url(String),
    Object {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        value: Option<String>,
    },
}

impl LinkEntry {
    fn value(&self) -> Option<&str> {
        match self {
            LinkEntry::Url(value) => Some(value),
            LinkEntry::Object { value, .. } => value.as_deref(),
        }
    }

    fn is_website(&self) -> bool {
        matches!(self, LinkEntry::Object { kind: Some(k), .. } if k == WEBSITE)
    }
}

// ==================== v2 ====================

#[derive(Debug, Deserialize)]
struct V2Name {
    value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    types: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeonamesDetails {
    country_name: Option<String>,
    country_code: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V2Location {
    #[serde(default, deserialize_with = "null_as_default")]
    geonames_details: GeonamesDetails,
}

#[derive(Debug, Deserialize)]
struct V2Organization {
    names: Vec<V2Name>,
    #[serde(default, deserialize_with = "null_as_default")]
    locations: Vec<V2Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    types: Vec<TypeEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    links: Vec<LinkEntry>,
    status: Option<String>,
    established: Option<Value>,
}

impl V2Organization {
    fn into_record(self, id: RorId) -> OrganisationRecord {
        let name = self
            .names
            .iter()
            .find(|n| n.types.iter().any(|t| t == ROR_DISPLAY))
            .or_else(|| self.names.first())
            .and_then(|n| n.value.clone());
        let geo = self.locations.into_iter().next().map(|l| l.geonames_details);
        let (country, country_code, city) = match geo {
            Some(g) => (g.country_name, g.country_code, g.name),
            None => (None, None, None),
        };
        let website = self
            .links
            .iter()
            .find(|l| l.is_website())
            .or_else(|| self.links.first())
            .and_then(|l| l.value().map(str::to_string));

        let mut record = OrganisationRecord::unavailable(id);
        record.name = or_unavailable(name);
        record.country = or_unavailable(country);
        record.country_code = or_unavailable(country_code);
        record.city = or_unavailable(city);
        record.org_type = join_types(&self.types);
        record.status = or_unavailable(self.status);
        record.established = render_established(self.established);
        record.website = or_unavailable(website);
        record
    }
}

// ==================== v1 ====================

#[derive(Debug, Deserialize)]
struct V1Country {
    country_name: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V1Address {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V1Organization {
    name: Option<String>,
    country: Option<V1Country>,
    #[serde(default, deserialize_with = "null_as_default")]
    addresses: Vec<V1Address>,
    #[serde(default, deserialize_with = "null_as_default")]
    types: Vec<TypeEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    links: Vec<LinkEntry>,
    status: Option<String>,
    established: Option<Value>,
}

impl V1Organization {
    fn into_record(self, id: RorId) -> OrganisationRecord {
        let (country, country_code) = match self.country {
            Some(c) => (c.country_name, c.country_code),
            None => (None, None),
        };
        let city = self.addresses.into_iter().next().and_then(|a| a.city);
        let website = self
            .links
            .first()
            .and_then(|l| l.value().map(str::to_string));

        let mut record = OrganisationRecord::unavailable(id);
        record.name = or_unavailable(self.name);
        record.country = or_unavailable(country);
        record.country_code = or_unavailable(country_code);
        record.city = or_unavailable(city);
        record.org_type = join_types(&self.types);
        record.status = or_unavailable(self.status);
        record.established = render_established(self.established);
        record.website = or_unavailable(website);
        record
    }
}

fn join_types(types: &[TypeEntry]) -> String {
    let joined = types
        .iter()
        .map(TypeEntry::label)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    or_unavailable(Some(joined))
}

fn render_established(value: Option<Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => or_unavailable(Some(s)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Map a registry response body onto a record for `id`
pub fn parse_organisation(id: RorId, body: &str) -> Result<OrganisationRecord, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    if value.get("names").is_some_and(Value::is_array) {
        let org: V2Organization = serde_json::from_value(value)?;
        Ok(org.into_record(id))
    } else {
        let org: V1Organization = serde_json::from_value(value)?;
        Ok(org.into_record(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvard() -> RorId {
        RorId::parse("03vek6s52").unwrap()
    }

    const V2_BODY: &str = r#"{
        "id": "https://ror.org/03vek6s52",
        "names": [
            {"value": "Harvard", "types": ["acronym"], "lang": null},
            {"value": "Harvard University", "types": ["ror_display", "label"], "lang": "en"}
        ],
        "locations": [
            {"geonames_id": 4931972, "geonames_details": {
                "country_code": "US", "country_name": "United States", "name": "Cambridge"
            }}
        ],
        "types": ["education", "funder"],
        "links": [
            {"type": "wikipedia", "value": "http://en.wikipedia.org/wiki/Harvard_University"},
            {"type": "website", "value": "https://www.harvard.edu"}
        ],
        "status": "active",
        "established": 1636
    }"#;

    #[test]
    fn test_v2_mapping() {
        let record = parse_organisation(harvard(), V2_BODY).unwrap();
        assert_eq!(record.name, "Harvard University");
        assert_eq!(record.country, "United States");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.city, "Cambridge");
        assert_eq!(record.org_type, "education, funder");
        assert_eq!(record.website, "https://www.harvard.edu");
        assert_eq!(record.status, "active");
        assert_eq!(record.established, "1636");
        assert_eq!(record.url, "https://ror.org/03vek6s52");
        assert!(!record.is_placeholder());
    }

    #[test]
    fn test_v2_falls_back_to_first_name_and_link() {
        let body = r#"{
            "names": [{"value": "Acme Labs", "types": ["label"]}],
            "links": [{"type": "wikipedia", "value": "https://en.wikipedia.org/wiki/Acme"}],
            "types": [{"label": "company"}]
        }"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, "Acme Labs");
        assert_eq!(record.website, "https://en.wikipedia.org/wiki/Acme");
        assert_eq!(record.org_type, "company");
        assert_eq!(record.country, NOT_AVAILABLE);
        assert_eq!(record.status, NOT_AVAILABLE);
        assert_eq!(record.established, NOT_AVAILABLE);
    }

    #[test]
    fn test_v2_empty_collections() {
        let body = r#"{"names": [], "locations": [], "types": [], "links": [], "established": null}"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.city, NOT_AVAILABLE);
        assert_eq!(record.org_type, NOT_AVAILABLE);
        assert_eq!(record.website, NOT_AVAILABLE);
        assert_eq!(record.established, NOT_AVAILABLE);
    }

    #[test]
    fn test_v1_mapping() {
        let body = r#"{
            "id": "https://ror.org/03vek6s52",
            "name": "Harvard University",
            "country": {"country_name": "United States", "country_code": "US"},
            "addresses": [{"city": "Cambridge", "lat": 42.37}],
            "types": ["Education"],
            "links": ["http://www.harvard.edu/"],
            "status": "active",
            "established": 1636
        }"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, "Harvard University");
        assert_eq!(record.country, "United States");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.city, "Cambridge");
        assert_eq!(record.org_type, "Education");
        assert_eq!(record.website, "http://www.harvard.edu/");
        assert_eq!(record.established, "1636");
    }

    #[test]
    fn test_v1_minimal_body() {
        let record = parse_organisation(harvard(), "{}").unwrap();
        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.country, NOT_AVAILABLE);
        assert_eq!(record.website, NOT_AVAILABLE);
    }

    #[test]
    fn test_invalid_body_is_an_error() {
        assert!(parse_organisation(harvard(), "<html>oops</html>").is_err());
        assert!(parse_organisation(harvard(), r#""just a string""#).is_err());
        assert!(parse_organisation(harvard(), r#"{"names": [42]}"#).is_err());
    }

    #[test]
    fn test_v2_explicit_nulls_read_as_missing() {
        let body = r#"{
            "names": [{"value": "Acme", "types": ["ror_display"]}],
            "links": null,
            "types": null,
            "locations": [{"geonames_details": null}],
            "status": "active"
        }"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, "Acme");
        assert_eq!(record.website, NOT_AVAILABLE);
        assert_eq!(record.org_type, NOT_AVAILABLE);
        assert_eq!(record.city, NOT_AVAILABLE);
        assert_eq!(record.status, "active");

        let body = r#"{
            "names": [{"value": null, "types": null}],
            "locations": null,
            "links": [{"type": "website", "value": null}],
            "types": [{"label": null}]
        }"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.website, NOT_AVAILABLE);
        assert_eq!(record.org_type, NOT_AVAILABLE);
    }

    #[test]
    fn test_v1_explicit_nulls_read_as_missing() {
        let body = r#"{
            "name": "Acme",
            "country": null,
            "addresses": null,
            "types": null,
            "links": null,
            "status": null
        }"#;
        let record = parse_organisation(harvard(), body).unwrap();
        assert_eq!(record.name, "Acme");
        assert_eq!(record.country, NOT_AVAILABLE);
        assert_eq!(record.city, NOT_AVAILABLE);
        assert_eq!(record.website, NOT_AVAILABLE);
        assert_eq!(record.status, NOT_AVAILABLE);
    }
}
