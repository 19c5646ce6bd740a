//! Identity lookup data structures.
//!
//! This module defines the response shapes of the IP resolution service and the
//! geolocation/network profile returned by the geolocation service.

use serde::{Deserialize, Deserializer, Serialize};

/// Response of the public IP resolution endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IpResponse {
    /// Public IP address
    pub ip: String,
}

/// Country flag representations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    /// URL of a flag image
    pub img: Option<String>,
    /// Flag emoji
    pub emoji: Option<String>,
    /// Flag emoji as Unicode code points
    pub emoji_unicode: Option<String>,
}

/// Network operator of the looked-up address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    /// Autonomous system number
    pub asn: Option<u64>,
    /// Organization owning the address block
    pub org: Option<String>,
    /// Internet service provider
    pub isp: Option<String>,
    /// Operator domain
    pub domain: Option<String>,
}

/// Timezone of the looked-up address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timezone {
    /// IANA timezone id, e.g. "Africa/Nairobi"
    pub id: Option<String>,
    /// Abbreviation, e.g. "EAT"
    pub abbr: Option<String>,
    /// Whether daylight saving time is in effect
    pub is_dst: Option<bool>,
    /// UTC offset in seconds
    pub offset: Option<i64>,
    /// UTC offset as text, e.g. "-05:00"
    pub utc: Option<String>,
    /// Current local time at the address
    pub current_time: Option<String>,
}

/// Geolocation and network profile for one IP address.
///
/// Every field is optional; the geolocation service omits fields it cannot
/// resolve and reports logical failures with `success: false` plus `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoProfile {
    /// Looked-up IP address
    pub ip: Option<String>,
    /// Lookup-success flag reported by the service
    pub success: Option<bool>,
    /// Failure reason when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Address family, e.g. "IPv4"
    #[serde(rename = "type")]
    pub ip_type: Option<String>,
    /// Continent name
    pub continent: Option<String>,
    /// Two-letter continent code
    pub continent_code: Option<String>,
    /// Country name
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country_code: Option<String>,
    /// Region or state name
    pub region: Option<String>,
    /// Region code
    pub region_code: Option<String>,
    /// City name
    pub city: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Whether the country is an EU member
    pub is_eu: Option<bool>,
    /// Postal code
    #[serde(deserialize_with = "string_or_number")]
    pub postal: Option<String>,
    /// International calling code, without "+"
    #[serde(deserialize_with = "string_or_number")]
    pub calling_code: Option<String>,
    /// Capital city of the country
    pub capital: Option<String>,
    /// Codes of bordering countries
    #[serde(deserialize_with = "border_list")]
    pub borders: Option<Vec<String>>,
    /// Country flag
    pub flag: Option<Flag>,
    /// Network operator
    pub connection: Option<Connection>,
    /// Timezone of the address
    pub timezone: Option<Timezone>,
}

impl GeoProfile {
    /// True when the service explicitly reported a failed lookup.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

/// Accepts `"1"`, `1` or `null`; some services send numeric codes as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

/// Accepts either a JSON list or a comma-separated string of country codes.
fn border_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::List(list) => list,
        Raw::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPWHO_SAMPLE: &str = r#"{
        "ip": "8.8.8.8",
        "success": true,
        "type": "IPv4",
        "continent": "North America",
        "continent_code": "NA",
        "country": "United States",
        "country_code": "US",
        "region": "California",
        "region_code": "CA",
        "city": "Mountain View",
        "latitude": 37.3860517,
        "longitude": -122.0838511,
        "is_eu": false,
        "postal": "94039",
        "calling_code": "1",
        "capital": "Washington D.C.",
        "borders": "CA,MX",
        "flag": {
            "img": "https://cdn.ipwhois.io/flags/us.svg",
            "emoji": "🇺🇸",
            "emoji_unicode": "U+1F1FA U+1F1F8"
        },
        "connection": {
            "asn": 15169,
            "org": "Google LLC",
            "isp": "Google LLC",
            "domain": "google.com"
        },
        "timezone": {
            "id": "America/Los_Angeles",
            "abbr": "PDT",
            "is_dst": true,
            "offset": -25200,
            "utc": "-07:00",
            "current_time": "2024-06-01T10:00:00-07:00"
        }
    }"#;

    #[test]
    fn test_deserialize_full_profile() {
        let profile: GeoProfile = serde_json::from_str(IPWHO_SAMPLE).expect("valid sample");
        assert_eq!(profile.ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(profile.ip_type.as_deref(), Some("IPv4"));
        assert_eq!(profile.calling_code.as_deref(), Some("1"));
        assert_eq!(
            profile.borders,
            Some(vec!["CA".to_string(), "MX".to_string()])
        );
        assert_eq!(
            profile.flag.as_ref().and_then(|f| f.emoji.as_deref()),
            Some("🇺🇸")
        );
        assert_eq!(
            profile.connection.as_ref().and_then(|c| c.asn),
            Some(15169)
        );
        assert_eq!(
            profile.timezone.as_ref().and_then(|t| t.offset),
            Some(-25200)
        );
        assert!(!profile.is_rejected());
    }

    #[test]
    fn test_deserialize_rejection() {
        let profile: GeoProfile = serde_json::from_str(
            r#"{"ip": "10.0.0.1", "success": false, "message": "Reserved range"}"#,
        )
        .expect("valid rejection");
        assert!(profile.is_rejected());
        assert_eq!(profile.message.as_deref(), Some("Reserved range"));
        assert!(profile.country.is_none());
    }

    #[test]
    fn test_deserialize_numeric_codes_and_list_borders() {
        let profile: GeoProfile = serde_json::from_str(
            r#"{"calling_code": 44, "postal": null, "borders": ["IE"]}"#,
        )
        .expect("valid profile");
        assert_eq!(profile.calling_code.as_deref(), Some("44"));
        assert!(profile.postal.is_none());
        assert_eq!(profile.borders, Some(vec!["IE".to_string()]));
    }

    #[test]
    fn test_empty_border_string() {
        let profile: GeoProfile =
            serde_json::from_str(r#"{"borders": ""}"#).expect("valid profile");
        assert_eq!(profile.borders, Some(vec![]));
    }
}
