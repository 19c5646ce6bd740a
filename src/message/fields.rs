//! Field keys recognized by the built-in formatter.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A line the built-in formatter can emit.
///
/// The string form of each variant is its snake_case key, e.g. `calling_code`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Public IP address
    Ip,
    /// "city, region, country" from the present parts
    Location,
    /// Device label
    Device,
    /// Browser name and version
    Browser,
    /// Operating system name and version
    Os,
    /// Visited page path
    Page,
    /// Local time of the visit
    Time,
    /// Timezone id and UTC offset
    Timezone,
    /// Country name
    Country,
    /// Country code
    CountryCode,
    /// City name
    City,
    /// Region name
    Region,
    /// Region code
    RegionCode,
    /// Internet service provider
    Isp,
    /// Continent name
    Continent,
    /// Continent code
    ContinentCode,
    /// Flag emoji paired with the country name
    Flag,
    /// "latitude, longitude"
    Coordinates,
    /// Postal code
    Postal,
    /// Calling code with a "+" prefix
    CallingCode,
    /// Autonomous system number
    Asn,
    /// Network organization
    Org,
}

impl Field {
    /// Emoji prefix and bold label of the field's line.
    pub(crate) fn decoration(&self) -> (&'static str, &'static str) {
        match self {
            Field::Page => ("🌐", "Page"),
            Field::Ip => ("💻", "IP"),
            Field::Country => ("🌍", "Country"),
            Field::CountryCode => ("🏳️", "Country Code"),
            Field::Flag => ("", "Flag"),
            Field::City => ("🏙️", "City"),
            Field::Region => ("📍", "Region"),
            Field::RegionCode => ("📌", "Region Code"),
            Field::Continent => ("🌎", "Continent"),
            Field::ContinentCode => ("🗺️", "Continent Code"),
            Field::Device => ("📱", "Device"),
            Field::Browser => ("🌐", "Browser"),
            Field::Os => ("⚙️", "OS"),
            Field::Time => ("⏰", "Time"),
            Field::Timezone => ("🕐", "Timezone"),
            Field::Isp => ("📡", "ISP"),
            Field::Org => ("🏢", "Organization"),
            Field::Asn => ("🔢", "ASN"),
            Field::Coordinates => ("📌", "Coordinates"),
            Field::Postal => ("📮", "Postal"),
            Field::CallingCode => ("📞", "Calling Code"),
            Field::Location => ("📍", "Location"),
        }
    }
}

/// Parses field keys, keeping their order and dropping unknown keys.
///
/// Keys are trimmed and matched case-insensitively. Empty entries are skipped.
pub fn parse_fields<'a, I>(keys: I) -> Vec<Field>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .filter_map(|key| match Field::from_str(&key.to_ascii_lowercase()) {
            Ok(field) => Some(field),
            Err(_) => {
                debug!("Ignoring unknown field key '{}'", key);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_keys_round_trip_through_strings() {
        for field in Field::iter() {
            assert_eq!(Field::from_str(field.as_ref()), Ok(field));
        }
        assert_eq!(Field::iter().count(), 22);
    }

    #[test]
    fn test_snake_case_keys() {
        assert_eq!(Field::CallingCode.as_ref(), "calling_code");
        assert_eq!(Field::ContinentCode.to_string(), "continent_code");
        assert_eq!(Field::Ip.as_ref(), "ip");
    }

    #[test]
    fn test_parse_fields_keeps_order_and_drops_unknown() {
        let fields = parse_fields(["page", " Country ", "nope", "", "isp"]);
        assert_eq!(fields, vec![Field::Page, Field::Country, Field::Isp]);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&vec![Field::RegionCode, Field::Os]).unwrap();
        assert_eq!(json, r#"["region_code","os"]"#);
        let parsed: Vec<Field> = serde_json::from_str(r#"["calling_code"]"#).unwrap();
        assert_eq!(parsed, vec![Field::CallingCode]);
    }
}
