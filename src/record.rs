//! The normalized visitor record.
//!
//! A [`VisitorRecord`] is assembled exactly once per dispatch by [`merge`] from
//! the (optional) geolocation profile and the local context snapshot. It has no
//! setters; consumers only ever see it by shared reference.

use serde::Serialize;

use crate::context::ContextSnapshot;
use crate::identity::{Connection, Flag, GeoProfile, Timezone};

/// Everything known about one visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitorRecord {
    // Network
    /// Public IP address
    pub ip: Option<String>,
    /// Lookup-success flag reported by the service
    pub success: Option<bool>,
    /// Address family, e.g. "IPv4"
    #[serde(rename = "type")]
    pub ip_type: Option<String>,

    // Geolocation
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
    pub postal: Option<String>,
    /// International calling code, without "+"
    pub calling_code: Option<String>,
    /// Capital city of the country
    pub capital: Option<String>,
    /// Codes of bordering countries
    pub borders: Option<Vec<String>>,
    /// Country flag
    pub flag: Option<Flag>,
    /// Network operator
    pub connection: Option<Connection>,
    /// Timezone of the address
    pub timezone: Option<Timezone>,

    // Device
    /// Device label, e.g. "Apple iPhone" or "Desktop"
    pub device: Option<String>,
    /// "name version" of the browser
    pub browser: Option<String>,
    /// "name version" of the operating system
    pub os: Option<String>,

    // Page
    /// Path of the visited page
    pub page: Option<String>,
    /// Full URL of the visited page
    pub full_url: Option<String>,
    /// Referrer, or "Direct"
    pub referrer: Option<String>,
    /// Local time of the visit
    pub timestamp: Option<String>,
    /// Raw User-Agent string
    pub user_agent: Option<String>,
}

impl VisitorRecord {
    /// Emoji glyph of the country flag, if known.
    pub fn flag_emoji(&self) -> Option<&str> {
        self.flag.as_ref().and_then(|flag| flag.emoji.as_deref())
    }

    /// Connection ISP, if known.
    pub fn isp(&self) -> Option<&str> {
        self.connection.as_ref().and_then(|c| c.isp.as_deref())
    }

    /// Connection organization, if known.
    pub fn org(&self) -> Option<&str> {
        self.connection.as_ref().and_then(|c| c.org.as_deref())
    }

    /// Autonomous system number, if known.
    pub fn asn(&self) -> Option<u64> {
        self.connection.as_ref().and_then(|c| c.asn)
    }

    /// Serializes the record to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Combines the geolocation profile (if the lookups succeeded) with the local context.
pub fn merge(geo: Option<GeoProfile>, context: ContextSnapshot) -> VisitorRecord {
    let geo = geo.unwrap_or_default();
    let non_empty = |value: String| if value.is_empty() { None } else { Some(value) };

    VisitorRecord {
        ip: geo.ip,
        success: geo.success,
        ip_type: geo.ip_type,
        continent: geo.continent,
        continent_code: geo.continent_code,
        country: geo.country,
        country_code: geo.country_code,
        region: geo.region,
        region_code: geo.region_code,
        city: geo.city,
        latitude: geo.latitude,
        longitude: geo.longitude,
        is_eu: geo.is_eu,
        postal: geo.postal,
        calling_code: geo.calling_code,
        capital: geo.capital,
        borders: geo.borders,
        flag: geo.flag,
        connection: geo.connection,
        timezone: geo.timezone,
        device: Some(context.device),
        browser: context.browser,
        os: context.os,
        page: non_empty(context.page),
        full_url: non_empty(context.full_url),
        referrer: Some(context.referrer),
        timestamp: Some(context.timestamp),
        user_agent: non_empty(context.user_agent),
    }
}
