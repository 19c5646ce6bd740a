//! Built-in message formatter.
//!
//! Renders a [`VisitorRecord`] as Telegram HTML: a header banner, one line per
//! selected field (in selection order), and a footer banner. Fields without a
//! value produce no line at all.

use super::escape::escape_html;
use super::fields::Field;
use crate::config::{MESSAGE_FOOTER, MESSAGE_HEADER};
use crate::record::VisitorRecord;

/// Returns the value if it has visible content.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Renders the value portion of a field's line, escaped, or `None` when absent.
fn field_value(record: &VisitorRecord, field: Field) -> Option<String> {
    let escaped = |value: Option<&str>| present(value).map(escape_html);

    match field {
        Field::Page => escaped(record.page.as_deref()),
        Field::Ip => escaped(record.ip.as_deref()),
        Field::Country => escaped(record.country.as_deref()),
        Field::CountryCode => escaped(record.country_code.as_deref()),
        // The flag line exists only when an emoji glyph is known
        Field::Flag => present(record.flag_emoji())
            .map(|_| present(record.country.as_deref()).map(escape_html).unwrap_or_default()),
        Field::City => escaped(record.city.as_deref()),
        Field::Region => escaped(record.region.as_deref()),
        Field::RegionCode => escaped(record.region_code.as_deref()),
        Field::Continent => escaped(record.continent.as_deref()),
        Field::ContinentCode => escaped(record.continent_code.as_deref()),
        Field::Device => escaped(record.device.as_deref()),
        Field::Browser => escaped(record.browser.as_deref()),
        Field::Os => escaped(record.os.as_deref()),
        Field::Time => escaped(record.timestamp.as_deref()),
        Field::Timezone => {
            let timezone = record.timezone.as_ref()?;
            match (present(timezone.id.as_deref()), present(timezone.utc.as_deref())) {
                (Some(id), Some(utc)) => {
                    Some(format!("{} ({})", escape_html(id), escape_html(utc)))
                }
                (Some(id), None) => Some(escape_html(id)),
                (None, Some(utc)) => Some(format!("({})", escape_html(utc))),
                (None, None) => None,
            }
        }
        Field::Isp => escaped(record.isp()),
        Field::Org => escaped(record.org()),
        Field::Asn => record.asn().map(|asn| asn.to_string()),
        Field::Coordinates => match (record.latitude, record.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{}, {}", lat, lon)),
            _ => None,
        },
        Field::Postal => escaped(record.postal.as_deref()),
        Field::CallingCode => escaped(record.calling_code.as_deref())
            .map(|code| format!("+{}", code.trim_start_matches('+'))),
        Field::Location => {
            let parts: Vec<String> = [
                record.city.as_deref(),
                record.region.as_deref(),
                record.country.as_deref(),
            ]
            .into_iter()
            .filter_map(present)
            .map(escape_html)
            .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
    }
}

/// Renders one field's line (without trailing newline), or `None` when it has no value.
pub fn render_field(record: &VisitorRecord, field: Field) -> Option<String> {
    let value = field_value(record, field)?;
    let (emoji, label) = field.decoration();
    let emoji = match field {
        Field::Flag => record.flag_emoji().map(escape_html).unwrap_or_default(),
        _ => emoji.to_string(),
    };
    Some(format!("{} <b>{}:</b> {}", emoji, label, value))
}

/// Formats the record with the given ordered field selection.
///
/// Pure: the same record and selection always produce the same text.
pub fn format_message(record: &VisitorRecord, fields: &[Field]) -> String {
    let mut message = String::from(MESSAGE_HEADER);
    for line in fields.iter().filter_map(|field| render_field(record, *field)) {
        message.push_str(&line);
        message.push('\n');
    }
    message.push_str(MESSAGE_FOOTER);
    message
}
