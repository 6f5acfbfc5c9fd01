use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const NO_ADDRESS: &str = "No address provided";
pub const MAX_RATING: f64 = 5.0;

// ---------- TIMESTAMPS ---------- //

/// The wrapper shape the document store uses for timestamps.
pub fn timestamp_wrapper(at: DateTime<Utc>) -> Value {
    let mut map = Map::new();
    map.insert("seconds".to_string(), Value::from(at.timestamp()));
    map.insert(
        "nanoseconds".to_string(),
        Value::from(at.timestamp_subsec_nanos()),
    );
    Value::Object(map)
}

fn only_keys(map: &Map<String, Value>, allowed: &[&str]) -> bool {
    map.keys().all(|k| allowed.contains(&k.as_str()))
}

/// Recognises `{seconds, nanoseconds}`, `{_seconds, _nanoseconds}` and
/// `{timestampValue: "<rfc3339>"}`.
fn timestamp_from_wrapper(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if map.len() == 1 {
        if let Some(raw) = map.get("timestampValue").and_then(Value::as_str) {
            return DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    let (seconds, nanos) = if only_keys(map, &["seconds", "nanoseconds", "type"]) {
        (map.get("seconds")?, map.get("nanoseconds")?)
    } else if only_keys(map, &["_seconds", "_nanoseconds"]) {
        (map.get("_seconds")?, map.get("_nanoseconds")?)
    } else {
        return None;
    };

    let seconds = seconds.as_i64()?;
    let nanos = u32::try_from(nanos.as_u64()?).ok()?;
    DateTime::from_timestamp(seconds, nanos)
}

fn to_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Replaces every timestamp wrapper inside `value` with an RFC 3339 UTC
/// string. Values that are already strings are left as they are, so the
/// conversion is idempotent.
pub fn convert_timestamps(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(at) = timestamp_from_wrapper(&map) {
                return Value::String(to_rfc3339(at));
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, convert_timestamps(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(convert_timestamps).collect()),
        other => other,
    }
}

pub fn convert_field_timestamps(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, convert_timestamps(v)))
        .collect()
}

/// Reads an RFC 3339 string, a timestamp wrapper or epoch milliseconds.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(map) => timestamp_from_wrapper(map),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

// ---------- ADDRESSES ---------- //

const ADDRESS_PARTS: &[&[&str]] = &[
    &["street", "line1", "address"],
    &["city"],
    &["state"],
    &["zip", "zipCode", "zip_code", "postal_code", "postalCode"],
    &["country"],
];

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Best-effort display string for the heterogeneous address shapes found in
/// the `restaurants` collection. Never fails.
pub fn format_address(address: &Value) -> String {
    let formatted = match address {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => ADDRESS_PARTS
            .iter()
            .filter_map(|aliases| {
                aliases
                    .iter()
                    .find_map(|key| map.get(*key).and_then(scalar_text))
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };

    if formatted.is_empty() {
        NO_ADDRESS.to_string()
    } else {
        formatted
    }
}

// ---------- RATINGS ---------- //

pub fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

/// Five-star breakdown of a rating; `full + half + empty` is always 5.
pub fn star_rating(rating: f64) -> StarRating {
    let clamped = clamp_rating(rating);
    let full = clamped.floor() as u8;
    let half = if full < 5 && clamped - clamped.floor() >= 0.5 {
        1
    } else {
        0
    };
    StarRating {
        full,
        half,
        empty: 5 - full - half,
    }
}

// ---------- STATUS BADGES ---------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Success,
    Warning,
    Destructive,
    Secondary,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusBadge {
    pub label: String,
    pub variant: BadgeVariant,
}

fn title_case(raw: &str) -> String {
    raw.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn status_badge(status: &str) -> StatusBadge {
    let key = status.trim().to_lowercase().replace(['-', ' '], "_");
    let variant = match key.as_str() {
        "active" | "verified" | "online" | "available" | "completed" | "delivered"
        | "published" | "approved" => BadgeVariant::Success,
        "pending" | "busy" | "in_progress" | "delivering" | "processing" | "draft"
        | "review" => BadgeVariant::Warning,
        "suspended" | "cancelled" | "canceled" | "failed" | "rejected" | "banned"
        | "closed" => BadgeVariant::Destructive,
        "inactive" | "offline" | "archived" | "disabled" => BadgeVariant::Secondary,
        _ => BadgeVariant::Default,
    };
    let label = title_case(status.trim());
    StatusBadge {
        label: if label.is_empty() {
            "Unknown".to_string()
        } else {
            label
        },
        variant,
    }
}

// ---------- CURRENCY ---------- //

pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
