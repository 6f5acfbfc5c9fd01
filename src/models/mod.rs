use crate::db::{Document, Fields};
use crate::utils::format::{convert_field_timestamps, parse_datetime};
use chrono::{DateTime, Utc};
use serde_json::Value;

pub mod data_model;
pub mod documentation;
pub mod order;
pub mod restaurant;
pub mod tracking;
pub mod user;

/// Maps a raw document into an entity, substituting defaults for missing
/// or mistyped fields. Mapping never fails.
pub trait FromDocument: Sized {
    fn from_document(doc: &Document) -> Self;
}

/// Converts timestamp wrappers, then maps.
pub fn normalize<T: FromDocument>(mut doc: Document) -> T {
    doc.fields = convert_field_timestamps(std::mem::take(&mut doc.fields));
    T::from_document(&doc)
}

pub fn normalize_all<T: FromDocument>(docs: Vec<Document>) -> Vec<T> {
    docs.into_iter().map(normalize).collect()
}

/// Lenient typed access to a document's field map.
pub struct FieldReader<'a> {
    fields: &'a Fields,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self { fields }
    }

    pub fn raw(&self, key: &str) -> Value {
        self.fields.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Non-blank string value.
    pub fn str(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.f64(key).unwrap_or(default)
    }

    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        match self.f64(key) {
            Some(v) if v >= 0.0 => v as u64,
            _ => default,
        }
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.f64(key).map(|v| v as i64).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            _ => default,
        }
    }

    pub fn datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        self.fields.get(key).and_then(parse_datetime)
    }
}
