use crate::config::FirestoreConfig;
use crate::db::{
    Direction, Document, DocumentStore, DocumentWrite, FieldTransform, Fields, Query, StoreError,
};
use crate::utils::format::parse_datetime;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Document store backed by the Firestore REST API (v1).
pub struct FirestoreStore {
    client: reqwest::Client,
    cfg: FirestoreConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorStatus,
}

#[derive(Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl FirestoreStore {
    pub fn new(cfg: FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| StoreError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { client, cfg })
    }

    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.cfg.project_id, self.cfg.database
        )
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    /// Ids come from decoded request paths, so they are pushed as escaped
    /// segments rather than formatted into the URL.
    fn document_url(&self, collection: &str, id: &str) -> Result<reqwest::Url, StoreError> {
        let mut url = reqwest::Url::parse(&self.url(&self.documents_root()))
            .map_err(|e| StoreError::Unavailable(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("base url cannot carry a path".to_string()))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cfg.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, StoreError> {
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => StoreError::from_status(&parsed.error.status, parsed.error.message),
                Err(_) => StoreError::Backend {
                    code: status.as_u16().to_string(),
                    message: body,
                },
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn commit(&self, write: Value) -> Result<(), StoreError> {
        let url = self.url(&format!("{}:commit", self.documents_root()));
        self.send(self.client.post(url).json(&json!({ "writes": [write] })))
            .await
            .map(|_| ())
    }

    fn update_write(&self, collection: &str, id: &str, write: &DocumentWrite) -> Value {
        let mut w = Map::new();
        w.insert(
            "update".to_string(),
            json!({
                "name": self.document_name(collection, id),
                "fields": encode_fields(&write.fields),
            }),
        );
        if !write.transforms.is_empty() {
            w.insert(
                "updateTransforms".to_string(),
                Value::Array(
                    write
                        .transforms
                        .iter()
                        .map(|(field, t)| encode_transform(field, t))
                        .collect(),
                ),
            );
        }
        Value::Object(w)
    }
}

/// Backtick-quotes field names that are not plain identifiers.
pub fn field_path(field: &str) -> String {
    let mut chars = field.chars();
    let simple = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn encode_transform(field: &str, transform: &FieldTransform) -> Value {
    match transform {
        FieldTransform::ServerTimestamp => json!({
            "fieldPath": field_path(field),
            "setToServerValue": "REQUEST_TIME",
        }),
        FieldTransform::Increment(by) => json!({
            "fieldPath": field_path(field),
            "increment": { "integerValue": by.to_string() },
        }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Plain JSON to the typed value representation. Timestamp wrappers become
/// `timestampValue`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => match parse_datetime(value) {
            Some(at) => json!({
                "timestampValue": at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }),
            None => json!({ "mapValue": { "fields": encode_fields(map) } }),
        },
    }
}

fn decode_timestamp(raw: &str) -> Result<Value, StoreError> {
    let at = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| StoreError::Decode(format!("timestampValue '{raw}': {e}")))?
        .with_timezone(&Utc);
    Ok(json!({
        "seconds": at.timestamp(),
        "nanoseconds": at.timestamp_subsec_nanos(),
    }))
}

/// Typed value back to plain JSON. Timestamps come back as
/// `{seconds, nanoseconds}` wrappers, geo points as `{latitude, longitude}`.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Err(StoreError::Decode(format!("untyped value: {value}")));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(Value::Bool(inner.as_bool().unwrap_or(false))),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::Decode(format!("integerValue: {inner}")))
        }
        "doubleValue" => Ok(match inner {
            Value::Number(_) => inner.clone(),
            // NaN and the infinities have no JSON representation
            _ => Value::Null,
        }),
        "timestampValue" => match inner.as_str() {
            Some(raw) => decode_timestamp(raw),
            None => Err(StoreError::Decode(format!("timestampValue: {inner}"))),
        },
        "stringValue" | "bytesValue" | "referenceValue" => {
            Ok(Value::String(inner.as_str().unwrap_or_default().to_string()))
        }
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
            "longitude": inner.get("longitude").and_then(Value::as_f64).unwrap_or(0.0),
        })),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => Ok(Value::Object(decode_fields(inner.get("fields"))?)),
        other => Err(StoreError::Decode(format!("unsupported value type '{other}'"))),
    }
}

fn decode_fields(fields: Option<&Value>) -> Result<Fields, StoreError> {
    match fields.and_then(Value::as_object) {
        Some(map) => map
            .iter()
            .map(|(k, v)| decode_value(v).map(|decoded| (k.clone(), decoded)))
            .collect(),
        None => Ok(Map::new()),
    }
}

pub fn decode_document(raw: &Value) -> Result<Document, StoreError> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode("document without a name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();
    let time = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    };

    Ok(Document {
        id,
        fields: decode_fields(raw.get("fields"))?,
        create_time: time("createTime"),
        update_time: time("updateTime"),
    })
}

pub fn structured_query(query: &Query) -> Value {
    let mut sq = Map::new();
    sq.insert(
        "from".to_string(),
        json!([{ "collectionId": query.collection }]),
    );

    let mut filters: Vec<Value> = query
        .filters
        .iter()
        .map(|(field, value)| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": field_path(field) },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            })
        })
        .collect();
    match filters.len() {
        0 => {}
        1 => {
            sq.insert("where".to_string(), filters.remove(0));
        }
        _ => {
            sq.insert(
                "where".to_string(),
                json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
            );
        }
    }

    if let Some((field, direction)) = &query.order_by {
        let direction = match direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        sq.insert(
            "orderBy".to_string(),
            json!([{ "field": { "fieldPath": field_path(field) }, "direction": direction }]),
        );
    }
    if let Some(limit) = query.limit {
        sq.insert("limit".to_string(), json!(limit));
    }

    json!({ "structuredQuery": Value::Object(sq) })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.document_url(collection, id)?;
        match self.send(self.client.get(url)).await {
            Ok(raw) => decode_document(&raw).map(Some),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let url = self.url(&format!("{}:runQuery", self.documents_root()));
        let raw = self
            .send(self.client.post(url).json(&structured_query(query)))
            .await?;
        let rows = raw.as_array().cloned().unwrap_or_default();
        debug!(
            "firestore runQuery on '{}' returned {} rows",
            query.collection,
            rows.len()
        );

        // Rows without a document only carry a readTime.
        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(decode_document)
            .collect()
    }

    async fn create(&self, collection: &str, write: DocumentWrite) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let mut w = self.update_write(collection, &id, &write);
        w["currentDocument"] = json!({ "exists": false });
        self.commit(w).await?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        write: DocumentWrite,
    ) -> Result<(), StoreError> {
        let mut w = self.update_write(collection, id, &write);
        w["updateMask"] = json!({
            "fieldPaths": write.fields.keys().map(|k| field_path(k)).collect::<Vec<_>>()
        });
        w["currentDocument"] = json!({ "exists": true });
        self.commit(w).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.commit(json!({
            "delete": self.document_name(collection, id),
            "currentDocument": { "exists": true },
        }))
        .await
    }
}
