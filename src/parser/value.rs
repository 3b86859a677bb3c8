//! Typed argument values
//!
//! [`TypedValue`] is the universal result shape of argument materialization.
//! Extended-JSON tagged objects such as `{"$oid": "..."}` are resolved into
//! native variants before a value is handed out, so a caller only ever sees
//! the variants below.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Number;

/// A materialized argument value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    /// JSON number, integer/float distinction preserved
    Number(Number),
    Text(String),
    /// 12-byte object identifier
    Identifier(ObjectId),
    /// Point in time, millisecond precision
    Instant(DateTime<Utc>),
    Int64(i64),
    Array(Vec<TypedValue>),
    /// Object fields in source order
    Object(Vec<(String, TypedValue)>),
}

impl TypedValue {
    /// Get the string content of a `Text` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the elements of an `Array` value
    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the fields of an `Object` value
    pub fn as_object(&self) -> Option<&[(String, TypedValue)]> {
        match self {
            TypedValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field of an `Object` value by key
    ///
    /// Returns `None` for non-object values and missing keys.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.as_object()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Check whether an `Object` value has a field with the given key
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Canonical textual form of the scalar typed variants
    ///
    /// * `Identifier` - 24 lowercase hex digits
    /// * `Instant` - RFC 3339 with milliseconds and a `Z` suffix
    /// * `Int64` - decimal digits
    ///
    /// Other variants return `None`.
    pub fn canonical_string(&self) -> Option<String> {
        match self {
            TypedValue::Identifier(oid) => Some(oid.to_hex()),
            TypedValue::Instant(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            TypedValue::Int64(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Convert to relaxed extended JSON
    ///
    /// Identifiers render as `{"$oid": ...}` and instants as `{"$date": ...}`;
    /// 64-bit integers render as plain numbers.
    pub fn to_extjson(&self) -> serde_json::Value {
        Bson::from(self.clone()).into_relaxed_extjson()
    }
}

impl From<TypedValue> for Bson {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Null => Bson::Null,
            TypedValue::Bool(b) => Bson::Boolean(b),
            TypedValue::Number(n) => match n.as_i64() {
                Some(i) => Bson::Int64(i),
                None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            TypedValue::Text(s) => Bson::String(s),
            TypedValue::Identifier(oid) => Bson::ObjectId(oid),
            TypedValue::Instant(dt) => {
                Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis()))
            }
            TypedValue::Int64(n) => Bson::Int64(n),
            TypedValue::Array(items) => Bson::Array(items.into_iter().map(Bson::from).collect()),
            TypedValue::Object(fields) => {
                let mut doc = Document::new();
                for (key, value) in fields {
                    doc.insert(key, Bson::from(value));
                }
                Bson::Document(doc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn object(fields: Vec<(&str, TypedValue)>) -> TypedValue {
        TypedValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_object_lookup() {
        let value = object(vec![
            ("name", TypedValue::Text("Alice".to_string())),
            ("age", TypedValue::Number(30.into())),
        ]);

        assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert!(value.contains_key("age"));
        assert!(!value.contains_key("email"));
        assert!(TypedValue::Null.get("name").is_none());
    }

    #[test]
    fn test_canonical_strings() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(
            TypedValue::Identifier(oid).canonical_string().as_deref(),
            Some("507f1f77bcf86cd799439011")
        );

        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            TypedValue::Instant(dt).canonical_string().as_deref(),
            Some("2024-01-15T10:30:00.000Z")
        );

        assert_eq!(
            TypedValue::Int64(-42).canonical_string().as_deref(),
            Some("-42")
        );
        assert!(TypedValue::Bool(true).canonical_string().is_none());
    }

    #[test]
    fn test_to_bson_document_preserves_order() {
        let value = object(vec![
            ("z", TypedValue::Number(1.into())),
            ("a", TypedValue::Bool(false)),
            ("m", TypedValue::Null),
        ]);

        if let Bson::Document(doc) = Bson::from(value) {
            let keys: Vec<&String> = doc.keys().collect();
            assert_eq!(keys, vec!["z", "a", "m"]);
            assert_eq!(doc.get_i64("z").unwrap(), 1);
            assert!(!doc.get_bool("a").unwrap());
        } else {
            panic!("Expected document");
        }
    }

    #[test]
    fn test_to_bson_numbers() {
        let float = serde_json::Number::from_f64(1.5).unwrap();
        assert_eq!(Bson::from(TypedValue::Number(float)), Bson::Double(1.5));
        assert_eq!(Bson::from(TypedValue::Number(7.into())), Bson::Int64(7));
        assert_eq!(Bson::from(TypedValue::Int64(9)), Bson::Int64(9));
    }

    #[test]
    fn test_to_extjson() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let json = object(vec![("_id", TypedValue::Identifier(oid))]).to_extjson();
        assert_eq!(json["_id"]["$oid"], "507f1f77bcf86cd799439011");
    }
}
