//! Serialization for Record.
//!
//! A record serializes as a flat map of its fields. The key is not part of
//! the serialized form: it identifies the row, it is not row data.
//!
//! Deserialization accepts any map; JSON scalars, arrays and objects map to
//! the matching [`Value`] variants. Strings are kept as strings, columns
//! decide whether to read them as dates.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to values")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = Record::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            record.fields.insert(key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_simple_fields() {
        let record = Record::new()
            .with_key("k1")
            .set("name", "Ada")
            .set("score", 42i64);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Ada","score":42}"#);
    }

    #[test]
    fn test_serialize_is_order_independent() {
        let a = Record::new().set("b", 1i64).set("a", 2i64);
        let b = Record::new().set("a", 2i64).set("b", 1i64);

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_deserialize_simple_fields() {
        let json = r#"{"name": "Ada", "score": 42, "ratio": 0.5, "active": false, "note": null}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.get_string("name").unwrap(), Some("Ada"));
        assert_eq!(record.get_int("score").unwrap(), Some(42));
        assert_eq!(record.get_float("ratio").unwrap(), Some(0.5));
        assert_eq!(record.get_bool("active").unwrap(), Some(false));
        assert_eq!(record.get_string("note").unwrap(), None);
        assert_eq!(record.key(), None);
    }

    #[test]
    fn test_deserialize_nested() {
        let json = r#"{"address": {"city": "Ghent"}, "tags": ["a", "b"]}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let address = record.get_record("address").unwrap().unwrap();
        assert_eq!(address.get_string("city").unwrap(), Some("Ghent"));
        assert_eq!(record.get("tags").unwrap().to_string(), "a, b");
    }

    #[test]
    fn test_deserialize_rejects_non_map() {
        let result: Result<Record, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
