//! Conversions between plain JSON values and Firestore typed values
//!
//! Firestore wraps every value into an object that tells its type, e.g. `{"stringValue": "abc"}` or `{"integerValue": "42"}`

use serde_json::{json, Map, Number, Value};

/// Convert a plain JSON value into a Firestore value
pub fn to_firestore(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore transmits 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            let values: Vec<Value> = values.iter().map(to_firestore).collect();
            json!({ "arrayValue": { "values": values } })
        },
        Value::Object(map) => json!({ "mapValue": { "fields": fields_to_firestore(map) } }),
    }
}

/// Convert a map of plain JSON fields into a map of Firestore fields
pub fn fields_to_firestore(fields: &Map<String, Value>) -> Map<String, Value> {
    fields.iter()
        .map(|(name, value)| (name.clone(), to_firestore(value)))
        .collect()
}

/// Convert a Firestore value into a plain JSON value.
///
/// Timestamps and references are kept as their string representation, unsupported types become `null`
pub fn from_firestore(value: &Value) -> Value {
    let (kind, inner) = match value.as_object().and_then(|obj| obj.iter().next()) {
        Some(pair) => pair,
        None => {
            log::debug!("Not a Firestore value: {}", value);
            return Value::Null;
        },
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.as_bool().map_or(Value::Null, Value::Bool),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed.map_or(Value::Null, |i| Value::Number(Number::from(i)))
        },
        "doubleValue" => inner.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => {
            let values = inner.get("values")
                .and_then(|v| v.as_array())
                .map(|values| values.iter().map(from_firestore).collect())
                .unwrap_or_default();
            Value::Array(values)
        },
        "mapValue" => {
            let fields = inner.get("fields")
                .and_then(|v| v.as_object())
                .map(fields_from_firestore)
                .unwrap_or_default();
            Value::Object(fields)
        },
        other => {
            log::warn!("Unsupported Firestore value type {:?}. Ignoring it", other);
            Value::Null
        },
    }
}

/// Convert a map of Firestore fields into a map of plain JSON fields
pub fn fields_from_firestore(fields: &Map<String, Value>) -> Map<String, Value> {
    fields.iter()
        .map(|(name, value)| (name.clone(), from_firestore(value)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_fields_to_firestore() {
        let plain = json!({
            "date": "2021-07-14",
            "title": "fireworks",
            "description": "",
            "photo": null,
        });
        let converted = fields_to_firestore(plain.as_object().unwrap());
        assert_eq!(Value::Object(converted.clone()), json!({
            "date": { "stringValue": "2021-07-14" },
            "title": { "stringValue": "fireworks" },
            "description": { "stringValue": "" },
            "photo": { "nullValue": null },
        }));
        assert_eq!(Value::Object(fields_from_firestore(&converted)), plain);
    }

    #[test]
    fn nested_and_numeric_values() {
        let firestore = json!({
            "mapValue": { "fields": {
                "count": { "integerValue": "42" },
                "ratio": { "doubleValue": 0.5 },
                "tags": { "arrayValue": { "values": [ { "stringValue": "a" }, { "booleanValue": true } ] } },
                "empty": { "arrayValue": {} },
                "when": { "timestampValue": "2021-01-01T00:00:00Z" },
                "where": { "geoPointValue": { "latitude": 1.0, "longitude": 2.0 } },
            }}
        });
        assert_eq!(from_firestore(&firestore), json!({
            "count": 42,
            "ratio": 0.5,
            "tags": ["a", true],
            "empty": [],
            "when": "2021-01-01T00:00:00Z",
            "where": null,
        }));
        assert_eq!(to_firestore(&json!(42)), json!({ "integerValue": "42" }));
    }
}
