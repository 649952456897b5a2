//! JSON <-> DataObject conversion

use crate::DataObject;

impl DataObject {
    /// Parses JSON text. Object members keep their document order.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(value.into())
    }

    /// Renders the node as JSON. Repeated mapping keys are grouped into an
    /// array under the first occurrence of the key.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DataObject::Null => serde_json::Value::Null,
            DataObject::Boolean(b) => serde_json::Value::Bool(*b),
            DataObject::Integer(i) => serde_json::Value::Number((*i).into()),
            DataObject::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataObject::String(s) => serde_json::Value::String(s.clone()),
            DataObject::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(DataObject::to_json).collect())
            }
            DataObject::Mapping(entries) => {
                let mut groups: Vec<(&str, Vec<serde_json::Value>)> = Vec::new();
                for (key, value) in entries {
                    match groups.iter_mut().find(|(k, _)| *k == key.as_str()) {
                        Some((_, values)) => values.push(value.to_json()),
                        None => groups.push((key.as_str(), vec![value.to_json()])),
                    }
                }
                let object = groups
                    .into_iter()
                    .map(|(key, mut values)| {
                        let value = if values.len() == 1 {
                            values.remove(0)
                        } else {
                            serde_json::Value::Array(values)
                        };
                        (key.to_string(), value)
                    })
                    .collect();
                serde_json::Value::Object(object)
            }
        }
    }
}

impl From<serde_json::Value> for DataObject {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataObject::Null,
            serde_json::Value::Bool(b) => DataObject::Boolean(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => DataObject::Integer(i),
                (None, Some(f)) => DataObject::Float(f),
                (None, None) => DataObject::String(n.to_string()),
            },
            serde_json::Value::String(s) => DataObject::String(s),
            serde_json::Value::Array(items) => {
                DataObject::Sequence(items.into_iter().map(DataObject::from).collect())
            }
            serde_json::Value::Object(members) => DataObject::Mapping(
                members
                    .into_iter()
                    .map(|(key, value)| (key, DataObject::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keeps_member_order_and_number_kinds() {
        let doc = DataObject::from_json_str(r#"{"z": 1, "a": 2.5, "m": "x"}"#).unwrap();
        assert_eq!(
            doc,
            DataObject::Mapping(vec![
                ("z".to_string(), DataObject::Integer(1)),
                ("a".to_string(), DataObject::Float(2.5)),
                ("m".to_string(), DataObject::String("x".to_string())),
            ])
        );
    }

    #[test]
    fn repeated_keys_render_as_array() {
        let doc = DataObject::mapping([("tag", "a"), ("tag", "b"), ("tag", "c"), ("id", "1")]);
        assert_eq!(doc.to_json(), json!({"tag": ["a", "b", "c"], "id": "1"}));
    }

    #[test]
    fn two_repeats_render_as_array() {
        let doc = DataObject::mapping([("tag", "a"), ("tag", "b")]);
        assert_eq!(doc.to_json(), json!({"tag": ["a", "b"]}));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(DataObject::from_json_str("{\"a\": ").is_err());
    }
}
