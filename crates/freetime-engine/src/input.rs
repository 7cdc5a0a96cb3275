//! Lenient deserialization for request fields.
//!
//! Request records come from spreadsheets and form posts, so a field may hold
//! any JSON type. [`LooseValue`] accepts every shape without failing, which
//! keeps a single bad field from rejecting the whole request. Resolution in
//! [`crate::schedule`] then turns the unexpected shapes into per-record
//! diagnostics.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// Any input value, reduced to what the engine can use.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LooseValue {
    Int(i64),
    Text(String),
    List(Vec<LooseValue>),
    Null,
    /// Anything else, rendered for diagnostics.
    Other(String),
}

impl fmt::Display for LooseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseValue::Int(n) => write!(f, "{n}"),
            LooseValue::Text(s) | LooseValue::Other(s) => f.write_str(s),
            LooseValue::Null => f.write_str("null"),
            LooseValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl<'de> Deserialize<'de> for LooseValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LooseVisitor)
    }
}

struct LooseVisitor;

impl<'de> Visitor<'de> for LooseVisitor {
    type Value = LooseValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<LooseValue, E> {
        Ok(LooseValue::Other(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LooseValue, E> {
        Ok(LooseValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LooseValue, E> {
        Ok(match i64::try_from(v) {
            Ok(n) => LooseValue::Int(n),
            Err(_) => LooseValue::Other(v.to_string()),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LooseValue, E> {
        Ok(LooseValue::Other(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LooseValue, E> {
        Ok(LooseValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<LooseValue, E> {
        Ok(LooseValue::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LooseValue, E> {
        Ok(LooseValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<LooseValue, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<LooseValue, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LooseValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<LooseValue>()? {
            items.push(item);
        }
        Ok(LooseValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LooseValue, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LooseValue::Other("{...}".to_string()))
    }
}

/// `deserialize_with` for clock fields: strings pass through, anything else
/// is kept in rendered form so clock parsing reports it.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match LooseValue::deserialize(deserializer)? {
        LooseValue::Text(s) => s,
        other => other.to_string(),
    })
}
