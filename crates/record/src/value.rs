//! Dynamic property values.

use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::Record;

/// A dynamically typed value stored in a record property.
///
/// Covers the JSON-expressible universe; a property that was never set reads
/// as absent rather than [`Value::Null`], but the two are deliberately
/// indistinguishable to the filter and sort operators.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<Value>),
	Record(Record),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(val) => Some(*val),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(val) => Some(*val),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(val) => Some(*val),
			Value::Int(val) => Some(*val as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(val) => Some(val),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(vals) => Some(vals),
			_ => None,
		}
	}

	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Value::Record(val) => Some(val),
			_ => None,
		}
	}

	/// Coerces the value to its string form.
	///
	/// Scalars render as their literal text (`Null` as the empty string);
	/// lists and records render as their JSON text. This is the form the
	/// string-matching filter operators and lexicographic sorting observe.
	pub fn coerce_string(&self) -> String {
		match self {
			Value::Null => String::new(),
			Value::Bool(val) => val.to_string(),
			Value::Int(val) => val.to_string(),
			Value::Float(val) => val.to_string(),
			Value::String(val) => val.clone(),
			Value::List(_) | Value::Record(_) => self.to_value().to_string(),
		}
	}

	/// Converts to a plain [`serde_json::Value`], with nested record keys in
	/// ascending lexicographic order.
	pub fn to_value(&self) -> Json {
		match self {
			Value::Null => Json::Null,
			Value::Bool(val) => Json::Bool(*val),
			Value::Int(val) => Json::Number((*val).into()),
			Value::Float(val) => serde_json::Number::from_f64(*val).map_or(Json::Null, Json::Number),
			Value::String(val) => Json::String(val.clone()),
			Value::List(vals) => Json::Array(vals.iter().map(Value::to_value).collect()),
			Value::Record(val) => val.to_value(),
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_unit(),
			Value::Bool(val) => serializer.serialize_bool(*val),
			Value::Int(val) => serializer.serialize_i64(*val),
			Value::Float(val) => serializer.serialize_f64(*val),
			Value::String(val) => serializer.serialize_str(val),
			Value::List(vals) => vals.serialize(serializer),
			Value::Record(val) => val.serialize(serializer),
		}
	}
}

impl From<bool> for Value {
	fn from(val: bool) -> Self {
		Value::Bool(val)
	}
}

impl From<i64> for Value {
	fn from(val: i64) -> Self {
		Value::Int(val)
	}
}

impl From<i32> for Value {
	fn from(val: i32) -> Self {
		Value::Int(val.into())
	}
}

impl From<f64> for Value {
	fn from(val: f64) -> Self {
		Value::Float(val)
	}
}

impl From<&str> for Value {
	fn from(val: &str) -> Self {
		Value::String(val.into())
	}
}

impl From<String> for Value {
	fn from(val: String) -> Self {
		Value::String(val)
	}
}

impl From<Vec<Value>> for Value {
	fn from(vals: Vec<Value>) -> Self {
		Value::List(vals)
	}
}

impl From<Record> for Value {
	fn from(val: Record) -> Self {
		Value::Record(val)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(val: Option<T>) -> Self {
		val.map_or(Value::Null, Into::into)
	}
}

impl From<Json> for Value {
	fn from(val: Json) -> Self {
		match val {
			Json::Null => Value::Null,
			Json::Bool(val) => Value::Bool(val),
			Json::Number(num) => match num.as_i64() {
				Some(val) => Value::Int(val),
				None => Value::Float(num.as_f64().unwrap_or(f64::NAN)),
			},
			Json::String(val) => Value::String(val),
			Json::Array(vals) => Value::List(vals.into_iter().map(Value::from).collect()),
			Json::Object(map) => Value::Record(map.into_iter().map(|(key, val)| (key, Value::from(val))).collect()),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn conversions() {
		assert_eq!(Value::from(3), Value::Int(3));
		assert_eq!(Value::from("a"), Value::String("a".into()));
		assert_eq!(Value::from(None::<i64>), Value::Null);
		assert_eq!(Value::from(Some("x")), Value::String("x".into()));
	}

	#[test]
	fn coerce_string_forms() {
		assert_eq!(Value::Null.coerce_string(), "");
		assert_eq!(Value::Bool(true).coerce_string(), "true");
		assert_eq!(Value::Int(42).coerce_string(), "42");
		assert_eq!(Value::from("abc").coerce_string(), "abc");
		assert_eq!(Value::List(vec![Value::Int(1), Value::Int(2)]).coerce_string(), "[1,2]");
	}

	#[test]
	fn json_round_trip() {
		let json: Json = serde_json::from_str(r#"{"b":[1,2.5,null],"a":"x"}"#).unwrap();
		let value = Value::from(json.clone());
		assert_eq!(value.to_value(), json);
	}

	#[test]
	fn strict_equality_across_types() {
		assert_ne!(Value::Int(1), Value::String("1".into()));
		assert_ne!(Value::Null, Value::String(String::new()));
	}
}
