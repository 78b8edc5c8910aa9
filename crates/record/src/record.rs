//! The ordered property bag backing every list element.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::Value;

/// An ordered bag of named properties.
///
/// Property enumeration follows insertion order, so a record built from
/// `{"b": 1, "a": 2}` iterates `b` before `a`. Serialization deliberately
/// does not: [`Record::to_value`] and the [`Serialize`] impl emit keys in
/// ascending lexicographic order, recursively, which keeps the JSON output
/// deterministic regardless of construction order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
	entries: IndexMap<String, Value>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.entries.get_mut(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Sets a property, returning the previous value if the key already
	/// existed. An existing key keeps its position in the enumeration order;
	/// a new key is appended.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.entries.insert(key.into(), value.into())
	}

	/// Removes a property, preserving the relative order of the rest.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.entries.shift_remove(key)
	}

	/// Property names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.entries.values()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Converts to a plain nested [`serde_json::Value`] mapping with keys in
	/// ascending lexicographic order at every level.
	pub fn to_value(&self) -> Json {
		let mut map = serde_json::Map::with_capacity(self.entries.len());
		for (key, value) in self.sorted_entries() {
			map.insert(key.to_owned(), value.to_value());
		}
		Json::Object(map)
	}

	/// JSON text of [`Record::to_value`].
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}

	fn sorted_entries(&self) -> Vec<(&str, &Value)> {
		let mut entries: Vec<_> = self.iter().collect();
		entries.sort_by_key(|(key, _)| *key);
		entries
	}
}

impl Serialize for Record {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in self.sorted_entries() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
		}
	}
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.entries.extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
	}
}

impl IntoIterator for Record {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl From<serde_json::Map<String, Json>> for Record {
	fn from(map: serde_json::Map<String, Json>) -> Self {
		map.into_iter().map(|(key, value)| (key, Value::from(value))).collect()
	}
}

/// Builds a [`Record`] from `key => value` pairs, in order.
///
/// ```
/// use datalist_record::{Value, record};
///
/// let rec = record! {
///     "id" => 1,
///     "name" => "first",
/// };
/// assert_eq!(rec.get("id"), Some(&Value::Int(1)));
/// ```
#[macro_export]
macro_rules! record {
	{$($key:expr => $value:expr),+ $(,)?} => {{
		let mut record = $crate::Record::new();
		$(record.insert($key, $value);)+
		record
	}};
	{} => {
		$crate::Record::new()
	};
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn insertion_order_enumeration() {
		let mut rec = Record::new();
		rec.insert("b", 1);
		rec.insert("a", 2);
		rec.insert("b", 3);
		assert_eq!(rec.keys().collect::<Vec<_>>(), ["b", "a"]);
		assert_eq!(rec.get("b"), Some(&Value::Int(3)));
	}

	#[test]
	fn remove_preserves_order() {
		let mut rec = record! { "c" => 1, "b" => 2, "a" => 3 };
		assert_eq!(rec.remove("b"), Some(Value::Int(2)));
		assert_eq!(rec.remove("b"), None);
		assert_eq!(rec.keys().collect::<Vec<_>>(), ["c", "a"]);
	}

	#[test]
	fn serialization_sorts_keys() {
		let rec = record! {
			"b" => 1,
			"a" => record! { "z" => Value::Null, "y" => "nested" },
		};
		assert_eq!(rec.to_json().unwrap(), r#"{"a":{"y":"nested","z":null},"b":1}"#);
		assert_eq!(serde_json::to_string(&rec.to_value()).unwrap(), rec.to_json().unwrap());
	}

	#[test]
	fn from_json_map() {
		let json: Json = serde_json::from_str(r#"{"value":"a","id":7}"#).unwrap();
		let rec = Record::from(json.as_object().unwrap().clone());
		assert_eq!(rec.get("id"), Some(&Value::Int(7)));
		assert_eq!(rec.get("value"), Some(&Value::String("a".into())));
	}
}
