//! Storage cells with per-item deferred resolution.

use std::fmt;
use std::mem;

use datalist_record::Record;

/// One storage cell of a list: either a materialized record or a deferred
/// producer for it.
///
/// Resolution replaces the deferred variant in place, so a producer runs at
/// most once for the lifetime of the slot.
pub enum Slot {
	Record(Record),
	Deferred(Box<dyn FnOnce() -> Record>),
}

impl Slot {
	/// Defers production of a record until the slot is first observed.
	pub fn deferred<R, F>(producer: F) -> Self
	where
		R: Into<Record>,
		F: FnOnce() -> R + 'static,
	{
		Slot::Deferred(Box::new(move || producer().into()))
	}

	/// Resolves the slot in place and returns the record.
	pub(crate) fn resolve(&mut self) -> &mut Record {
		if matches!(self, Slot::Deferred(_)) {
			let record = match mem::replace(self, Slot::Record(Record::new())) {
				Slot::Deferred(producer) => producer(),
				Slot::Record(_) => unreachable!("checked deferred above"),
			};
			*self = Slot::Record(record);
		}
		match self {
			Slot::Record(record) => record,
			Slot::Deferred(_) => unreachable!("slot was just resolved"),
		}
	}

	/// Resolves the slot and takes the record out.
	pub(crate) fn into_record(self) -> Record {
		match self {
			Slot::Record(record) => record,
			Slot::Deferred(producer) => producer(),
		}
	}

	/// The record of an already-resolved slot.
	///
	/// Callers must have resolved the slot first; the pipeline only uses
	/// this after a force-resolving pass.
	pub(crate) fn expect_record(&self) -> &Record {
		match self {
			Slot::Record(record) => record,
			Slot::Deferred(_) => unreachable!("slot is resolved before read-only access"),
		}
	}
}

impl From<Record> for Slot {
	fn from(record: Record) -> Self {
		Slot::Record(record)
	}
}

impl fmt::Debug for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Slot::Record(record) => f.debug_tuple("Record").field(record).finish(),
			Slot::Deferred(_) => f.write_str("Deferred"),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use datalist_record::record;
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn deferred_resolves_once() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let mut slot = Slot::deferred(move || {
			counter.set(counter.get() + 1);
			record! { "value" => "c" }
		});
		assert_eq!(slot.resolve().get("value").unwrap().as_str(), Some("c"));
		assert_eq!(slot.resolve().get("value").unwrap().as_str(), Some("c"));
		assert_eq!(calls.get(), 1);
	}

	#[test]
	fn into_record_resolves() {
		let slot = Slot::deferred(|| record! { "value" => 1 });
		assert_eq!(slot.into_record(), record! { "value" => 1 });
	}
}
