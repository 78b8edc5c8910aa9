//! The pipeline executor: one pass per queued action, in insertion order.

use std::cmp::Ordering;
use std::mem;

use datalist_record::{Record, Value};
use log::trace;
use rand::seq::SliceRandom;

use crate::action::{Action, SortOrder};
use crate::slot::Slot;

/// Applies the drained action queue over the slot sequence. Each action
/// runs as its own pass; only the passes that need record contents force
/// slot resolution.
pub(crate) fn run(items: &mut Vec<Slot>, actions: Vec<Action>) {
	for action in actions {
		trace!("applying {} over {} item(s)", action.name(), items.len());
		apply(items, action);
	}
}

fn apply(items: &mut Vec<Slot>, action: Action) {
	match action {
		Action::Filter(mut predicate) => items.retain_mut(|slot| predicate(slot.resolve())),
		Action::FilterBy(filter) => items.retain_mut(|slot| filter.matches(slot.resolve())),
		Action::Sort(mut comparator) => {
			let mut records = take_records(items);
			records.sort_by(|a, b| comparator(a, b));
			put_records(items, records);
		}
		Action::SortBy { property, order } => {
			let mut records = take_records(items);
			let keys: Vec<Option<String>> = records.iter().map(|record| sort_key(record, &property)).collect();
			let mut indices: Vec<usize> = (0..records.len()).collect();
			indices.sort_by(|&a, &b| compare_sort_keys(&keys[a], &keys[b], order));
			let sorted: Vec<Record> = indices.into_iter().map(|i| mem::take(&mut records[i])).collect();
			put_records(items, sorted);
		}
		Action::Reverse => items.reverse(),
		Action::Shuffle => items.shuffle(&mut rand::thread_rng()),
		Action::Map(mut transform) => {
			let records = take_records(items);
			put_records(items, records.into_iter().map(&mut transform).collect());
		}
	}
}

/// Resolves every slot in place.
pub(crate) fn resolve_all(items: &mut [Slot]) {
	for slot in items {
		slot.resolve();
	}
}

/// The value a record sorts by: the string-coerced property, or `None` when
/// the property is absent or `Null`.
fn sort_key(record: &Record, property: &str) -> Option<String> {
	record.get(property).filter(|value| !value.is_null()).map(Value::coerce_string)
}

/// Missing keys sort before present ones; present keys compare
/// lexicographically. `Desc` flips both placements.
fn compare_sort_keys(a: &Option<String>, b: &Option<String>, order: SortOrder) -> Ordering {
	let ordering = match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => a.cmp(b),
	};
	match order {
		SortOrder::Asc => ordering,
		SortOrder::Desc => ordering.reverse(),
	}
}

fn take_records(items: &mut Vec<Slot>) -> Vec<Record> {
	items.drain(..).map(Slot::into_record).collect()
}

fn put_records(items: &mut Vec<Slot>, records: Vec<Record>) {
	*items = records.into_iter().map(Slot::from).collect();
}
