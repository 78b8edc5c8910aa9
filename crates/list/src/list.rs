//! The chainable, indexable, iterable list facade.

use std::cmp::Ordering;
use std::fmt;

use datalist_record::{Record, Value};
use log::debug;
use rand::Rng;
use serde_json::Value as Json;

use crate::action::{Action, FilterOperator, PropertyFilter, SortOrder};
use crate::context::{Producer, ProducerContext, ProducerOutput};
use crate::error::ListError;
use crate::pipeline;
use crate::slot::Slot;

/// A lazily-evaluated list of records.
///
/// Builder calls ([`filter`](Self::filter), [`filter_by`](Self::filter_by),
/// [`sort`](Self::sort), [`sort_by`](Self::sort_by),
/// [`reverse`](Self::reverse), [`shuffle`](Self::shuffle),
/// [`map`](Self::map)) queue work without executing it; any observation —
/// indexing, iteration, length, serialization, a structural mutation —
/// flushes the queue first, so reads always see the settled sequence.
///
/// Backing data is either a concrete slot sequence or a whole-list
/// [`Producer`] consulted through the [`ProducerContext`] protocol; see the
/// crate docs for the re-consultation policy. Not intended for concurrent
/// use.
pub struct DataList {
	items: Vec<Slot>,
	actions: Vec<Action>,
	producer: Option<Producer>,
	materialized: bool,
}

impl DataList {
	/// An empty list.
	pub fn new() -> Self {
		Self {
			items: Vec::new(),
			actions: Vec::new(),
			producer: None,
			materialized: true,
		}
	}

	/// A list backed by a whole-list producer, consulted lazily.
	///
	/// The producer is invoked with a [`ProducerContext`] describing the
	/// pending `filterBy`/`sortBy` clauses; clauses it marks applied are not
	/// re-applied generically. It stays attached — and is re-consulted by
	/// passes with newly queued `filterBy`/`sortBy` clauses — until the
	/// first structural mutation pins the list.
	pub fn from_producer<F>(producer: F) -> Self
	where
		F: FnMut(&ProducerContext) -> ProducerOutput + 'static,
	{
		Self {
			items: Vec::new(),
			actions: Vec::new(),
			producer: Some(Box::new(producer)),
			materialized: false,
		}
	}

	// ---- queue / execution ----------------------------------------------

	/// Flushes the pending action queue (the "update" step every observer
	/// runs first).
	fn update(&mut self) {
		self.run_pipeline(&[]);
	}

	fn run_pipeline(&mut self, requested_properties: &[String]) {
		if self.should_consult_producer() {
			let context = ProducerContext::from_actions(&self.actions, requested_properties);
			let output = match self.producer.as_mut() {
				Some(producer) => producer(&context),
				None => unreachable!("guarded by should_consult_producer"),
			};
			if self.materialized {
				debug!("re-consulting producer with {} filter / {} sort clause(s)", context.filters().len(), context.sorts().len());
			}
			self.remove_applied(output.applied);
			self.items = output.items;
			self.materialized = true;
		}
		pipeline::run(&mut self.items, std::mem::take(&mut self.actions));
	}

	/// The producer is consulted on first materialization and again
	/// whenever the queue holds a clause it could claim.
	fn should_consult_producer(&self) -> bool {
		self.producer.is_some() && (!self.materialized || self.actions.iter().any(Action::is_claimable))
	}

	fn remove_applied(&mut self, applied: Vec<crate::context::ClauseId>) {
		let mut claimed = Vec::with_capacity(applied.len());
		for id in applied {
			if self.actions.get(id.0).is_some_and(Action::is_claimable) {
				debug!("producer applied clause {} at queue position {}", self.actions[id.0].name(), id.0);
				claimed.push(id.0);
			} else {
				debug!("ignoring producer claim for unknown clause id {}", id.0);
			}
		}
		let mut index = 0;
		self.actions.retain(|_| {
			let keep = !claimed.contains(&index);
			index += 1;
			keep
		});
	}

	/// Drops the producer: the concrete sequence is now the only source of
	/// truth. Called by every structural mutation.
	fn pin(&mut self) {
		if self.producer.take().is_some() {
			debug!("list pinned; producer detached");
		}
	}

	// ---- reads ----------------------------------------------------------

	/// The number of records, after flushing pending actions.
	pub fn len(&mut self) -> usize {
		self.update();
		self.items.len()
	}

	pub fn is_empty(&mut self) -> bool {
		self.len() == 0
	}

	/// The record at `index`, or `None` when out of range.
	pub fn get(&mut self, index: usize) -> Option<&Record> {
		self.update();
		self.items.get_mut(index).map(|slot| &*slot.resolve())
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
		self.update();
		self.items.get_mut(index).map(Slot::resolve)
	}

	/// Whether `index` is currently occupied.
	pub fn exists(&mut self, index: usize) -> bool {
		self.update();
		index < self.items.len()
	}

	pub fn first(&mut self) -> Option<&Record> {
		self.get(0)
	}

	pub fn last(&mut self) -> Option<&Record> {
		self.update();
		self.items.last_mut().map(|slot| &*slot.resolve())
	}

	/// A uniformly random record, or `None` when the list is empty.
	pub fn random(&mut self) -> Option<&Record> {
		self.update();
		if self.items.is_empty() {
			return None;
		}
		let index = rand::thread_rng().gen_range(0..self.items.len());
		self.get(index)
	}

	/// Iterates the records in order. The pipeline is flushed and every
	/// slot resolved up front; the exclusive borrow rules out builder calls
	/// for as long as the iterator lives.
	pub fn iter(&mut self) -> Iter<'_> {
		self.update();
		pipeline::resolve_all(&mut self.items);
		Iter { inner: self.items.iter() }
	}

	// ---- structural mutations -------------------------------------------

	/// Writes `item` at `index`. An index equal to the current length
	/// appends; a larger one fails without mutating the list.
	pub fn set(&mut self, index: usize, item: impl Into<Slot>) -> Result<(), ListError> {
		self.update();
		let len = self.items.len();
		match index.cmp(&len) {
			Ordering::Less => self.items[index] = item.into(),
			Ordering::Equal => self.items.push(item.into()),
			Ordering::Greater => return Err(ListError::IndexOutOfRange { index, len }),
		}
		self.pin();
		Ok(())
	}

	/// Removes and returns the record at `index`, shifting the tail down.
	/// `None` when the index is not occupied.
	pub fn remove(&mut self, index: usize) -> Option<Record> {
		self.update();
		if index >= self.items.len() {
			return None;
		}
		self.pin();
		Some(self.items.remove(index).into_record())
	}

	/// Appends an item (a record or a deferred slot).
	pub fn push(&mut self, item: impl Into<Slot>) -> &mut Self {
		self.update();
		self.pin();
		self.items.push(item.into());
		self
	}

	/// Removes and returns the last record.
	pub fn pop(&mut self) -> Option<Record> {
		self.update();
		self.pin();
		self.items.pop().map(Slot::into_record)
	}

	/// Prepends an item.
	pub fn unshift(&mut self, item: impl Into<Slot>) -> &mut Self {
		self.update();
		self.pin();
		self.items.insert(0, item.into());
		self
	}

	/// Removes and returns the first record.
	pub fn shift(&mut self) -> Option<Record> {
		self.update();
		self.pin();
		if self.items.is_empty() {
			return None;
		}
		Some(self.items.remove(0).into_record())
	}

	/// Appends clones of the other list's current records. Both lists are
	/// flushed first; the other list keeps its contents.
	pub fn concat(&mut self, other: &mut DataList) -> &mut Self {
		self.update();
		other.update();
		self.pin();
		for slot in &mut other.items {
			self.items.push(Slot::from(slot.resolve().clone()));
		}
		self
	}

	/// A new, independent list holding clones of the records from `offset`,
	/// at most `length` of them (all remaining when `None`).
	pub fn slice(&mut self, offset: usize, length: Option<usize>) -> DataList {
		self.update();
		let start = offset.min(self.items.len());
		let end = match length {
			Some(length) => (start + length).min(self.items.len()),
			None => self.items.len(),
		};
		self.items[start..end].iter_mut().map(|slot| slot.resolve().clone()).collect()
	}

	/// A new list of synthetic records holding exactly `properties`, with
	/// `Null` for any property a source record lacks. The projection request
	/// is visible to a backing producer through the context for this pass
	/// only; this list's own records stay unprojected.
	pub fn slice_properties<I, S>(&mut self, properties: I) -> DataList
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let properties: Vec<String> = properties.into_iter().map(Into::into).collect();
		self.run_pipeline(&properties);
		let mut projected = DataList::new();
		for slot in &mut self.items {
			let record = slot.resolve();
			let synthetic: Record = properties
				.iter()
				.map(|property| (property.clone(), record.get(property).cloned().unwrap_or(Value::Null)))
				.collect();
			projected.items.push(Slot::from(synthetic));
		}
		projected
	}

	// ---- chainable builders ---------------------------------------------

	/// Queues a predicate filter; records for which the predicate returns
	/// `false` are dropped when the queue flushes.
	pub fn filter<F>(&mut self, predicate: F) -> &mut Self
	where
		F: FnMut(&Record) -> bool + 'static,
	{
		self.actions.push(Action::Filter(Box::new(predicate)));
		self
	}

	/// Queues a property filter. Fails — queuing nothing — when the
	/// operator is a regex one and `value` is not a valid pattern.
	pub fn filter_by(&mut self, property: impl Into<String>, value: impl Into<Value>, operator: FilterOperator) -> Result<&mut Self, ListError> {
		let filter = PropertyFilter::new(property.into(), value.into(), operator)?;
		self.actions.push(Action::FilterBy(filter));
		Ok(self)
	}

	/// Queues a comparator sort.
	pub fn sort<F>(&mut self, comparator: F) -> &mut Self
	where
		F: FnMut(&Record, &Record) -> Ordering + 'static,
	{
		self.actions.push(Action::Sort(Box::new(comparator)));
		self
	}

	/// Queues a property sort: missing (absent-or-null) properties sort
	/// first for [`SortOrder::Asc`], last for [`SortOrder::Desc`]; present
	/// values compare lexicographically on their string form.
	pub fn sort_by(&mut self, property: impl Into<String>, order: SortOrder) -> &mut Self {
		self.actions.push(Action::SortBy {
			property: property.into(),
			order,
		});
		self
	}

	/// Queues an order reversal.
	pub fn reverse(&mut self) -> &mut Self {
		self.actions.push(Action::Reverse);
		self
	}

	/// Queues a uniform shuffle.
	pub fn shuffle(&mut self) -> &mut Self {
		self.actions.push(Action::Shuffle);
		self
	}

	/// Queues a per-record transform.
	pub fn map<F>(&mut self, transform: F) -> &mut Self
	where
		F: FnMut(Record) -> Record + 'static,
	{
		self.actions.push(Action::Map(Box::new(transform)));
		self
	}

	// ---- serialization --------------------------------------------------

	/// The list as a plain JSON array of nested mappings, keys in ascending
	/// lexicographic order at every level.
	pub fn to_value(&mut self) -> Json {
		self.update();
		pipeline::resolve_all(&mut self.items);
		Json::Array(self.items.iter().map(|slot| slot.expect_record().to_value()).collect())
	}

	/// JSON text of [`Self::to_value`].
	pub fn to_json(&mut self) -> Result<String, ListError> {
		Ok(serde_json::to_string(&self.to_value())?)
	}
}

impl Default for DataList {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for DataList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataList")
			.field("items", &self.items)
			.field("pending_actions", &self.actions)
			.field("has_producer", &self.producer.is_some())
			.finish()
	}
}

impl<T: Into<Slot>> FromIterator<T> for DataList {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut list = DataList::new();
		list.items = iter.into_iter().map(Into::into).collect();
		list
	}
}

impl From<Vec<Record>> for DataList {
	fn from(records: Vec<Record>) -> Self {
		records.into_iter().collect()
	}
}

impl<T: Into<Slot>> Extend<T> for DataList {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.update();
		self.pin();
		self.items.extend(iter.into_iter().map(Into::into));
	}
}

/// Borrowing iterator over resolved records, created by
/// [`DataList::iter`].
pub struct Iter<'a> {
	inner: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
	type Item = &'a Record;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(Slot::expect_record)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a mut DataList {
	type Item = &'a Record;
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl IntoIterator for DataList {
	type Item = Record;
	type IntoIter = std::iter::Map<std::vec::IntoIter<Slot>, fn(Slot) -> Record>;

	fn into_iter(mut self) -> Self::IntoIter {
		self.update();
		self.items.into_iter().map(Slot::into_record as fn(Slot) -> Record)
	}
}
