//! The request/response protocol between the list and a whole-list producer.
//!
//! When a list is backed by a producer, each execution pass hands it a
//! [`ProducerContext`] describing the pending `filterBy`/`sortBy` clauses
//! and any requested output properties. The producer may satisfy some of
//! those clauses itself (a remote query engine pushing filters into its
//! query, say) and claims them by id in the returned [`ProducerOutput`];
//! claimed clauses are removed from the queue before the generic pipeline
//! runs over the returned items.

use datalist_record::Value;

use crate::action::{Action, FilterOperator, SortOrder};
use crate::slot::Slot;

/// Opaque handle tying a context clause back to its queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseId(pub(crate) usize);

/// A pending `filterBy` clause, as shown to a producer.
#[derive(Debug)]
pub struct FilterClause {
	id: ClauseId,
	property: String,
	value: Value,
	operator: FilterOperator,
}

impl FilterClause {
	pub fn id(&self) -> ClauseId {
		self.id
	}

	pub fn property(&self) -> &str {
		&self.property
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	pub fn operator(&self) -> FilterOperator {
		self.operator
	}
}

/// A pending `sortBy` clause, as shown to a producer.
#[derive(Debug)]
pub struct SortClause {
	id: ClauseId,
	property: String,
	order: SortOrder,
}

impl SortClause {
	pub fn id(&self) -> ClauseId {
		self.id
	}

	pub fn property(&self) -> &str {
		&self.property
	}

	pub fn order(&self) -> SortOrder {
		self.order
	}
}

/// The request object passed to a whole-list producer, built fresh for each
/// invocation from the pending action queue.
#[derive(Debug, Default)]
pub struct ProducerContext {
	filters: Vec<FilterClause>,
	sorts: Vec<SortClause>,
	properties: Vec<String>,
}

impl ProducerContext {
	pub(crate) fn from_actions(actions: &[Action], properties: &[String]) -> Self {
		let mut filters = Vec::new();
		let mut sorts = Vec::new();
		for (index, action) in actions.iter().enumerate() {
			match action {
				Action::FilterBy(filter) => filters.push(FilterClause {
					id: ClauseId(index),
					property: filter.property.clone(),
					value: filter.value.clone(),
					operator: filter.operator,
				}),
				Action::SortBy { property, order } => sorts.push(SortClause {
					id: ClauseId(index),
					property: property.clone(),
					order: *order,
				}),
				_ => {}
			}
		}
		Self {
			filters,
			sorts,
			properties: properties.to_vec(),
		}
	}

	/// Pending `filterBy` clauses, in queue order.
	pub fn filters(&self) -> &[FilterClause] {
		&self.filters
	}

	/// Pending `sortBy` clauses, in queue order.
	pub fn sorts(&self) -> &[SortClause] {
		&self.sorts
	}

	/// Property names requested by a projection pass; empty outside
	/// [`DataList::slice_properties`](crate::DataList::slice_properties).
	pub fn properties(&self) -> &[String] {
		&self.properties
	}
}

/// A producer's reply: the full list contents plus the clauses it already
/// satisfied.
#[derive(Debug)]
pub struct ProducerOutput {
	pub(crate) items: Vec<Slot>,
	pub(crate) applied: Vec<ClauseId>,
}

impl ProducerOutput {
	pub fn new<I, T>(items: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Slot>,
	{
		Self {
			items: items.into_iter().map(Into::into).collect(),
			applied: Vec::new(),
		}
	}

	/// Marks a context clause as already satisfied by the producer, so the
	/// generic pipeline will not re-apply it.
	pub fn mark_applied(mut self, id: ClauseId) -> Self {
		self.applied.push(id);
		self
	}
}

/// The whole-list backing producer. Invoked synchronously; it may be
/// re-invoked on later execution passes, so it must be stable for equal
/// pending-clause state.
pub(crate) type Producer = Box<dyn FnMut(&ProducerContext) -> ProducerOutput>;
