//! Lazily-evaluated, chainable lists of dynamic records.
//!
//! A [`DataList`] queues its operations — filter, sort, map, reverse,
//! shuffle — as pending actions and only runs them when something observes
//! the list (indexing, iteration, length, serialization, or a structural
//! mutation). Laziness is layered twice:
//!
//! - **per item**: a [`Slot`] may hold a deferred producer for a single
//!   record, resolved in place at most once;
//! - **whole list**: the list itself may be backed by a producer function
//!   that yields the entire contents on demand. Each consultation passes a
//!   [`ProducerContext`] describing the pending `filterBy`/`sortBy`
//!   clauses, and the producer claims the clauses it satisfied itself in
//!   its [`ProducerOutput`] — letting a backing store push filters and
//!   sorts down while the rest is applied generically.
//!
//! The producer stays attached after the first materialization and is
//! re-consulted by any pass that queued new claimable clauses; the first
//! structural mutation (`set`, `remove`, `push`, `pop`, `shift`,
//! `unshift`, `concat`, `extend`) pins the concrete sequence and detaches
//! it for good.
//!
//! ```
//! use datalist::DataList;
//! use datalist_record::record;
//!
//! let mut list: DataList = vec![
//!     record! { "value" => "a" },
//!     record! { "value" => "b" },
//! ]
//! .into();
//! list.push(datalist::Slot::deferred(|| record! { "value" => "c" }));
//! list.filter(|rec| rec.get("value").and_then(|v| v.as_str()) != Some("b"));
//! assert_eq!(list.to_json().unwrap(), r#"[{"value":"a"},{"value":"c"}]"#);
//! ```
//!
//! Everything is synchronous and single-threaded; a list is not meant to
//! be shared across threads.

mod action;
mod context;
mod error;
mod list;
mod pipeline;
mod slot;

pub use action::{FilterOperator, SortOrder};
pub use context::{ClauseId, FilterClause, ProducerContext, ProducerOutput, SortClause};
pub use error::ListError;
pub use list::{DataList, Iter};
pub use slot::Slot;

pub use datalist_record::{Record, Value, record};
