//! Error types for list construction and builder calls.

use thiserror::Error;

/// Errors reported synchronously by the list facade.
///
/// Every failed call is rejected before it mutates visible state: a builder
/// call that fails validation queues nothing, and a failed write leaves the
/// sequence untouched.
#[derive(Debug, Error)]
pub enum ListError {
	/// A write targeted an index past the end of the list. Writing at
	/// exactly the current length appends; anything beyond is rejected.
	#[error("index {index} is out of range for a list of length {len}")]
	IndexOutOfRange {
		/// The requested index.
		index: usize,
		/// The list length at the time of the call.
		len: usize,
	},

	/// A filter operator spelling was not recognized.
	#[error("unknown filter operator '{0}'")]
	UnknownOperator(String),

	/// A sort order spelling was not recognized (expected 'asc' or 'desc').
	#[error("unknown sort order '{0}' (expected 'asc' or 'desc')")]
	UnknownOrder(String),

	/// A regExp/notRegExp filter was given a pattern that does not compile.
	#[error("invalid filter pattern '{pattern}': {source}")]
	InvalidPattern {
		/// The rejected pattern text.
		pattern: String,
		/// The underlying regex compilation error.
		source: Box<fancy_regex::Error>,
	},

	/// JSON encoding of the materialized list failed.
	#[error("JSON encoding failed: {0}")]
	Json(#[from] serde_json::Error),
}
