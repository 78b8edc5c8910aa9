//! Pending operations queued by the chainable builder calls.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use datalist_record::{Record, Value};
use fancy_regex::Regex;

use crate::ListError;

/// Comparison operator applied by [`DataList::filter_by`](crate::DataList::filter_by).
///
/// [`FromStr`] accepts the wire spellings (`equal`, `notEqual`, `regExp`,
/// `notRegExp`, `startWith`, `notStartWith`, `endWith`, `notEndWith`,
/// `inArray`, `notInArray`); anything else fails before an action is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
	Equal,
	NotEqual,
	RegExp,
	NotRegExp,
	StartsWith,
	NotStartsWith,
	EndsWith,
	NotEndsWith,
	InArray,
	NotInArray,
}

impl FilterOperator {
	pub fn as_str(&self) -> &'static str {
		match self {
			FilterOperator::Equal => "equal",
			FilterOperator::NotEqual => "notEqual",
			FilterOperator::RegExp => "regExp",
			FilterOperator::NotRegExp => "notRegExp",
			FilterOperator::StartsWith => "startWith",
			FilterOperator::NotStartsWith => "notStartWith",
			FilterOperator::EndsWith => "endWith",
			FilterOperator::NotEndsWith => "notEndWith",
			FilterOperator::InArray => "inArray",
			FilterOperator::NotInArray => "notInArray",
		}
	}
}

impl fmt::Display for FilterOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FilterOperator {
	type Err = ListError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"equal" => Ok(FilterOperator::Equal),
			"notEqual" => Ok(FilterOperator::NotEqual),
			"regExp" => Ok(FilterOperator::RegExp),
			"notRegExp" => Ok(FilterOperator::NotRegExp),
			"startWith" => Ok(FilterOperator::StartsWith),
			"notStartWith" => Ok(FilterOperator::NotStartsWith),
			"endWith" => Ok(FilterOperator::EndsWith),
			"notEndWith" => Ok(FilterOperator::NotEndsWith),
			"inArray" => Ok(FilterOperator::InArray),
			"notInArray" => Ok(FilterOperator::NotInArray),
			_ => Err(ListError::UnknownOperator(s.into())),
		}
	}
}

/// Sort direction for [`DataList::sort_by`](crate::DataList::sort_by).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}

impl SortOrder {
	pub fn as_str(&self) -> &'static str {
		match self {
			SortOrder::Asc => "asc",
			SortOrder::Desc => "desc",
		}
	}
}

impl fmt::Display for SortOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortOrder {
	type Err = ListError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"asc" => Ok(SortOrder::Asc),
			"desc" => Ok(SortOrder::Desc),
			_ => Err(ListError::UnknownOrder(s.into())),
		}
	}
}

/// A property filter with its comparison target and (for the regex
/// operators) the pattern compiled at builder-call time.
pub(crate) struct PropertyFilter {
	pub(crate) property: String,
	pub(crate) value: Value,
	pub(crate) operator: FilterOperator,
	regex: Option<Regex>,
}

impl PropertyFilter {
	pub(crate) fn new(property: String, value: Value, operator: FilterOperator) -> Result<Self, ListError> {
		let regex = match operator {
			FilterOperator::RegExp | FilterOperator::NotRegExp => {
				let pattern = value.coerce_string();
				let regex = Regex::new(&pattern).map_err(|source| ListError::InvalidPattern {
					pattern,
					source: Box::new(source),
				})?;
				Some(regex)
			}
			_ => None,
		};
		Ok(Self { property, value, operator, regex })
	}

	/// Tests one record against the filter.
	///
	/// A property that is absent or `Null` counts as missing: it passes only
	/// `equal` with a `Null` target, `notEqual` with a non-`Null` target,
	/// `inArray` when the target list contains `Null`, and `notInArray` when
	/// it does not.
	pub(crate) fn matches(&self, record: &Record) -> bool {
		let value = record.get(&self.property).filter(|value| !value.is_null());
		let Some(value) = value else {
			return match self.operator {
				FilterOperator::Equal => self.value.is_null(),
				FilterOperator::NotEqual => !self.value.is_null(),
				FilterOperator::InArray => target_contains(&self.value, &Value::Null),
				FilterOperator::NotInArray => !target_contains(&self.value, &Value::Null),
				_ => false,
			};
		};
		match self.operator {
			FilterOperator::Equal => *value == self.value,
			FilterOperator::NotEqual => *value != self.value,
			FilterOperator::RegExp => self.regex_matches(value),
			FilterOperator::NotRegExp => !self.regex_matches(value),
			FilterOperator::StartsWith => value.coerce_string().starts_with(&self.value.coerce_string()),
			FilterOperator::NotStartsWith => !value.coerce_string().starts_with(&self.value.coerce_string()),
			FilterOperator::EndsWith => value.coerce_string().ends_with(&self.value.coerce_string()),
			FilterOperator::NotEndsWith => !value.coerce_string().ends_with(&self.value.coerce_string()),
			FilterOperator::InArray => target_contains(&self.value, value),
			FilterOperator::NotInArray => !target_contains(&self.value, value),
		}
	}

	fn regex_matches(&self, value: &Value) -> bool {
		// The pattern is compiled in `new` for both regex operators; runtime
		// failures (backtrack limit) count as a non-match.
		self.regex.as_ref().is_some_and(|regex| regex.is_match(&value.coerce_string()).unwrap_or(false))
	}
}

impl fmt::Debug for PropertyFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PropertyFilter")
			.field("property", &self.property)
			.field("value", &self.value)
			.field("operator", &self.operator)
			.finish_non_exhaustive()
	}
}

/// Membership of `value` in a list-valued target. A non-list target
/// contains nothing.
fn target_contains(target: &Value, value: &Value) -> bool {
	matches!(target, Value::List(vals) if vals.contains(value))
}

/// One queued operation, applied in insertion order by the pipeline
/// executor and discarded afterwards.
pub(crate) enum Action {
	Filter(Box<dyn FnMut(&Record) -> bool>),
	FilterBy(PropertyFilter),
	Sort(Box<dyn FnMut(&Record, &Record) -> Ordering>),
	SortBy { property: String, order: SortOrder },
	Reverse,
	Shuffle,
	Map(Box<dyn FnMut(Record) -> Record>),
}

impl Action {
	/// Whether a whole-list producer can claim this action through the
	/// producer context.
	pub(crate) fn is_claimable(&self) -> bool {
		matches!(self, Action::FilterBy(_) | Action::SortBy { .. })
	}

	pub(crate) fn name(&self) -> &'static str {
		match self {
			Action::Filter(_) => "filter",
			Action::FilterBy(_) => "filterBy",
			Action::Sort(_) => "sort",
			Action::SortBy { .. } => "sortBy",
			Action::Reverse => "reverse",
			Action::Shuffle => "shuffle",
			Action::Map(_) => "map",
		}
	}
}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::FilterBy(filter) => f.debug_tuple("FilterBy").field(filter).finish(),
			Action::SortBy { property, order } => f.debug_struct("SortBy").field("property", property).field("order", order).finish(),
			other => f.write_str(other.name()),
		}
	}
}
