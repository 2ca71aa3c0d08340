use sqlx::{Postgres, QueryBuilder};

use clout_storage::queries::{SEARCH_ORDER, SEARCH_SELECT};

use crate::{Error, Result, search::SearchRequest};

/// Catalog searches never return more than this many rows.
pub const LOCAL_PAGE_SIZE: i64 = 10;

const MIN_POPULARITY_SQL: &[&str] = &["i.users_count >= ", ""];
const MAX_POPULARITY_SQL: &[&str] = &["i.users_count <= ", ""];
const TEXT_MATCH_SQL: &[&str] = &["(i.name ILIKE ", " OR i.screen_name ILIKE ", ")"];
const CATEGORY_SQL: &[&str] = &[
	"EXISTS (SELECT 1 FROM influencers_categories AS ic WHERE ic.influencer_id = i.id AND ic.category = ",
	")",
];

/// Normalized search criteria shared by the catalog query and the provider lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
	pub min_popularity: Option<i64>,
	pub max_popularity: Option<i64>,
	pub text_query: Option<String>,
	pub category: Option<String>,
}
impl Filter {
	pub fn validate(&self) -> Result<()> {
		for (label, bound) in
			[("min_popularity", self.min_popularity), ("max_popularity", self.max_popularity)]
		{
			if bound.is_some_and(|value| value < 0) {
				return Err(Error::invalid_filter(format!("{label} must be zero or greater.")));
			}
		}

		if let (Some(min), Some(max)) = (self.min_popularity, self.max_popularity)
			&& min > max
		{
			return Err(Error::invalid_filter(
				"min_popularity cannot be greater than max_popularity.",
			));
		}

		Ok(())
	}

	pub(crate) fn from_request(req: &SearchRequest) -> Result<Self> {
		let filter = Self {
			min_popularity: parse_bound("min_popularity", req.min_popularity.as_deref())?,
			max_popularity: parse_bound("max_popularity", req.max_popularity.as_deref())?,
			text_query: trimmed(req.q.as_deref()),
			category: trimmed(req.category.as_deref()),
		};

		filter.validate()?;

		Ok(filter)
	}
}

/// A single conjunct of the catalog search. Every value is bound as a query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
	MinPopularity(i64),
	MaxPopularity(i64),
	/// Case-insensitive substring match on display name or screen name. Holds the escaped
	/// `LIKE` pattern.
	TextMatch(String),
	/// The profile has an association with this category.
	Category(String),
}
impl Predicate {
	/// SQL fragments interleaved with parameters: `fragments[0] params[0] fragments[1] ...`.
	fn parts(&self) -> (&'static [&'static str], Vec<BoundValue>) {
		match self {
			Self::MinPopularity(value) => (MIN_POPULARITY_SQL, vec![BoundValue::Int(*value)]),
			Self::MaxPopularity(value) => (MAX_POPULARITY_SQL, vec![BoundValue::Int(*value)]),
			Self::TextMatch(pattern) => (
				TEXT_MATCH_SQL,
				vec![BoundValue::Text(pattern.clone()), BoundValue::Text(pattern.clone())],
			),
			Self::Category(category) => (CATEGORY_SQL, vec![BoundValue::Text(category.clone())]),
		}
	}

	fn push(&self, builder: &mut QueryBuilder<'static, Postgres>) {
		let (fragments, params) = self.parts();

		for (fragment, param) in fragments.iter().zip(params) {
			builder.push(fragment);
			param.push(builder);
		}

		if let Some(tail) = fragments.last() {
			builder.push(tail);
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundValue {
	Int(i64),
	Text(String),
}
impl BoundValue {
	fn push(self, builder: &mut QueryBuilder<'static, Postgres>) {
		match self {
			Self::Int(value) => builder.push_bind(value),
			Self::Text(value) => builder.push_bind(value),
		};
	}
}

/// The catalog side of a search: a conjunction of predicates, ordered by score with unscored
/// profiles last, capped at [`LOCAL_PAGE_SIZE`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalQuery {
	predicates: Vec<Predicate>,
}
impl LocalQuery {
	pub fn from_filter(filter: &Filter) -> Self {
		let mut predicates = Vec::new();

		if let Some(min) = filter.min_popularity {
			predicates.push(Predicate::MinPopularity(min));
		}
		if let Some(max) = filter.max_popularity {
			predicates.push(Predicate::MaxPopularity(max));
		}
		if let Some(text) = &filter.text_query {
			predicates.push(Predicate::TextMatch(like_pattern(text)));
		}
		if let Some(category) = &filter.category {
			predicates.push(Predicate::Category(category.clone()));
		}

		Self { predicates }
	}

	pub fn predicates(&self) -> &[Predicate] {
		&self.predicates
	}

	/// Parameters in placeholder order, including the trailing limit.
	pub fn params(&self) -> Vec<BoundValue> {
		let mut params: Vec<_> =
			self.predicates.iter().flat_map(|predicate| predicate.parts().1).collect();

		params.push(BoundValue::Int(LOCAL_PAGE_SIZE));

		params
	}

	pub fn to_builder(&self) -> QueryBuilder<'static, Postgres> {
		let mut builder = QueryBuilder::new(SEARCH_SELECT);

		for (index, predicate) in self.predicates.iter().enumerate() {
			builder.push(if index == 0 { " WHERE " } else { " AND " });
			predicate.push(&mut builder);
		}

		builder.push(SEARCH_ORDER);
		builder.push(" LIMIT ");
		builder.push_bind(LOCAL_PAGE_SIZE);

		builder
	}
}

/// Wraps `text` in `%` after escaping the `LIKE` metacharacters it contains.
pub fn like_pattern(text: &str) -> String {
	let mut pattern = String::with_capacity(text.len() + 2);

	pattern.push('%');

	for ch in text.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			pattern.push('\\');
		}

		pattern.push(ch);
	}

	pattern.push('%');

	pattern
}

fn trimmed(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn parse_bound(label: &str, raw: Option<&str>) -> Result<Option<i64>> {
	let Some(value) = trimmed(raw) else {
		return Ok(None);
	};

	value
		.parse::<i64>()
		.map(Some)
		.map_err(|_| Error::invalid_filter(format!("{label} must be an integer, got {value:?}.")))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(min: Option<&str>, max: Option<&str>, q: Option<&str>) -> SearchRequest {
		SearchRequest {
			q: q.map(str::to_string),
			min_popularity: min.map(str::to_string),
			max_popularity: max.map(str::to_string),
			category: None,
		}
	}

	#[test]
	fn blank_fields_are_absent() {
		let filter = Filter::from_request(&request(Some(" "), Some(""), Some("  ")))
			.expect("blank fields must normalize");

		assert_eq!(filter, Filter::default());
	}

	#[test]
	fn numbers_are_coerced_and_text_trimmed() {
		let filter = Filter::from_request(&request(Some(" 100 "), Some("2000"), Some(" chef ")))
			.expect("valid filter");

		assert_eq!(filter.min_popularity, Some(100));
		assert_eq!(filter.max_popularity, Some(2_000));
		assert_eq!(filter.text_query.as_deref(), Some("chef"));
	}

	#[test]
	fn inverted_bounds_are_rejected() {
		let err = Filter::from_request(&request(Some("1000"), Some("100"), None))
			.expect_err("min > max must fail");

		assert!(matches!(err, Error::InvalidFilter { .. }));
	}

	#[test]
	fn equal_bounds_are_allowed() {
		assert!(Filter::from_request(&request(Some("5"), Some("5"), None)).is_ok());
	}

	#[test]
	fn non_numeric_bound_is_rejected() {
		let err =
			Filter::from_request(&request(Some("lots"), None, None)).expect_err("must fail");

		assert!(matches!(err, Error::InvalidFilter { .. }));
	}

	#[test]
	fn negative_bound_is_rejected() {
		let err = Filter::from_request(&request(None, Some("-1"), None)).expect_err("must fail");

		assert!(matches!(err, Error::InvalidFilter { .. }));
	}

	#[test]
	fn empty_filter_scans_without_where() {
		let query = LocalQuery::from_filter(&Filter::default());
		let builder = query.to_builder();
		let sql = builder.sql();

		assert!(query.predicates().is_empty());
		assert!(!sql.contains("i.users_count >="));
		assert!(!sql.contains("$2"));
		assert!(sql.ends_with("ORDER BY i.score DESC NULLS LAST, i.id LIMIT $1"));
		assert_eq!(query.params(), vec![BoundValue::Int(LOCAL_PAGE_SIZE)]);
	}

	#[test]
	fn predicates_are_conjoined_with_ordered_placeholders() {
		let filter = Filter {
			min_popularity: Some(10),
			max_popularity: Some(20),
			text_query: Some("ana".to_string()),
			category: Some("travel".to_string()),
		};
		let query = LocalQuery::from_filter(&filter);
		let builder = query.to_builder();
		let sql = builder.sql();

		assert!(sql.contains(
			" WHERE i.users_count >= $1 AND i.users_count <= $2 AND (i.name ILIKE $3 OR i.screen_name ILIKE $4) AND EXISTS (SELECT 1 FROM influencers_categories AS ic WHERE ic.influencer_id = i.id AND ic.category = $5)"
		));
		assert!(sql.ends_with("LIMIT $6"));
		assert_eq!(
			query.params(),
			vec![
				BoundValue::Int(10),
				BoundValue::Int(20),
				BoundValue::Text("%ana%".to_string()),
				BoundValue::Text("%ana%".to_string()),
				BoundValue::Text("travel".to_string()),
				BoundValue::Int(LOCAL_PAGE_SIZE),
			]
		);
	}

	#[test]
	fn user_text_never_reaches_sql() {
		let filter =
			Filter { text_query: Some("x' OR 1=1 --".to_string()), ..Filter::default() };
		let builder = LocalQuery::from_filter(&filter).to_builder();

		assert!(!builder.sql().contains("1=1"));
	}

	#[test]
	fn like_metacharacters_are_escaped() {
		assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
	}
}
