pub mod external;
pub mod filter;
pub mod merge;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{CloutService, Error, ProfileRecord, Result, cache::CallerScope};
use external::ExternalLookup;
use filter::{Filter, LocalQuery};

/// Raw search criteria as they arrive from a query string. Bounds are coerced to integers and
/// text is trimmed; blank values count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	pub q: Option<String>,
	pub min_popularity: Option<String>,
	pub max_popularity: Option<String>,
	pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub influencers: Vec<ProfileRecord>,
	/// Set when the provider was unavailable and only catalog results are included.
	pub degraded: bool,
}

impl CloutService {
	/// Runs a merged search and records its provider tags in the caller's cache slot.
	pub async fn search(&self, scope: &CallerScope, req: SearchRequest) -> Result<SearchResponse> {
		let filter = Filter::from_request(&req)?;
		let response = self.aggregate(&filter).await?;

		self.cache.store(scope, &response.influencers);

		Ok(response)
	}

	/// Runs a merged search restricted to `category`. Leaves the tag cache untouched.
	///
	/// A blank `category` is rejected rather than widened to an unrestricted search.
	pub async fn search_category(
		&self,
		category: &str,
		req: SearchRequest,
	) -> Result<SearchResponse> {
		if category.trim().is_empty() {
			return Err(Error::invalid_filter("category must not be blank."));
		}

		let req = SearchRequest { category: Some(category.to_string()), ..req };
		let filter = Filter::from_request(&req)?;

		self.aggregate(&filter).await
	}

	async fn aggregate(&self, filter: &Filter) -> Result<SearchResponse> {
		let local_query = LocalQuery::from_filter(filter);
		let (local, external) =
			tokio::join!(self.store.find_profiles(&local_query), self.lookup_external(filter));
		let local = local?;
		let local_count = local.len();
		let (external, degraded) = match external {
			ExternalLookup::Found(records) => (records, false),
			ExternalLookup::Degraded { reason } => {
				warn!(%reason, "Profile provider unavailable. Returning catalog results only.");

				(Vec::new(), true)
			},
		};
		let external_count = external.len();
		let influencers = merge::merge(local, external);

		debug!(
			local = local_count,
			external = external_count,
			merged = influencers.len(),
			degraded,
			"Search merged."
		);

		Ok(SearchResponse { influencers, degraded })
	}
}
