use std::time::Duration;

use clout_providers::stats::StatsQuery;

use crate::{CloutService, ProfileRecord, search::filter::Filter};

/// Outcome of the provider lookup. Provider trouble never fails a search; it degrades it.
#[derive(Clone, Debug, PartialEq)]
pub enum ExternalLookup {
	Found(Vec<ProfileRecord>),
	Degraded { reason: String },
}

pub fn stats_query(filter: &Filter) -> StatsQuery {
	StatsQuery {
		text: filter.text_query.clone(),
		tags: filter.category.clone(),
		min_users_count: filter.min_popularity,
		max_users_count: filter.max_popularity,
	}
}

impl CloutService {
	pub(crate) async fn lookup_external(&self, filter: &Filter) -> ExternalLookup {
		let cfg = &self.cfg.providers.stats;
		let query = stats_query(filter);
		let timeout = Duration::from_millis(cfg.timeout_ms);

		match tokio::time::timeout(timeout, self.providers.stats.search(cfg, &query)).await {
			Ok(Ok(profiles)) =>
				ExternalLookup::Found(profiles.into_iter().map(ProfileRecord::from_stats).collect()),
			Ok(Err(err)) => ExternalLookup::Degraded { reason: err.to_string() },
			Err(_) => ExternalLookup::Degraded {
				reason: format!("Provider did not respond within {} ms.", cfg.timeout_ms),
			},
		}
	}
}
