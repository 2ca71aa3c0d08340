pub mod cache;
pub mod profile;
pub mod profiles;
pub mod search;
pub mod store;

mod error;

pub use cache::{CallerScope, TagCache};
pub use error::{Error, Result};
pub use profile::{ProfileDetail, ProfileRecord, Rating, ScoreSummary};
pub use profiles::CreateProfileRequest;
pub use search::{
	SearchRequest, SearchResponse,
	external::ExternalLookup,
	filter::{Filter, LOCAL_PAGE_SIZE, LocalQuery, Predicate},
	merge::merge,
};
pub use store::PgCatalogStore;

use std::{future::Future, pin::Pin, sync::Arc};

use clout_config::{Config, StatsProviderConfig};
use clout_providers::stats::{self, StatsProfile, StatsQuery};
use clout_storage::{
	db::Db,
	models::{InfluencerScores, NewInfluencer},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence operations the service needs from the catalog.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	/// Runs the local search. Results are already ordered and capped.
	fn find_profiles<'a>(
		&'a self,
		query: &'a LocalQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>>;

	/// Inserts a profile and attaches `categories`. A category failure must not undo the profile.
	fn create_profile<'a>(
		&'a self,
		profile: &'a NewInfluencer,
		categories: &'a [String],
	) -> BoxFuture<'a, Result<ProfileRecord>>;

	fn profile_detail<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<Option<ProfileDetail>>>;

	fn profile_id<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Option<i32>>>;

	fn refresh_scores<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<Option<InfluencerScores>>>;

	fn delete_profile<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<bool>>;
}

pub trait StatsProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a StatsProviderConfig,
		query: &'a StatsQuery,
	) -> BoxFuture<'a, clout_providers::Result<Vec<StatsProfile>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub stats: Arc<dyn StatsProvider>,
}
impl Providers {
	pub fn new(stats: Arc<dyn StatsProvider>) -> Self {
		Self { stats }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { stats: Arc::new(DefaultProviders) }
	}
}

pub struct CloutService {
	pub cfg: Config,
	pub store: Arc<dyn CatalogStore>,
	pub providers: Providers,
	pub cache: TagCache,
}
impl CloutService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_parts(cfg, Arc::new(PgCatalogStore::new(db)), Providers::default())
	}

	pub fn with_parts(cfg: Config, store: Arc<dyn CatalogStore>, providers: Providers) -> Self {
		let cache = TagCache::new(&cfg.search.cache);

		Self { cfg, store, providers, cache }
	}
}

struct DefaultProviders;

impl StatsProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a StatsProviderConfig,
		query: &'a StatsQuery,
	) -> BoxFuture<'a, clout_providers::Result<Vec<StatsProfile>>> {
		Box::pin(stats::search(cfg, query))
	}
}
