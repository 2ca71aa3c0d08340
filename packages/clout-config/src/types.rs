use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub stats: StatsProviderConfig,
}

/// Connection settings for the external profile-statistics provider.
#[derive(Debug, Deserialize)]
pub struct StatsProviderConfig {
	pub api_base: String,
	pub path: String,
	/// Falls back to `CLOUT_STATS_API_KEY` when blank.
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_api_key_header")]
	pub api_key_header: String,
	pub host: String,
	/// Provider-side network filter, e.g. "INST".
	#[serde(default = "default_source_type")]
	pub source_type: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub cache: SearchCache,
}

#[derive(Debug, Deserialize)]
pub struct SearchCache {
	#[serde(default)]
	pub scope: CacheScope,
	pub ttl_secs: u64,
	pub max_scopes: usize,
}

/// Who shares the tag cache written by a completed search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
	/// One slot for the whole process. Any caller may read tags written by another caller's
	/// search.
	Process,
	/// One slot per caller session. Callers without a session share a single anonymous slot.
	#[default]
	Caller,
}

fn default_api_key_header() -> String {
	"X-RapidAPI-Key".to_string()
}

fn default_source_type() -> String {
	"INST".to_string()
}
