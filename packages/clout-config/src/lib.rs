mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	CacheScope, Config, Postgres, Providers, Search, SearchCache, Service, StatsProviderConfig,
	Storage,
};

use std::{env, fs, path::Path};

pub const STATS_API_KEY_ENV: &str = "CLOUT_STATS_API_KEY";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg = parse(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, env::var(STATS_API_KEY_ENV).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn parse(raw: &str) -> std::result::Result<Config, toml::de::Error> {
	toml::from_str(raw)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::validation("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns", "must be greater than zero."));
	}

	let stats = &cfg.providers.stats;

	if stats.api_base.trim().is_empty() {
		return Err(Error::validation("providers.stats.api_base", "must be non-empty."));
	}
	if stats.api_key.trim().is_empty() {
		return Err(Error::validation(
			"providers.stats.api_key",
			format!("must be non-empty, either inline or through {STATS_API_KEY_ENV}."),
		));
	}
	if stats.api_key_header.trim().is_empty() {
		return Err(Error::validation("providers.stats.api_key_header", "must be non-empty."));
	}
	if stats.timeout_ms == 0 {
		return Err(Error::validation("providers.stats.timeout_ms", "must be greater than zero."));
	}
	if stats.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::validation("providers.stats.default_headers", "values must be strings."));
	}
	if cfg.search.cache.ttl_secs == 0 {
		return Err(Error::validation("search.cache.ttl_secs", "must be greater than zero."));
	}
	if cfg.search.cache.max_scopes == 0 {
		return Err(Error::validation("search.cache.max_scopes", "must be greater than zero."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config, env_api_key: Option<String>) {
	let stats = &mut cfg.providers.stats;

	if stats.api_key.trim().is_empty()
		&& let Some(key) = env_api_key.filter(|key| !key.trim().is_empty())
	{
		stats.api_key = key;
	}

	stats.source_type = stats.source_type.trim().to_string();

	if stats.source_type.is_empty() {
		stats.source_type = "INST".to_string();
	}
}
