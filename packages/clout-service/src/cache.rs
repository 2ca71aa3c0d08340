//! Short-lived memory of provider tags seen by recent searches.
//!
//! A completed search overwrites the slot of its [`CallerScope`] with the tags of every merged
//! record that carried any. Profile creation later reads that slot to attach categories without
//! asking the provider again.
//!
//! Within one slot the last search to *complete* wins, not the last to start. Under
//! [`CacheScope::Process`] every caller shares a single slot, so a creation call can pick up tags
//! from another caller's concurrent search. [`CacheScope::Caller`] confines that race to callers
//! presenting the same session.

use std::{
	collections::HashMap,
	sync::Mutex,
	time::{Duration, Instant},
};

use clout_config::{CacheScope, SearchCache};

use crate::ProfileRecord;

/// Identifies whose searches feed a cache slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallerScope {
	/// Callers that did not identify a session.
	Shared,
	Session(String),
}
impl CallerScope {
	pub fn from_session(session: Option<&str>) -> Self {
		match session.map(str::trim).filter(|value| !value.is_empty()) {
			Some(session) => Self::Session(session.to_string()),
			None => Self::Shared,
		}
	}
}

#[derive(Debug)]
struct Slot {
	written_at: Instant,
	tags: HashMap<String, Vec<String>>,
}

#[derive(Debug)]
pub struct TagCache {
	mode: CacheScope,
	ttl: Duration,
	max_scopes: usize,
	slots: Mutex<HashMap<CallerScope, Slot>>,
}
impl TagCache {
	pub fn new(cfg: &SearchCache) -> Self {
		Self {
			mode: cfg.scope,
			ttl: Duration::from_secs(cfg.ttl_secs),
			max_scopes: cfg.max_scopes.max(1),
			slots: Mutex::new(HashMap::new()),
		}
	}

	/// Replaces the scope's slot with the tags carried by `records`.
	pub fn store(&self, scope: &CallerScope, records: &[ProfileRecord]) {
		self.store_at(scope, records, Instant::now());
	}

	/// Tags cached for `external_id` by the scope's latest search, if still fresh.
	pub fn tags_for(&self, scope: &CallerScope, external_id: &str) -> Option<Vec<String>> {
		self.tags_for_at(scope, external_id, Instant::now())
	}

	fn key(&self, scope: &CallerScope) -> CallerScope {
		match self.mode {
			CacheScope::Process => CallerScope::Shared,
			CacheScope::Caller => scope.clone(),
		}
	}

	fn store_at(&self, scope: &CallerScope, records: &[ProfileRecord], now: Instant) {
		let tags = records
			.iter()
			.filter(|record| !record.tags.is_empty())
			.map(|record| (record.external_id.clone(), record.tags.clone()))
			.collect();
		let key = self.key(scope);
		let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());

		slots.retain(|_, slot| now.saturating_duration_since(slot.written_at) < self.ttl);
		slots.insert(key, Slot { written_at: now, tags });

		while slots.len() > self.max_scopes {
			let Some(oldest) = slots
				.iter()
				.min_by_key(|(_, slot)| slot.written_at)
				.map(|(key, _)| key.clone())
			else {
				break;
			};

			slots.remove(&oldest);
		}
	}

	fn tags_for_at(
		&self,
		scope: &CallerScope,
		external_id: &str,
		now: Instant,
	) -> Option<Vec<String>> {
		let key = self.key(scope);
		let slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
		let slot = slots.get(&key)?;

		if now.saturating_duration_since(slot.written_at) >= self.ttl {
			return None;
		}

		slot.tags.get(external_id).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cfg(scope: CacheScope, max_scopes: usize) -> SearchCache {
		SearchCache { scope, ttl_secs: 60, max_scopes }
	}

	fn tagged(external_id: &str, tags: &[&str]) -> ProfileRecord {
		ProfileRecord {
			id: None,
			external_id: external_id.to_string(),
			social_type: None,
			group_id: None,
			url: None,
			display_name: String::new(),
			screen_name: String::new(),
			image_url: String::new(),
			description: String::new(),
			popularity_count: None,
			score: None,
			credibility_score: None,
			categories: Vec::new(),
			tags: tags.iter().map(|tag| tag.to_string()).collect(),
		}
	}

	fn session(name: &str) -> CallerScope {
		CallerScope::from_session(Some(name))
	}

	#[test]
	fn blank_session_is_shared() {
		assert_eq!(CallerScope::from_session(Some("  ")), CallerScope::Shared);
		assert_eq!(CallerScope::from_session(None), CallerScope::Shared);
	}

	#[test]
	fn returns_tags_for_matching_id_only() {
		let cache = TagCache::new(&cfg(CacheScope::Caller, 8));

		cache.store(&CallerScope::Shared, &[tagged("x", &["fitness", "travel"]), tagged("y", &[])]);

		assert_eq!(
			cache.tags_for(&CallerScope::Shared, "x"),
			Some(vec!["fitness".to_string(), "travel".to_string()])
		);
		assert_eq!(cache.tags_for(&CallerScope::Shared, "y"), None);
		assert_eq!(cache.tags_for(&CallerScope::Shared, "z"), None);
	}

	#[test]
	fn later_search_replaces_the_slot() {
		let cache = TagCache::new(&cfg(CacheScope::Caller, 8));
		let scope = session("s1");

		cache.store(&scope, &[tagged("x", &["fitness"])]);
		cache.store(&scope, &[tagged("y", &["food"])]);

		assert_eq!(cache.tags_for(&scope, "x"), None);
		assert_eq!(cache.tags_for(&scope, "y"), Some(vec!["food".to_string()]));
	}

	#[test]
	fn caller_mode_isolates_sessions() {
		let cache = TagCache::new(&cfg(CacheScope::Caller, 8));

		cache.store(&session("s1"), &[tagged("x", &["fitness"])]);

		assert_eq!(cache.tags_for(&session("s2"), "x"), None);
		assert_eq!(cache.tags_for(&CallerScope::Shared, "x"), None);
		assert!(cache.tags_for(&session("s1"), "x").is_some());
	}

	#[test]
	fn process_mode_shares_one_slot() {
		let cache = TagCache::new(&cfg(CacheScope::Process, 8));

		cache.store(&session("s1"), &[tagged("x", &["fitness"])]);

		assert_eq!(cache.tags_for(&session("s2"), "x"), Some(vec!["fitness".to_string()]));

		cache.store(&session("s2"), &[tagged("y", &["food"])]);

		assert_eq!(cache.tags_for(&session("s1"), "x"), None);
	}

	#[test]
	fn slots_expire_after_ttl() {
		let cache = TagCache::new(&cfg(CacheScope::Caller, 8));
		let start = Instant::now();

		cache.store_at(&CallerScope::Shared, &[tagged("x", &["fitness"])], start);

		assert!(cache.tags_for_at(&CallerScope::Shared, "x", start + Duration::from_secs(59)).is_some());
		assert!(cache.tags_for_at(&CallerScope::Shared, "x", start + Duration::from_secs(60)).is_none());
	}

	#[test]
	fn oldest_slot_is_evicted_beyond_capacity() {
		let cache = TagCache::new(&cfg(CacheScope::Caller, 2));
		let start = Instant::now();

		cache.store_at(&session("a"), &[tagged("x", &["one"])], start);
		cache.store_at(&session("b"), &[tagged("x", &["two"])], start + Duration::from_secs(1));
		cache.store_at(&session("c"), &[tagged("x", &["three"])], start + Duration::from_secs(2));

		let now = start + Duration::from_secs(3);

		assert_eq!(cache.tags_for_at(&session("a"), "x", now), None);
		assert_eq!(cache.tags_for_at(&session("b"), "x", now), Some(vec!["two".to_string()]));
		assert_eq!(cache.tags_for_at(&session("c"), "x", now), Some(vec!["three".to_string()]));
	}
}
