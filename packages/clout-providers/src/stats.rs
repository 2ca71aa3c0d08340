//! Client for the external profile-statistics search endpoint.
//!
//! The provider ranks candidates itself. This module only translates a query into the provider's
//! parameter names and decodes the `data` array it returns.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

pub const PAGE: u32 = 1;
pub const PER_PAGE: u32 = 10;
pub const SORT_BY_POPULARITY_DESC: &str = "-usersCount";

/// Search criteria in provider terms. Absent fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
	pub text: Option<String>,
	pub tags: Option<String>,
	pub min_users_count: Option<i64>,
	pub max_users_count: Option<i64>,
}
impl StatsQuery {
	pub fn to_params(&self, source_type: &str) -> Vec<(&'static str, String)> {
		let mut params = vec![
			("page", PAGE.to_string()),
			("perPage", PER_PAGE.to_string()),
			("sort", SORT_BY_POPULARITY_DESC.to_string()),
		];

		if let Some(text) = &self.text {
			params.push(("q", text.clone()));
		}
		if let Some(tags) = &self.tags {
			params.push(("tags", tags.clone()));
		}

		params.push(("socialTypes", source_type.to_string()));

		if let Some(min) = self.min_users_count {
			params.push(("minUsersCount", min.to_string()));
		}
		if let Some(max) = self.max_users_count {
			params.push(("maxUsersCount", max.to_string()));
		}

		params.push(("trackTotal", "true".to_string()));

		params
	}
}

/// One candidate as reported by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsProfile {
	pub cid: String,
	#[serde(default)]
	pub social_type: Option<String>,
	#[serde(default, rename = "groupID")]
	pub group_id: Option<Value>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub screen_name: Option<String>,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub users_count: Option<i64>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
}
impl StatsProfile {
	/// The provider sends group ids as either strings or numbers.
	pub fn group_id_string(&self) -> Option<String> {
		match self.group_id.as_ref()? {
			Value::String(value) => Some(value.clone()),
			Value::Number(value) => Some(value.to_string()),
			_ => None,
		}
	}
}

pub async fn search(
	cfg: &clout_config::StatsProviderConfig,
	query: &StatsQuery,
) -> Result<Vec<StatsProfile>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.headers(crate::auth_headers(cfg)?)
		.query(&query.to_params(&cfg.source_type))
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { status: status.as_u16() });
	}

	let json: Value = res.json().await?;

	parse_search_response(json)
}

fn parse_search_response(json: Value) -> Result<Vec<StatsProfile>> {
	let data = json.get("data").and_then(Value::as_array).ok_or_else(|| Error::InvalidResponse {
		message: "Stats response is missing data array.".to_string(),
	})?;
	let mut profiles = Vec::with_capacity(data.len());

	for item in data {
		match StatsProfile::deserialize(item) {
			Ok(profile) if !profile.cid.trim().is_empty() => profiles.push(profile),
			Ok(_) => tracing::debug!("Skipping stats candidate with blank cid."),
			Err(err) => tracing::debug!(error = %err, "Skipping malformed stats candidate."),
		}
	}

	Ok(profiles)
}
